//! Lane assignment: give every fragment of one day a lane so that no two
//! fragments in the same lane overlap.
//!
//! The packing is greedy first-fit in input order. Each fragment starts at
//! lane 0, and every time it collides with an already placed fragment of its
//! current lane it moves one lane down and the scan restarts from the first
//! placed fragment. This does not minimize the lane count; it reproduces the
//! calendar's historical packing, so callers relying on stable row heights get
//! the same answer for the same sorted input.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::event::{Fragment, LaneFragment};

/// How interval boundaries are compared when testing two fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// `[start, end)` intervals: a fragment ending exactly when another starts
    /// does not overlap it.
    #[default]
    HalfOpen,
    /// Closed intervals: touching fragments overlap and are pushed to
    /// separate lanes.
    Inclusive,
}

impl OverlapPolicy {
    /// Whether `a` and `b` overlap under this policy.
    pub fn overlaps(self, a: &Fragment, b: &Fragment) -> bool {
        match self {
            OverlapPolicy::HalfOpen => {
                a.start_in_seconds < b.end_in_seconds && b.start_in_seconds < a.end_in_seconds
            }
            OverlapPolicy::Inclusive => {
                a.start_in_seconds <= b.end_in_seconds && b.start_in_seconds <= a.end_in_seconds
            }
        }
    }
}

/// The fragments of one day with their lanes, and the number of lanes used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayLanes {
    pub fragments: Vec<LaneFragment>,
    /// `1 + max(lane_index)`, or 1 for an empty day. Multiplies the row height.
    pub lane_count: usize,
}

/// Assign lanes to one day's fragments using [`OverlapPolicy::HalfOpen`].
///
/// Fragments are processed in input order; sort by `start_in_seconds` first
/// for a sensible packing.
///
/// # Errors
/// Returns `CalendarError::InvalidEvent` when a fragment ends before it starts.
pub fn assign_lanes(fragments: &[Fragment]) -> Result<DayLanes> {
    assign_lanes_with(fragments, OverlapPolicy::default())
}

/// Assign lanes to one day's fragments under `policy`.
pub fn assign_lanes_with(fragments: &[Fragment], policy: OverlapPolicy) -> Result<DayLanes> {
    place(fragments.iter().map(|f| (f.clone(), 0)), policy)
}

/// Re-run assignment on already annotated fragments, starting each one from
/// its previous lane instead of lane 0.
pub fn reassign_lanes(fragments: &[LaneFragment], policy: OverlapPolicy) -> Result<DayLanes> {
    place(
        fragments
            .iter()
            .map(|lf| (lf.fragment.clone(), lf.lane_index)),
        policy,
    )
}

fn place(
    fragments: impl Iterator<Item = (Fragment, usize)>,
    policy: OverlapPolicy,
) -> Result<DayLanes> {
    let mut placed: Vec<LaneFragment> = Vec::new();
    let mut max_lane = 0;

    for (fragment, first_lane) in fragments {
        fragment.validate()?;

        let mut lane = first_lane;
        loop {
            let conflict = placed
                .iter()
                .filter(|p| p.lane_index == lane)
                .any(|p| policy.overlaps(&fragment, &p.fragment));

            if !conflict {
                break;
            }
            lane += 1;
        }

        max_lane = max_lane.max(lane);
        placed.push(LaneFragment {
            fragment,
            lane_index: lane,
        });
    }

    Ok(DayLanes {
        fragments: placed,
        lane_count: max_lane + 1,
    })
}
