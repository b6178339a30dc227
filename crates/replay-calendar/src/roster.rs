//! Channel roster: an explicit, caller-owned cache of followed channels.
//!
//! The fetch layer fills the roster and asks it which ids still need to be
//! requested. Lookups may miss (banned or deleted accounts), so misses are
//! reported as recoverable errors or skipped with a warning, never a panic.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

/// Maximum number of ids the platform accepts in one lookup request.
pub const MAX_IDS_PER_REQUEST: usize = 100;

const CHANNEL_BASE_URL: &str = "https://www.twitch.tv";

/// A followed channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub login: String,
    pub display_name: String,
    #[serde(default)]
    pub profile_image_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct Roster {
    channels: HashMap<String, Channel>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Insert or replace a channel.
    pub fn insert(&mut self, channel: Channel) {
        self.channels.insert(channel.id.clone(), channel);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.channels.contains_key(id)
    }

    /// # Errors
    /// Returns `CalendarError::UserNotFound` when `id` is not cached.
    pub fn get(&self, id: &str) -> Result<&Channel> {
        self.channels
            .get(id)
            .ok_or_else(|| CalendarError::UserNotFound(id.to_string()))
    }

    /// Look up every id, keeping input order and skipping the ones that are
    /// not cached.
    pub fn resolve<'a, I>(&self, ids: I) -> Vec<&Channel>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter()
            .filter_map(|id| match self.get(id) {
                Ok(channel) => Some(channel),
                Err(_) => {
                    tracing::warn!(
                        user_id = id,
                        "channel not found, the account may be banned or deleted"
                    );
                    None
                }
            })
            .collect()
    }

    /// Ids not yet cached, deduplicated, split into request-sized batches.
    pub fn missing<'a, I>(&self, ids: I) -> Vec<Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = std::collections::HashSet::new();
        let missing: Vec<String> = ids
            .into_iter()
            .filter(|id| !self.contains(id) && seen.insert(*id))
            .map(str::to_string)
            .collect();

        missing
            .chunks(MAX_IDS_PER_REQUEST)
            .map(<[String]>::to_vec)
            .collect()
    }

    /// Public page of the channel that published `user_id`'s live stream.
    ///
    /// # Errors
    /// Returns `CalendarError::UserNotFound` when the channel is not cached.
    pub fn channel_url(&self, user_id: &str) -> Result<String> {
        let channel = self.get(user_id)?;
        Ok(format!("{}/{}", CHANNEL_BASE_URL, channel.login))
    }

    /// All cached channels ordered by login, ignoring case.
    pub fn sorted_by_login(&self) -> Vec<&Channel> {
        let mut channels: Vec<&Channel> = self.channels.values().collect();
        channels.sort_by_cached_key(|c| (c.login.to_lowercase(), c.id.clone()));
        channels
    }
}

impl Extend<Channel> for Roster {
    fn extend<T: IntoIterator<Item = Channel>>(&mut self, iter: T) {
        for channel in iter {
            self.insert(channel);
        }
    }
}

impl FromIterator<Channel> for Roster {
    fn from_iter<T: IntoIterator<Item = Channel>>(iter: T) -> Self {
        let mut roster = Roster::new();
        roster.extend(iter);
        roster
    }
}
