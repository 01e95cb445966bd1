//! Groups ("pools") of participants who pair among themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GroupId;

/// Maximum length of a group name.
pub const MAX_GROUP_NAME_LEN: usize = 64;

/// A named pool of participants tied to one chat channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier (immutable after creation).
    pub id: GroupId,
    /// Human-readable name, unique across the service.
    pub name: String,
    /// Chat channel the group lives in, unique across the service.
    pub channel_id: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Creates a new group.
    #[must_use]
    pub fn new(name: impl Into<String>, channel_id: impl Into<String>) -> Self {
        Self {
            id: GroupId::new(),
            name: name.into(),
            channel_id: channel_id.into(),
            created_at: Utc::now(),
        }
    }
}
