use derive_more::{Display, From, FromStr};
use serde::{Deserialize, Serialize};

/// Assigned by the store on first persistence; stable and never reused.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnouncementId(pub i64);

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, From, FromStr, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientId(pub i64);
