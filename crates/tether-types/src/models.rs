use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A one-time code issued for a game identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeInfo {
    pub code: String,
    /// Game identity the code was issued for.
    pub subject_id: String,
    pub issued_at: DateTime<Utc>,
    /// Recorded only. Lookups do not reject codes past this point.
    pub expires_at: DateTime<Utc>,
}

/// Permanent 1:1 link between a game identity and a chat identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    pub game_id: String,
    pub chat_id: String,
}
