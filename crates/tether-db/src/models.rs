/// Database row types. These map directly to SQLite rows and stay
/// independent of the tether-types API models.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingRow {
    pub id: i64,
    pub chat_id: String,
    pub game_id: String,
    pub created_at: String,
}

/// Result of an insert attempt against the two unique identity columns.
#[derive(Debug)]
pub enum InsertOutcome {
    Inserted(BindingRow),
    /// An existing row already holds the chat id, the game id, or both.
    Taken(BindingRow),
}
