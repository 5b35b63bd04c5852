use serde::{Deserialize, Serialize};

/// A user record as the server returns it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    /// Server-assigned, immutable identifier
    pub id: u64,
    pub name: String,
    pub email: String,
    pub age: u32,
}

/// Write-request body for create and update calls.
///
/// The id is never part of the body; for updates it lives in the URL only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub age: u32,
}
