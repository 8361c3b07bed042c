use serde::Serialize;

/// A tennis player as referenced by the results feed. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Player {
    /// Provider player id (e.g. "xGJsdJvO")
    pub id: String,
    /// Url-style display name (e.g. "alcaraz-carlos")
    pub name: String,
    pub nationality: String,
    /// Profile page link synthesized from name and id
    pub link: String,
}
