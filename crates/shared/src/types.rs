//! Common types used across Steeple

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Church (tenant) ID wrapper
///
/// Every query below the admission layer is scoped by one of these; the
/// admission core only ever reads them, it never mints or mutates tenants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChurchId(pub Uuid);

impl ChurchId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChurchId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ChurchId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ChurchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_church_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = ChurchId::from(uuid);
        assert_eq!(id.0, uuid);
    }

    #[test]
    fn test_church_id_serde_transparent() {
        let id = ChurchId::new();
        let json = serde_json::to_string(&id).unwrap();
        // Serializes as a bare UUID string, not a wrapper object
        assert_eq!(json, format!("\"{}\"", id.0));
    }
}
