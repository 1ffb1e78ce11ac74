//! Student identifiers.

use std::fmt;

use mongodb::bson::oid::ObjectId;

use super::error::StudentError;

/// A store-assigned student identifier: a MongoDB ObjectId, rendered as
/// 24 lowercase hex characters at the API boundary.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct StudentId(ObjectId);

impl StudentId {
    /// Mints a fresh identifier. Only stores call this.
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Parses the path form of an identifier.
    pub fn parse(raw: &str) -> Result<Self, StudentError> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|_| StudentError::InvalidIdentifier)
    }

    pub fn as_object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for StudentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}
