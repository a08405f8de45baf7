//! Entity trait: identity + continuity across state changes.

/// Marker + minimal interface for records with identity.
///
/// Two entities are "the same thing" when their ids match, regardless of how
/// their attribute values have drifted apart.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Identity comparison (not value equality).
    fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
