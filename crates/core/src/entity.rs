//! Entity trait: identity + continuity across state changes.

/// Anything an operator can select, confirm and act on from a list.
///
/// Invoices also implement [`crate::AggregateRoot`] because their state
/// evolves through events.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Human-facing reference shown in confirmations (number or name).
    fn display_ref(&self) -> String;
}
