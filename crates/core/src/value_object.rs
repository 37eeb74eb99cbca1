//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values.
/// `Money`, confirmation requests and entity snapshots are value objects;
/// to "modify" one, build a new one.
///
/// ```ignore
/// let a = Money::from_units(100);
/// let b = Money::from_cents(10_000);
/// assert_eq!(a, b); // equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
