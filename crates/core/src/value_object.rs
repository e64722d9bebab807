//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. A food type or a quantity in kilograms is a value object,
//! a movement record (which carries a `RecordId`) is an entity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// ```ignore
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// struct Kilograms(f64);
///
/// impl ValueObject for Kilograms {}
///
/// assert_eq!(Kilograms(2.5), Kilograms(2.5));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
