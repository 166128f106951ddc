//! Model — data-transfer types convertible to and from entities.

use crate::entity::Entity;

/// Contract for data models that convert to and from an [`Entity`].
///
/// Both conversions must be pure and deterministic. Implementers should make
/// them mutual inverses on every field meaningful to the domain, so that
/// `M::from_entity(e).to_entity()` reproduces `e`. The trait cannot enforce
/// this; test it for each concrete model.
pub trait EntityModel<E: Entity>: Sized {
    /// Convert this model into its entity.
    fn to_entity(&self) -> E;

    /// Build a model from an entity.
    fn from_entity(entity: E) -> Self;
}
