//! Entity <-> row conversion

use crate::traits::Entity;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Converts between a domain entity `E` and the row type `D` it is stored as.
pub trait Converter<E: Entity, D: Entity<Id = E::Id>>: Send + Sync {
    fn to_entity(&self, dto: D) -> E;

    fn to_dto(&self, entity: E) -> D;
}

/// Converter built from two closures.
pub struct ManualConverter<E, D> {
    to_entity: Arc<dyn Fn(D) -> E + Send + Sync>,
    to_dto: Arc<dyn Fn(E) -> D + Send + Sync>,
}

impl<E, D> ManualConverter<E, D> {
    pub fn new<F, G>(to_entity: F, to_dto: G) -> Self
    where
        F: Fn(D) -> E + Send + Sync + 'static,
        G: Fn(E) -> D + Send + Sync + 'static,
    {
        Self {
            to_entity: Arc::new(to_entity),
            to_dto: Arc::new(to_dto),
        }
    }
}

impl<E, D> Clone for ManualConverter<E, D> {
    fn clone(&self) -> Self {
        Self {
            to_entity: Arc::clone(&self.to_entity),
            to_dto: Arc::clone(&self.to_dto),
        }
    }
}

impl<E, D> fmt::Debug for ManualConverter<E, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualConverter").finish_non_exhaustive()
    }
}

impl<E, D> Converter<E, D> for ManualConverter<E, D>
where
    E: Entity,
    D: Entity<Id = E::Id>,
{
    fn to_entity(&self, dto: D) -> E {
        (self.to_entity)(dto)
    }

    fn to_dto(&self, entity: E) -> D {
        (self.to_dto)(entity)
    }
}

/// Converter for entities that are stored as themselves.
pub struct IdentityConverter<E>(PhantomData<fn() -> E>);

impl<E> IdentityConverter<E> {
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<E> Default for IdentityConverter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for IdentityConverter<E> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for IdentityConverter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentityConverter")
    }
}

impl<E: Entity> Converter<E, E> for IdentityConverter<E> {
    fn to_entity(&self, dto: E) -> E {
        dto
    }

    fn to_dto(&self, entity: E) -> E {
        entity
    }
}

/// Convert every item with `convert`, keeping order.
pub fn to_many<A, B, F>(items: Vec<A>, convert: F) -> Vec<B>
where
    F: FnMut(A) -> B,
{
    items.into_iter().map(convert).collect()
}
