//! Identifiers module provides `Id` for GPU resources and other engine-related objects

use std::{
    fmt::Debug,
    hash::{Hash, Hasher},
    marker::PhantomData,
};

pub use uuid::Uuid;

/// Typed resource identifier
pub struct Id<T> {
    /// Actual identifier value
    value: uuid::Uuid,
    phantom: PhantomData<T>,
}

impl<T> Id<T> {
    /// Construct new Id from parts
    pub fn new(low: u64, high: u64) -> Self {
        Self {
            value: uuid::Uuid::from_u64_pair(low, high),
            phantom: PhantomData,
        }
    }

    /// Constructs new random id
    pub fn random() -> Self {
        Self {
            value: uuid::Uuid::new_v4(),
            phantom: PhantomData,
        }
    }

    /// Checks if id is null
    pub fn is_null(&self) -> bool {
        self.value.is_nil()
    }

    /// Returns reference to internal Uuid instance
    pub fn uuid(&self) -> &uuid::Uuid {
        &self.value
    }
}

impl<T> From<uuid::Uuid> for Id<T> {
    fn from(value: uuid::Uuid) -> Self {
        Self {
            value,
            phantom: PhantomData,
        }
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> Debug for Id<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let of_type = std::any::type_name::<T>()
            .rsplit("::")
            .next()
            .unwrap_or("?");
        write!(f, "Id<{}>({})", of_type, self.value.hyphenated())
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self {
            value: uuid::Uuid::nil(),
            phantom: PhantomData,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Texture;

    #[test]
    fn random_ids_are_distinct_and_not_null() {
        let ids = (0..16).map(|_| Id::<Texture>::random()).collect::<HashSet<_>>();
        assert_eq!(ids.len(), 16);
        assert!(ids.iter().all(|id| !id.is_null()));
        assert!(Id::<Texture>::default().is_null());
    }

    #[test]
    fn debug_shows_short_type_name() {
        let id = Id::<Texture>::new(0, 1);
        assert!(format!("{:?}", id).starts_with("Id<Texture>("));
    }
}
