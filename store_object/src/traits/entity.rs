use serde::Serialize;
use std::fmt::Debug;

/// Anything that carries an identifier.
///
/// Implemented by domain entities and by the row types (DTOs) they are stored as.
/// Both sides of a conversion must use the same `Id`.
pub trait Entity: Send + Sync {
    /// Identifier type. `Default` is the "not assigned yet" value.
    type Id: Clone + Send + Sync + Debug + PartialEq + Default + Serialize;

    fn id(&self) -> Self::Id;

    /// Whether the identifier differs from its unassigned value.
    fn has_id(&self) -> bool {
        self.id() != Self::Id::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tag {
        id: i64,
    }

    impl Entity for Tag {
        type Id = i64;

        fn id(&self) -> i64 {
            self.id
        }
    }

    #[test]
    fn test_has_id() {
        assert!(!Tag { id: 0 }.has_id());
        assert!(Tag { id: 9 }.has_id());
    }
}
