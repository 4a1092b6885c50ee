//! Transform lookup by handle.
//!
//! The [`TransformResolver`] trait is the seam between size calculations and
//! wherever transform definitions live. The production implementation is
//! [`TransformRegistry`], built from the `[transforms.*]` tables of the site
//! config. Callers pass a resolver explicitly; nothing here reaches into
//! global state.

use super::transform::{DimensionError, TransformDescriptor};
use std::collections::BTreeMap;

/// Looks up a transform descriptor by its handle.
pub trait TransformResolver: Sync {
    /// Resolve `handle`, failing with [`DimensionError::TransformNotFound`]
    /// when no transform by that name exists.
    fn resolve(&self, handle: &str) -> Result<TransformDescriptor, DimensionError>;
}

/// In-memory transform table keyed by handle, ordered by handle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformRegistry {
    transforms: BTreeMap<String, TransformDescriptor>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a transform under `handle`.
    pub fn insert(&mut self, handle: impl Into<String>, transform: TransformDescriptor) {
        self.transforms.insert(handle.into(), transform);
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Iterate `(handle, transform)` pairs in handle order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TransformDescriptor)> {
        self.transforms.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<S: Into<String>> FromIterator<(S, TransformDescriptor)> for TransformRegistry {
    fn from_iter<I: IntoIterator<Item = (S, TransformDescriptor)>>(iter: I) -> Self {
        Self {
            transforms: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl TransformResolver for TransformRegistry {
    fn resolve(&self, handle: &str) -> Result<TransformDescriptor, DimensionError> {
        match self.transforms.get(handle) {
            Some(transform) => Ok(*transform),
            None => {
                tracing::debug!(handle, known = self.transforms.len(), "transform lookup missed");
                Err(DimensionError::TransformNotFound(handle.to_string()))
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::TransformMode;
    use std::sync::Mutex;

    /// Resolver that records every lookup and answers from a fixed table.
    /// Uses Mutex (not RefCell) so it is Sync like the real registry.
    #[derive(Default)]
    pub struct RecordingResolver {
        pub registry: TransformRegistry,
        pub lookups: Mutex<Vec<String>>,
    }

    impl RecordingResolver {
        pub fn with(handle: &str, transform: TransformDescriptor) -> Self {
            let mut registry = TransformRegistry::new();
            registry.insert(handle, transform);
            Self {
                registry,
                lookups: Mutex::new(Vec::new()),
            }
        }

        pub fn get_lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    impl TransformResolver for RecordingResolver {
        fn resolve(&self, handle: &str) -> Result<TransformDescriptor, DimensionError> {
            self.lookups.lock().unwrap().push(handle.to_string());
            self.registry.resolve(handle)
        }
    }

    fn thumb() -> TransformDescriptor {
        TransformDescriptor::new(TransformMode::ScaleAndCrop, 200, 200).unwrap()
    }

    #[test]
    fn registry_resolves_known_handle() {
        let mut registry = TransformRegistry::new();
        registry.insert("thumb", thumb());
        assert_eq!(registry.resolve("thumb"), Ok(thumb()));
    }

    #[test]
    fn registry_unknown_handle_is_typed_error() {
        let registry = TransformRegistry::new();
        assert_eq!(
            registry.resolve("hero"),
            Err(DimensionError::TransformNotFound("hero".to_string()))
        );
    }

    #[test]
    fn registry_iterates_in_handle_order() {
        let fit = TransformDescriptor::new(TransformMode::ScaleToFit, 800, 600).unwrap();
        let registry: TransformRegistry = [("thumb", thumb()), ("hero", fit)].into_iter().collect();
        let handles: Vec<&str> = registry.iter().map(|(h, _)| h).collect();
        assert_eq!(handles, vec!["hero", "thumb"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn recording_resolver_logs_lookups() {
        let resolver = RecordingResolver::with("thumb", thumb());
        assert!(resolver.resolve("thumb").is_ok());
        assert!(resolver.resolve("missing").is_err());
        assert_eq!(resolver.get_lookups(), vec!["thumb", "missing"]);
    }
}
