use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Type-keyed resource map components use to publish handles to each other.
///
/// Each type appears at most once. The gaps component publishes its gap handle
/// here so sizing code can pull derived widths without owning the component.
#[derive(Clone, Default)]
pub struct SharedState {
    inner: Arc<RwLock<HashMap<TypeId, Box<dyn Any + Send + Sync>>>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_arc<T>(&self, value: Arc<T>) -> Result<(), SharedStateError>
    where
        T: Send + Sync + 'static,
    {
        let mut guard = self.inner.write().map_err(|_| SharedStateError::Poisoned)?;
        let type_id = TypeId::of::<T>();
        if guard.contains_key(&type_id) {
            return Err(SharedStateError::AlreadyExists);
        }
        guard.insert(type_id, Box::new(value));
        Ok(())
    }

    pub fn get<T>(&self) -> Result<Arc<T>, SharedStateError>
    where
        T: Send + Sync + 'static,
    {
        let guard = self.inner.read().map_err(|_| SharedStateError::Poisoned)?;
        guard
            .get(&TypeId::of::<T>())
            .ok_or(SharedStateError::Missing)?
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(SharedStateError::TypeMismatch)
    }

    pub fn contains<T>(&self) -> bool
    where
        T: Send + Sync + 'static,
    {
        self.inner
            .read()
            .map(|guard| guard.contains_key(&TypeId::of::<T>()))
            .unwrap_or(false)
    }

    pub fn get_or_insert_with<T, F>(&self, make: F) -> Result<Arc<T>, SharedStateError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> T,
    {
        let mut guard = self.inner.write().map_err(|_| SharedStateError::Poisoned)?;
        let entry = guard
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Arc::new(make())));
        entry
            .downcast_ref::<Arc<T>>()
            .cloned()
            .ok_or(SharedStateError::TypeMismatch)
    }
}

#[derive(Debug, Error)]
pub enum SharedStateError {
    #[error("resource already exists")]
    AlreadyExists,
    #[error("resource missing")]
    Missing,
    #[error("resource type mismatch")]
    TypeMismatch,
    #[error("shared state poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gap::{GapHandle, GapValue};

    #[test]
    fn published_handle_is_shared() {
        let state = SharedState::new();
        let handle = Arc::new(GapHandle::new(GapValue::new(12u32)));
        state.insert_arc(handle.clone()).unwrap();

        let fetched = state.get::<GapHandle>().unwrap();
        assert!(Arc::ptr_eq(&handle, &fetched));
        handle.set(30u32);
        assert_eq!(fetched.value().get(), 30);
    }

    #[test]
    fn second_publish_fails() {
        let state = SharedState::new();
        state.insert_arc(Arc::new(GapHandle::default())).unwrap();
        let err = state.insert_arc(Arc::new(GapHandle::default())).unwrap_err();
        assert!(matches!(err, SharedStateError::AlreadyExists));
    }

    #[test]
    fn missing_resource_reports_missing() {
        let state = SharedState::new();
        assert!(!state.contains::<GapHandle>());
        let err = state.get::<GapHandle>().unwrap_err();
        assert!(matches!(err, SharedStateError::Missing));
    }

    #[test]
    fn lazy_init_runs_once() {
        let state = SharedState::new();
        let first = state
            .get_or_insert_with(|| GapHandle::new(GapValue::new(4u32)))
            .unwrap();
        let second = state
            .get_or_insert_with(|| GapHandle::new(GapValue::new(99u32)))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.value().get(), 4);
    }
}
