//! Child comparer creation

use std::sync::Arc;

use super::{Comparer, ObjectComparer};
use crate::reflect::TypeDesc;
use crate::settings::ComparisonSettings;

/// Supplies the comparer used for a nested value
///
/// Comparers returned without a tree builder can still be used for flat
/// comparisons and, unless list or tree hooks are configured, for trees.
pub trait ComparerFactory: Send + Sync {
    fn get_comparer_for_type(
        &self,
        ty: &TypeDesc,
        settings: &ComparisonSettings,
        parent: &Comparer,
    ) -> Arc<dyn ObjectComparer>;
}

/// Children share the parent's settings and its current overrides snapshot
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultComparerFactory;

impl ComparerFactory for DefaultComparerFactory {
    fn get_comparer_for_type(
        &self,
        _ty: &TypeDesc,
        _settings: &ComparisonSettings,
        parent: &Comparer,
    ) -> Arc<dyn ObjectComparer> {
        Arc::new(parent.clone())
    }
}
