//! Leaf value comparers
//!
//! A value comparer decides equality of two values compared as a whole and
//! renders them for difference reports. Overrides attach comparers to
//! members, names, types or predicates.

use std::fmt;
use std::sync::Arc;

use crate::reflect::{TypeDesc, Value};
use crate::settings::ComparisonSettings;

pub trait ValueComparer: Send + Sync {
    fn equal(&self, a: &Value, b: &Value, settings: &ComparisonSettings) -> bool;

    fn render(&self, value: &Value) -> String {
        value.to_string()
    }
}

impl fmt::Debug for dyn ValueComparer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ValueComparer")
    }
}

/// Structural equality of [`Value`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValueComparer;

impl ValueComparer for DefaultValueComparer {
    fn equal(&self, a: &Value, b: &Value, _settings: &ComparisonSettings) -> bool {
        a == b
    }
}

/// Case-insensitive comparison of strings and characters
#[derive(Debug, Clone, Copy, Default)]
pub struct IgnoreCaseComparer;

impl ValueComparer for IgnoreCaseComparer {
    fn equal(&self, a: &Value, b: &Value, _settings: &ComparisonSettings) -> bool {
        match (a, b) {
            (Value::Str(x), Value::Str(y)) => x.to_lowercase() == y.to_lowercase(),
            (Value::Char(x), Value::Char(y)) => x.to_lowercase().eq(y.to_lowercase()),
            _ => a == b,
        }
    }
}

/// Treats null as a fixed default value before comparing
#[derive(Debug, Clone)]
pub struct NullAsDefaultComparer {
    default: Value,
}

impl NullAsDefaultComparer {
    pub fn new(default: Value) -> Self {
        Self { default }
    }

    /// Uses the default value of `ty`
    pub fn for_type(ty: &TypeDesc) -> Self {
        Self::new(ty.default_value())
    }

    fn normalize<'a>(&'a self, v: &'a Value) -> &'a Value {
        if v.is_null() {
            &self.default
        } else {
            v
        }
    }
}

impl ValueComparer for NullAsDefaultComparer {
    fn equal(&self, a: &Value, b: &Value, _settings: &ComparisonSettings) -> bool {
        self.normalize(a) == self.normalize(b)
    }
}

type EqualFn = dyn Fn(&Value, &Value) -> bool + Send + Sync;
type RenderFn = dyn Fn(&Value) -> String + Send + Sync;

/// Comparer built from closures
#[derive(Clone)]
pub struct FnValueComparer {
    equal: Arc<EqualFn>,
    render: Option<Arc<RenderFn>>,
}

impl FnValueComparer {
    pub fn new(equal: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            equal: Arc::new(equal),
            render: None,
        }
    }

    pub fn with_render(mut self, render: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }
}

impl ValueComparer for FnValueComparer {
    fn equal(&self, a: &Value, b: &Value, _settings: &ComparisonSettings) -> bool {
        (self.equal)(a, b)
    }

    fn render(&self, value: &Value) -> String {
        match &self.render {
            Some(render) => render(value),
            None => value.to_string(),
        }
    }
}

/// Never reports a difference
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysEqualComparer;

impl ValueComparer for AlwaysEqualComparer {
    fn equal(&self, _a: &Value, _b: &Value, _settings: &ComparisonSettings) -> bool {
        true
    }
}
