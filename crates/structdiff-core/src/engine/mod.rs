//! Comparison engine
//!
//! [`Comparer`] walks two values of a known static type and yields every
//! [`Difference`] lazily. For each value pair it applies, in order:
//!
//! 1. runtime resolution when the static type is `Any`
//! 2. a value-level override, or the default comparer for primitives
//! 3. the first matching container strategy
//! 4. the null guard
//! 5. member-by-member recursion through child comparers from the factory

pub mod factory;

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use structdiff_core_types::RunId;

use crate::diff::{Difference, DifferenceKind, DifferenceTree, NodeCursor};
use crate::errors::{CompareError, Result};
use crate::overrides::{MemberFilter, OverridesCollection};
use crate::reflect::{MemberInfo, Reflect, TypeDesc, Value};
use crate::settings::ComparisonSettings;
use crate::strategies::{builtin_strategies, ContainerStrategy, StrategyScope};
use crate::value_comparer::{DefaultValueComparer, ValueComparer};
use crate::{log_op_end, log_op_error, log_op_start};

pub use factory::{ComparerFactory, DefaultComparerFactory};

/// Lazy sequence of differences; errors surface as `Err` items
pub type Differences = Box<dyn Iterator<Item = Result<Difference>>>;

pub fn empty() -> Differences {
    Box::new(std::iter::empty())
}

pub fn single(difference: Difference) -> Differences {
    Box::new(std::iter::once(Ok(difference)))
}

pub fn failed(error: CompareError) -> Differences {
    Box::new(std::iter::once(Err(error)))
}

/// Runs `f` only when the first item is requested
pub fn deferred(f: impl FnOnce() -> Differences + 'static) -> Differences {
    Box::new(std::iter::once_with(f).flatten())
}

/// Produces the flat differences of two values
pub trait ObjectComparer {
    fn calculate_differences(
        &self,
        ty: &TypeDesc,
        v1: &Value,
        v2: &Value,
        member: Option<&MemberInfo>,
    ) -> Differences;

    /// `None` when this comparer cannot record into a difference tree
    fn tree_builder(&self) -> Option<&dyn DifferenceTreeBuilder> {
        None
    }
}

/// Records differences into the tree below `cursor` while yielding them
pub trait DifferenceTreeBuilder {
    fn build_difference_tree(
        &self,
        ty: &TypeDesc,
        v1: &Value,
        v2: &Value,
        member: Option<&MemberInfo>,
        cursor: &NodeCursor,
    ) -> Differences;
}

/// Deep structural comparer
///
/// Cloning is cheap; clones share settings, strategies and an overrides
/// snapshot. Registering an override on a comparer never affects clones or
/// children created before the registration.
#[derive(Clone)]
pub struct Comparer {
    settings: Arc<ComparisonSettings>,
    overrides: Arc<OverridesCollection>,
    default_comparer: Arc<dyn ValueComparer>,
    factory: Arc<dyn ComparerFactory>,
    strategies: Arc<Vec<Arc<dyn ContainerStrategy>>>,
    custom_strategies: usize,
}

impl Default for Comparer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Comparer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Comparer")
            .field("settings", &self.settings)
            .field("overrides", &self.overrides)
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Comparer {
    pub fn new() -> Self {
        Self::with_settings(ComparisonSettings::default())
    }

    pub fn with_settings(settings: ComparisonSettings) -> Self {
        Self {
            settings: Arc::new(settings),
            overrides: Arc::new(OverridesCollection::new()),
            default_comparer: Arc::new(DefaultValueComparer),
            factory: Arc::new(DefaultComparerFactory),
            strategies: Arc::new(builtin_strategies()),
            custom_strategies: 0,
        }
    }

    pub fn with_factory(mut self, factory: impl ComparerFactory + 'static) -> Self {
        self.factory = Arc::new(factory);
        self
    }

    /// Probe `strategy` before the built-in ones, after earlier custom ones
    pub fn with_container_strategy(mut self, strategy: impl ContainerStrategy + 'static) -> Self {
        let at = self.custom_strategies;
        Arc::make_mut(&mut self.strategies).insert(at, Arc::new(strategy));
        self.custom_strategies += 1;
        self
    }

    pub fn settings(&self) -> &ComparisonSettings {
        &self.settings
    }

    pub fn overrides(&self) -> &OverridesCollection {
        &self.overrides
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn set_default_comparer(&mut self, comparer: impl ValueComparer + 'static) {
        self.default_comparer = Arc::new(comparer);
    }

    // ---------- Override registration ----------

    /// # Errors
    ///
    /// `DuplicateOverride` if the member already has an override
    pub fn add_member_override(
        &mut self,
        member: &MemberInfo,
        comparer: impl ValueComparer + 'static,
    ) -> Result<()> {
        tracing::debug!(member = %member.qualified_name(), "member override registered");
        Arc::make_mut(&mut self.overrides).add_member_override(member, Arc::new(comparer))
    }

    /// Override the member `name` of `T`
    ///
    /// # Errors
    ///
    /// `UnknownMember` if `T` has no such member, `DuplicateOverride` if it
    /// already has an override
    pub fn add_member_override_for<T: Reflect>(
        &mut self,
        name: &str,
        comparer: impl ValueComparer + 'static,
    ) -> Result<()> {
        let ty = T::type_desc();
        let member = ty
            .member(name)
            .cloned()
            .ok_or_else(|| CompareError::UnknownMember {
                type_name: ty.name().to_string(),
                member: name.to_string(),
            })?;
        self.add_member_override(&member, comparer)
    }

    pub fn add_type_override(
        &mut self,
        ty: &TypeDesc,
        comparer: impl ValueComparer + 'static,
        filter: Option<MemberFilter>,
    ) {
        tracing::debug!(type_name = ty.name(), filtered = filter.is_some(), "type override registered");
        Arc::make_mut(&mut self.overrides).add_type_override(ty, Arc::new(comparer), filter);
    }

    pub fn add_type_override_for<T: Reflect>(
        &mut self,
        comparer: impl ValueComparer + 'static,
        filter: Option<MemberFilter>,
    ) {
        self.add_type_override(&T::type_desc(), comparer, filter);
    }

    pub fn add_name_override(
        &mut self,
        name: &str,
        comparer: impl ValueComparer + 'static,
        filter: Option<MemberFilter>,
    ) {
        tracing::debug!(member = name, filtered = filter.is_some(), "name override registered");
        Arc::make_mut(&mut self.overrides).add_name_override(name, Arc::new(comparer), filter);
    }

    pub fn add_predicate_override(
        &mut self,
        predicate: impl Fn(&MemberInfo) -> bool + Send + Sync + 'static,
        comparer: impl ValueComparer + 'static,
    ) {
        Arc::make_mut(&mut self.overrides)
            .add_predicate_override(Arc::new(predicate), Arc::new(comparer));
    }

    // ---------- Typed entry points ----------

    /// # Errors
    ///
    /// Override ambiguity or strategy misuse met before the first difference
    pub fn compare<T: Reflect>(&self, a: &T, b: &T) -> Result<bool> {
        self.compare_values(&T::type_desc(), &a.to_value(), &b.to_value())
    }

    /// # Errors
    ///
    /// The first error met during the comparison
    pub fn compare_with_differences<T: Reflect>(
        &self,
        a: &T,
        b: &T,
    ) -> Result<(bool, Vec<Difference>)> {
        self.compare_values_with_differences(&T::type_desc(), &a.to_value(), &b.to_value())
    }

    pub fn differences<T: Reflect>(&self, a: &T, b: &T) -> Differences {
        self.value_differences(&T::type_desc(), &a.to_value(), &b.to_value())
    }

    /// # Errors
    ///
    /// The first error met during the comparison
    pub fn compare_with_tree<T: Reflect>(&self, a: &T, b: &T) -> Result<DifferenceTree> {
        self.compare_values_with_tree(&T::type_desc(), &a.to_value(), &b.to_value())
    }

    // ---------- Value entry points ----------

    /// Lazy differences of two values of static type `ty`
    pub fn value_differences(&self, ty: &TypeDesc, v1: &Value, v2: &Value) -> Differences {
        let this = self.clone();
        let (ty, v1, v2) = (ty.clone(), v1.clone(), v2.clone());
        deferred(move || this.calculate(&ty, &v1, &v2, None, &NodeCursor::implicit_root()))
    }

    /// # Errors
    ///
    /// Override ambiguity or strategy misuse met before the first difference
    pub fn compare_values(&self, ty: &TypeDesc, v1: &Value, v2: &Value) -> Result<bool> {
        let run_id = RunId::new();
        let start = Instant::now();
        log_op_start!("compare", run_id = %run_id, type_name = ty.name());

        let result = match self.value_differences(ty, v1, v2).next() {
            None => Ok(true),
            Some(Ok(_)) => Ok(false),
            Some(Err(e)) => Err(e),
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(equal) => {
                log_op_end!("compare", duration_ms = duration_ms, run_id = %run_id, equal = *equal);
            }
            Err(e) => {
                log_op_error!("compare", e.clone(), duration_ms = duration_ms, run_id = %run_id);
            }
        }
        result
    }

    /// # Errors
    ///
    /// The first error met during the comparison
    pub fn compare_values_with_differences(
        &self,
        ty: &TypeDesc,
        v1: &Value,
        v2: &Value,
    ) -> Result<(bool, Vec<Difference>)> {
        let run_id = RunId::new();
        let start = Instant::now();
        log_op_start!("compare_with_differences", run_id = %run_id, type_name = ty.name());

        let result: Result<Vec<Difference>> = self.value_differences(ty, v1, v2).collect();

        let duration_ms = start.elapsed().as_millis() as u64;
        match &result {
            Ok(differences) => {
                log_op_end!(
                    "compare_with_differences",
                    duration_ms = duration_ms,
                    run_id = %run_id,
                    difference_count = differences.len()
                );
            }
            Err(e) => {
                log_op_error!(
                    "compare_with_differences",
                    e.clone(),
                    duration_ms = duration_ms,
                    run_id = %run_id
                );
            }
        }
        result.map(|differences| (differences.is_empty(), differences))
    }

    /// Compare and record every difference into a fresh tree
    ///
    /// Each tree difference keeps the path it had where it was found,
    /// relative to its node.
    ///
    /// # Errors
    ///
    /// The first error met during the comparison, including
    /// `TreeBuilderNotImplemented` from a factory-supplied comparer
    pub fn compare_values_with_tree(
        &self,
        ty: &TypeDesc,
        v1: &Value,
        v2: &Value,
    ) -> Result<DifferenceTree> {
        let run_id = RunId::new();
        let start = Instant::now();
        log_op_start!("compare_with_tree", run_id = %run_id, type_name = ty.name());

        let tree = Rc::new(RefCell::new(DifferenceTree::new(
            self.settings.root_member(ty),
        )));
        let cursor = NodeCursor::explicit_root(Rc::clone(&tree));
        let mut count = 0usize;
        let mut outcome = Ok(());
        for item in self.build_difference_tree(ty, v1, v2, None, &cursor) {
            match item {
                Ok(_) => count += 1,
                Err(e) => {
                    outcome = Err(e);
                    break;
                }
            }
        }
        drop(cursor);

        let duration_ms = start.elapsed().as_millis() as u64;
        match outcome {
            Ok(()) => {
                let tree = Rc::try_unwrap(tree)
                    .map(RefCell::into_inner)
                    .unwrap_or_else(|shared| shared.borrow().clone());
                log_op_end!(
                    "compare_with_tree",
                    duration_ms = duration_ms,
                    run_id = %run_id,
                    difference_count = count,
                    node_count = tree.node_count()
                );
                Ok(tree)
            }
            Err(e) => {
                log_op_error!(
                    "compare_with_tree",
                    e.clone(),
                    duration_ms = duration_ms,
                    run_id = %run_id
                );
                Err(e)
            }
        }
    }

    // ---------- Traversal ----------

    /// Differences of one value pair, recorded below `cursor`
    pub(crate) fn calculate(
        &self,
        ty: &TypeDesc,
        v1: &Value,
        v2: &Value,
        member: Option<&MemberInfo>,
        cursor: &NodeCursor,
    ) -> Differences {
        if ty.is_any() {
            return self.calculate_runtime(v1, v2, member, cursor);
        }

        let resolved = match member {
            Some(m) => self.overrides.resolve_member(m),
            None => self.overrides.resolve_type(ty),
        };
        let resolved = match resolved {
            Ok(resolved) => resolved,
            Err(e) => return failed(e),
        };
        if resolved.is_some() || ty.is_primitive() {
            let comparer = resolved.unwrap_or_else(|| Arc::clone(&self.default_comparer));
            return self.compare_directly(comparer.as_ref(), v1, v2, "", cursor);
        }

        if let Some(strategy) = self.strategy_for(ty, v1, v2) {
            tracing::trace!(strategy = strategy.name(), type_name = ty.name(), "container strategy matched");
            let scope = StrategyScope {
                comparer: self,
                ty,
                v1,
                v2,
                member,
                cursor,
            };
            let stops = strategy.stops_further_comparison(&scope);
            let differences = strategy.compare(&scope);
            if stops {
                return differences;
            }
            let this = self.clone();
            let (ty, v1, v2, cursor) = (ty.clone(), v1.clone(), v2.clone(), cursor.clone());
            return Box::new(
                differences.chain(deferred(move || this.compare_structure(&ty, &v1, &v2, &cursor))),
            );
        }

        self.compare_structure(ty, v1, v2, cursor)
    }

    /// Static type `Any`: continue with the runtime type of the operands
    fn calculate_runtime(
        &self,
        v1: &Value,
        v2: &Value,
        member: Option<&MemberInfo>,
        cursor: &NodeCursor,
    ) -> Differences {
        match (v1.runtime_type(), v2.runtime_type()) {
            (None, None) => empty(),
            (None, Some(_)) | (Some(_), None) => self.emit(
                cursor,
                Difference::value_mismatch("", self.render(v1), self.render(v2)),
            ),
            (Some(t1), Some(t2)) if t1 != t2 && !(t1.is_record() && t2.is_record()) => {
                tracing::trace!(left = t1.name(), right = t2.name(), "runtime type mismatch");
                self.emit(
                    cursor,
                    Difference::new(
                        "",
                        self.render(v1),
                        self.render(v2),
                        DifferenceKind::TypeMismatch,
                    )
                    .with_note(format!("{} != {}", t1.name(), t2.name())),
                )
            }
            (Some(t1), Some(_)) if t1.is_any() => {
                self.compare_directly(self.default_comparer.as_ref(), v1, v2, "", cursor)
            }
            (Some(t1), Some(_)) => self.calculate(&t1, v1, v2, member, cursor),
        }
    }

    fn strategy_for(&self, ty: &TypeDesc, v1: &Value, v2: &Value) -> Option<&Arc<dyn ContainerStrategy>> {
        self.strategies.iter().find(|s| s.matches(ty, v1, v2))
    }

    /// Null guard followed by member recursion
    fn compare_structure(
        &self,
        ty: &TypeDesc,
        v1: &Value,
        v2: &Value,
        cursor: &NodeCursor,
    ) -> Differences {
        match (v1.is_null(), v2.is_null()) {
            (true, true) => empty(),
            (true, false) | (false, true) => self.emit(
                cursor,
                Difference::value_mismatch("", self.render(v1), self.render(v2)),
            ),
            _ if !self.settings.recursive_comparison() => empty(),
            _ => self.compare_members(ty, v1, v2, cursor),
        }
    }

    fn compare_members(
        &self,
        ty: &TypeDesc,
        v1: &Value,
        v2: &Value,
        cursor: &NodeCursor,
    ) -> Differences {
        let members: Vec<MemberInfo> = ty
            .members()
            .iter()
            .filter(|m| {
                !self
                    .strategies
                    .iter()
                    .any(|s| s.matches(ty, v1, v2) && s.skips_member(ty, m))
            })
            .cloned()
            .collect();
        tracing::trace!(type_name = ty.name(), members = members.len(), "comparing members");

        let this = self.clone();
        let (v1, v2, cursor) = (v1.clone(), v2.clone(), cursor.clone());
        Box::new(
            members
                .into_iter()
                .flat_map(move |m| this.compare_member(&m, &v1, &v2, &cursor)),
        )
    }

    fn compare_member(
        &self,
        member: &MemberInfo,
        v1: &Value,
        v2: &Value,
        cursor: &NodeCursor,
    ) -> Differences {
        let left = v1.member_value(member.name()).unwrap_or(Value::Null);
        let right = v2.member_value(member.name()).unwrap_or(Value::Null);
        let node = cursor.add_descendant(Some(self.settings.tree_member(cursor.context(), member)));

        let resolved = match self.overrides.resolve_member(member) {
            Ok(resolved) => resolved,
            Err(e) => return failed(e),
        };
        let declared = member.declared_type();
        match resolved {
            None if !declared.is_primitive() => {
                let nested = self.nested_differences(declared, &left, &right, Some(member), &node);
                self.prefixed(nested, member.name(), node)
            }
            resolved => {
                let comparer = resolved.unwrap_or_else(|| Arc::clone(&self.default_comparer));
                self.compare_directly(comparer.as_ref(), &left, &right, member.name(), &node)
            }
        }
    }

    /// Differences of a nested value from a factory-supplied comparer
    pub(crate) fn nested_differences(
        &self,
        ty: &TypeDesc,
        v1: &Value,
        v2: &Value,
        member: Option<&MemberInfo>,
        cursor: &NodeCursor,
    ) -> Differences {
        let child = self.factory.get_comparer_for_type(ty, &self.settings, self);
        if let Some(builder) = child.tree_builder() {
            return builder.build_difference_tree(ty, v1, v2, member, cursor);
        }
        if cursor.is_implicit() {
            return child.calculate_differences(ty, v1, v2, member);
        }
        if self.settings.requires_tree_fidelity() {
            return failed(CompareError::TreeBuilderNotImplemented {
                type_name: ty.name().to_string(),
            });
        }
        tracing::debug!(type_name = ty.name(), "comparer has no tree builder, recording flat differences");
        let cursor = cursor.clone();
        Box::new(
            child
                .calculate_differences(ty, v1, v2, member)
                .inspect(move |item| {
                    if let Ok(difference) = item {
                        cursor.add_difference(difference);
                    }
                }),
        )
    }

    /// Prefix every nested path with `segment` through the path insertion hook
    pub(crate) fn prefixed(&self, nested: Differences, segment: &str, node: NodeCursor) -> Differences {
        let settings = Arc::clone(&self.settings);
        let segment = segment.to_string();
        Box::new(nested.map(move |item| {
            item.map(|difference| settings.insert_path(node.context(), difference, &segment))
        }))
    }

    /// At most one difference from a value comparer
    pub(crate) fn compare_directly(
        &self,
        comparer: &dyn ValueComparer,
        v1: &Value,
        v2: &Value,
        path: &str,
        cursor: &NodeCursor,
    ) -> Differences {
        if comparer.equal(v1, v2, &self.settings) {
            return empty();
        }
        self.emit(
            cursor,
            Difference::value_mismatch(path, comparer.render(v1), comparer.render(v2)),
        )
    }

    /// Shape `difference` through the settings hook and attach it to the node
    pub(crate) fn record(&self, cursor: &NodeCursor, difference: Difference) -> Difference {
        let difference = self.settings.shape_difference(cursor.context(), difference);
        cursor.add_difference(&difference);
        difference
    }

    pub(crate) fn emit(&self, cursor: &NodeCursor, difference: Difference) -> Differences {
        single(self.record(cursor, difference))
    }

    pub(crate) fn render(&self, value: &Value) -> String {
        self.default_comparer.render(value)
    }

    pub(crate) fn value_comparer_for(&self, ty: &TypeDesc) -> Result<Arc<dyn ValueComparer>> {
        Ok(self
            .overrides
            .resolve_type(ty)?
            .unwrap_or_else(|| Arc::clone(&self.default_comparer)))
    }
}

impl ObjectComparer for Comparer {
    fn calculate_differences(
        &self,
        ty: &TypeDesc,
        v1: &Value,
        v2: &Value,
        member: Option<&MemberInfo>,
    ) -> Differences {
        self.calculate(ty, v1, v2, member, &NodeCursor::implicit_root())
    }

    fn tree_builder(&self) -> Option<&dyn DifferenceTreeBuilder> {
        Some(self)
    }
}

impl DifferenceTreeBuilder for Comparer {
    fn build_difference_tree(
        &self,
        ty: &TypeDesc,
        v1: &Value,
        v2: &Value,
        member: Option<&MemberInfo>,
        cursor: &NodeCursor,
    ) -> Differences {
        let this = self.clone();
        let (ty, v1, v2, member, cursor) = (
            ty.clone(),
            v1.clone(),
            v2.clone(),
            member.cloned(),
            cursor.clone(),
        );
        deferred(move || this.calculate(&ty, &v1, &v2, member.as_ref(), &cursor))
    }
}
