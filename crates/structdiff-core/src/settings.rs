//! Comparison settings
//!
//! Flags and hooks shared by a comparer and every child comparer it creates.
//! Each hook receives the [`NodeContext`] of the node being compared.

use std::fmt;
use std::sync::Arc;

use crate::diff::{Difference, NodeContext, TreeMember};
use crate::reflect::{MemberInfo, TypeDesc};
use crate::strategies::lists::ListComparisonOptions;

pub type ListComparisonHook = Arc<dyn Fn(&NodeContext, &mut ListComparisonOptions) + Send + Sync>;
pub type TreeMemberHook = Arc<dyn Fn(&NodeContext, &MemberInfo) -> TreeMember + Send + Sync>;
pub type RootMemberHook = Arc<dyn Fn(&TypeDesc) -> Option<TreeMember> + Send + Sync>;
pub type DifferenceHook = Arc<dyn Fn(&NodeContext, Difference) -> Difference + Send + Sync>;
pub type PathInsertionHook = Arc<dyn Fn(&NodeContext, Difference, &str) -> Difference + Send + Sync>;

#[derive(Clone)]
pub struct ComparisonSettings {
    recursive_comparison: bool,
    empty_and_null_collections_equal: bool,
    use_default_if_member_absent: bool,
    list_comparison: Option<ListComparisonHook>,
    tree_member: Option<TreeMemberHook>,
    root_member: Option<RootMemberHook>,
    difference: Option<DifferenceHook>,
    path_insertion: Option<PathInsertionHook>,
}

impl Default for ComparisonSettings {
    fn default() -> Self {
        Self {
            recursive_comparison: true,
            empty_and_null_collections_equal: false,
            use_default_if_member_absent: false,
            list_comparison: None,
            tree_member: None,
            root_member: None,
            difference: None,
            path_insertion: None,
        }
    }
}

impl fmt::Debug for ComparisonSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonSettings")
            .field("recursive_comparison", &self.recursive_comparison)
            .field(
                "empty_and_null_collections_equal",
                &self.empty_and_null_collections_equal,
            )
            .field(
                "use_default_if_member_absent",
                &self.use_default_if_member_absent,
            )
            .field("list_comparison", &self.list_comparison.is_some())
            .field("tree_member", &self.tree_member.is_some())
            .field("root_member", &self.root_member.is_some())
            .field("difference", &self.difference.is_some())
            .field("path_insertion", &self.path_insertion.is_some())
            .finish()
    }
}

impl ComparisonSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// When false, structural members are never enumerated
    pub fn with_recursive_comparison(mut self, enabled: bool) -> Self {
        self.recursive_comparison = enabled;
        self
    }

    pub fn with_empty_and_null_collections_equal(mut self, enabled: bool) -> Self {
        self.empty_and_null_collections_equal = enabled;
        self
    }

    /// Compare a member missing from a dynamic object as its type's default
    pub fn with_use_default_if_member_absent(mut self, enabled: bool) -> Self {
        self.use_default_if_member_absent = enabled;
        self
    }

    pub fn configure_list_comparison(
        mut self,
        hook: impl Fn(&NodeContext, &mut ListComparisonOptions) + Send + Sync + 'static,
    ) -> Self {
        self.list_comparison = Some(Arc::new(hook));
        self
    }

    pub fn configure_tree_member(
        mut self,
        hook: impl Fn(&NodeContext, &MemberInfo) -> TreeMember + Send + Sync + 'static,
    ) -> Self {
        self.tree_member = Some(Arc::new(hook));
        self
    }

    pub fn configure_root_member(
        mut self,
        hook: impl Fn(&TypeDesc) -> Option<TreeMember> + Send + Sync + 'static,
    ) -> Self {
        self.root_member = Some(Arc::new(hook));
        self
    }

    pub fn configure_difference(
        mut self,
        hook: impl Fn(&NodeContext, Difference) -> Difference + Send + Sync + 'static,
    ) -> Self {
        self.difference = Some(Arc::new(hook));
        self
    }

    pub fn configure_path_insertion(
        mut self,
        hook: impl Fn(&NodeContext, Difference, &str) -> Difference + Send + Sync + 'static,
    ) -> Self {
        self.path_insertion = Some(Arc::new(hook));
        self
    }

    pub fn recursive_comparison(&self) -> bool {
        self.recursive_comparison
    }

    pub fn empty_and_null_collections_equal(&self) -> bool {
        self.empty_and_null_collections_equal
    }

    pub fn use_default_if_member_absent(&self) -> bool {
        self.use_default_if_member_absent
    }

    /// List, tree-member or root-member hooks make sense only with a real tree
    pub fn requires_tree_fidelity(&self) -> bool {
        self.list_comparison.is_some() || self.tree_member.is_some() || self.root_member.is_some()
    }

    /// List options for the list at `ctx`
    pub fn list_options(&self, ctx: &NodeContext) -> ListComparisonOptions {
        let mut options = ListComparisonOptions::default();
        if let Some(hook) = &self.list_comparison {
            hook(ctx, &mut options);
        }
        options
    }

    pub fn tree_member(&self, ctx: &NodeContext, member: &MemberInfo) -> TreeMember {
        match &self.tree_member {
            Some(hook) => hook(ctx, member),
            None => TreeMember::from_info(member),
        }
    }

    pub fn root_member(&self, ty: &TypeDesc) -> Option<TreeMember> {
        self.root_member.as_ref().and_then(|hook| hook(ty))
    }

    pub fn shape_difference(&self, ctx: &NodeContext, difference: Difference) -> Difference {
        match &self.difference {
            Some(hook) => hook(ctx, difference),
            None => difference,
        }
    }

    pub fn insert_path(&self, ctx: &NodeContext, difference: Difference, segment: &str) -> Difference {
        match &self.path_insertion {
            Some(hook) => hook(ctx, difference, segment),
            None => difference.insert_path(segment),
        }
    }
}
