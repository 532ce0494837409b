//! Hierarchical difference recording.
//!
//! A [`DifferenceTree`] is an arena of nodes mirroring the traversed object
//! graph. The engine walks it through a [`NodeCursor`], which also carries
//! the [`NodeContext`] handed to settings hooks. An implicit cursor has a
//! context but no tree; differences added through it are dropped.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::diff::model::Difference;
use crate::errors::{CompareError, Result};
use crate::reflect::MemberInfo;

/// Member a tree node stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeMember {
    pub name: String,
    pub info: Option<MemberInfo>,
}

impl TreeMember {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: None,
        }
    }

    pub fn from_info(info: &MemberInfo) -> Self {
        Self {
            name: info.name().to_string(),
            info: Some(info.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
struct NodeData {
    member: Option<TreeMember>,
    differences: Vec<Difference>,
    descendants: Vec<NodeId>,
    ancestor: Option<NodeId>,
}

/// Arena-backed tree of differences
///
/// The root is created with the tree. Nodes added with [`add_node`] stay
/// detached until given an ancestor, which can happen only once.
///
/// [`add_node`]: DifferenceTree::add_node
#[derive(Debug, Clone)]
pub struct DifferenceTree {
    nodes: Vec<NodeData>,
}

impl DifferenceTree {
    pub fn new(root_member: Option<TreeMember>) -> Self {
        Self {
            nodes: vec![NodeData {
                member: root_member,
                ..NodeData::default()
            }],
        }
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.node(self.root_id())
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.0 < self.nodes.len(), "node {} out of range", id.0);
        NodeRef { tree: self, id }
    }

    /// Allocate a detached node
    pub fn add_node(&mut self, member: Option<TreeMember>) -> NodeId {
        self.nodes.push(NodeData {
            member,
            ..NodeData::default()
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Attach `node` below `ancestor`
    pub fn set_ancestor(&mut self, node: NodeId, ancestor: NodeId) -> Result<()> {
        if self.nodes[node.0].ancestor.is_some() || node == self.root_id() {
            return Err(CompareError::AncestorAlreadyAssigned { node: node.0 });
        }
        self.nodes[node.0].ancestor = Some(ancestor);
        self.nodes[ancestor.0].descendants.push(node);
        Ok(())
    }

    /// Allocate a node already attached below `parent`
    pub fn add_descendant(&mut self, parent: NodeId, member: Option<TreeMember>) -> NodeId {
        let id = self.add_node(member);
        self.nodes[id.0].ancestor = Some(parent);
        self.nodes[parent.0].descendants.push(id);
        id
    }

    pub fn add_difference(&mut self, node: NodeId, difference: Difference) {
        self.nodes[node.0].differences.push(difference);
    }

    /// All differences in the tree, depth first
    pub fn all_differences(&self) -> Vec<Difference> {
        self.root().all_differences()
    }

    pub fn has_differences(&self) -> bool {
        self.root().has_differences()
    }

    /// Number of nodes reachable from the root
    pub fn node_count(&self) -> usize {
        1 + self.root().descendant_count()
    }

    /// Drop every subtree that records no difference
    pub fn shrink(&mut self) {
        let mut nodes = Vec::with_capacity(self.nodes.len());
        self.copy_kept(self.root_id(), None, &mut nodes);
        self.nodes = nodes;
    }

    fn copy_kept(&self, id: NodeId, ancestor: Option<NodeId>, out: &mut Vec<NodeData>) -> NodeId {
        let source = &self.nodes[id.0];
        let new_id = NodeId(out.len());
        out.push(NodeData {
            member: source.member.clone(),
            differences: source.differences.clone(),
            descendants: Vec::new(),
            ancestor,
        });
        for &child in &source.descendants {
            if self.node(child).has_differences() {
                let copied = self.copy_kept(child, Some(new_id), out);
                out[new_id.0].descendants.push(copied);
            }
        }
        new_id
    }

    /// Serializable snapshot of the tree
    pub fn report(&self) -> TreeReport {
        self.root().report()
    }
}

/// Trees are equal when their reachable structure is equal
impl PartialEq for DifferenceTree {
    fn eq(&self, other: &Self) -> bool {
        self.report() == other.report()
    }
}

/// Borrowed view of one node
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a DifferenceTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn member(&self) -> Option<&'a TreeMember> {
        self.data().member.as_ref()
    }

    pub fn member_name(&self) -> Option<&'a str> {
        self.member().map(|m| m.name.as_str())
    }

    /// Differences attached directly to this node
    pub fn differences(&self) -> &'a [Difference] {
        &self.data().differences
    }

    pub fn descendants(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        self.data()
            .descendants
            .iter()
            .map(move |&id| NodeRef { tree, id })
    }

    /// First direct descendant with the given member name
    pub fn descendant(&self, name: &str) -> Option<NodeRef<'a>> {
        self.descendants().find(|n| n.member_name() == Some(name))
    }

    pub fn ancestor(&self) -> Option<NodeRef<'a>> {
        self.data().ancestor.map(|id| NodeRef {
            tree: self.tree,
            id,
        })
    }

    /// Differences of this node and its subtree, depth first
    pub fn all_differences(&self) -> Vec<Difference> {
        let mut out = Vec::new();
        self.collect_differences(&mut out);
        out
    }

    fn collect_differences(&self, out: &mut Vec<Difference>) {
        out.extend(self.differences().iter().cloned());
        for child in self.descendants() {
            child.collect_differences(out);
        }
    }

    pub fn has_differences(&self) -> bool {
        !self.differences().is_empty() || self.descendants().any(|c| c.has_differences())
    }

    fn descendant_count(&self) -> usize {
        self.descendants().map(|c| 1 + c.descendant_count()).sum()
    }

    pub fn report(&self) -> TreeReport {
        TreeReport {
            member: self.member_name().map(str::to_string),
            differences: self.differences().to_vec(),
            descendants: self.descendants().map(|c| c.report()).collect(),
        }
    }
}

/// Plain-data form of a tree, for serialization and equality
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub differences: Vec<Difference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub descendants: Vec<TreeReport>,
}

/// Position of the traversal, as seen by settings hooks
#[derive(Debug, Clone, Default)]
pub struct NodeContext {
    member: Option<TreeMember>,
    ancestor: Option<Rc<NodeContext>>,
}

impl NodeContext {
    pub fn member(&self) -> Option<&TreeMember> {
        self.member.as_ref()
    }

    pub fn ancestor(&self) -> Option<&NodeContext> {
        self.ancestor.as_deref()
    }

    pub fn depth(&self) -> usize {
        self.ancestor.as_ref().map_or(0, |a| 1 + a.depth())
    }

    /// Names of the members from the root down to this node
    pub fn member_path(&self) -> Vec<String> {
        let mut names = self
            .ancestor
            .as_ref()
            .map(|a| a.member_path())
            .unwrap_or_default();
        if let Some(m) = &self.member {
            names.push(m.name.clone());
        }
        names
    }
}

/// Current node of a traversal
#[derive(Debug, Clone)]
pub struct NodeCursor {
    context: Rc<NodeContext>,
    tree: Option<(Rc<RefCell<DifferenceTree>>, NodeId)>,
}

impl NodeCursor {
    /// A cursor that records nothing
    pub fn implicit_root() -> Self {
        Self {
            context: Rc::new(NodeContext::default()),
            tree: None,
        }
    }

    /// A cursor at the root of `tree`
    pub fn explicit_root(tree: Rc<RefCell<DifferenceTree>>) -> Self {
        let (member, root) = {
            let t = tree.borrow();
            (t.root().member().cloned(), t.root_id())
        };
        Self {
            context: Rc::new(NodeContext {
                member,
                ancestor: None,
            }),
            tree: Some((tree, root)),
        }
    }

    pub fn is_implicit(&self) -> bool {
        self.tree.is_none()
    }

    pub fn context(&self) -> &NodeContext {
        &self.context
    }

    pub fn node_id(&self) -> Option<NodeId> {
        self.tree.as_ref().map(|(_, id)| *id)
    }

    /// Step down into a new child node
    pub fn add_descendant(&self, member: Option<TreeMember>) -> NodeCursor {
        let tree = self.tree.as_ref().map(|(tree, id)| {
            let child = tree.borrow_mut().add_descendant(*id, member.clone());
            (Rc::clone(tree), child)
        });
        NodeCursor {
            context: Rc::new(NodeContext {
                member,
                ancestor: Some(Rc::clone(&self.context)),
            }),
            tree,
        }
    }

    pub fn add_difference(&self, difference: &Difference) {
        if let Some((tree, id)) = &self.tree {
            tree.borrow_mut().add_difference(*id, difference.clone());
        }
    }
}
