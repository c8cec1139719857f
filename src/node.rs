use std::{cell::RefCell, rc::Weak};

use crate::noderef::NodeRef;

/// Which side of its parent a node appeared on in the original linear sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn is_left(&self) -> bool {
        matches!(self, Side::Left)
    }

    pub fn is_right(&self) -> bool {
        matches!(self, Side::Right)
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("L"),
            Side::Right => f.write_str("R"),
        }
    }
}

/// The inner node stored behind a [`NodeRef`].
///
/// A node owns its value and its children. The parent link is a [`Weak`]
/// reference so a subtree never keeps its ancestors alive.
pub struct Node<T> {
    value: T,
    parent: Option<Weak<RefCell<Node<T>>>>,
    position: Option<Side>,
    children: Vec<NodeRef<T>>,

    // Set only on the synthetic root owned by a Bush
    anchor: bool,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T) -> Self {
        Node {
            value,
            parent: None,
            position: None,
            children: Vec::new(),
            anchor: false,
        }
    }

    pub(crate) fn new_anchor(value: T) -> Self {
        let mut node = Node::new(value);
        node.anchor = true;
        node
    }

    pub(crate) fn with_parent(mut self, parent: Weak<RefCell<Node<T>>>, position: Side) -> Self {
        self.parent = Some(parent);
        self.position = Some(position);
        self
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut self.value
    }

    pub(crate) fn set_value(&mut self, value: T) -> T {
        std::mem::replace(&mut self.value, value)
    }

    /// Position relative to the parent. `None` for free-standing roots and
    /// detached nodes. Roots of a [`crate::Bush`] are `Left` children of its
    /// hidden anchor, so they report `Some(Side::Left)` with no visible parent.
    pub fn position(&self) -> Option<Side> {
        self.position
    }

    pub fn children(&self) -> &[NodeRef<T>] {
        &self.children
    }

    /// Return the number of child nodes for this node
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn is_anchor(&self) -> bool {
        self.anchor
    }

    /// Upgrade the parent link, including an anchor parent.
    pub(crate) fn raw_parent(&self) -> Option<NodeRef<T>> {
        self.parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(NodeRef::from_rc)
    }

    /// Whether a parent link is recorded, even one whose parent was dropped.
    pub(crate) fn has_parent_link(&self) -> bool {
        self.parent.is_some()
    }

    pub(crate) fn detach(&mut self) {
        self.parent = None;
        self.position = None;
    }

    pub(crate) fn push_child(&mut self, node: NodeRef<T>) {
        self.children.push(node);
    }

    /// Insert a child node at the specified index
    pub(crate) fn insert_child(&mut self, node: NodeRef<T>, index: usize) {
        debug_assert!(index <= self.children.len());
        self.children.insert(index, node);
    }

    /// Remove a child by identity, returning it when it was present
    pub(crate) fn remove_child(&mut self, node: &NodeRef<T>) -> Option<NodeRef<T>> {
        let index = self.children.iter().position(|child| child.ptr_eq(node))?;
        Some(self.children.remove(index))
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<NodeRef<T>> {
        &mut self.children
    }
}

/// Unlinks the subtree with a work list so dropping a deep tree does not
/// recurse once per level.
impl<T> Drop for Node<T> {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(child) = stack.pop() {
            if let Some(mut node) = child.into_unique() {
                stack.append(&mut node.children);
            }
        }
    }
}

impl<T> std::fmt::Debug for Node<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("position", &self.position)
            .field("has_parent", &self.parent.is_some())
            .field("num_children", &self.children.len())
            .finish()
    }
}
