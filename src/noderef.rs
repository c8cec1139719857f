use std::{
    cell::{BorrowError, Ref, RefCell, RefMut},
    rc::{Rc, Weak},
};

use colored::Colorize as _;
use tracing::debug;

use crate::{
    error::{BushError, Result},
    iterator::LinearIter,
    node::{Node, Side},
};

/// Shared handle to a node in a bush.
///
/// Cloning a `NodeRef` clones the handle, not the subtree. Use
/// [`NodeRef::deep_clone`] for an independent copy.
pub struct NodeRef<T> {
    node_ref: Rc<RefCell<Node<T>>>,
}

impl<T> Clone for NodeRef<T> {
    fn clone(&self) -> Self {
        Self {
            node_ref: self.node_ref.clone(),
        }
    }
}

impl<T> NodeRef<T> {
    /// Create a free-standing root node.
    pub fn new(value: T) -> Self {
        Self::from_node(Node::new(value))
    }

    pub(crate) fn from_node(node: Node<T>) -> Self {
        Self {
            node_ref: Rc::new(RefCell::new(node)),
        }
    }

    pub(crate) fn from_rc(node_ref: Rc<RefCell<Node<T>>>) -> Self {
        Self { node_ref }
    }

    /// Take the inner node when this is the last strong handle to it.
    pub(crate) fn into_unique(self) -> Option<Node<T>> {
        Rc::try_unwrap(self.node_ref).ok().map(RefCell::into_inner)
    }

    fn weak(&self) -> Weak<RefCell<Node<T>>> {
        Rc::downgrade(&self.node_ref)
    }

    /// Get a reference to the inner node
    pub fn node(&self) -> Ref<'_, Node<T>> {
        self.node_ref.borrow()
    }

    pub fn try_node(&self) -> std::result::Result<Ref<'_, Node<T>>, BorrowError> {
        self.node_ref.try_borrow()
    }

    pub(crate) fn node_mut(&self) -> RefMut<'_, Node<T>> {
        self.node_ref.borrow_mut()
    }

    pub fn value(&self) -> Ref<'_, T> {
        Ref::map(self.node(), Node::value)
    }

    pub fn value_mut(&self) -> RefMut<'_, T> {
        RefMut::map(self.node_mut(), Node::value_mut)
    }

    /// Replace the value, returning the previous one.
    pub fn set_value(&self, value: T) -> T {
        self.node_mut().set_value(value)
    }

    /// Calls the provided closure with a reference to the node's value
    pub fn with_value<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(self.node().value())
    }

    /// Calls the provided closure with a mutable reference to the node's value
    pub fn with_value_mut<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut T) -> R,
    {
        f(self.node_mut().value_mut())
    }

    /// Side of the parent this node sits on. See [`Node::position`].
    pub fn position(&self) -> Option<Side> {
        self.node().position()
    }

    /// The parent of this node. Roots of a [`crate::Bush`] report no parent,
    /// though their [`position`](NodeRef::position) is still `Some(Side::Left)`.
    pub fn parent(&self) -> Option<NodeRef<T>> {
        self.node()
            .raw_parent()
            .filter(|parent| !parent.node().is_anchor())
    }

    pub fn is_root(&self) -> bool {
        self.parent().is_none()
    }

    /// Number of edges between this node and its root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(node) = current {
            depth += 1;
            current = node.parent();
        }
        depth
    }

    /// Snapshot of the child handles, in stored order.
    pub fn children(&self) -> Vec<NodeRef<T>> {
        self.node().children().to_vec()
    }

    pub fn left_children(&self) -> Vec<NodeRef<T>> {
        self.children_on(Side::Left)
    }

    pub fn right_children(&self) -> Vec<NodeRef<T>> {
        self.children_on(Side::Right)
    }

    fn children_on(&self, side: Side) -> Vec<NodeRef<T>> {
        self.node()
            .children()
            .iter()
            .filter(|child| child.position() == Some(side))
            .cloned()
            .collect()
    }

    pub fn num_children(&self) -> usize {
        self.node().num_children()
    }

    /// True when both handles point at the same node.
    pub fn ptr_eq(&self, other: &NodeRef<T>) -> bool {
        Rc::ptr_eq(&self.node_ref, &other.node_ref)
    }

    pub fn downgrade(&self) -> WeakNodeRef<T> {
        WeakNodeRef {
            node_ref: self.weak(),
        }
    }

    /// Append a new child holding `value` on the given side and return it.
    pub fn add_child(&self, value: T, side: Side) -> NodeRef<T> {
        let child = NodeRef::from_node(Node::new(value).with_parent(self.weak(), side));
        self.node_mut().push_child(child.clone());
        debug!("{} {} child", "Added".bright_green(), side);
        child
    }

    /// Insert a new child next to the first child matching `predicate`.
    ///
    /// The new node takes the side of the matched neighbour. Returns `None`
    /// without touching the tree when no child matches.
    pub fn insert_child<P>(&self, predicate: P, value: T, place_before: bool) -> Option<NodeRef<T>>
    where
        P: FnMut(&NodeRef<T>) -> bool,
    {
        let (index, side) = self.find_neighbour(predicate, place_before)?;
        let child = NodeRef::from_node(Node::new(value).with_parent(self.weak(), side));
        self.node_mut().insert_child(child.clone(), index);
        debug!("{} {} child at index {}", "Inserted".bright_green(), side, index);
        Some(child)
    }

    /// Locate the insertion index and side next to the first matching child.
    fn find_neighbour<P>(&self, mut predicate: P, place_before: bool) -> Option<(usize, Side)>
    where
        P: FnMut(&NodeRef<T>) -> bool,
    {
        let children = self.children();
        let index = children.iter().position(|child| predicate(child))?;
        let side = children[index].position()?;

        if place_before {
            Some((index, side))
        } else {
            Some((index + 1, side))
        }
    }

    /// Detach this node from its parent. Roots and detached nodes are left as is.
    ///
    /// A node whose parent has already been dropped is detached as well.
    pub fn remove(&self) {
        if !self.node().has_parent_link() {
            return;
        }

        let parent = self.node().raw_parent();
        if let Some(parent) = parent {
            if parent.node_mut().remove_child(self).is_some() {
                debug!("{} child", "Removed".bright_red());
            }
        }
        self.node_mut().detach();
    }

    /// Remove every descendant matching `predicate`.
    ///
    /// Matching direct children are removed first, then the surviving
    /// children are searched. The count includes only nodes that matched,
    /// not the descendants that went with them.
    pub fn remove_children<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&NodeRef<T>) -> bool,
    {
        self.remove_children_with(&mut predicate)
    }

    fn remove_children_with<P>(&self, predicate: &mut P) -> usize
    where
        P: FnMut(&NodeRef<T>) -> bool,
    {
        let mut count = 0;
        let mut stack = vec![self.clone()];

        // Survivors are pushed in reverse so they are visited in stored order
        while let Some(node) = stack.pop() {
            let (removed, kept): (Vec<_>, Vec<_>) = node
                .children()
                .into_iter()
                .partition(|child| predicate(child));

            if !removed.is_empty() {
                *node.node_mut().children_mut() = kept.clone();
                for child in &removed {
                    child.node_mut().detach();
                }
                debug!("{} {} children", "Removed".bright_red(), removed.len());
            }

            count += removed.len();
            stack.extend(kept.into_iter().rev());
        }
        count
    }

    /// Iterate the subtree in original left-to-right order.
    pub fn iter(&self) -> LinearIter<T> {
        LinearIter::new(self.clone())
    }

    /// First node in left-to-right order matching `predicate`.
    pub fn find<P>(&self, mut predicate: P) -> Option<NodeRef<T>>
    where
        P: FnMut(&NodeRef<T>) -> bool,
    {
        self.iter()
            .map(|node| node.into_node())
            .find(|node| predicate(node))
    }

    pub fn find_all<P>(&self, mut predicate: P) -> Vec<NodeRef<T>>
    where
        P: FnMut(&NodeRef<T>) -> bool,
    {
        self.iter()
            .map(|node| node.into_node())
            .filter(|node| predicate(node))
            .collect()
    }

    /// Join the values of the subtree in left-to-right order.
    pub fn join(&self, separator: &str) -> String
    where
        T: std::fmt::Display,
    {
        self.iter()
            .filter(|node| !node.node().is_anchor())
            .map(|node| node.value().to_string())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

impl<T> NodeRef<T>
where
    T: Clone,
{
    /// Copy the whole subtree into a new, detached tree.
    pub fn deep_clone(&self) -> NodeRef<T> {
        let clone = self.clone_subtree(None);
        debug!("{} subtree", "Cloned".bright_purple());
        clone
    }

    fn clone_subtree(&self, attach: Option<(Weak<RefCell<Node<T>>>, Side)>) -> NodeRef<T> {
        let root = NodeRef::from_node(self.clone_node(attach));

        // Pairs of (source, copy) whose children still need copying
        let mut stack = vec![(self.clone(), root.clone())];
        while let Some((source, copy)) = stack.pop() {
            for child in source.node().children() {
                let attach = child.position().map(|side| (copy.weak(), side));
                let child_copy = NodeRef::from_node(child.clone_node(attach));
                copy.node_mut().push_child(child_copy.clone());
                stack.push((child.clone(), child_copy));
            }
        }
        root
    }

    fn clone_node(&self, attach: Option<(Weak<RefCell<Node<T>>>, Side)>) -> Node<T> {
        let source = self.node();

        let node = if source.is_anchor() {
            Node::new_anchor(source.value().clone())
        } else {
            Node::new(source.value().clone())
        };
        match attach {
            Some((parent, side)) => node.with_parent(parent, side),
            None => node,
        }
    }

    /// Append a deep copy of `node` as a child on the given side.
    pub fn add_child_node(&self, node: &NodeRef<T>, side: Side) -> NodeRef<T> {
        let child = node.clone_subtree(Some((self.weak(), side)));
        self.node_mut().push_child(child.clone());
        debug!("{} cloned {} child", "Added".bright_green(), side);
        child
    }

    /// Insert a deep copy of `node` next to the first child matching `predicate`.
    pub fn insert_child_node<P>(
        &self,
        predicate: P,
        node: &NodeRef<T>,
        place_before: bool,
    ) -> Option<NodeRef<T>>
    where
        P: FnMut(&NodeRef<T>) -> bool,
    {
        let (index, side) = self.find_neighbour(predicate, place_before)?;
        let child = node.clone_subtree(Some((self.weak(), side)));
        self.node_mut().insert_child(child.clone(), index);
        debug!(
            "{} cloned {} child at index {}",
            "Inserted".bright_green(),
            side,
            index
        );
        Some(child)
    }
}

impl<T> std::fmt::Display for NodeRef<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        crate::display::TreeDisplay::default().format(self, f)
    }
}

impl<T> std::fmt::Debug for NodeRef<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("node", &self.try_node())
            .finish()
    }
}

/// Non-owning handle to a node that may since have been dropped.
pub struct WeakNodeRef<T> {
    node_ref: Weak<RefCell<Node<T>>>,
}

impl<T> Clone for WeakNodeRef<T> {
    fn clone(&self) -> Self {
        Self {
            node_ref: self.node_ref.clone(),
        }
    }
}

impl<T> WeakNodeRef<T> {
    pub fn upgrade(&self) -> Option<NodeRef<T>> {
        self.node_ref.upgrade().map(NodeRef::from_rc)
    }
}

impl<T> WeakNodeRef<T>
where
    T: Clone,
{
    /// Deep clone the referenced subtree.
    ///
    /// Fails with [`BushError::InvalidArgument`] when the node no longer exists.
    pub fn deep_clone(&self) -> Result<NodeRef<T>> {
        self.upgrade()
            .map(|node| node.deep_clone())
            .ok_or_else(|| BushError::InvalidArgument("cannot clone a dropped node".into()))
    }
}

impl<T> std::fmt::Debug for WeakNodeRef<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeakNodeRef")
            .field("alive", &(self.node_ref.strong_count() > 0))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tracing_test::traced_test;

    use super::*;
    use crate::test::{linear, sample_tree};

    #[traced_test]
    #[test]
    fn test_add_child_links_parent() {
        let root = NodeRef::new("root");
        let a = root.add_child("a", Side::Left);

        assert!(a.parent().is_some_and(|p| p.ptr_eq(&root)));
        assert_eq!(a.position(), Some(Side::Left));
        assert_eq!(a.depth(), 1);
        assert!(root.is_root());
        assert_eq!(root.position(), None);
        assert!(logs_contain("Added"));
    }

    #[test]
    fn test_linearization_matches_construction() {
        let root = NodeRef::new("root");
        let a = root.add_child("a", Side::Left);
        root.add_child("b", Side::Right);
        a.add_child("c", Side::Left);

        assert_eq!(linear(&root), vec!["c", "a", "root", "b"]);
    }

    #[test]
    fn test_left_right_filters() {
        let root = sample_tree();
        let left: Vec<_> = root.left_children().iter().map(|c| *c.value()).collect();
        let right: Vec<_> = root.right_children().iter().map(|c| *c.value()).collect();

        assert_eq!(left, vec!["the", "quick"]);
        assert_eq!(right, vec!["over"]);
    }

    #[rstest]
    #[case(true, vec!["the", "quick", "fox", "sly", "over", "dog"])]
    #[case(false, vec!["the", "quick", "fox", "over", "dog", "sly"])]
    fn test_insert_next_to_right_neighbour(#[case] place_before: bool, #[case] expected: Vec<&str>) {
        let root = sample_tree();
        let inserted = root
            .insert_child(|c| *c.value() == "over", "sly", place_before)
            .unwrap();

        assert_eq!(inserted.position(), Some(Side::Right));
        assert!(inserted.parent().is_some_and(|p| p.ptr_eq(&root)));
        assert_eq!(linear(&root), expected);
    }

    #[test]
    fn test_insert_takes_neighbour_side() {
        let root = NodeRef::new("root");
        root.add_child("l", Side::Left);
        root.add_child("r", Side::Right);

        let before_r = root.insert_child(|c| *c.value() == "r", "x", true).unwrap();
        let after_l = root.insert_child(|c| *c.value() == "l", "y", false).unwrap();

        assert_eq!(before_r.position(), Some(Side::Right));
        assert_eq!(after_l.position(), Some(Side::Left));
        assert_eq!(linear(&root), vec!["l", "y", "root", "x", "r"]);
    }

    #[test]
    fn test_insert_not_found_leaves_tree_untouched() {
        let root = sample_tree();
        let before = linear(&root);

        assert!(root.insert_child(|c| *c.value() == "cat", "x", true).is_none());
        assert!(root
            .insert_child_node(|c| *c.value() == "cat", &NodeRef::new("x"), false)
            .is_none());
        assert_eq!(linear(&root), before);
    }

    #[test]
    fn test_remove_detaches_node() {
        let root = sample_tree();
        let over = root.find(|n| *n.value() == "over").unwrap();

        over.remove();
        assert!(over.parent().is_none());
        assert_eq!(over.position(), None);
        assert_eq!(linear(&root), vec!["the", "quick", "fox"]);

        // Removing again, or removing a root, does nothing
        over.remove();
        root.remove();
        assert_eq!(linear(&over), vec!["over", "dog"]);
    }

    #[test]
    fn test_remove_after_parent_dropped() {
        let orphan = {
            let root = NodeRef::new("r");
            root.add_child("a", Side::Left)
        };
        assert!(orphan.parent().is_none());
        assert_eq!(orphan.position(), Some(Side::Left));

        orphan.remove();
        assert!(orphan.parent().is_none());
        assert_eq!(orphan.position(), None);
    }

    #[test]
    fn test_remove_root_after_bush_dropped() {
        let root = {
            let bush: crate::Bush<&str> = crate::Bush::new();
            bush.add_root("kept")
        };

        root.remove();
        assert_eq!(root.position(), None);
        assert_eq!(root.join(" "), "kept");
    }

    #[test]
    fn test_deep_chain_clone_compare_and_remove() {
        let root = NodeRef::new(0usize);
        let mut tail = root.clone();
        for i in 1..100_000 {
            tail = tail.add_child(i, Side::Right);
        }

        let clone = root.deep_clone();
        assert_eq!(clone.iter().count(), 100_000);
        assert_eq!(clone.iter().last().map(|n| *n.value()), Some(99_999));
        assert_eq!(clone, root);
        assert_eq!(clone.xxhash(), root.xxhash());

        assert_eq!(clone.remove_children(|n| *n.value() == 99_999), 1);
        assert_ne!(clone, root);
    }

    #[test]
    fn test_remove_by_identity() {
        let root = NodeRef::new("root");
        root.add_child("a", Side::Left);
        let second = root.add_child("a", Side::Left);

        second.remove();
        assert_eq!(root.num_children(), 1);
        assert!(!root.children()[0].ptr_eq(&second));
    }

    #[traced_test]
    #[test]
    fn test_remove_children_counts_matches_only() {
        let root = NodeRef::new("root");
        let x = root.add_child("x", Side::Left);
        x.add_child("x", Side::Left);
        let keep = root.add_child("keep", Side::Right);
        keep.add_child("x", Side::Right);
        keep.add_child("y", Side::Left);

        // The nested "x" under the removed "x" is not counted
        assert_eq!(root.remove_children(|n| *n.value() == "x"), 2);
        assert_eq!(linear(&root), vec!["root", "y", "keep"]);
        assert!(logs_contain("Removed"));
    }

    #[test]
    fn test_deep_clone_is_independent() {
        let root = sample_tree();
        let clone = root.deep_clone();

        assert_eq!(clone, root);
        assert!(!clone.ptr_eq(&root));
        assert!(clone.is_root());

        clone.find(|n| *n.value() == "fox").unwrap().set_value("cat");
        assert_eq!(root.join(" "), "the quick fox over dog");
        assert_eq!(clone.join(" "), "the quick cat over dog");

        *root.value_mut() = "wolf";
        assert_eq!(*clone.value(), "cat");
    }

    #[test]
    fn test_clone_preserves_positions() {
        let root = sample_tree();
        let clone = root.deep_clone();

        for (a, b) in root.iter().zip(clone.iter()) {
            assert_eq!(a.position(), b.position());
            assert_eq!(a.depth(), b.depth());
        }
    }

    #[test]
    fn test_add_child_node_clones() {
        let root = NodeRef::new("root");
        let source = sample_tree();
        let added = root.add_child_node(&source, Side::Right);

        assert_eq!(added, source);
        assert_eq!(added.position(), Some(Side::Right));
        assert!(source.is_root());

        added.add_child("extra", Side::Right);
        assert_eq!(source.join(" "), "the quick fox over dog");
    }

    #[test]
    fn test_add_own_subtree_as_child() {
        let root = NodeRef::new("root");
        root.add_child("a", Side::Left);
        root.add_child_node(&root, Side::Right);

        assert_eq!(linear(&root), vec!["a", "root", "a", "root"]);
    }

    #[test]
    fn test_weak_clone_of_dropped_node_fails() {
        let weak = {
            let root = NodeRef::new("gone".to_string());
            root.downgrade()
        };

        assert!(matches!(
            weak.deep_clone(),
            Err(BushError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_weak_clone_of_live_node() {
        let root = sample_tree();
        let clone = root.downgrade().deep_clone().unwrap();
        assert_eq!(clone, root);
    }

    #[test]
    fn test_find_all_scans_in_order() {
        let root = sample_tree();
        let short: Vec<_> = root
            .find_all(|n| n.value().len() == 3)
            .iter()
            .map(|n| *n.value())
            .collect();

        assert_eq!(short, vec!["the", "fox", "dog"]);
    }
}
