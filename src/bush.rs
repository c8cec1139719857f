use tracing::debug;

use crate::{
    display::TreeDisplay,
    iterator::LinearIter,
    node::{Node, Side},
    noderef::NodeRef,
};

/// A forest of positioned trees.
///
/// The forest roots are the children of a hidden anchor node, so every forest
/// operation is the matching node operation applied to the anchor. Roots are
/// always left children of the anchor and report no parent.
pub struct Bush<T> {
    anchor: NodeRef<T>,
}

impl<T> Bush<T>
where
    T: Default,
{
    pub fn new() -> Self {
        debug!("Created new Bush");
        Self {
            anchor: NodeRef::from_node(Node::new_anchor(T::default())),
        }
    }
}

impl<T> Default for Bush<T>
where
    T: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Bush<T> {
    pub fn roots(&self) -> Vec<NodeRef<T>> {
        self.anchor.children()
    }

    /// Number of roots
    pub fn len(&self) -> usize {
        self.anchor.num_children()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes across all trees
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn add_root(&self, value: T) -> NodeRef<T> {
        self.anchor.add_child(value, Side::Left)
    }

    /// Insert a new root next to the first root matching `predicate`.
    pub fn insert_root<P>(&self, predicate: P, value: T, place_before: bool) -> Option<NodeRef<T>>
    where
        P: FnMut(&NodeRef<T>) -> bool,
    {
        self.anchor.insert_child(predicate, value, place_before)
    }

    /// Remove every node matching `predicate`, returning how many matched.
    pub fn remove_all<P>(&self, predicate: P) -> usize
    where
        P: FnMut(&NodeRef<T>) -> bool,
    {
        self.anchor.remove_children(predicate)
    }

    /// Iterate all trees in left-to-right order.
    pub fn iter(&self) -> LinearIter<T> {
        LinearIter::from_roots(self.roots())
    }

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

    pub fn join(&self, separator: &str) -> String
    where
        T: std::fmt::Display,
    {
        self.anchor.join(separator)
    }
}

impl<T> Bush<T>
where
    T: Clone,
{
    /// Add a deep copy of `node` as a new root.
    pub fn add_root_node(&self, node: &NodeRef<T>) -> NodeRef<T> {
        self.anchor.add_child_node(node, Side::Left)
    }

    pub fn insert_root_node<P>(
        &self,
        predicate: P,
        node: &NodeRef<T>,
        place_before: bool,
    ) -> Option<NodeRef<T>>
    where
        P: FnMut(&NodeRef<T>) -> bool,
    {
        self.anchor.insert_child_node(predicate, node, place_before)
    }
}

impl<T> Bush<T>
where
    T: PartialEq,
{
    pub fn equals_ignore_order(&self, other: &Bush<T>) -> bool {
        self.anchor.equals_ignore_order(&other.anchor)
    }

    pub fn equals_unordered_strict(&self, other: &Bush<T>) -> bool {
        self.anchor.equals_unordered_strict(&other.anchor)
    }
}

impl<T> Bush<T>
where
    T: std::hash::Hash,
{
    pub fn xxhash(&self) -> u64 {
        self.anchor.xxhash()
    }
}

/// Deep clones the whole forest.
impl<T> Clone for Bush<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            anchor: self.anchor.deep_clone(),
        }
    }
}

impl<T> PartialEq for Bush<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.anchor == other.anchor
    }
}

impl<T> Eq for Bush<T> where T: Eq {}

impl<T> std::hash::Hash for Bush<T>
where
    T: std::hash::Hash,
{
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::hash::Hash::hash(&self.anchor, state)
    }
}

impl<'a, T> IntoIterator for &'a Bush<T> {
    type Item = crate::iterator::IterNode<T>;
    type IntoIter = LinearIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> std::fmt::Display for Bush<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        TreeDisplay::default().format_forest(&self.roots(), f)
    }
}

impl<T> std::fmt::Debug for Bush<T>
where
    T: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bush")
            .field("roots", &self.roots())
            .finish()
    }
}
