use std::{collections::VecDeque, ops::Deref};

use tracing::trace;

use crate::{node::Side, noderef::NodeRef};

/// A node yielded by [`LinearIter`], with its depth below the traversal start.
pub struct IterNode<T> {
    depth: usize,
    node: NodeRef<T>,
}

impl<T> IterNode<T> {
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn into_node(self) -> NodeRef<T> {
        self.node
    }
}

impl<T> Deref for IterNode<T> {
    type Target = NodeRef<T>;

    fn deref(&self) -> &Self::Target {
        &self.node
    }
}

enum Step<T> {
    // Schedule the children of a node around the node itself
    Expand(usize, NodeRef<T>),
    Yield(usize, NodeRef<T>),
}

/// Iterator reconstructing the original left-to-right order of a tree.
///
/// Each node is preceded by its left children and followed by its right
/// children, both in stored order and each expanded depth first. Children are
/// read lazily when their parent is reached.
pub struct LinearIter<T> {
    stack: VecDeque<Step<T>>,
}

impl<T> LinearIter<T> {
    pub fn new(node: NodeRef<T>) -> Self {
        Self {
            stack: VecDeque::from([Step::Expand(0, node)]),
        }
    }

    /// Iterate a sequence of sibling roots one after the other.
    pub(crate) fn from_roots(roots: Vec<NodeRef<T>>) -> Self {
        Self {
            stack: roots
                .into_iter()
                .map(|root| Step::Expand(0, root))
                .collect(),
        }
    }
}

impl<T> Iterator for LinearIter<T> {
    type Item = IterNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.stack.pop_front()? {
                Step::Yield(depth, node) => return Some(IterNode { depth, node }),
                Step::Expand(depth, node) => {
                    let children = node.children();
                    trace!("Expanding node with {} children", children.len());

                    // Pushed front in reverse so lefts come out first, in stored order
                    children
                        .iter()
                        .rev()
                        .filter(|child| child.position() == Some(Side::Right))
                        .for_each(|child| {
                            self.stack.push_front(Step::Expand(depth + 1, child.clone()))
                        });

                    self.stack.push_front(Step::Yield(depth, node.clone()));

                    children
                        .iter()
                        .rev()
                        .filter(|child| child.position() != Some(Side::Right))
                        .for_each(|child| {
                            self.stack.push_front(Step::Expand(depth + 1, child.clone()))
                        });
                }
            }
        }
    }
}
