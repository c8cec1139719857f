use std::hash::{Hash, Hasher};

use xxhash_rust::xxh64::Xxh64;

use crate::noderef::NodeRef;

/// Hashes the value and child structure of the subtree, consistent with the
/// order-sensitive [`PartialEq`] impl. Positions are not hashed.
impl<T> Hash for NodeRef<T>
where
    T: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Pre-order walk, children pushed in reverse to keep stored order
        let mut stack = vec![self.clone()];
        while let Some(current) = stack.pop() {
            let node = current.node();
            node.value().hash(state);
            node.num_children().hash(state);
            stack.extend(node.children().iter().rev().cloned());
        }
    }
}

impl<T> NodeRef<T>
where
    T: Hash,
{
    /// Order-sensitive xxh64 fingerprint of the subtree
    pub fn xxhash(&self) -> u64 {
        let mut hasher = Xxh64::new(0);
        self.hash(&mut hasher);
        hasher.finish()
    }
}
