//! Shared fixtures for unit tests.

use crate::{node::Side, noderef::NodeRef, Bush, BushBuilder};

/// "the quick fox over dog", rooted at "fox"
pub fn sample_tree() -> NodeRef<&'static str> {
    let fox = NodeRef::new("fox");
    fox.add_child("the", Side::Left);
    fox.add_child("quick", Side::Left);
    let over = fox.add_child("over", Side::Right);
    over.add_child("dog", Side::Right);
    fox
}

/// Roots "man" and "woman", where "woman" has the left child "and"
pub fn sentence_bush() -> Bush<&'static str> {
    BushBuilder::<&'static str, ()>::new()
        .root("man", |_| Ok(()))
        .and_then(|builder| builder.root("woman", |woman| woman.left("and", |_| Ok(()))))
        .unwrap()
        .done()
}

/// Linearized values of a subtree
pub fn linear(node: &NodeRef<&'static str>) -> Vec<&'static str> {
    node.iter().map(|n| *n.value()).collect()
}
