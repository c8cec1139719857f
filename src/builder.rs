//! Builders for constructing bushes from nested closures.
//!
//! The `NodeBuilder` and `BushBuilder` types enable building positioned trees in a composable way.
//!

use std::marker::PhantomData;

use tracing::{debug, debug_span};

use crate::{node::Side, noderef::NodeRef, Bush};

/// A builder for adding children to a node.
///
/// It is handed to the closures passed to [`BushBuilder::root`] and to its own
/// [`NodeBuilder::left`] and [`NodeBuilder::right`] methods.
pub struct NodeBuilder<'a, T, E> {
    node_ref: &'a NodeRef<T>,
    _phantom: PhantomData<E>,
}

impl<'a, T, E> NodeBuilder<'a, T, E> {
    pub fn new(node_ref: &'a NodeRef<T>) -> Self {
        Self {
            node_ref,
            _phantom: PhantomData,
        }
    }

    /// Adds a child on the given side of the current node.
    ///
    /// # Arguments
    ///
    /// * `value`: The value of the child node.
    /// * `side`: Whether the child precedes or follows the current node.
    /// * `f`: A closure that takes the child builder and adds its own children.
    pub fn child<F>(&mut self, value: T, side: Side, f: F) -> Result<(), E>
    where
        F: FnOnce(&mut NodeBuilder<'_, T, E>) -> Result<(), E>,
    {
        let child = self.node_ref.add_child(value, side);
        let mut node_builder = NodeBuilder::new(&child);

        // Call the supplied closure with the NodeBuilder to add this node's children
        f(&mut node_builder)
    }

    pub fn left<F>(&mut self, value: T, f: F) -> Result<(), E>
    where
        F: FnOnce(&mut NodeBuilder<'_, T, E>) -> Result<(), E>,
    {
        self.child(value, Side::Left, f)
    }

    pub fn right<F>(&mut self, value: T, f: F) -> Result<(), E>
    where
        F: FnOnce(&mut NodeBuilder<'_, T, E>) -> Result<(), E>,
    {
        self.child(value, Side::Right, f)
    }

    pub fn node(&self) -> &NodeRef<T> {
        self.node_ref
    }
}

/// A builder for constructing bushes.
///
/// Each call to `root` adds a tree to the bush, calling the provided closure
/// with a [`NodeBuilder`] for the new root. Closures return `Result<(), E>`
/// where `E` is your error type, so errors within them propagate.
///
/// # Examples
///
/// ```
/// use bush::BushBuilder;
///
/// let bush = BushBuilder::<&str, ()>::new()
///     .root("fox", |fox| {
///         fox.left("the", |_| Ok(()))?;
///         fox.right("jumps", |_| Ok(()))
///     })
///     .unwrap()
///     .done();
///
/// assert_eq!(bush.join(" "), "the fox jumps");
/// ```
pub struct BushBuilder<T, E> {
    bush: Bush<T>,
    debug_span: tracing::Span,
    _phantom: PhantomData<E>,
}

impl<T, E> BushBuilder<T, E>
where
    T: Default,
{
    /// Creates a new `BushBuilder` instance.
    pub fn new() -> Self {
        let debug_span = debug_span!("BushBuilder");
        let _debug = debug_span.enter();
        debug!("Created new BushBuilder");
        drop(_debug);

        Self {
            bush: Bush::new(),
            debug_span,
            _phantom: PhantomData,
        }
    }
}

impl<T, E> Default for BushBuilder<T, E>
where
    T: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> BushBuilder<T, E> {
    /// Adds a root to the bush and returns the updated builder.
    ///
    /// # Arguments
    ///
    /// * `value`: The value of the root node.
    /// * `f`: A closure that takes the root builder and adds its own children.
    pub fn root<F>(self, value: T, f: F) -> Result<Self, E>
    where
        F: FnOnce(&mut NodeBuilder<'_, T, E>) -> Result<(), E>,
    {
        self.debug_span.in_scope(|| {
            let root = self.bush.add_root(value);
            let mut node_builder = NodeBuilder::new(&root);

            f(&mut node_builder)?;
            debug!("Added root");
            Ok(())
        })?;
        Ok(self)
    }

    /// Returns the constructed bush when finished building it.
    pub fn done(self) -> Bush<T> {
        self.debug_span.in_scope(|| debug!("Finished building bush"));
        self.bush
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    #[derive(Debug, PartialEq)]
    enum MyError {
        Fail(String),
    }

    #[traced_test]
    #[test]
    fn test_builder() {
        let bush = BushBuilder::<&str, MyError>::new()
            .root("saw", |saw| {
                saw.left("I", |_| Ok(()))?;
                saw.right("man", |man| {
                    man.left("the", |_| Ok(()))?;
                    man.right("telescope", |t| {
                        t.left("with", |_| Ok(()))?;
                        t.left("a", |_| Ok(()))
                    })
                })
            })
            .unwrap()
            .root(".", |_| Ok(()))
            .unwrap()
            .done();

        assert_eq!(bush.len(), 2);
        assert_eq!(bush.join(" "), "I saw the man with a telescope .");
        assert!(logs_contain("Finished building bush"));
    }

    #[test]
    fn test_builder_error_propagates() {
        let result = BushBuilder::<&str, MyError>::new().root("root", |root| {
            root.left("ok", |_| Ok(()))?;
            root.right("bad", |_| Err(MyError::Fail("bad child".into())))
        });

        assert_eq!(result.err(), Some(MyError::Fail("bad child".into())));
    }

    #[test]
    fn test_node_builder_exposes_node() {
        let bush = BushBuilder::<u32, ()>::new()
            .root(1, |one| {
                assert_eq!(*one.node().value(), 1);
                one.child(2, Side::Right, |two| {
                    assert_eq!(two.node().position(), Some(Side::Right));
                    Ok(())
                })
            })
            .unwrap()
            .done();

        assert_eq!(bush.join("-"), "1-2");
    }
}
