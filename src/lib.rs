//! # Bush
//!
//! Ordered forests whose nodes remember which side of their parent they came from.
//!
//! ## Overview
//!
//! Each child in a bush is tagged [`Side::Left`] or [`Side::Right`], recording
//! whether it preceded or followed its parent in some original linear sequence,
//! such as the words of a sentence. Iterating a tree visits the left children,
//! then the node, then the right children, which reconstructs that sequence.
//!
//! ```
//! use bush::{Bush, Side};
//!
//! let bush: Bush<&str> = Bush::new();
//! let fox = bush.add_root("fox");
//! fox.add_child("the", Side::Left);
//! let jumps = fox.add_child("jumps", Side::Right);
//! jumps.add_child("high", Side::Right);
//!
//! assert_eq!(bush.join(" "), "the fox jumps high");
//! ```

mod builder;
mod bush;
mod compare;
mod display;
mod error;
mod hash;
mod iterator;

pub mod node;
pub mod noderef;

#[cfg(test)]
mod test;

pub use builder::{BushBuilder, NodeBuilder};
pub use bush::Bush;
pub use display::TreeDisplay;
pub use error::{BushError, Result};
pub use iterator::{IterNode, LinearIter};
pub use node::{Node, Side};
pub use noderef::{NodeRef, WeakNodeRef};
