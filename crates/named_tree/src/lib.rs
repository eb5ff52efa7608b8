//! Named component trees.
//!
//! A [`NamedTree`] node owns children under string identifiers and keeps a
//! back-reference to its parent node. Lookups start at the node itself and
//! walk up the parent chain, so a child node transparently sees everything
//! its ancestors own:
//!
//! ```rust,ignore
//! let root = NamedTree::new_root();
//! let manager = NamedTree::cyclic(|this| ManagerNode { node: NamedTree::within(this) });
//! root.add_component("manager", manager.clone(), false)?;
//! root.add_component("child1", Rc::new(Dancer::new("ana")), false)?;
//!
//! assert!(manager.node.get_component("child1").is_some());
//! ```
//!
//! Enumeration order is near-to-far: the node's own children in insertion
//! order, then its parent's, and so on, ending with the root itself.

mod iter;
mod node;

pub use iter::{Components, Entry};
pub use node::{NamedTree, NodeHandle};

#[cfg(test)]
mod tests;
