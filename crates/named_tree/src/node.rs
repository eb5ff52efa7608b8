use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use indexmap::IndexMap;
use roster_component::{
	Component, ComponentBase, ComponentError, ComponentId, ContainerId, OwnerKey, ReplacePolicy,
	TreeConfig, impl_component,
};
use tracing::{debug, trace, warn};

use crate::{Components, Entry};

/// Handle to the allocation a node is being built into.
///
/// Only [`NamedTree::cyclic`] creates handles, and a handle cannot outlive
/// the closure it is passed to, so a node can only point at the `Rc` it is
/// being placed in:
///
/// ```compile_fail
/// use std::rc::Weak;
/// use roster_named_tree::NamedTree;
///
/// let node = NamedTree::within(Weak::<NamedTree>::new());
/// ```
///
/// ```compile_fail
/// use roster_named_tree::NamedTree;
///
/// let mut stash = None;
/// let root = NamedTree::cyclic::<NamedTree, _>(|this| {
///     stash = Some(this);
///     unreachable!()
/// });
/// ```
pub struct NodeHandle<'a> {
	this: Weak<dyn Component>,
	_scope: PhantomData<fn(&'a ()) -> &'a ()>,
}

/// A node that owns children by identifier and sees its ancestors' children.
///
/// A node is itself a component: it can be added under another node, and it
/// can be embedded in a payload type declared with
/// `impl_component!(Payload: NamedTree { node })`. Either way it must live in
/// an [`Rc`] that it knows about, so nodes are only built through
/// [`new_root`](Self::new_root) or [`cyclic`](Self::cyclic).
pub struct NamedTree {
	base: ComponentBase,
	key: OwnerKey,
	/// The `Rc` holding this node (or the payload embedding it).
	this: Weak<dyn Component>,
	parent: RefCell<Option<Weak<dyn Component>>>,
	children: RefCell<IndexMap<ComponentId, Rc<dyn Component>>>,
	policy: ReplacePolicy,
}

impl_component!(NamedTree { base });

impl NamedTree {
	/// Creates a standalone node with default settings.
	pub fn new_root() -> Rc<Self> {
		Self::cyclic(Self::within)
	}

	/// Creates a standalone node with the given settings.
	pub fn new_root_with(config: TreeConfig) -> Rc<Self> {
		Self::cyclic(|this| Self::within_config(this, config))
	}

	/// Allocates a component that embeds a node.
	///
	/// `build` receives a handle to the allocation and passes it to
	/// [`within`](Self::within) for the node stored in the returned value:
	///
	/// ```rust,ignore
	/// let manager = NamedTree::cyclic(|this| ManagerNode {
	///     node: NamedTree::within(this),
	///     name: "the manager",
	/// });
	/// ```
	pub fn cyclic<T, F>(build: F) -> Rc<T>
	where
		T: Component,
		F: for<'a> FnOnce(NodeHandle<'a>) -> T,
	{
		Rc::new_cyclic(|this: &Weak<T>| {
			let this: Weak<dyn Component> = this.clone();
			build(NodeHandle {
				this,
				_scope: PhantomData,
			})
		})
	}

	/// Creates a node held by the allocation behind `handle`, with default
	/// settings.
	pub fn within(handle: NodeHandle<'_>) -> Self {
		Self::within_config(handle, TreeConfig::default())
	}

	/// Creates a node held by the allocation behind `handle`.
	pub fn within_config(handle: NodeHandle<'_>, config: TreeConfig) -> Self {
		Self {
			base: ComponentBase::new(),
			key: OwnerKey::new(),
			this: handle.this,
			parent: RefCell::new(None),
			children: RefCell::new(IndexMap::new()),
			policy: config.replace,
		}
	}

	/// Returns this node's container id.
	#[inline]
	pub fn id(&self) -> ContainerId {
		self.key.id()
	}

	/// Returns the component holding the parent node, if any.
	pub fn parent(&self) -> Option<Rc<dyn Component>> {
		self.parent.borrow().as_ref().and_then(Weak::upgrade)
	}

	/// Returns the number of children owned directly by this node.
	pub fn len(&self) -> usize {
		self.children.borrow().len()
	}

	/// Returns true if this node owns no children.
	pub fn is_empty(&self) -> bool {
		self.children.borrow().is_empty()
	}

	/// Returns this node's own children in insertion order.
	pub fn children(&self) -> Vec<Entry> {
		self.children
			.borrow()
			.iter()
			.map(|(id, child)| Entry::child(id.clone(), child.clone()))
			.collect()
	}

	pub(crate) fn child_at(&self, index: usize) -> Option<Entry> {
		self.children
			.borrow()
			.get_index(index)
			.map(|(id, child)| Entry::child(id.clone(), child.clone()))
	}

	/// Iterates over this node's children, then each ancestor's children,
	/// and finally the root itself with no identifier.
	pub fn components(&self) -> Components {
		Components::new(self.this.upgrade())
	}

	/// Returns the nearest component registered under `id`, searching this
	/// node first and then each ancestor.
	pub fn get_component(&self, id: &str) -> Option<Rc<dyn Component>> {
		let found = self
			.components()
			.find(|entry| entry.id().is_some_and(|key| key.as_str() == id))
			.map(Entry::into_component);
		trace!(node = %self.key.id(), id, found = found.is_some(), "lookup");
		found
	}

	/// Returns the first component, in [`components`](Self::components)
	/// order, accepted by `predicate`.
	pub fn find_component<F>(&self, mut predicate: F) -> Option<Rc<dyn Component>>
	where
		F: FnMut(Option<&ComponentId>, &dyn Component) -> bool,
	{
		self.components()
			.find(|entry| predicate(entry.id(), entry.component()))
			.map(Entry::into_component)
	}

	/// Calls `visitor` for every entry of [`components`](Self::components).
	pub fn on_components_and_self<F>(&self, mut visitor: F)
	where
		F: FnMut(&dyn Component),
	{
		for entry in self.components() {
			visitor(entry.component());
		}
	}

	/// Adds `component` under `id`.
	///
	/// Fails if the component already has an owner, if `id` is taken and
	/// `replace` is false, or if the component is this node or one of its
	/// ancestors. With `replace`, the previous child keeps its position and is
	/// released according to the node's [`ReplacePolicy`].
	pub fn add_component(
		&self,
		id: impl Into<ComponentId>,
		component: Rc<dyn Component>,
		replace: bool,
	) -> Result<(), ComponentError> {
		let id = id.into();
		let tag = component.type_tag();

		if let Some(owner) = component.owner() {
			debug!(node = %self.key.id(), %id, ty = %tag, %owner, "rejected add of owned component");
			return Err(ComponentError::AlreadyOwned {
				type_name: tag.name(),
				owner,
			});
		}

		let child_node = component.view::<NamedTree>();
		if let Some(child_node) = child_node
			&& self.has_ancestor_or_self(child_node)
		{
			debug!(node = %self.key.id(), %id, "rejected add that would form a cycle");
			return Err(ComponentError::Cycle { id });
		}

		if !replace && self.children.borrow().contains_key(&id) {
			debug!(node = %self.key.id(), %id, "rejected add to taken identifier");
			return Err(ComponentError::IdentifierTaken { id });
		}

		component
			.base()
			.claim(&self.key)
			.map_err(|owner| ComponentError::AlreadyOwned {
				type_name: tag.name(),
				owner,
			})?;
		if let Some(child_node) = child_node {
			*child_node.parent.borrow_mut() = Some(self.this.clone());
		}

		let displaced = self
			.children
			.borrow_mut()
			.insert(id.clone(), component);
		debug!(node = %self.key.id(), %id, ty = %tag, replaced = displaced.is_some(), "component added");

		if let Some(old) = displaced {
			self.release_displaced(&id, &old);
		}
		Ok(())
	}

	fn release_displaced(&self, id: &ComponentId, old: &Rc<dyn Component>) {
		match self.policy {
			ReplacePolicy::Orphan => {
				old.base().release(&self.key);
				if let Some(old_node) = old.view::<NamedTree>() {
					*old_node.parent.borrow_mut() = None;
				}
				warn!(node = %self.key.id(), %id, ty = %old.type_tag(), "replaced child orphaned");
			}
			ReplacePolicy::Retain => {
				warn!(
					node = %self.key.id(),
					%id,
					ty = %old.type_tag(),
					"replaced child still claims this node as owner"
				);
			}
		}
	}

	/// Returns true if `candidate` is this node or one of its ancestors.
	fn has_ancestor_or_self(&self, candidate: &NamedTree) -> bool {
		if std::ptr::eq(self, candidate) {
			return true;
		}
		let mut current = self.parent();
		while let Some(holder) = current {
			let Some(node) = holder.view::<NamedTree>() else {
				return false;
			};
			if std::ptr::eq(node, candidate) {
				return true;
			}
			current = node.parent();
		}
		false
	}
}

impl std::fmt::Debug for NamedTree {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NamedTree")
			.field("id", &self.key.id())
			.field("children", &self.children.borrow().keys().collect::<Vec<_>>())
			.field("has_parent", &self.parent().is_some())
			.finish()
	}
}
