use std::rc::Rc;

use roster_component::{Component, ComponentId};

use crate::NamedTree;

/// One item yielded by [`NamedTree::components`].
#[derive(Clone)]
pub struct Entry {
	id: Option<ComponentId>,
	component: Rc<dyn Component>,
}

impl Entry {
	pub(crate) fn child(id: ComponentId, component: Rc<dyn Component>) -> Self {
		Self {
			id: Some(id),
			component,
		}
	}

	fn root(component: Rc<dyn Component>) -> Self {
		Self {
			id: None,
			component,
		}
	}

	/// Returns the identifier, or `None` for the trailing root entry.
	#[inline]
	pub fn id(&self) -> Option<&ComponentId> {
		self.id.as_ref()
	}

	/// Returns the component.
	#[inline]
	pub fn component(&self) -> &dyn Component {
		&*self.component
	}

	/// Consumes the entry, returning the component handle.
	#[inline]
	pub fn into_component(self) -> Rc<dyn Component> {
		self.component
	}
}

impl std::fmt::Debug for Entry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Entry")
			.field("id", &self.id)
			.field("component", &self.component)
			.finish()
	}
}

/// Lazy near-to-far walk over a node's children and its ancestors' children.
///
/// Children are read one at a time, so the walk never holds a borrow of a
/// node between calls to `next`. A parent chain that loops makes the
/// iterator infinite; [`NamedTree::add_component`] refuses to build one.
pub struct Components {
	/// Component holding the node being walked; `None` once exhausted.
	holder: Option<Rc<dyn Component>>,
	index: usize,
}

impl Components {
	pub(crate) fn new(start: Option<Rc<dyn Component>>) -> Self {
		Self {
			holder: start,
			index: 0,
		}
	}
}

impl Iterator for Components {
	type Item = Entry;

	fn next(&mut self) -> Option<Entry> {
		loop {
			let holder = self.holder.as_ref()?;
			let Some(node) = holder.view::<NamedTree>() else {
				self.holder = None;
				return None;
			};

			if let Some(entry) = node.child_at(self.index) {
				self.index += 1;
				return Some(entry);
			}

			match node.parent() {
				Some(parent) => {
					self.holder = Some(parent);
					self.index = 0;
				}
				None => return self.holder.take().map(Entry::root),
			}
		}
	}
}
