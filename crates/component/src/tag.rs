use std::any::TypeId;
use std::hash::{Hash, Hasher};

use smallvec::SmallVec;

/// Runtime identity of a component type.
///
/// Equality and hashing only consider the [`TypeId`]; the names are kept for
/// diagnostics and for matching configuration entries.
#[derive(Clone, Copy)]
pub struct TypeTag {
	id: TypeId,
	path: &'static str,
	name: &'static str,
}

impl TypeTag {
	/// Returns the tag of `T`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		let path = std::any::type_name::<T>();
		Self {
			id: TypeId::of::<T>(),
			path,
			name: short_name(path),
		}
	}

	/// Returns the underlying [`TypeId`].
	#[inline]
	pub fn id(self) -> TypeId {
		self.id
	}

	/// Returns the unqualified type name (`Manager`, not `crate::staff::Manager`).
	///
	/// Not unique: types in different modules, or instantiations of one
	/// generic type, share a name.
	#[inline]
	pub fn name(self) -> &'static str {
		self.name
	}

	/// Returns the fully qualified type name, generic arguments included.
	#[inline]
	pub fn path(self) -> &'static str {
		self.path
	}
}

/// Strips the module path and any generic arguments from a type name.
fn short_name(full: &'static str) -> &'static str {
	let path = full.split('<').next().unwrap_or(full);
	path.rsplit("::").next().unwrap_or(path)
}

impl PartialEq for TypeTag {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl std::fmt::Debug for TypeTag {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("TypeTag").field(&self.name).finish()
	}
}

impl std::fmt::Display for TypeTag {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name)
	}
}

/// A concrete type followed by every supertype it embeds, nearest first.
pub type Lineage = SmallVec<[TypeTag; 4]>;
