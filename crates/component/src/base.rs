use std::any::{Any, TypeId};
use std::cell::Cell;

use crate::{ContainerId, Lineage, TypeTag};

/// Capability to claim and release components, held by one container.
///
/// Every key carries a fresh [`ContainerId`] and cannot be cloned, so a
/// component claimed with a key can only be released through that same key.
#[derive(Debug)]
pub struct OwnerKey {
	id: ContainerId,
}

impl OwnerKey {
	/// Allocates a key with a new container id.
	pub fn new() -> Self {
		Self {
			id: ContainerId::next(),
		}
	}

	/// Returns the container id this key claims under.
	#[inline]
	pub fn id(&self) -> ContainerId {
		self.id
	}
}

impl Default for OwnerKey {
	fn default() -> Self {
		Self::new()
	}
}

/// Ownership state embedded in every component.
///
/// A component is owned by at most one container. Containers claim it when
/// it is added, and only the [`OwnerKey`] that claimed it can release it.
#[derive(Debug, Default)]
pub struct ComponentBase {
	owner: Cell<Option<ContainerId>>,
}

impl ComponentBase {
	/// Creates an unowned base.
	pub const fn new() -> Self {
		Self {
			owner: Cell::new(None),
		}
	}

	/// Returns the owning container, if any.
	#[inline]
	pub fn owner(&self) -> Option<ContainerId> {
		self.owner.get()
	}

	/// Records the holder of `key` as the owning container.
	///
	/// Fails with the current owner if the component is already owned.
	pub fn claim(&self, key: &OwnerKey) -> Result<(), ContainerId> {
		match self.owner.get() {
			Some(current) => Err(current),
			None => {
				self.owner.set(Some(key.id));
				Ok(())
			}
		}
	}

	/// Clears the owner if it was claimed with `key`. Returns whether anything
	/// changed.
	pub fn release(&self, key: &OwnerKey) -> bool {
		if self.owner.get() == Some(key.id) {
			self.owner.set(None);
			true
		} else {
			false
		}
	}
}

/// A cloned component is a new, unowned instance.
impl Clone for ComponentBase {
	fn clone(&self) -> Self {
		Self::new()
	}
}

/// Object-safe interface of every component.
///
/// Implement through [`impl_component!`](crate::impl_component) rather than
/// by hand; the macro keeps [`lineage`](Component::lineage) and
/// [`upcast`](Component::upcast) consistent with each other.
pub trait Component: Any {
	/// Returns the embedded ownership state.
	fn base(&self) -> &ComponentBase;

	/// Returns the tag of the concrete type.
	fn type_tag(&self) -> TypeTag;

	/// Returns the concrete type followed by all of its supertypes.
	fn lineage(&self) -> Lineage;

	/// Returns a view of `self` as the type identified by `ty`, if `ty` is the
	/// concrete type or one of its supertypes.
	fn upcast(&self, ty: TypeId) -> Option<&dyn Any>;
}

/// Static side of [`Component`], available for sized component types.
pub trait ComponentType: Component + Sized {
	/// Returns the tag of this type.
	#[inline]
	fn tag() -> TypeTag {
		TypeTag::of::<Self>()
	}

	/// Pushes this type and then each of its supertypes onto `out`.
	fn extend_lineage(out: &mut Lineage);

	/// Returns the lineage of this type.
	fn type_lineage() -> Lineage {
		let mut out = Lineage::new();
		Self::extend_lineage(&mut out);
		out
	}
}

impl dyn Component {
	/// Views this component as `T` if `T` is its concrete type or a supertype.
	pub fn view<T: ComponentType>(&self) -> Option<&T> {
		self.upcast(TypeId::of::<T>())?.downcast_ref::<T>()
	}

	/// Returns true if `T` appears in this component's lineage.
	pub fn is_a<T: ComponentType>(&self) -> bool {
		self.upcast(TypeId::of::<T>()).is_some()
	}

	/// Returns the owning container, if any.
	#[inline]
	pub fn owner(&self) -> Option<ContainerId> {
		self.base().owner()
	}
}

impl std::fmt::Debug for dyn Component {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Component")
			.field("type", &self.type_tag())
			.field("owner", &self.owner())
			.finish()
	}
}

/// Implements [`Component`] and [`ComponentType`] for a struct.
///
/// Root types name the field holding their [`ComponentBase`]:
///
/// ```rust,ignore
/// struct Dancer { base: ComponentBase, name: String }
/// impl_component!(Dancer { base });
/// ```
///
/// Subtypes embed their supertype and name that field instead. The subtype
/// shares the supertype's base and is visible under both types:
///
/// ```rust,ignore
/// struct ParanoidManager { manager: Manager }
/// impl_component!(ParanoidManager: Manager { manager });
/// ```
#[macro_export]
macro_rules! impl_component {
	($type:ty : $super:ty { $field:ident }) => {
		impl $crate::Component for $type {
			fn base(&self) -> &$crate::ComponentBase {
				<$super as $crate::Component>::base(&self.$field)
			}

			fn type_tag(&self) -> $crate::TypeTag {
				$crate::TypeTag::of::<Self>()
			}

			fn lineage(&self) -> $crate::Lineage {
				<Self as $crate::ComponentType>::type_lineage()
			}

			fn upcast(
				&self,
				ty: ::std::any::TypeId,
			) -> ::core::option::Option<&dyn ::std::any::Any> {
				if ty == ::std::any::TypeId::of::<Self>() {
					::core::option::Option::Some(self as &dyn ::std::any::Any)
				} else {
					<$super as $crate::Component>::upcast(&self.$field, ty)
				}
			}
		}

		impl $crate::ComponentType for $type {
			fn extend_lineage(out: &mut $crate::Lineage) {
				out.push($crate::TypeTag::of::<Self>());
				<$super as $crate::ComponentType>::extend_lineage(out);
			}
		}
	};
	($type:ty { $field:ident }) => {
		impl $crate::Component for $type {
			fn base(&self) -> &$crate::ComponentBase {
				&self.$field
			}

			fn type_tag(&self) -> $crate::TypeTag {
				$crate::TypeTag::of::<Self>()
			}

			fn lineage(&self) -> $crate::Lineage {
				<Self as $crate::ComponentType>::type_lineage()
			}

			fn upcast(
				&self,
				ty: ::std::any::TypeId,
			) -> ::core::option::Option<&dyn ::std::any::Any> {
				if ty == ::std::any::TypeId::of::<Self>() {
					::core::option::Option::Some(self as &dyn ::std::any::Any)
				} else {
					::core::option::Option::None
				}
			}
		}

		impl $crate::ComponentType for $type {
			fn extend_lineage(out: &mut $crate::Lineage) {
				out.push($crate::TypeTag::of::<Self>());
			}
		}
	};
}
