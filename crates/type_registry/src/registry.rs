use std::rc::Rc;

use roster_component::{
	Component, ComponentError, ComponentType, ContainerId, Lineage, OwnerKey, RegistryConfig,
	TypeTag, Uniqueness,
};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::TypeState;

/// A component together with the lineage computed when it was added.
struct Slot {
	component: Rc<dyn Component>,
	lineage: Lineage,
}

/// Type-indexed component collection.
///
/// Components are kept in insertion order. Every add updates a [`TypeState`]
/// for the component's concrete type and for each of its supertypes, and is
/// validated against those states before anything changes: a rejected add
/// leaves the registry and the component exactly as they were.
pub struct TypeRegistry {
	key: OwnerKey,
	slots: Vec<Slot>,
	states: FxHashMap<TypeTag, TypeState>,
	config: RegistryConfig,
}

impl Default for TypeRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl TypeRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::with_config(RegistryConfig::default())
	}

	/// Creates an empty registry that applies the declarations in `config`.
	pub fn with_config(config: RegistryConfig) -> Self {
		Self {
			key: OwnerKey::new(),
			slots: Vec::new(),
			states: FxHashMap::default(),
			config,
		}
	}

	/// Returns this registry's container id.
	#[inline]
	pub fn id(&self) -> ContainerId {
		self.key.id()
	}

	/// Returns the number of components.
	#[inline]
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Returns true if no component has been added.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Adds `component`, optionally fixing the uniqueness of its concrete type.
	///
	/// Fails if the component already has an owner, if `unique` contradicts
	/// the concrete type's marking, or if the concrete type or any supertype
	/// is unique and already present.
	pub fn add_component(
		&mut self,
		component: Rc<dyn Component>,
		unique: Option<Uniqueness>,
	) -> Result<(), ComponentError> {
		let tag = component.type_tag();
		if let Some(owner) = component.owner() {
			debug!(container = %self.key.id(), ty = %tag, %owner, "rejected add of owned component");
			return Err(ComponentError::AlreadyOwned {
				type_name: tag.name(),
				owner,
			});
		}

		let lineage = component.lineage();
		if let Err(err) = self.check_add(tag, &lineage, unique) {
			debug!(container = %self.key.id(), ty = %tag, %err, "rejected add");
			return Err(err);
		}

		component
			.base()
			.claim(&self.key)
			.map_err(|owner| ComponentError::AlreadyOwned {
				type_name: tag.name(),
				owner,
			})?;

		self.state_entry(tag).mark(unique);
		for &ty in lineage.iter() {
			self.state_entry(ty).add_instance();
		}
		debug!(
			container = %self.key.id(),
			ty = %tag,
			supertypes = lineage.len().saturating_sub(1),
			?unique,
			"component added"
		);
		self.slots.push(Slot { component, lineage });
		Ok(())
	}

	/// Validation pass for [`add_component`](Self::add_component). Mutates nothing.
	fn check_add(
		&self,
		tag: TypeTag,
		lineage: &[TypeTag],
		unique: Option<Uniqueness>,
	) -> Result<(), ComponentError> {
		let state = self.state_or_declared(tag);
		state.check_mark(unique)?;

		let becomes_unique = state.is_unique() || unique.is_some_and(Uniqueness::is_unique);
		if becomes_unique && state.count() > 0 {
			return Err(ComponentError::CapacityExceeded {
				type_name: tag.name(),
				blocking: tag.name(),
			});
		}

		for &ty in lineage.iter().filter(|&&ty| ty != tag) {
			if !self.state_or_declared(ty).can_add_instance() {
				return Err(ComponentError::CapacityExceeded {
					type_name: tag.name(),
					blocking: ty.name(),
				});
			}
		}
		Ok(())
	}

	/// Fixes the uniqueness of `T` without adding a component.
	///
	/// Marking a type unique fails once it has more than one instance, and a
	/// marking can never be flipped.
	pub fn mark_component_type<T: ComponentType>(
		&mut self,
		uniqueness: Uniqueness,
	) -> Result<(), ComponentError> {
		self.mark_type(T::tag(), uniqueness)
	}

	/// Untyped form of [`mark_component_type`](Self::mark_component_type).
	pub fn mark_type(&mut self, tag: TypeTag, uniqueness: Uniqueness) -> Result<(), ComponentError> {
		if let Err(err) = self.state_or_declared(tag).check_mark(Some(uniqueness)) {
			debug!(container = %self.key.id(), ty = %tag, %err, "rejected marking");
			return Err(err);
		}
		self.state_entry(tag).mark(Some(uniqueness));
		debug!(container = %self.key.id(), ty = %tag, %uniqueness, "type marked");
		Ok(())
	}

	/// Returns the only component that is a `T`.
	///
	/// Fails with [`NotFound`](ComponentError::NotFound) or
	/// [`Ambiguous`](ComponentError::Ambiguous) whatever the marking of `T`.
	pub fn get_component<T: ComponentType>(&self) -> Result<&T, ComponentError> {
		let type_name = T::tag().name();
		let mut matches = self.get_components::<T>();
		let Some(found) = matches.next() else {
			trace!(container = %self.key.id(), ty = type_name, "no match");
			return Err(ComponentError::NotFound { type_name });
		};
		if matches.next().is_some() {
			let count = 2 + matches.count();
			trace!(container = %self.key.id(), ty = type_name, count, "ambiguous match");
			return Err(ComponentError::Ambiguous { type_name, count });
		}
		Ok(found)
	}

	/// Iterates, in insertion order, over every component that is a `T`.
	pub fn get_components<T: ComponentType>(&self) -> impl Iterator<Item = &T> + '_ {
		let tag = T::tag();
		self.slots
			.iter()
			.filter(move |slot| slot.lineage.contains(&tag))
			.filter_map(|slot| slot.component.view::<T>())
	}

	/// Returns true if at least one component is a `T`.
	pub fn contains<T: ComponentType>(&self) -> bool {
		let tag = T::tag();
		self.slots.iter().any(|slot| slot.lineage.contains(&tag))
	}

	/// Iterates over all components in insertion order.
	pub fn components(&self) -> impl Iterator<Item = &dyn Component> + '_ {
		self.slots.iter().map(|slot| &*slot.component)
	}

	/// Returns the state tracked for `T`, if any.
	pub fn type_state<T: ComponentType>(&self) -> Option<TypeState> {
		self.type_state_of(T::tag())
	}

	/// Returns the state tracked for `tag`, if any.
	pub fn type_state_of(&self, tag: TypeTag) -> Option<TypeState> {
		self.states.get(&tag).copied()
	}

	/// Returns the current state of `tag`, or the state the registry would
	/// create for it on first sight.
	fn state_or_declared(&self, tag: TypeTag) -> TypeState {
		self.states
			.get(&tag)
			.copied()
			.unwrap_or_else(|| TypeState::new(tag, self.config.declared(tag)))
	}

	fn state_entry(&mut self, tag: TypeTag) -> &mut TypeState {
		let config = &self.config;
		self.states
			.entry(tag)
			.or_insert_with(|| TypeState::new(tag, config.declared(tag)))
	}
}

impl std::fmt::Debug for TypeRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TypeRegistry")
			.field("id", &self.key.id())
			.field("len", &self.slots.len())
			.field("types", &self.states.len())
			.finish()
	}
}
