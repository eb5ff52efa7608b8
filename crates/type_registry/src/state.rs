use roster_component::{ComponentError, TypeTag, Uniqueness};

/// Bookkeeping for one type tracked by a [`TypeRegistry`](crate::TypeRegistry).
///
/// A state exists for every concrete type and every supertype the registry
/// has seen, and for every type marked through
/// [`mark_component_type`](crate::TypeRegistry::mark_component_type).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeState {
	tag: TypeTag,
	marking: Option<Uniqueness>,
	count: usize,
}

impl TypeState {
	pub(crate) fn new(tag: TypeTag, marking: Option<Uniqueness>) -> Self {
		Self {
			tag,
			marking,
			count: 0,
		}
	}

	/// Returns the tracked type.
	#[inline]
	pub fn tag(&self) -> TypeTag {
		self.tag
	}

	/// Returns the uniqueness marking, or `None` while unset.
	#[inline]
	pub fn marking(&self) -> Option<Uniqueness> {
		self.marking
	}

	/// Returns true if the type is marked unique.
	#[inline]
	pub fn is_unique(&self) -> bool {
		self.marking == Some(Uniqueness::Unique)
	}

	/// Returns how many instances of this type (directly or as a supertype)
	/// have been added.
	#[inline]
	pub fn count(&self) -> usize {
		self.count
	}

	/// Checks that `requested` can be applied without contradicting the
	/// current marking or count.
	pub(crate) fn check_mark(&self, requested: Option<Uniqueness>) -> Result<(), ComponentError> {
		let Some(requested) = requested else {
			return Ok(());
		};
		match self.marking {
			Some(existing) if existing == requested => Ok(()),
			Some(existing) => Err(ComponentError::MarkingConflict {
				type_name: self.tag.name(),
				existing,
				requested,
			}),
			None if requested.is_unique() && self.count > 1 => {
				Err(ComponentError::TooManyToMarkUnique {
					type_name: self.tag.name(),
					count: self.count,
				})
			}
			None => Ok(()),
		}
	}

	/// Applies a marking already validated by [`check_mark`](Self::check_mark).
	pub(crate) fn mark(&mut self, requested: Option<Uniqueness>) {
		if let Some(requested) = requested {
			debug_assert!(self.check_mark(Some(requested)).is_ok());
			self.marking = Some(requested);
		}
	}

	/// Returns true if another instance fits.
	#[inline]
	pub(crate) fn can_add_instance(&self) -> bool {
		self.count == 0 || !self.is_unique()
	}

	pub(crate) fn add_instance(&mut self) {
		debug_assert!(self.can_add_instance());
		self.count += 1;
	}
}
