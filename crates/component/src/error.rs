use thiserror::Error;

use crate::{ComponentId, ContainerId, Uniqueness};

/// Errors raised by container operations.
///
/// Shared between the type registry and named trees so both report the same
/// failure taxonomy; see [`ComponentError::kind`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComponentError {
	/// The component is already held by a container.
	#[error("component of type {type_name} already has a parent ({owner})")]
	AlreadyOwned {
		type_name: &'static str,
		owner: ContainerId,
	},
	/// A node already maps this identifier to a child.
	#[error("identifier '{id}' is already in use")]
	IdentifierTaken { id: ComponentId },
	/// A type's uniqueness marking cannot be flipped.
	#[error("type {type_name} is already marked as {existing}, cannot mark it as {requested}")]
	MarkingConflict {
		type_name: &'static str,
		existing: Uniqueness,
		requested: Uniqueness,
	},
	/// A type cannot become unique while it has several instances.
	#[error("cannot mark type {type_name} as unique, it already has {count} instances")]
	TooManyToMarkUnique { type_name: &'static str, count: usize },
	/// Adding the instance would put a unique type over capacity.
	#[error(
		"cannot add an instance of {type_name}: unique type {blocking} already has an instance"
	)]
	CapacityExceeded {
		type_name: &'static str,
		blocking: &'static str,
	},
	/// No component matched a type query.
	#[error("no component of type {type_name} in container")]
	NotFound { type_name: &'static str },
	/// Several components matched a type query that expects one.
	#[error("more than one component of type {type_name} in container ({count} found)")]
	Ambiguous { type_name: &'static str, count: usize },
	/// Adding the node would make it its own ancestor.
	#[error("adding '{id}' would make a node its own ancestor")]
	Cycle { id: ComponentId },
}

/// Coarse failure classes of [`ComponentError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
	/// The component or identifier is already owned.
	OwnershipConflict,
	/// A uniqueness marking was contradicted.
	UniquenessConflict,
	/// A unique type is already at its single instance.
	CapacityExceeded,
	/// A lookup found nothing.
	NotFound,
	/// A lookup found more than one match.
	Ambiguous,
	/// The parent chain would loop.
	Cycle,
}

impl ComponentError {
	/// Returns the failure class of this error.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::AlreadyOwned { .. } | Self::IdentifierTaken { .. } => ErrorKind::OwnershipConflict,
			Self::MarkingConflict { .. } | Self::TooManyToMarkUnique { .. } => {
				ErrorKind::UniquenessConflict
			}
			Self::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
			Self::NotFound { .. } => ErrorKind::NotFound,
			Self::Ambiguous { .. } => ErrorKind::Ambiguous,
			Self::Cycle { .. } => ErrorKind::Cycle,
		}
	}
}
