//! Shared component infrastructure.
//!
//! This crate provides the foundational types both containers build on:
//! - [`ComponentBase`]: Ownership back-reference embedded in every component
//! - [`Component`] / [`ComponentType`]: Object-safe and static component traits
//! - [`impl_component!`]: Declares a component type and its supertype chain
//! - [`TypeTag`] / [`Lineage`]: Precomputed type identity used for indexing
//! - [`OwnerKey`] / [`ContainerId`]: Ownership capability and container handles
//! - [`ComponentId`]: Child identifiers in named nodes
//! - [`ComponentError`]: Error type shared by every container
//! - [`config`]: TOML configuration for both containers

mod base;
pub mod config;
mod error;
mod tag;

use std::borrow::Borrow;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

pub use base::{Component, ComponentBase, ComponentType, OwnerKey};
pub use config::{ConfigError, RegistryConfig, ReplacePolicy, RosterConfig, TreeConfig};
pub use error::{ComponentError, ErrorKind};
pub use tag::{Lineage, TypeTag};

/// Whether a type is limited to a single instance per container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniqueness {
	/// At most one instance may be added.
	Unique,
	/// Any number of instances may be added.
	NonUnique,
}

impl Uniqueness {
	/// Maps a boolean "is unique" flag onto a marking.
	#[inline]
	pub fn from_flag(is_unique: bool) -> Self {
		if is_unique { Self::Unique } else { Self::NonUnique }
	}

	/// Returns true for [`Uniqueness::Unique`].
	#[inline]
	pub fn is_unique(self) -> bool {
		self == Self::Unique
	}
}

impl std::fmt::Display for Uniqueness {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Unique => write!(f, "unique"),
			Self::NonUnique => write!(f, "non-unique"),
		}
	}
}

/// Process-unique identifier of a container instance.
///
/// Components record the id of the container that owns them instead of a
/// reference to it, so ownership never keeps a container alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContainerId(u64);

impl ContainerId {
	/// Allocates a fresh id. Ids are never reused within a process.
	pub(crate) fn next() -> Self {
		static NEXT: AtomicU64 = AtomicU64::new(1);
		Self(NEXT.fetch_add(1, Ordering::Relaxed))
	}
}

impl std::fmt::Display for ContainerId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "container#{}", self.0)
	}
}

/// Identifier of a child within a single named node.
///
/// Cheap to clone; lookups accept `&str` through [`Borrow`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(Rc<str>);

impl ComponentId {
	/// Returns the identifier text.
	#[inline]
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Borrow<str> for ComponentId {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ComponentId {
	fn from(id: &str) -> Self {
		Self(Rc::from(id))
	}
}

impl From<String> for ComponentId {
	fn from(id: String) -> Self {
		Self(Rc::from(id))
	}
}

impl std::fmt::Display for ComponentId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}
