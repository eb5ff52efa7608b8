//! Component containers.
//!
//! This crate aggregates the roster sub-crates. Depend on it to get both
//! container kinds and the shared component infrastructure:
//!
//! - [`TypeRegistry`] - Components indexed by type, with per-type uniqueness
//! - [`NamedTree`] - Components keyed by identifier, with ancestor lookup
//! - [`Component`] / [`impl_component!`] - Declaring component types
//! - [`config`] - TOML configuration for both containers

pub use roster_component::{
	Component, ComponentBase, ComponentError, ComponentId, ComponentType, ConfigError,
	ContainerId, ErrorKind, Lineage, OwnerKey, RegistryConfig, ReplacePolicy, RosterConfig,
	TreeConfig, TypeTag, Uniqueness, config, impl_component,
};
pub use roster_named_tree::{Components, Entry, NamedTree, NodeHandle};
pub use roster_type_registry::{TypeRegistry, TypeState};

/// Builds a type registry from the `[registry]` section of `config`.
pub fn registry_from(config: &RosterConfig) -> TypeRegistry {
	TypeRegistry::with_config(config.registry.clone())
}

/// Builds a root node from the `[tree]` section of `config`.
pub fn tree_from(config: &RosterConfig) -> std::rc::Rc<NamedTree> {
	NamedTree::new_root_with(config.tree)
}
