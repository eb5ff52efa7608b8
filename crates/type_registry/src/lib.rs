//! Type-indexed component registry.
//!
//! [`TypeRegistry`] holds components of any type and answers queries by
//! type, including by any supertype a component embeds. Each type can be
//! marked unique (at most one instance) or non-unique; the marking is fixed
//! once set and is enforced for the type itself and, on every add, for each
//! supertype in the new component's lineage.
//!
//! ```rust,ignore
//! let mut registry = TypeRegistry::new();
//! registry.add_component(Rc::new(Manager::new("boss")), Some(Uniqueness::Unique))?;
//! registry.add_component(Rc::new(Dancer::new("ana")), None)?;
//!
//! let boss: &Manager = registry.get_component::<Manager>()?;
//! for dancer in registry.get_components::<Dancer>() { /* ... */ }
//! ```

mod registry;
mod state;

pub use registry::TypeRegistry;
pub use state::TypeState;
