//! Container configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [registry]
//! unique = ["Manager"]
//! non_unique = ["Dancer"]
//!
//! [tree]
//! replace = "orphan"
//! ```
//!
//! A type is matched by its fully qualified path
//! ([`TypeTag::path`](crate::TypeTag::path)) first, then by its unqualified
//! name ([`TypeTag::name`](crate::TypeTag::name)). An unqualified entry
//! applies to every type sharing that name: `Manager` covers
//! `staff::Manager` and `security::Manager`, and `Wrapper` covers every
//! `Wrapper<T>`. Use the full path to target one of them.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::{TypeTag, Uniqueness};

/// Errors produced while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
	/// The configuration file could not be read.
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	/// The configuration is not valid TOML for [`RosterConfig`].
	#[error("invalid configuration: {0}")]
	Parse(#[from] toml::de::Error),
	/// A type is declared both unique and non-unique.
	#[error("type {name} is declared both unique and non-unique")]
	ConflictingDeclaration { name: String },
}

/// Top-level configuration for both container kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RosterConfig {
	/// Type registry settings.
	pub registry: RegistryConfig,
	/// Named tree settings.
	pub tree: TreeConfig,
}

impl RosterConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.registry.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&source)
	}
}

/// Uniqueness declarations applied by a type registry.
///
/// A declaration takes effect the first time the registry tracks a matching
/// type, as if the type had been marked explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Types limited to a single instance.
	pub unique: Vec<String>,
	/// Types that may never be marked unique.
	pub non_unique: Vec<String>,
}

impl RegistryConfig {
	/// Returns the declared marking for `tag`.
	///
	/// An entry naming the full path wins over one naming the short name.
	pub fn declared(&self, tag: TypeTag) -> Option<Uniqueness> {
		self.declared_name(tag.path())
			.or_else(|| self.declared_name(tag.name()))
	}

	fn declared_name(&self, name: &str) -> Option<Uniqueness> {
		if self.unique.iter().any(|n| n == name) {
			Some(Uniqueness::Unique)
		} else if self.non_unique.iter().any(|n| n == name) {
			Some(Uniqueness::NonUnique)
		} else {
			None
		}
	}

	/// Rejects names listed under both markings.
	pub fn validate(&self) -> Result<(), ConfigError> {
		match self.unique.iter().find(|n| self.non_unique.contains(n)) {
			Some(name) => Err(ConfigError::ConflictingDeclaration { name: name.clone() }),
			None => Ok(()),
		}
	}
}

/// What happens to a child displaced by a replacing add.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacePolicy {
	/// Clear the displaced child's owner so it can be added elsewhere.
	#[default]
	Orphan,
	/// Leave the displaced child claiming the node as its owner.
	Retain,
}

/// Named tree settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeConfig {
	/// Policy for children displaced by `replace`.
	pub replace: ReplacePolicy,
}

#[cfg(test)]
mod tests;
