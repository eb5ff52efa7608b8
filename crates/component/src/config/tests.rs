use std::io::Write;

use pretty_assertions::assert_eq;

use super::*;

const CONFIG: &str = r#"
        [registry]
        unique = ["Manager"]
        non_unique = ["Dancer", "Stagehand"]

        [tree]
        replace = "retain"
    "#;

#[test]
fn test_parse_full_document() {
	let config = RosterConfig::from_toml_str(CONFIG).unwrap();

	assert_eq!(
		config,
		RosterConfig {
			registry: RegistryConfig {
				unique: vec!["Manager".into()],
				non_unique: vec!["Dancer".into(), "Stagehand".into()],
			},
			tree: TreeConfig {
				replace: ReplacePolicy::Retain,
			},
		}
	);
}

#[test]
fn test_empty_document_uses_defaults() {
	let config = RosterConfig::from_toml_str("").unwrap();
	assert_eq!(config, RosterConfig::default());
	assert_eq!(config.tree.replace, ReplacePolicy::Orphan);
}

mod staff {
	pub struct Manager;
	pub struct Stagehand;
	pub struct Accountant;
}

mod security {
	pub struct Manager;
}

#[test]
fn test_declared_lookup() {
	let config = RosterConfig::from_toml_str(CONFIG).unwrap();

	assert_eq!(
		config.registry.declared(TypeTag::of::<staff::Manager>()),
		Some(Uniqueness::Unique)
	);
	assert_eq!(
		config.registry.declared(TypeTag::of::<staff::Stagehand>()),
		Some(Uniqueness::NonUnique)
	);
	assert_eq!(config.registry.declared(TypeTag::of::<staff::Accountant>()), None);
}

#[test]
fn test_short_name_covers_every_module() {
	let config = RosterConfig::from_toml_str(CONFIG).unwrap();

	assert_eq!(
		config.registry.declared(TypeTag::of::<security::Manager>()),
		Some(Uniqueness::Unique)
	);
}

#[test]
fn test_full_path_targets_one_type() {
	let config = RegistryConfig {
		unique: vec![std::any::type_name::<security::Manager>().into()],
		non_unique: vec!["Manager".into()],
	};
	config.validate().unwrap();

	assert_eq!(
		config.declared(TypeTag::of::<security::Manager>()),
		Some(Uniqueness::Unique)
	);
	assert_eq!(
		config.declared(TypeTag::of::<staff::Manager>()),
		Some(Uniqueness::NonUnique)
	);
}

#[test]
fn test_conflicting_declaration_rejected() {
	let err = RosterConfig::from_toml_str(
		r#"
        [registry]
        unique = ["Dancer"]
        non_unique = ["Dancer"]
    "#,
	)
	.unwrap_err();

	assert!(matches!(err, ConfigError::ConflictingDeclaration { name } if name == "Dancer"));
}

#[test]
fn test_unknown_policy_rejected() {
	let err = RosterConfig::from_toml_str("[tree]\nreplace = \"swap\"\n").unwrap_err();
	assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_load_from_file() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(CONFIG.as_bytes()).unwrap();

	let config = RosterConfig::load(file.path()).unwrap();
	assert_eq!(config.registry.unique, vec!["Manager".to_string()]);
}

#[test]
fn test_load_missing_file() {
	let dir = tempfile::tempdir().unwrap();
	let err = RosterConfig::load(dir.path().join("absent.toml")).unwrap_err();
	assert!(matches!(err, ConfigError::Io { .. }));
}
