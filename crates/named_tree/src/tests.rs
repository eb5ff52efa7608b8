use std::rc::Rc;

use roster_component::{
	Component, ComponentBase, ComponentError, ErrorKind, OwnerKey, ReplacePolicy, TreeConfig,
	impl_component,
};
use rstest::{fixture, rstest};

use super::*;

#[derive(Debug)]
struct Dancer {
	base: ComponentBase,
	name: &'static str,
}
impl_component!(Dancer { base });

impl Dancer {
	fn new(name: &'static str) -> Rc<Self> {
		Rc::new(Self {
			base: ComponentBase::new(),
			name,
		})
	}
}

struct ManagerNode {
	node: NamedTree,
	name: &'static str,
}
impl_component!(ManagerNode: NamedTree { node });

fn manager_node(name: &'static str) -> Rc<ManagerNode> {
	NamedTree::cyclic(|this| ManagerNode {
		node: NamedTree::within(this),
		name,
	})
}

fn ids(node: &NamedTree) -> Vec<Option<String>> {
	node.components()
		.map(|entry| entry.id().map(ToString::to_string))
		.collect()
}

fn dancer_name(component: &dyn Component) -> Option<&'static str> {
	component.view::<Dancer>().map(|d| d.name)
}

struct Stage {
	root: Rc<NamedTree>,
	manager: Rc<ManagerNode>,
}

/// Root owning a manager node, which owns one dancer.
#[fixture]
fn stage() -> Stage {
	let root = NamedTree::new_root();
	let manager = manager_node("the manager");
	root.add_component("manager", manager.clone(), false).unwrap();
	manager
		.node
		.add_component("assistant", Dancer::new("assistant"), false)
		.unwrap();
	Stage { root, manager }
}

#[rstest]
fn test_lookup_through_parent_chain(stage: Stage) {
	let found = stage.root.get_component("manager").unwrap();
	assert_eq!(found.view::<ManagerNode>().unwrap().name, "the manager");

	assert!(stage.manager.node.get_component("child1").is_none());

	let dancer = Dancer::new("dancer");
	stage
		.root
		.add_component("child1", dancer.clone(), false)
		.unwrap();

	let found = stage.manager.node.get_component("child1").unwrap();
	assert_eq!(dancer_name(&*found), Some("dancer"));
	assert!(Rc::ptr_eq(&found, &(dancer as Rc<dyn Component>)));
}

#[rstest]
fn test_components_near_to_far(stage: Stage) {
	stage
		.root
		.add_component("child1", Dancer::new("d1"), false)
		.unwrap();

	assert_eq!(
		ids(&stage.manager.node),
		[
			Some("assistant".to_string()),
			Some("manager".to_string()),
			Some("child1".to_string()),
			None,
		]
	);
	assert_eq!(
		ids(&stage.root),
		[Some("manager".to_string()), Some("child1".to_string()), None]
	);
}

#[rstest]
fn test_root_yielded_last(stage: Stage) {
	let last = stage.manager.node.components().last().unwrap();
	assert!(last.id().is_none());

	let root = last.component().view::<NamedTree>().unwrap();
	assert!(std::ptr::eq(root, &*stage.root));
}

#[test]
fn test_detached_node_yields_itself() {
	let root = NamedTree::new_root();
	let entries: Vec<_> = root.components().collect();

	assert_eq!(entries.len(), 1);
	assert!(entries[0].id().is_none());
	assert!(std::ptr::eq(
		entries[0].component().view::<NamedTree>().unwrap(),
		&*root
	));
}

#[test]
fn test_embedded_node_points_at_its_payload() {
	let manager = manager_node("solo");
	let entries: Vec<_> = manager.node.components().collect();

	assert_eq!(entries.len(), 1);
	assert!(entries[0].id().is_none());
	let payload = entries[0].component().view::<ManagerNode>().unwrap();
	assert!(std::ptr::eq(payload, &*manager));

	let root = NamedTree::new_root();
	root.add_component("manager", manager.clone(), false).unwrap();
	root.add_component("child1", Dancer::new("d1"), false).unwrap();
	assert_eq!(
		dancer_name(&*manager.node.get_component("child1").unwrap()),
		Some("d1")
	);
	assert_eq!(
		ids(&manager.node),
		[Some("manager".to_string()), Some("child1".to_string()), None]
	);
}

#[rstest]
fn test_foreign_key_cannot_detach_child(stage: Stage) {
	let dancer = Dancer::new("d");
	stage.root.add_component("child1", dancer.clone(), false).unwrap();

	assert!(!dancer.base.release(&OwnerKey::new()));
	assert_eq!(dancer.base.owner(), Some(stage.root.id()));

	let other = NamedTree::new_root();
	let err = other.add_component("child1", dancer, false).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::OwnershipConflict);
	assert!(other.is_empty());
}

#[rstest]
fn test_duplicate_identifiers_nearest_first(stage: Stage) {
	stage
		.root
		.add_component("lead", Dancer::new("far"), false)
		.unwrap();
	stage
		.manager
		.node
		.add_component("lead", Dancer::new("near"), false)
		.unwrap();

	let leads: Vec<_> = stage
		.manager
		.node
		.components()
		.filter(|entry| entry.id().is_some_and(|id| id.as_str() == "lead"))
		.filter_map(|entry| dancer_name(entry.component()))
		.collect();
	assert_eq!(leads, ["near", "far"]);

	let lead = stage.manager.node.get_component("lead").unwrap();
	assert_eq!(dancer_name(&*lead), Some("near"));
}

#[test]
fn test_taken_identifier_rejected() {
	let root = NamedTree::new_root();
	root.add_component("child1", Dancer::new("first"), false)
		.unwrap();

	let second = Dancer::new("second");
	let err = root
		.add_component("child1", second.clone(), false)
		.unwrap_err();

	assert_eq!(err, ComponentError::IdentifierTaken { id: "child1".into() });
	assert_eq!(err.kind(), ErrorKind::OwnershipConflict);
	assert_eq!(second.base.owner(), None);
	assert_eq!(
		dancer_name(&*root.get_component("child1").unwrap()),
		Some("first")
	);
}

#[test]
fn test_replace_orphans_previous_child() {
	let root = NamedTree::new_root();
	let first = Dancer::new("first");
	root.add_component("a", Dancer::new("before"), false).unwrap();
	root.add_component("child1", first.clone(), false).unwrap();
	root.add_component("z", Dancer::new("after"), false).unwrap();

	root.add_component("child1", Dancer::new("second"), true)
		.unwrap();

	assert_eq!(
		dancer_name(&*root.get_component("child1").unwrap()),
		Some("second")
	);
	assert_eq!(first.base.owner(), None);
	assert_eq!(root.len(), 3);
	assert_eq!(
		ids(&root),
		[
			Some("a".to_string()),
			Some("child1".to_string()),
			Some("z".to_string()),
			None,
		]
	);

	let other = NamedTree::new_root();
	other.add_component("rehomed", first.clone(), false).unwrap();
	assert_eq!(first.base.owner(), Some(other.id()));
}

#[test]
fn test_replace_with_retain_policy_keeps_owner() {
	let root = NamedTree::new_root_with(TreeConfig {
		replace: ReplacePolicy::Retain,
	});
	let first = Dancer::new("first");
	root.add_component("child1", first.clone(), false).unwrap();
	root.add_component("child1", Dancer::new("second"), true)
		.unwrap();

	assert_eq!(first.base.owner(), Some(root.id()));

	let other = NamedTree::new_root();
	let err = other.add_component("x", first, false).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::OwnershipConflict);
}

#[rstest]
fn test_replacing_node_detaches_it(stage: Stage) {
	stage
		.root
		.add_component("child1", Dancer::new("d"), false)
		.unwrap();
	stage
		.root
		.add_component("manager", manager_node("successor"), true)
		.unwrap();

	assert!(stage.manager.node.parent().is_none());
	assert!(stage.manager.node.get_component("child1").is_none());
	assert_eq!(stage.manager.node.base().owner(), None);
}

#[rstest]
fn test_owned_component_rejected(stage: Stage) {
	let other = NamedTree::new_root();
	let err = other
		.add_component("stolen", stage.manager.clone(), false)
		.unwrap_err();

	assert_eq!(
		err,
		ComponentError::AlreadyOwned {
			type_name: "ManagerNode",
			owner: stage.root.id(),
		}
	);
	assert!(other.is_empty());
}

#[rstest]
fn test_cycle_rejected(stage: Stage) {
	let err = stage
		.manager
		.node
		.add_component("boss", stage.root.clone(), false)
		.unwrap_err();
	assert_eq!(err, ComponentError::Cycle { id: "boss".into() });
	assert!(stage.root.parent().is_none());
	assert_eq!(stage.root.base().owner(), None);

	let err = stage
		.root
		.add_component("self", stage.root.clone(), false)
		.unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Cycle);
}

#[rstest]
fn test_find_component_by_capability(stage: Stage) {
	stage
		.root
		.add_component("child1", Dancer::new("d1"), false)
		.unwrap();

	let found = stage
		.manager
		.node
		.find_component(|id, component| id.is_some() && component.is_a::<NamedTree>())
		.unwrap();
	assert_eq!(found.view::<ManagerNode>().unwrap().name, "the manager");

	let root = stage
		.manager
		.node
		.find_component(|id, _| id.is_none())
		.unwrap();
	assert!(root.view::<ManagerNode>().is_none());
	assert!(root.is_a::<NamedTree>());

	assert!(
		stage
			.root
			.find_component(|_, component| dancer_name(component) == Some("nobody"))
			.is_none()
	);
}

#[rstest]
fn test_visitor_sees_every_entry(stage: Stage) {
	stage
		.root
		.add_component("child1", Dancer::new("d1"), false)
		.unwrap();

	let mut dancers = Vec::new();
	let mut nodes = 0;
	stage.manager.node.on_components_and_self(|component| {
		if let Some(name) = dancer_name(component) {
			dancers.push(name);
		} else if component.is_a::<NamedTree>() {
			nodes += 1;
		}
	});

	assert_eq!(dancers, ["assistant", "d1"]);
	assert_eq!(nodes, 2);
}

#[rstest]
fn test_children_are_own_entries_only(stage: Stage) {
	let children = stage.manager.node.children();
	assert_eq!(children.len(), 1);
	assert_eq!(children[0].id().map(|id| id.as_str()), Some("assistant"));
	assert_eq!(stage.manager.node.len(), 1);
}
