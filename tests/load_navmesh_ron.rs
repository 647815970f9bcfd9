//! Load a navmesh from disk and steer across it
//!

use bevy::prelude::*;
use bevy_navmesh_flowfield_plugin::prelude::*;

#[test]
fn load_and_link() {
	let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/corridor_navmesh.ron";
	let mesh = NavMesh::from_ron(path).unwrap();
	assert_eq!(6, mesh.region_count());
	let result = mesh.neighbours(RegionID::new(1));
	let actual = vec![RegionID::new(0), RegionID::new(2)];
	let mut sorted = result.clone();
	sorted.sort();
	assert_eq!(actual, sorted);
}

#[test]
fn missing_file_is_an_error() {
	let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/does_not_exist.ron";
	let result = NavMesh::from_ron(path);
	assert!(matches!(result, Err(NavMeshError::Load(_))));
}

#[test]
fn bundle_from_disk() {
	let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/corridor_navmesh.ron";
	let bundle = NavMeshFlowFieldBundle::from_ron(&path);
	assert!(bundle.is_ok());
}

#[test]
fn steer_on_loaded_mesh() {
	let path = env!("CARGO_MANIFEST_DIR").to_string() + "/assets/corridor_navmesh.ron";
	let mesh = NavMesh::from_ron(path).unwrap();
	let destination = Vec3::new(2.8, 0.0, 0.5);
	let region = mesh.region_containing(destination, PLANAR_EPSILON, COPLANAR_TOLERANCE).unwrap();
	assert_eq!(RegionID::new(5), region);
	let corridor = Corridor::CostMap(mesh.distance_field(region));
	let mut field =
		NavMeshFlowField::new(destination, corridor, Handedness::Right, FieldLifecycle::Persistent);
	let mut agent = FlowAgent::new(FieldID::new(0));
	let out = agent.steer(
		&mesh,
		&mut field,
		Vec3::new(0.2, 0.0, 0.5),
		Vec3::ZERO,
		&SteeringParams::default(),
	);
	assert_eq!(AgentState::Bound, agent.get_state());
	assert!(out.desired_velocity.x > 0.0);
}
