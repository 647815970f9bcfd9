//! Drive the plugin inside a minimal app
//!

use bevy::prelude::*;
use bevy_navmesh_flowfield_plugin::prelude::*;

/// Two 10x10 squares side by side along `x`
fn two_rooms() -> NavMesh {
	two_rooms_at(0.0)
}

/// [two_rooms] shifted by `offset` along `x`
fn two_rooms_at(offset: f32) -> NavMesh {
	let vertices = vec![
		Vec3::new(offset, 0.0, 0.0),
		Vec3::new(offset + 10.0, 0.0, 0.0),
		Vec3::new(offset + 20.0, 0.0, 0.0),
		Vec3::new(offset, 0.0, 10.0),
		Vec3::new(offset + 10.0, 0.0, 10.0),
		Vec3::new(offset + 20.0, 0.0, 10.0),
	];
	NavMesh::new(vertices, vec![vec![0, 1, 4, 3], vec![1, 2, 5, 4]]).unwrap()
}

fn app() -> App {
	let mut app = App::new();
	app.add_plugins(MinimalPlugins).add_plugins(NavMeshFlowFieldPlugin);
	app.world_mut().spawn(NavMeshFlowFieldBundle::new(two_rooms()));
	app
}

#[test]
fn request_creates_agent_and_steers() {
	let mut app = app();
	let agent = app.world_mut().spawn(Transform::from_xyz(2.0, 0.0, 5.0)).id();
	app.world_mut()
		.send_event(EventPathRequest::new(agent, Vec3::new(18.0, 0.0, 5.0)));
	for _ in 0..3 {
		app.update();
	}
	let flow_agent = app.world().get::<FlowAgent>(agent).unwrap();
	assert!(flow_agent.get_field().is_some());
	let steering = app.world().get::<FlowSteering>(agent).unwrap();
	assert!(steering.get_velocity().x > 0.0);
}

#[test]
fn same_destination_shares_field() {
	let mut app = app();
	let a = app.world_mut().spawn(Transform::from_xyz(2.0, 0.0, 5.0)).id();
	let b = app.world_mut().spawn(Transform::from_xyz(3.0, 0.0, 7.0)).id();
	app.world_mut()
		.send_event(EventPathRequest::new(a, Vec3::new(18.0, 0.0, 5.0)));
	app.world_mut()
		.send_event(EventPathRequest::new(b, Vec3::new(18.0, 0.0, 5.0)));
	app.update();
	let field_a = app.world().get::<FlowAgent>(a).unwrap().get_field();
	let field_b = app.world().get::<FlowAgent>(b).unwrap().get_field();
	assert_eq!(field_a, field_b);
	let mut caches = app.world_mut().query::<&FlowFieldCache>();
	let cache = caches.single(app.world()).unwrap();
	assert_eq!(1, cache.len());
}

#[test]
fn off_mesh_destination_is_ignored() {
	let mut app = app();
	let agent = app.world_mut().spawn(Transform::from_xyz(2.0, 0.0, 5.0)).id();
	app.world_mut()
		.send_event(EventPathRequest::new(agent, Vec3::new(50.0, 0.0, 50.0)));
	app.update();
	assert!(app.world().get::<FlowAgent>(agent).is_none());
}

#[test]
fn agents_steer_on_their_own_navmesh() {
	let mut app = App::new();
	app.add_plugins(MinimalPlugins).add_plugins(NavMeshFlowFieldPlugin);
	let west = app.world_mut().spawn(NavMeshFlowFieldBundle::new(two_rooms())).id();
	let east = app
		.world_mut()
		.spawn(NavMeshFlowFieldBundle::new(two_rooms_at(100.0)))
		.id();
	let a = app.world_mut().spawn(Transform::from_xyz(18.0, 0.0, 5.0)).id();
	let b = app.world_mut().spawn(Transform::from_xyz(102.0, 0.0, 5.0)).id();
	// both fields get the first id of their own cache
	app.world_mut()
		.send_event(EventPathRequest::new(a, Vec3::new(2.0, 0.0, 5.0)));
	app.world_mut()
		.send_event(EventPathRequest::new(b, Vec3::new(118.0, 0.0, 5.0)));
	for _ in 0..3 {
		app.update();
	}
	let agent_a = app.world().get::<FlowAgent>(a).unwrap();
	let agent_b = app.world().get::<FlowAgent>(b).unwrap();
	assert_eq!(Some(west), agent_a.get_navmesh());
	assert_eq!(Some(east), agent_b.get_navmesh());
	assert_eq!(agent_a.get_field(), agent_b.get_field());
	assert!(app.world().get::<FlowSteering>(a).unwrap().get_velocity().x < 0.0);
	assert!(app.world().get::<FlowSteering>(b).unwrap().get_velocity().x > 0.0);
}
