//! Logic relating to [NavMeshFlowField] creation and upkeep
//!

use std::collections::BTreeSet;

use crate::prelude::*;
use bevy::prelude::*;

/// A request for an agent to steer towards a destination. A field towards
/// the same destination is shared if one exists, otherwise one is created
#[derive(Event)]
pub struct EventPathRequest {
	/// Agent making the request
	entity: Entity,
	/// Where it wants to go
	destination: Vec3,
}

impl EventPathRequest {
	/// Create a new instance of [EventPathRequest]
	pub fn new(entity: Entity, destination: Vec3) -> Self {
		EventPathRequest {
			entity,
			destination,
		}
	}
	/// Get the requesting entity
	pub fn get_entity(&self) -> Entity {
		self.entity
	}
	/// Get the destination
	pub fn get_destination(&self) -> Vec3 {
		self.destination
	}
}

/// Find or create a field for each [EventPathRequest] and point the agent at
/// it. The first navmesh holding the destination owns the field
#[cfg(not(tarpaulin_include))]
pub fn event_insert_field(
	mut events: EventReader<EventPathRequest>,
	mut cache_q: Query<(Entity, &NavMesh, &mut FlowFieldCache, &FlowFieldSettings)>,
	mut agent_q: Query<&mut FlowAgent>,
	mut cmds: Commands,
	time: Res<Time>,
) {
	for event in events.read() {
		let mut placed = false;
		for (nav_entity, mesh, mut cache, settings) in cache_q.iter_mut() {
			let id = match cache.find_field(event.destination, settings.destination_epsilon) {
				Some(id) => id,
				None => {
					let Some(region) = mesh.region_containing(
						event.destination,
						settings.steering.epsilon,
						settings.steering.coplanar_tolerance,
					) else {
						continue;
					};
					let corridor = Corridor::CostMap(mesh.distance_field(region));
					let field = NavMeshFlowField::new(
						event.destination,
						corridor,
						settings.handedness,
						settings.lifecycle,
					);
					let id = cache.insert_field(field, time.elapsed());
					debug!("Created field {:?} towards {:?}", id, event.destination);
					id
				}
			};
			let agent = FlowAgent::new(id).with_navmesh(nav_entity);
			if let Ok(mut existing) = agent_q.get_mut(event.entity) {
				*existing = agent;
			} else if let Ok(mut entity_cmds) = cmds.get_entity(event.entity) {
				entity_cmds.try_insert((agent, FlowSteering::default()));
			}
			placed = true;
			break;
		}
		if !placed {
			warn!("Destination {:?} is not on any navmesh", event.destination);
		}
	}
}

/// Purge fields no agent uses that haven't been touched in a while
#[cfg(not(tarpaulin_include))]
pub fn cleanup_old_fields(
	mut cache_q: Query<(Entity, &mut FlowFieldCache)>,
	agent_q: Query<&FlowAgent>,
	time: Res<Time>,
) {
	for (nav_entity, mut cache) in cache_q.iter_mut() {
		let in_use: BTreeSet<FieldID> = agent_q
			.iter()
			.filter(|a| a.get_navmesh() == Some(nav_entity))
			.filter_map(|a| a.get_field())
			.collect();
		let purged = cache.purge_expired(time.elapsed(), &in_use);
		if !purged.is_empty() {
			debug!("Purged fields {:?}", purged);
		}
	}
}
