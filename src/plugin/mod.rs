//! Defines the Bevy [Plugin] for navmesh flow fields
//!

use crate::prelude::*;
use bevy::prelude::*;

pub mod field_layer;
pub mod steering_layer;

/// Order in which the systems run each tick
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum OrderingSet {
	/// Purge stale caches
	Tidy,
	/// Create fields for new requests
	Calculate,
	/// Steer and move agents
	Steer,
}

/// Registers navmesh flow field types, events and systems
pub struct NavMeshFlowFieldPlugin;

impl Plugin for NavMeshFlowFieldPlugin {
	#[cfg(not(tarpaulin_include))]
	fn build(&self, app: &mut App) {
		app.register_type::<VertexID>()
			.register_type::<EdgeID>()
			.register_type::<RegionID>()
			.register_type::<FieldID>()
			.register_type::<NavMesh>()
			.register_type::<FlowAgent>()
			.register_type::<FlowSteering>()
			.register_type::<FlowFieldSettings>()
			.add_event::<field_layer::EventPathRequest>()
			.add_event::<steering_layer::EventAgentArrived>()
			.configure_sets(
				Update,
				(OrderingSet::Tidy, OrderingSet::Calculate, OrderingSet::Steer).chain(),
			)
			.add_systems(
				Update,
				(
					field_layer::cleanup_old_fields.in_set(OrderingSet::Tidy),
					field_layer::event_insert_field.in_set(OrderingSet::Calculate),
					(steering_layer::steer_agents, steering_layer::integrate_steering)
						.chain()
						.in_set(OrderingSet::Steer),
				),
			);
	}
}
