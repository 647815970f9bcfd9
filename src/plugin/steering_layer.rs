//! Per-tick driving of [FlowAgent]s and integration of their steering
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Sent on the one tick an agent reaches its destination
#[derive(Event)]
pub struct EventAgentArrived {
	/// The agent
	entity: Entity,
}

impl EventAgentArrived {
	/// Create a new instance of [EventAgentArrived]
	pub fn new(entity: Entity) -> Self {
		EventAgentArrived { entity }
	}
	/// Get the agent
	pub fn get_entity(&self) -> Entity {
		self.entity
	}
}

/// Motion state of an agent
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
pub struct FlowSteering {
	/// Overrides the navmesh's default [SteeringParams] when set
	params: Option<SteeringParams>,
	/// Current velocity
	velocity: Vec3,
	/// Force produced by the last steering tick
	force: Vec3,
}

impl FlowSteering {
	/// Create steering with custom parameters
	pub fn new(params: SteeringParams) -> Self {
		FlowSteering {
			params: Some(params),
			..default()
		}
	}
	/// Get the parameter override
	pub fn get_params(&self) -> Option<&SteeringParams> {
		self.params.as_ref()
	}
	/// Get the velocity
	pub fn get_velocity(&self) -> Vec3 {
		self.velocity
	}
	/// Set the velocity, for hosts doing their own physics
	pub fn set_velocity(&mut self, velocity: Vec3) {
		self.velocity = velocity;
	}
	/// Get the last steering force
	pub fn get_force(&self) -> Vec3 {
		self.force
	}
}

/// Steer every agent with the field it was given, looked up in the cache of
/// the navmesh entity that owns it
#[cfg(not(tarpaulin_include))]
pub fn steer_agents(
	mut cache_q: Query<(&NavMesh, &mut FlowFieldCache, &FlowFieldSettings)>,
	mut agent_q: Query<(Entity, &Transform, &mut FlowAgent, &mut FlowSteering)>,
	mut event_arrived: EventWriter<EventAgentArrived>,
	time: Res<Time>,
) {
	for (entity, tform, mut agent, mut steering) in agent_q.iter_mut() {
		let (Some(navmesh), Some(id)) = (agent.get_navmesh(), agent.get_field()) else {
			continue;
		};
		let Ok((mesh, mut cache, settings)) = cache_q.get_mut(navmesh) else {
			continue;
		};
		let params = steering.params.unwrap_or(settings.steering);
		if let Some(field) = cache.get_field_mut(id) {
			let out = agent.steer(mesh, field, tform.translation, steering.velocity, &params);
			steering.force = out.force;
			if out.arrived {
				event_arrived.write(EventAgentArrived::new(entity));
			}
			cache.touch_field(id, time.elapsed());
		}
	}
}

/// Apply the steering force as a change in velocity and move the agent
#[cfg(not(tarpaulin_include))]
pub fn integrate_steering(mut agent_q: Query<(&mut Transform, &mut FlowSteering)>, time: Res<Time>) {
	for (mut tform, mut steering) in agent_q.iter_mut() {
		let force = steering.force;
		steering.velocity += force;
		steering.force = Vec3::ZERO;
		tform.translation += steering.velocity * time.delta_secs();
	}
}
