//! A [FlowAgent] is the per-agent cursor into a shared [NavMeshFlowField].
//!
//! It tracks which Region and which triangle of that Region the agent stands
//! in, and each tick turns the agent's position into a steering force:
//!
//! ```text
//!  UNBOUND ──bind──> BOUND ──within arrival distance──> ARRIVED
//!     ^                │
//!     └────no route────┘
//! ```
//!
//! While bound the cheapest check runs first. If the agent is still inside its
//! current triangle nothing needs looking up. If it left the triangle but is
//! still inside the Region a new lane and triangle are selected. Only when it
//! left the Region is the mesh searched for a new one, and if that search
//! fails (numerical trouble along a boundary usually) the position is clamped
//! onto the last Region's boundary so the agent keeps moving.
//!

pub mod flow_triangle;
pub mod lanes;

use crate::prelude::*;
use bevy::prelude::*;

/// Where an agent is in its lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum AgentState {
	/// Not standing in any Region of the field
	#[default]
	Unbound,
	/// Standing in a Region with a flow
	Bound,
	/// Reached the destination, holds position until given a new field
	Arrived,
}

/// Tuning of an agent's steering
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct SteeringParams {
	/// Speed of the desired velocity
	pub max_speed: f32,
	/// Distance from the destination treated as arrival
	pub arrival_distance: f32,
	/// Tolerance of the planar containment tests
	pub epsilon: f32,
	/// How far off a Region's plane a position may be and still count as inside it
	pub coplanar_tolerance: f32,
}

impl Default for SteeringParams {
	fn default() -> Self {
		SteeringParams {
			max_speed: DEFAULT_MAX_SPEED,
			arrival_distance: DEFAULT_ARRIVAL_DISTANCE,
			epsilon: PLANAR_EPSILON,
			coplanar_tolerance: COPLANAR_TOLERANCE,
		}
	}
}

/// Result of one steering tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SteeringOutput {
	/// Force matching the current velocity to the desired one in a single step
	pub force: Vec3,
	/// Velocity the agent wants
	pub desired_velocity: Vec3,
	/// Set on the one tick the agent arrives
	pub arrived: bool,
}

impl SteeringOutput {
	/// Bring the agent to a stop
	fn braking(velocity: Vec3) -> Self {
		SteeringOutput {
			force: -velocity,
			desired_velocity: Vec3::ZERO,
			arrived: false,
		}
	}
}

/// Per-agent cursor into a [NavMeshFlowField]
#[derive(Component, Clone, Debug, Default, Reflect)]
pub struct FlowAgent {
	/// Lifecycle state
	state: AgentState,
	/// Entity holding the [NavMesh] and [FlowFieldCache] the field lives in
	navmesh: Option<Entity>,
	/// Field the agent steers with
	field: Option<FieldID>,
	/// Region the agent is in, kept when binding fails
	region: Option<RegionID>,
	/// Region the agent entered `region` from
	from: Option<RegionID>,
	/// Regions still to cross, empty in the Region holding the destination
	remaining: Vec<RegionID>,
	/// Triangle of `region` the agent stands in, [None] when seeking the destination directly
	triangle: Option<FlowTriangle>,
	/// Lane memory
	lanes: LaneTracker,
	/// Last direction produced, held when a direction can't be computed
	direction: Vec2,
}

impl FlowAgent {
	/// Create an agent steering with a field
	pub fn new(field: FieldID) -> Self {
		FlowAgent {
			field: Some(field),
			..default()
		}
	}
	/// Record which navmesh entity owns the field
	pub fn with_navmesh(mut self, navmesh: Entity) -> Self {
		self.navmesh = Some(navmesh);
		self
	}
	/// Get the state
	pub fn get_state(&self) -> AgentState {
		self.state
	}
	/// Get the navmesh entity owning the field
	pub fn get_navmesh(&self) -> Option<Entity> {
		self.navmesh
	}
	/// Get the field in use
	pub fn get_field(&self) -> Option<FieldID> {
		self.field
	}
	/// Switch to another field of the same navmesh, the agent starts over unbound
	pub fn set_field(&mut self, field: FieldID) {
		*self = FlowAgent {
			navmesh: self.navmesh,
			..FlowAgent::new(field)
		};
	}
	/// Get the current Region
	pub fn get_region(&self) -> Option<RegionID> {
		self.region
	}
	/// Get the Regions left to cross
	pub fn get_remaining(&self) -> &[RegionID] {
		&self.remaining
	}
	/// Get the current triangle
	pub fn get_triangle(&self) -> Option<&FlowTriangle> {
		self.triangle.as_ref()
	}
	/// Get the last lane
	pub fn get_lane(&self) -> Option<i32> {
		self.lanes.get_lane()
	}
	/// Get the last direction produced
	pub fn get_direction(&self) -> Vec2 {
		self.direction
	}
	/// Work out the steering force for an agent at `position` moving at `velocity`
	pub fn steer(
		&mut self,
		mesh: &NavMesh,
		field: &mut NavMeshFlowField,
		position: Vec3,
		velocity: Vec3,
		params: &SteeringParams,
	) -> SteeringOutput {
		let mut pt = to_planar(position);
		match self.state {
			AgentState::Arrived => return SteeringOutput::braking(velocity),
			AgentState::Unbound => {
				if !self.bind(mesh, field, position, params) {
					return SteeringOutput::braking(velocity);
				}
			}
			AgentState::Bound => {
				if !self.within_current_triangle_bounds(mesh, position, params) {
					let current = self.region;
					match current {
						Some(region)
							if mesh.region_contains(
								region,
								position,
								params.epsilon,
								params.coplanar_tolerance,
							) =>
						{
							self.select_triangle(mesh, field, pt, params.epsilon);
						}
						Some(region) => {
							if !self.bind(mesh, field, position, params) {
								if self.state == AgentState::Unbound {
									return SteeringOutput::braking(velocity);
								}
								let clamped = mesh.closest_point_on_boundary(region, position);
								trace!("Agent clamped to {:?} on region {:?}", clamped, region);
								pt = to_planar(clamped);
								self.select_triangle(mesh, field, pt, params.epsilon);
							}
						}
						None => {
							self.state = AgentState::Unbound;
							return SteeringOutput::braking(velocity);
						}
					}
				}
			}
		}

		let destination = to_planar(field.get_destination());
		if self.remaining.is_empty()
			&& to_planar(position).distance(destination) <= params.arrival_distance
		{
			debug!("Agent arrived at {:?}", field.get_destination());
			self.state = AgentState::Arrived;
			let mut output = SteeringOutput::braking(velocity);
			output.arrived = true;
			return output;
		}
		let mut blend = self.direction;
		match &self.triangle {
			Some(triangle) => triangle.calc_dir(pt, &mut blend),
			None if self.remaining.is_empty() => blend = destination - pt,
			None => {}
		}
		// corners cancelling out keep the last heading
		if let Some(dir) = blend.try_normalize() {
			self.direction = dir;
		}
		let desired_velocity = from_planar(self.direction) * params.max_speed;
		SteeringOutput {
			force: desired_velocity - velocity,
			desired_velocity,
			arrived: false,
		}
	}
	/// The cheap per-tick test. In the terminal Region an agent seeking the
	/// destination directly has no triangle so the Region itself is tested
	fn within_current_triangle_bounds(
		&self,
		mesh: &NavMesh,
		position: Vec3,
		params: &SteeringParams,
	) -> bool {
		match (&self.triangle, self.region) {
			(Some(triangle), _) => triangle.contains(to_planar(position), params.epsilon),
			(None, Some(region)) if self.remaining.is_empty() => mesh.region_contains(
				region,
				position,
				params.epsilon,
				params.coplanar_tolerance,
			),
			_ => false,
		}
	}
	/// Find the Region holding `position` and grow the field into it. Coming
	/// from an adjacent Region the step is keyed by it so its portal flows are
	/// reused. Returns `false` if no Region holds the position or the
	/// destination can't be reached from it
	fn bind(
		&mut self,
		mesh: &NavMesh,
		field: &mut NavMeshFlowField,
		position: Vec3,
		params: &SteeringParams,
	) -> bool {
		let Some(region) = mesh.region_containing(position, params.epsilon, params.coplanar_tolerance)
		else {
			debug!("No region contains {:?}", position);
			return false;
		};
		let from = self
			.region
			.filter(|old| *old != region && mesh.portal_between(*old, region).is_some());
		match field.calc_region_flow(mesh, from, region) {
			RegionFlow::Remaining(remaining) => {
				self.region = Some(region);
				self.from = from;
				self.remaining = remaining;
				self.state = AgentState::Bound;
				self.lanes.reset_lane();
				self.select_triangle(mesh, field, to_planar(position), params.epsilon);
				true
			}
			RegionFlow::NoRoute => {
				debug!("Agent in region {:?} has no route", region);
				self.region = Some(region);
				self.state = AgentState::Unbound;
				self.triangle = None;
				false
			}
		}
	}
	/// Pick the lane and triangle of the current Region holding `pt`. In the
	/// terminal Region a triangle of the destination fan is picked, if `pt` is
	/// in none of them the agent seeks the destination directly
	fn select_triangle(
		&mut self,
		mesh: &NavMesh,
		field: &NavMeshFlowField,
		pt: Vec2,
		epsilon: f32,
	) {
		let Some(region) = self.region else {
			return;
		};
		if self.remaining.is_empty() {
			self.triangle = field.terminal_triangle(mesh, region, pt, epsilon).map(|t| {
				let mut corners = *t.get_corners();
				self.lanes.get_continuity().substitute(&mut corners);
				FlowTriangle::new(corners)
			});
			return;
		}
		let flows = field.get_flows();
		if let Some(triangulation) = field.get_triangulation(self.from, region) {
			triangulation.update_lane(pt, epsilon, &mut self.lanes, flows);
			self.triangle = triangulation.update_flow_tri_laned(pt, &self.lanes, flows);
		} else {
			let vertices = mesh.region_vertices(region);
			let corners = match vertices.as_slice() {
				[a, b, c] => flows
					.get(*a)
					.zip(flows.get(*b))
					.zip(flows.get(*c))
					.map(|((a, b), c)| [*a, *b, *c]),
				_ => None,
			};
			self.triangle = corners.map(|mut c| {
				self.lanes.get_continuity().substitute(&mut c);
				FlowTriangle::new(c)
			});
		}
		if self.triangle.is_none() {
			warn!("Region {:?} has no flow triangle at {:?}", region, pt);
		}
	}
}
