//! A [FlowVertex] binds a direction of travel to a vertex of the mesh. Agents
//! blend the directions of the three corners of the triangle they stand in to
//! produce a smooth steering direction.
//!
//! A direction can be ambiguous where a vertex is shared by parts of the
//! Corridor heading different ways (the inside of a turn for instance). Such
//! vertices don't store a fixed direction, they point from the vertex towards
//! whoever is asking, which produces a flow that curves around the corner:
//!
//! ```text
//!        \  |  /
//!         \ | /
//!   ------- o -------   radial vertex `o`
//! ```
//!

use std::collections::HashMap;

use crate::prelude::*;
use bevy::prelude::*;

/// How a [FlowVertex] resolves its direction
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub enum FlowDirection {
	/// Always the same unit direction
	Static(Vec2),
	/// Points from the vertex towards the query point
	Radial,
	/// Points from the query point towards the vertex, used for the destination
	Sink,
	/// A direction for each side of a line through the vertex
	Split {
		/// Separates the two directions, `inside` is used on its positive side
		plane: HalfPlane,
		/// Direction used on the inside of `plane`
		inside: Vec2,
		/// Direction used on the outside, when [None] the vertex is radial there
		outside: Option<Vec2>,
	},
}

/// A direction bound to one vertex of the mesh
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct FlowVertex {
	/// The mesh vertex
	vertex: VertexID,
	/// Position of the vertex on the flow plane
	position: Vec2,
	/// How the direction is resolved
	direction: FlowDirection,
}

impl FlowVertex {
	/// Create a new instance of [FlowVertex]
	pub fn new(vertex: VertexID, position: Vec2, direction: FlowDirection) -> Self {
		FlowVertex {
			vertex,
			position,
			direction,
		}
	}
	/// Get the mesh vertex
	pub fn get_vertex(&self) -> VertexID {
		self.vertex
	}
	/// Get the planar position
	pub fn get_position(&self) -> Vec2 {
		self.position
	}
	/// Get the direction kind
	pub fn get_direction(&self) -> &FlowDirection {
		&self.direction
	}
	/// Whether the direction depends on the query point
	pub fn is_ambiguous(&self) -> bool {
		!matches!(self.direction, FlowDirection::Static(_))
	}
	/// Direction to use when blending at `point`. Evaluated fresh on every
	/// call because radial directions follow the query point
	pub fn direction_at(&self, point: Vec2) -> Vec2 {
		match self.direction {
			FlowDirection::Static(dir) => dir,
			FlowDirection::Radial => self.radial(point),
			FlowDirection::Sink => -self.radial(point),
			FlowDirection::Split {
				plane,
				inside,
				outside,
			} => {
				if plane.side(point) >= 0.0 {
					inside
				} else if let Some(dir) = outside {
					dir
				} else {
					self.radial(point)
				}
			}
		}
	}
	/// Unit vector from the vertex to `point`, zero when they coincide
	fn radial(&self, point: Vec2) -> Vec2 {
		(point - self.position).normalize_or_zero()
	}
}

/// Every [FlowVertex] of a field keyed 1:1 by vertex handle so all Regions
/// sharing a vertex blend the same value
#[derive(Clone, Debug, Default)]
pub struct VertexFlows(HashMap<VertexID, FlowVertex>);

impl VertexFlows {
	/// Get the [FlowVertex] of a vertex
	pub fn get(&self, vertex: VertexID) -> Option<&FlowVertex> {
		self.0.get(&vertex)
	}
	/// Number of vertices with a flow
	pub fn len(&self) -> usize {
		self.0.len()
	}
	/// Whether no vertex has a flow yet
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
	/// Drop every flow
	pub fn clear(&mut self) {
		self.0.clear();
	}
	/// Give a vertex a static direction unless it already has a flow
	pub fn insert_if_absent(&mut self, vertex: VertexID, position: Vec2, direction: Vec2) {
		self.0.entry(vertex).or_insert_with(|| {
			let dir = direction.normalize_or_zero();
			if dir == Vec2::ZERO {
				FlowVertex::new(vertex, position, FlowDirection::Radial)
			} else {
				FlowVertex::new(vertex, position, FlowDirection::Static(dir))
			}
		});
	}
	/// Assign the direction a portal wants for one of its endpoints.
	///
	/// The first portal to touch a vertex decides its static direction. A
	/// later portal disagreeing with it splits the vertex along that portal's
	/// half-plane `plane` (its inside being the Region the portal leads into),
	/// any further disagreement leaves the vertex radial.
	/// `backwards` marks a direction that points back through its own portal
	pub fn assign_portal(
		&mut self,
		vertex: VertexID,
		position: Vec2,
		direction: Vec2,
		plane: HalfPlane,
		backwards: bool,
	) -> FlowVertex {
		let wanted = direction.normalize_or_zero();
		let resolved = match self.0.get(&vertex).map(|f| f.direction) {
			None => {
				if backwards || wanted == Vec2::ZERO {
					FlowDirection::Radial
				} else {
					FlowDirection::Static(wanted)
				}
			}
			Some(FlowDirection::Static(existing)) => {
				if backwards || wanted == Vec2::ZERO {
					FlowDirection::Split {
						plane,
						inside: existing,
						outside: None,
					}
				} else if existing.dot(wanted) >= DIRECTION_AGREEMENT {
					FlowDirection::Static(existing)
				} else {
					FlowDirection::Split {
						plane,
						inside: wanted,
						outside: Some(existing),
					}
				}
			}
			Some(FlowDirection::Split { plane, inside, outside }) => {
				if !backwards && inside.dot(wanted) >= DIRECTION_AGREEMENT {
					FlowDirection::Split { plane, inside, outside }
				} else {
					FlowDirection::Radial
				}
			}
			Some(FlowDirection::Radial | FlowDirection::Sink) => FlowDirection::Radial,
		};
		let flow = FlowVertex::new(vertex, position, resolved);
		self.0.insert(vertex, flow);
		flow
	}
}
