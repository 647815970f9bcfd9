//! A [NavMeshFlowField] holds the flow towards one destination along one
//! [Corridor]. It is grown lazily, one Region at a time, as agents walk into
//! Regions it hasn't seen yet.
//!
//! Each step `(from, node)` does the following once:
//!
//! * the portal `from -> node` and the portal out of `node` get directions for
//! both of their endpoints, aimed at the next portal along the Corridor (or
//! at the destination itself near the end)
//! * if `node` has more than three corners it gets a [FlowTriangulate] for
//! that entry/exit pair
//! * if `node` holds the destination its corners are aimed at the
//! destination, which joins them as a sink corner. Every boundary edge and
//! the destination form a triangle so the flow carries on smoothly from the
//! last portal
//!
//! Every later request for the same step is answered from the cache, so the
//! cost of a Region is paid once no matter how many agents cross it.
//!

use std::collections::BTreeMap;

use crate::prelude::*;
use bevy::prelude::*;

/// Handle standing in for the destination when it is a corner of a
/// [FlowTriangle], no mesh vertex uses it
pub const DESTINATION_VERTEX: VertexID = VertexID::new(u32::MAX);

/// How long the caches of a field live
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum FieldLifecycle {
	/// Caches are kept for the life of the field and shared by every agent
	#[default]
	Persistent,
	/// Only the most recent step is kept, suited to one-off destinations
	Transitional,
}

/// Result of growing a field into a Region
#[derive(Clone, Debug, PartialEq)]
pub enum RegionFlow {
	/// Regions still to cross after the current one, empty once the Region holding the destination is reached
	Remaining(Vec<RegionID>),
	/// The destination cannot be reached from the Region
	NoRoute,
}

/// Flow towards a destination over a [NavMesh]
#[derive(Clone, Debug)]
pub struct NavMeshFlowField {
	/// Where agents are heading
	destination: Vec3,
	/// How to get there from any Region
	corridor: Corridor,
	/// Whether caches are retained
	lifecycle: FieldLifecycle,
	/// Lane sign convention passed to each [FlowTriangulate]
	handedness: Handedness,
	/// Flow of every vertex touched so far
	flows: VertexFlows,
	/// Portals with flows assigned to both endpoints, keyed by the portal edge on the side being left
	portals: BTreeMap<EdgeID, (VertexID, VertexID)>,
	/// Lane decompositions keyed by `(from, node)`
	triangulations: BTreeMap<(Option<RegionID>, RegionID), FlowTriangulate>,
	/// Steps already processed and the Regions remaining after each
	processed: BTreeMap<(Option<RegionID>, RegionID), Vec<RegionID>>,
	/// Number of steps actually computed rather than answered from cache
	computations: usize,
}

impl NavMeshFlowField {
	/// Create a new instance of [NavMeshFlowField], no Region has any flow until [NavMeshFlowField::calc_region_flow] is called
	pub fn new(
		destination: Vec3,
		corridor: Corridor,
		handedness: Handedness,
		lifecycle: FieldLifecycle,
	) -> Self {
		NavMeshFlowField {
			destination,
			corridor,
			lifecycle,
			handedness,
			flows: VertexFlows::default(),
			portals: BTreeMap::new(),
			triangulations: BTreeMap::new(),
			processed: BTreeMap::new(),
			computations: 0,
		}
	}
	/// Get the destination
	pub fn get_destination(&self) -> Vec3 {
		self.destination
	}
	/// Get the corridor
	pub fn get_corridor(&self) -> &Corridor {
		&self.corridor
	}
	/// Get the lifecycle mode
	pub fn get_lifecycle(&self) -> FieldLifecycle {
		self.lifecycle
	}
	/// Get the handedness
	pub fn get_handedness(&self) -> Handedness {
		self.handedness
	}
	/// Get the flow of every vertex computed so far
	pub fn get_flows(&self) -> &VertexFlows {
		&self.flows
	}
	/// Number of steps that were computed rather than read from the cache
	pub fn computations(&self) -> usize {
		self.computations
	}
	/// Whether the step `(from, node)` has been processed
	pub fn is_processed(&self, from: Option<RegionID>, node: RegionID) -> bool {
		self.processed.contains_key(&(from, node))
	}
	/// Get the lane decomposition built for a step, [None] for triangles, the
	/// terminal Region or steps not yet processed
	pub fn get_triangulation(
		&self,
		from: Option<RegionID>,
		node: RegionID,
	) -> Option<&FlowTriangulate> {
		self.triangulations.get(&(from, node))
	}
	/// The destination as a triangle corner, its direction points at it from anywhere
	pub fn get_destination_flow(&self) -> FlowVertex {
		FlowVertex::new(DESTINATION_VERTEX, to_planar(self.destination), FlowDirection::Sink)
	}
	/// In the Region holding the destination, the triangle made of a boundary
	/// edge and the destination that contains `pt`. [None] if the Region
	/// hasn't been processed or `pt` is in none of them
	pub fn terminal_triangle(
		&self,
		mesh: &NavMesh,
		node: RegionID,
		pt: Vec2,
		epsilon: f32,
	) -> Option<FlowTriangle> {
		let sink = self.get_destination_flow();
		for edge in mesh.region_edges(node).iter() {
			let (Some(a), Some(b)) = (
				self.flows.get(mesh.edge_origin(*edge)),
				self.flows.get(mesh.edge_destination(*edge)),
			) else {
				continue;
			};
			let triangle = FlowTriangle::new([*a, *b, sink]);
			if triangle.area() > 0.0 && triangle.contains(pt, epsilon) {
				return Some(triangle);
			}
		}
		None
	}
	/// Get the flows of the two endpoints of a portal, `(origin, destination)`
	pub fn get_portal_flow(&self, portal: EdgeID) -> Option<(&FlowVertex, &FlowVertex)> {
		let (tail, head) = self.portals.get(&portal)?;
		Some((self.flows.get(*tail)?, self.flows.get(*head)?))
	}
	/// Drop every cache, the field is rebuilt lazily from scratch
	pub fn clear_caches(&mut self) {
		self.flows.clear();
		self.portals.clear();
		self.triangulations.clear();
		self.processed.clear();
	}
	/// Grow the field into `node` having arrived from `from` ([None] when the
	/// agent starts in `node` or `from` isn't adjacent).
	///
	/// Repeating a step already processed returns the cached result without
	/// doing any work
	pub fn calc_region_flow(
		&mut self,
		mesh: &NavMesh,
		from: Option<RegionID>,
		node: RegionID,
	) -> RegionFlow {
		if let Some(remaining) = self.processed.get(&(from, node)) {
			return RegionFlow::Remaining(remaining.clone());
		}
		let Some(route) = self.corridor.route_from(node, mesh) else {
			debug!("No route from region {:?} to {:?}", node, self.destination);
			return RegionFlow::NoRoute;
		};
		if self.lifecycle == FieldLifecycle::Transitional {
			self.clear_caches();
		}
		self.computations += 1;
		// entry portal, seen from the side being left
		let entry = match from {
			Some(f) => match mesh.portal_between(f, node) {
				Some(portal) => {
					self.calc_portal_flow(mesh, portal, &route);
					mesh.edge_twin(portal)
				}
				None => None,
			},
			None => None,
		};
		if let Some(next) = route.get(1) {
			let Some(exit) = mesh.portal_between(node, *next) else {
				warn!("Corridor jumps from region {:?} to {:?} which are not adjacent", node, next);
				return RegionFlow::NoRoute;
			};
			self.calc_portal_flow(mesh, exit, &route[1..]);
			if mesh.region_vertex_count(node) > 3 {
				let triangulation =
					FlowTriangulate::new(mesh, node, entry, exit, self.handedness).or_else(|| {
						// turning back through the entry, treat as a fresh start
						FlowTriangulate::new(mesh, node, None, exit, self.handedness)
					});
				if let Some(t) = triangulation {
					t.assign_vertex_flows(mesh, &mut self.flows);
					self.triangulations.insert((from, node), t);
				}
			} else {
				let target = mesh.edge_midpoint(exit);
				for v in mesh.region_vertices(node) {
					let position = mesh.vertex_planar(v);
					self.flows.insert_if_absent(v, position, target - position);
				}
			}
		} else {
			let target = to_planar(self.destination);
			for v in mesh.region_vertices(node) {
				let position = mesh.vertex_planar(v);
				self.flows.insert_if_absent(v, position, target - position);
			}
		}
		let remaining = route[1..].to_vec();
		trace!("Region {:?} flow computed, {} regions remain", node, remaining.len());
		self.processed.insert((from, node), remaining.clone());
		RegionFlow::Remaining(remaining)
	}
	/// Assign flows to both endpoints of `portal`. `ahead` starts with the
	/// Region the portal leads into and continues along the Corridor
	fn calc_portal_flow(&mut self, mesh: &NavMesh, portal: EdgeID, ahead: &[RegionID]) {
		if self.portals.contains_key(&portal) {
			return;
		}
		let tail = mesh.edge_origin(portal);
		let head = mesh.edge_destination(portal);
		let into = match ahead.first() {
			Some(region) => mesh.region_centroid(*region),
			None => to_planar(self.destination),
		};
		let plane = HalfPlane::through(mesh.vertex_planar(tail), mesh.vertex_planar(head), into);
		for v in [tail, head] {
			let position = mesh.vertex_planar(v);
			let direction = self.portal_target(mesh, v, ahead) - position;
			let backwards = direction.dot(plane.get_normal()) < 0.0;
			self.flows.assign_portal(v, position, direction, plane, backwards);
		}
		self.portals.insert(portal, (tail, head));
	}
	/// Where a portal endpoint should aim: the middle of the first later
	/// portal that doesn't share the vertex, otherwise the destination
	fn portal_target(&self, mesh: &NavMesh, vertex: VertexID, ahead: &[RegionID]) -> Vec2 {
		for pair in ahead.windows(2).take(PORTAL_LOOKAHEAD) {
			match mesh.portal_between(pair[0], pair[1]) {
				Some(portal) if !mesh.edge_has_vertex(portal, vertex) => {
					return mesh.edge_midpoint(portal);
				}
				Some(_) => {}
				None => break,
			}
		}
		to_planar(self.destination)
	}
}
