//! A [FlowTriangulate] splits one Region into lanes relative to the portal an
//! agent enters through and the portal it should leave by.
//!
//! Walking counter-clockwise from the entry portal `e0 -> e1` we meet the
//! right-hand chain of boundary vertices, the exit portal `x0 -> x1` and then
//! the left-hand chain. The area between the two portals is the main lane
//! `0`, the leftover pockets are fanned out from the nearest exit corner:
//!
//! ```text
//!            x1 ________ x0
//!             / \      / \
//!      l1   /    \ 0  /   \
//!          |  -1  \  /  +1 \ r1
//!          |_______\/_______\
//!            e0        e1
//! ```
//!
//! Each spoke of a fan is a half-plane, a position is classified into a lane
//! by testing spokes from the main lane outwards and stopping at the first
//! one it lies inside of. The three corners of the lane triangle are then
//! looked up in the field's [VertexFlows].
//!
//! When the entry and exit portals are opposite sides of a quad the main
//! lane itself is split by the diagonal `e1 -> x1`.
//!
//! A fan assumes a convex Region, a reflex vertex makes the boundary walk
//! visit vertices out of order. This is detected by counting the vertices
//! placed in the fans against the boundary size, a mismatch is reported and
//! the record is flagged invalid but remains usable.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Which fan holds the positive lanes
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Reflect)]
pub enum Handedness {
	/// Lanes to the right of the direction of travel are positive
	#[default]
	Right,
	/// Lanes to the left of the direction of travel are positive
	Left,
}

impl Handedness {
	/// Multiplier converting a right-positive lane into this convention
	pub fn sign(&self) -> i32 {
		match self {
			Handedness::Right => 1,
			Handedness::Left => -1,
		}
	}
}

/// The main lane between the portals
#[derive(Clone, Debug, PartialEq)]
enum MainLane {
	/// Portals share a corner, the lane is a single triangle
	Triangle([VertexID; 3]),
	/// Portals are opposite sides of a quad split by a diagonal
	Quad {
		/// Positive on the entry-corner side
		diagonal: HalfPlane,
		/// Triangle holding the entry's first corner
		near: [VertexID; 3],
		/// Triangle holding the exit's first corner
		far: [VertexID; 3],
	},
}

/// Triangles radiating from one exit corner
#[derive(Clone, Debug, Default, PartialEq)]
struct Fan {
	/// Exit portal corner every triangle shares
	apex: VertexID,
	/// Boundary vertices ordered outwards from the main lane, the first is an entry corner
	vertices: Vec<VertexID>,
	/// Half-plane of the spoke `apex -> vertices[i]`, positive towards the main lane
	spokes: Vec<HalfPlane>,
}

impl Fan {
	/// Create a fan with only its entry corner
	fn new(apex: VertexID, entry_corner: VertexID) -> Self {
		Fan {
			apex,
			vertices: vec![entry_corner],
			spokes: Vec::new(),
		}
	}
	/// Number of lanes (triangles) in the fan
	fn lane_count(&self) -> usize {
		self.spokes.len()
	}
}

/// Lane decomposition of a Region for one entry/exit portal pair
#[derive(Clone, Debug, PartialEq)]
pub struct FlowTriangulate {
	/// Region being decomposed
	region: RegionID,
	/// Entry portal edge within the Region
	entry: EdgeID,
	/// Whether the entry edge was picked because the Region starts the Corridor
	pseudo_entry: bool,
	/// Exit portal edge within the Region
	exit: EdgeID,
	/// The through lane
	main: MainLane,
	/// Pocket between the exit's far corner and the entry
	left: Fan,
	/// Pocket between the entry and the exit's near corner
	right: Fan,
	/// Lane sign convention
	handedness: Handedness,
	/// Whether every boundary vertex found a place in the decomposition
	valid: bool,
}

impl FlowTriangulate {
	/// Decompose `region` for travel from `entry` to `exit`. When `entry` is
	/// [None] (the Region starts the Corridor) the boundary edge furthest from
	/// the exit is used in its place. Returns [None] if `exit` isn't an edge
	/// of the Region or coincides with the entry
	pub fn new(
		mesh: &NavMesh,
		region: RegionID,
		entry: Option<EdgeID>,
		exit: EdgeID,
		handedness: Handedness,
	) -> Option<Self> {
		if mesh.edge_region(exit) != region || entry == Some(exit) {
			return None;
		}
		let pseudo_entry = entry.is_none();
		let entry = match entry {
			Some(e) => e,
			None => furthest_edge_from(mesh, exit),
		};
		let edges = mesh.edges_from(entry);
		let n = edges.len();
		let k = edges.iter().position(|e| *e == exit)?;
		let e0 = mesh.edge_origin(edges[0]);
		let e1 = mesh.edge_origin(edges[1]);
		let x0 = mesh.edge_origin(edges[k]);
		let x1 = mesh.edge_origin(edges[(k + 1) % n]);
		let p = |v: VertexID| mesh.vertex_planar(v);

		let main = if x0 == e1 {
			MainLane::Triangle([e0, e1, x1])
		} else if x1 == e0 {
			MainLane::Triangle([e0, e1, x0])
		} else {
			MainLane::Quad {
				diagonal: HalfPlane::through(p(e1), p(x1), p(e0)),
				near: [e0, e1, x1],
				far: [e1, x0, x1],
			}
		};
		let main_centre = match &main {
			MainLane::Triangle(t) => (p(t[0]) + p(t[1]) + p(t[2])) / 3.0,
			MainLane::Quad { .. } => (p(e0) + p(e1) + p(x0) + p(x1)) / 4.0,
		};

		// right chain walks outwards from the main lane, each vertex must turn
		// counter-clockwise about the apex from the previous spoke
		let mut right = Fan::new(x0, e1);
		for i in 2..k {
			let v = mesh.edge_origin(edges[i]);
			let prev = right.vertices[right.vertices.len() - 1];
			if turns_counter_clockwise(p(x0), p(prev), p(v)) {
				let inside = if right.vertices.len() == 1 {
					main_centre
				} else {
					p(right.vertices[right.vertices.len() - 2])
				};
				right.spokes.push(HalfPlane::through(p(x0), p(prev), inside));
				right.vertices.push(v);
			} else {
				debug!("Vertex {:?} of region {:?} out of order in right fan", v, region);
			}
		}

		// left chain walks inwards towards the entry, so collect then reverse
		let mut chain: Vec<VertexID> = Vec::new();
		for i in (k + 2)..n {
			let v = mesh.edge_origin(edges[i]);
			match chain.last().copied() {
				Some(prev) if !turns_counter_clockwise(p(x1), p(prev), p(v)) => {
					debug!("Vertex {:?} of region {:?} out of order in left fan", v, region);
				}
				_ => chain.push(v),
			}
		}
		let mut left = Fan::new(x1, e0);
		for v in chain.into_iter().rev() {
			let prev = left.vertices[left.vertices.len() - 1];
			let inside = if left.vertices.len() == 1 {
				main_centre
			} else {
				p(left.vertices[left.vertices.len() - 2])
			};
			left.spokes.push(HalfPlane::through(p(x1), p(prev), inside));
			left.vertices.push(v);
		}

		let portal_vertices = if matches!(main, MainLane::Triangle(_)) { 3 } else { 4 };
		let placed = left.lane_count() + right.lane_count() + portal_vertices;
		let valid = placed == n;
		if !valid {
			warn!(
				"Region {:?} could not be fully decomposed, placed {} of {} boundary vertices. Is it convex?",
				region, placed, n
			);
		}
		Some(FlowTriangulate {
			region,
			entry,
			pseudo_entry,
			exit,
			main,
			left,
			right,
			handedness,
			valid,
		})
	}
	/// Get the Region
	pub fn get_region(&self) -> RegionID {
		self.region
	}
	/// Get the entry edge (possibly a stand-in if the Region starts the Corridor)
	pub fn get_entry(&self) -> EdgeID {
		self.entry
	}
	/// Get the exit edge
	pub fn get_exit(&self) -> EdgeID {
		self.exit
	}
	/// Whether every boundary vertex was placed into the decomposition
	pub fn is_valid(&self) -> bool {
		self.valid
	}
	/// The diagonal splitting the main lane, only present when it's a quad
	pub fn get_diagonal(&self) -> Option<HalfPlane> {
		match &self.main {
			MainLane::Quad { diagonal, .. } => Some(*diagonal),
			MainLane::Triangle(_) => None,
		}
	}
	/// Number of lanes either side of the main lane as `(left, right)`
	pub fn get_lane_counts(&self) -> (usize, usize) {
		(self.left.lane_count(), self.right.lane_count())
	}
	/// Give every vertex of the decomposition that isn't a real portal corner
	/// a flow. Fan vertices point at their apex, stand-in entry corners point
	/// at the middle of the exit. Existing flows are left alone
	pub fn assign_vertex_flows(&self, mesh: &NavMesh, flows: &mut VertexFlows) {
		for fan in [&self.left, &self.right] {
			let apex = mesh.vertex_planar(fan.apex);
			for v in fan.vertices.iter().skip(1) {
				let position = mesh.vertex_planar(*v);
				flows.insert_if_absent(*v, position, apex - position);
			}
		}
		if self.pseudo_entry {
			let target = mesh.edge_midpoint(self.exit);
			for v in [mesh.edge_origin(self.entry), mesh.edge_destination(self.entry)] {
				let position = mesh.vertex_planar(v);
				flows.insert_if_absent(v, position, target - position);
			}
		}
	}
	/// Lane of `pos` in the right-positive convention, spokes are crossed
	/// once `pos` is further than `epsilon` beyond them
	fn classify(&self, pos: Vec2, epsilon: f32) -> i32 {
		let mut lane = 0;
		for (i, spoke) in self.left.spokes.iter().enumerate() {
			if spoke.contains(pos, epsilon) {
				break;
			}
			lane = -(i as i32 + 1);
		}
		if lane != 0 {
			return lane;
		}
		for (i, spoke) in self.right.spokes.iter().enumerate() {
			if spoke.contains(pos, epsilon) {
				break;
			}
			lane = i as i32 + 1;
		}
		lane
	}
	/// Lane of `pos` in this record's handedness, without side effects
	pub fn lane_of(&self, pos: Vec2, epsilon: f32) -> i32 {
		self.handedness.sign() * self.classify(pos, epsilon)
	}
	/// Classify `pos` into a lane and record it on the `tracker`.
	///
	/// Moving outwards across spokes records each crossed spoke's flow pair,
	/// innermost first, in the tracker's continuity cache. Moving back inwards
	/// (or jumping across the main lane) invalidates the cache
	pub fn update_lane(
		&self,
		pos: Vec2,
		epsilon: f32,
		tracker: &mut LaneTracker,
		flows: &VertexFlows,
	) -> i32 {
		let lane = self.lane_of(pos, epsilon);
		if let Some(previous) = tracker.get_lane() {
			let same_side = previous == 0 || lane == 0 || previous.signum() == lane.signum();
			if !same_side || lane.abs() < previous.abs() {
				tracker.get_continuity_mut().invalidate();
			} else {
				for crossed in (previous.abs() + 1)..=lane.abs() {
					if let Some(boundary) = self.boundary_flow(crossed * lane.signum(), flows) {
						tracker.get_continuity_mut().record_crossing(boundary);
					}
				}
			}
		}
		tracker.set_lane(lane);
		lane
	}
	/// Flow pair of the spoke crossed to enter `lane` from the next lane inwards
	fn boundary_flow(&self, lane: i32, flows: &VertexFlows) -> Option<BoundaryFlow> {
		let raw = lane * self.handedness.sign();
		let fan = if raw > 0 { &self.right } else { &self.left };
		let index = raw.unsigned_abs() as usize - 1;
		let apex = flows.get(fan.apex)?;
		let corner = flows.get(*fan.vertices.get(index)?)?;
		Some(BoundaryFlow::new(*apex, *corner))
	}
	/// Corners of the lane triangle holding `pos`
	pub fn lane_vertices(&self, lane: i32, pos: Vec2) -> Option<[VertexID; 3]> {
		let raw = lane * self.handedness.sign();
		if raw == 0 {
			return match &self.main {
				MainLane::Triangle(t) => Some(*t),
				MainLane::Quad {
					diagonal,
					near,
					far,
				} => {
					if diagonal.side(pos) >= 0.0 {
						Some(*near)
					} else {
						Some(*far)
					}
				}
			};
		}
		let fan = if raw > 0 { &self.right } else { &self.left };
		let j = raw.unsigned_abs() as usize;
		Some([fan.apex, *fan.vertices.get(j - 1)?, *fan.vertices.get(j)?])
	}
	/// Select the flow triangle for the lane last recorded on the `tracker`.
	///
	/// Corners sharing a vertex with either continuity slot of the tracker
	/// take the cached [FlowVertex] so a direction carries over unchanged
	/// from the previous triangle
	pub fn update_flow_tri_laned(
		&self,
		pos: Vec2,
		tracker: &LaneTracker,
		flows: &VertexFlows,
	) -> Option<FlowTriangle> {
		let lane = tracker.get_lane().unwrap_or(0);
		let ids = self.lane_vertices(lane, pos)?;
		let mut corners = [*flows.get(ids[0])?, *flows.get(ids[1])?, *flows.get(ids[2])?];
		tracker.get_continuity().substitute(&mut corners);
		Some(FlowTriangle::new(corners))
	}
}

/// The boundary edge of the exit's Region whose midpoint is furthest from the exit's midpoint
fn furthest_edge_from(mesh: &NavMesh, exit: EdgeID) -> EdgeID {
	let target = mesh.edge_midpoint(exit);
	let mut best = mesh.edge_next(exit);
	let mut best_distance = f32::MIN;
	for edge in mesh.edges_from(exit).into_iter().skip(1) {
		let distance = mesh.edge_midpoint(edge).distance_squared(target);
		if distance > best_distance {
			best_distance = distance;
			best = edge;
		}
	}
	best
}

#[rustfmt::skip]
#[cfg(test)]
mod tests {
	use super::*;

	/// Hexagon with the entry along the bottom and the exit along the top
	///
	/// ```text
	///    v4 ____ v3
	///      /    \
	///  v5 /      \ v2
	///     \      /
	///      \____/
	///    v0      v1
	/// ```
	fn hexagon() -> (NavMesh, EdgeID, EdgeID) {
		let vertices = vec![
			Vec3::new(0.0, 0.0, 0.0),
			Vec3::new(2.0, 0.0, 0.0),
			Vec3::new(3.0, 0.0, 1.5),
			Vec3::new(2.0, 0.0, 3.0),
			Vec3::new(0.0, 0.0, 3.0),
			Vec3::new(-1.0, 0.0, 1.5),
		];
		let mesh = NavMesh::new(vertices, vec![vec![0, 1, 2, 3, 4, 5]]).unwrap();
		let edges = mesh.region_edges(RegionID::new(0));
		(mesh, edges[0], edges[3])
	}

	/// Region with a long right-hand chain, entry `a -> b`, exit `f -> g`
	fn right_heavy(reflex: bool) -> (NavMesh, EdgeID, EdgeID) {
		let d = if reflex { Vec3::new(2.0, 0.0, 3.0) } else { Vec3::new(4.0, 0.0, 3.0) };
		let vertices = vec![
			Vec3::new(0.0, 0.0, 0.0), // a
			Vec3::new(1.0, 0.0, 0.0), // b
			Vec3::new(3.0, 0.0, 1.0), // c
			d,                        // d
			Vec3::new(3.5, 0.0, 5.0), // e
			Vec3::new(1.0, 0.0, 6.0), // f
			Vec3::new(0.0, 0.0, 6.0), // g
		];
		let mesh = NavMesh::new(vertices, vec![vec![0, 1, 2, 3, 4, 5, 6]]).unwrap();
		let edges = mesh.region_edges(RegionID::new(0));
		(mesh, edges[0], edges[5])
	}

	/// Give every vertex of a single-region mesh some flow
	fn flows_for(mesh: &NavMesh) -> VertexFlows {
		let mut flows = VertexFlows::default();
		for v in mesh.region_vertices(RegionID::new(0)) {
			flows.insert_if_absent(v, mesh.vertex_planar(v), Vec2::Y);
		}
		flows
	}

	#[test]
	fn hexagon_decomposition() {
		let (mesh, entry, exit) = hexagon();
		let tri = FlowTriangulate::new(&mesh, RegionID::new(0), Some(entry), exit, Handedness::Right).unwrap();
		assert!(tri.is_valid());
		assert_eq!((1, 1), tri.get_lane_counts());
		assert!(tri.get_diagonal().is_some());
	}
	#[test]
	fn hexagon_lanes() {
		let (mesh, entry, exit) = hexagon();
		let tri = FlowTriangulate::new(&mesh, RegionID::new(0), Some(entry), exit, Handedness::Right).unwrap();
		assert_eq!(0, tri.lane_of(Vec2::new(1.0, 1.5), PLANAR_EPSILON));
		assert_eq!(1, tri.lane_of(Vec2::new(2.6, 1.5), PLANAR_EPSILON));
		assert_eq!(-1, tri.lane_of(Vec2::new(-0.5, 1.5), PLANAR_EPSILON));
		let lane_one = tri.lane_vertices(1, Vec2::new(2.6, 1.5)).unwrap();
		assert_eq!([VertexID::new(3), VertexID::new(1), VertexID::new(2)], lane_one);
		let lane_minus_one = tri.lane_vertices(-1, Vec2::new(-0.5, 1.5)).unwrap();
		assert_eq!([VertexID::new(4), VertexID::new(0), VertexID::new(5)], lane_minus_one);
	}
	#[test]
	fn left_handedness_flips_lanes() {
		let (mesh, entry, exit) = hexagon();
		let tri = FlowTriangulate::new(&mesh, RegionID::new(0), Some(entry), exit, Handedness::Left).unwrap();
		assert_eq!(-1, tri.lane_of(Vec2::new(2.6, 1.5), PLANAR_EPSILON));
		let lane = tri.lane_vertices(-1, Vec2::new(2.6, 1.5)).unwrap();
		assert_eq!([VertexID::new(3), VertexID::new(1), VertexID::new(2)], lane);
	}
	#[test]
	fn quad_split_selects_triangle_by_diagonal() {
		let vertices = vec![
			Vec3::new(0.0, 0.0, 0.0),
			Vec3::new(2.0, 0.0, 0.0),
			Vec3::new(2.0, 0.0, 3.0),
			Vec3::new(0.0, 0.0, 3.0),
		];
		let mesh = NavMesh::new(vertices, vec![vec![0, 1, 2, 3]]).unwrap();
		let edges = mesh.region_edges(RegionID::new(0));
		let tri = FlowTriangulate::new(&mesh, RegionID::new(0), Some(edges[0]), edges[2], Handedness::Right).unwrap();
		assert!(tri.is_valid());
		assert_eq!((0, 0), tri.get_lane_counts());
		let near = tri.lane_vertices(0, Vec2::new(0.5, 0.5)).unwrap();
		let far = tri.lane_vertices(0, Vec2::new(1.8, 2.5)).unwrap();
		assert_eq!([VertexID::new(0), VertexID::new(1), VertexID::new(3)], near);
		assert_eq!([VertexID::new(1), VertexID::new(2), VertexID::new(3)], far);
	}
	#[test]
	fn adjacent_portals_make_triangle_main_lane() {
		let (mesh, entry, _) = hexagon();
		let edges = mesh.region_edges(RegionID::new(0));
		// exit shares v1 with the entry
		let tri = FlowTriangulate::new(&mesh, RegionID::new(0), Some(entry), edges[1], Handedness::Right).unwrap();
		assert!(tri.is_valid());
		assert!(tri.get_diagonal().is_none());
		assert_eq!((3, 0), tri.get_lane_counts());
		let main = tri.lane_vertices(0, Vec2::new(1.5, 0.5)).unwrap();
		assert_eq!([VertexID::new(0), VertexID::new(1), VertexID::new(2)], main);
	}
	#[test]
	fn right_fan_lanes_walk_outwards() {
		let (mesh, entry, exit) = right_heavy(false);
		let tri = FlowTriangulate::new(&mesh, RegionID::new(0), Some(entry), exit, Handedness::Right).unwrap();
		assert!(tri.is_valid());
		assert_eq!((0, 3), tri.get_lane_counts());
		assert_eq!(0, tri.lane_of(Vec2::new(0.5, 3.0), PLANAR_EPSILON));
		assert_eq!(1, tri.lane_of(Vec2::new(1.667, 2.333), PLANAR_EPSILON));
		assert_eq!(2, tri.lane_of(Vec2::new(2.667, 3.333), PLANAR_EPSILON));
		assert_eq!(3, tri.lane_of(Vec2::new(2.833, 4.667), PLANAR_EPSILON));
	}
	#[test]
	fn reflex_vertex_reported_invalid() {
		let (mesh, entry, exit) = right_heavy(true);
		let tri = FlowTriangulate::new(&mesh, RegionID::new(0), Some(entry), exit, Handedness::Right).unwrap();
		assert!(!tri.is_valid());
		// still usable
		assert_eq!((0, 2), tri.get_lane_counts());
		assert_eq!(0, tri.lane_of(Vec2::new(0.5, 3.0), PLANAR_EPSILON));
	}
	#[test]
	fn lane_tracker_records_and_invalidates() {
		let (mesh, entry, exit) = right_heavy(false);
		let flows = flows_for(&mesh);
		let tri = FlowTriangulate::new(&mesh, RegionID::new(0), Some(entry), exit, Handedness::Right).unwrap();
		let mut tracker = LaneTracker::default();
		tri.update_lane(Vec2::new(0.5, 3.0), PLANAR_EPSILON, &mut tracker, &flows);
		assert!(tracker.get_continuity().get_previous().is_none());
		tri.update_lane(Vec2::new(1.667, 2.333), PLANAR_EPSILON, &mut tracker, &flows);
		let first = *tracker.get_continuity().get_previous().unwrap();
		assert_eq!(VertexID::new(1), first.get_corner().get_vertex());
		assert_eq!(Some(&first), tracker.get_continuity().get_confirmed());
		tri.update_lane(Vec2::new(2.667, 3.333), PLANAR_EPSILON, &mut tracker, &flows);
		let second = *tracker.get_continuity().get_previous().unwrap();
		assert_eq!(VertexID::new(2), second.get_corner().get_vertex());
		// confirmed slot keeps the first crossing
		assert_eq!(Some(&first), tracker.get_continuity().get_confirmed());
		// backtrack
		let lane = tri.update_lane(Vec2::new(1.667, 2.333), PLANAR_EPSILON, &mut tracker, &flows);
		assert_eq!(1, lane);
		assert!(tracker.get_continuity().get_previous().is_none());
		assert!(tracker.get_continuity().get_confirmed().is_none());
	}
	#[test]
	fn skipping_lanes_records_every_spoke() {
		let (mesh, entry, exit) = right_heavy(false);
		let flows = flows_for(&mesh);
		let tri = FlowTriangulate::new(&mesh, RegionID::new(0), Some(entry), exit, Handedness::Right).unwrap();
		let mut tracker = LaneTracker::default();
		tri.update_lane(Vec2::new(0.5, 3.0), PLANAR_EPSILON, &mut tracker, &flows);
		// main lane straight into lane 2 in one step
		let lane = tri.update_lane(Vec2::new(2.667, 3.333), PLANAR_EPSILON, &mut tracker, &flows);
		assert_eq!(2, lane);
		let inner = tracker.get_continuity().get_confirmed().unwrap();
		assert_eq!(VertexID::new(1), inner.get_corner().get_vertex());
		let outer = tracker.get_continuity().get_previous().unwrap();
		assert_eq!(VertexID::new(2), outer.get_corner().get_vertex());
	}
	#[test]
	fn small_scale_region_keeps_its_fans() {
		let scale = 1e-4;
		let vertices = vec![
			Vec3::new(0.0, 0.0, 0.0) * scale,
			Vec3::new(2.0, 0.0, 0.0) * scale,
			Vec3::new(3.0, 0.0, 1.5) * scale,
			Vec3::new(2.0, 0.0, 3.0) * scale,
			Vec3::new(0.0, 0.0, 3.0) * scale,
			Vec3::new(-1.0, 0.0, 1.5) * scale,
		];
		let mesh = NavMesh::new(vertices, vec![vec![0, 1, 2, 3, 4, 5]]).unwrap();
		let edges = mesh.region_edges(RegionID::new(0));
		let tri = FlowTriangulate::new(&mesh, RegionID::new(0), Some(edges[0]), edges[3], Handedness::Right).unwrap();
		assert!(tri.is_valid());
		assert_eq!((1, 1), tri.get_lane_counts());
		let epsilon = 1e-8;
		assert_eq!(0, tri.lane_of(Vec2::new(1.0, 1.5) * scale, epsilon));
		assert_eq!(1, tri.lane_of(Vec2::new(2.6, 1.5) * scale, epsilon));
		assert_eq!(-1, tri.lane_of(Vec2::new(-0.5, 1.5) * scale, epsilon));
	}
	#[test]
	fn start_region_uses_furthest_edge() {
		let (mesh, _, exit) = hexagon();
		let tri = FlowTriangulate::new(&mesh, RegionID::new(0), None, exit, Handedness::Right).unwrap();
		let edges = mesh.region_edges(RegionID::new(0));
		assert_eq!(edges[0], tri.get_entry());
		let mut flows = VertexFlows::default();
		tri.assign_vertex_flows(&mesh, &mut flows);
		// fan vertices and stand-in entry corners all receive a flow
		assert_eq!(4, flows.len());
		let v2 = flows.get(VertexID::new(2)).unwrap();
		let expected = (Vec2::new(2.0, 3.0) - Vec2::new(3.0, 1.5)).normalize();
		assert_eq!(FlowDirection::Static(expected), *v2.get_direction());
	}
	#[test]
	fn exit_matching_entry_is_rejected() {
		let (mesh, entry, _) = hexagon();
		assert!(FlowTriangulate::new(&mesh, RegionID::new(0), Some(entry), entry, Handedness::Right).is_none());
	}
}
