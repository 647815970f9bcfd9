//! A navigation mesh is a series of convex polygon Regions an agent may walk
//! across. Adjacent Regions share a Portal edge.
//!
//! The mesh is stored as a half-edge arena so the boundary of any Region can be
//! walked with `next`/`prev` and the neighbouring Region found through the
//! `twin` of an edge:
//!
//! ```text
//!   v3 ___________ v2
//!     |         /|
//!     |  r0   /  |
//!     |     /    |
//!     |   /  r1  |
//!     |_/________|
//!   v0             v1
//! ```
//!
//! Here `v0 -> v2` is an edge of `r0` whose twin `v2 -> v0` belongs to `r1`,
//! making it the portal between the two Regions. Edges without a twin sit on
//! the outer boundary of the mesh.
//!
//! Building a mesh from raw geometry, merging Regions and welding boundaries
//! happen outside of this crate, [NavMesh::new] only links up the
//! polygons it is given.
//!

pub mod corridor;

use std::collections::HashMap;

use crate::prelude::*;
use bevy::prelude::*;

/// Handle of a vertex owned by a [NavMesh]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct VertexID(u32);

impl VertexID {
	/// Create a new instance of [VertexID]
	pub const fn new(index: u32) -> Self {
		VertexID(index)
	}
	/// Get the index of the vertex
	pub fn get(&self) -> u32 {
		self.0
	}
}

/// Handle of a directed boundary edge of a Region
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct EdgeID(u32);

impl EdgeID {
	/// Create a new instance of [EdgeID]
	pub fn new(index: u32) -> Self {
		EdgeID(index)
	}
	/// Get the index of the edge
	pub fn get(&self) -> u32 {
		self.0
	}
}

/// Stable node index of a Region
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct RegionID(u32);

impl RegionID {
	/// Create a new instance of [RegionID]
	pub fn new(index: u32) -> Self {
		RegionID(index)
	}
	/// Get the node index
	pub fn get(&self) -> u32 {
		self.0
	}
}

/// Reasons a [NavMesh] cannot be built
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum NavMeshError {
	/// A polygon needs at least three corners
	#[error("polygon {0} has fewer than 3 vertices")]
	DegeneratePolygon(usize),
	/// A polygon referenced a vertex that doesn't exist
	#[error("polygon {polygon} references vertex {vertex} but only {count} vertices exist")]
	VertexOutOfRange {
		/// Offending polygon
		polygon: usize,
		/// Offending vertex index
		vertex: u32,
		/// Number of vertices supplied
		count: usize,
	},
	/// Two polygons claimed the same directed edge, the mesh is not manifold
	#[error("directed edge {0} -> {1} is used by more than one polygon")]
	NonManifoldEdge(u32, u32),
	/// Reading a mesh from disk failed
	#[error("unable to load navmesh: {0}")]
	Load(String),
}

/// A directed edge on the boundary of a Region
#[derive(Clone, Copy, Debug, Reflect)]
struct HalfEdge {
	/// Vertex the edge starts from
	origin: VertexID,
	/// Next edge counter-clockwise around the Region
	next: EdgeID,
	/// Previous edge around the Region
	prev: EdgeID,
	/// Opposite edge in the neighbouring Region, `None` on the outer boundary
	twin: Option<EdgeID>,
	/// Region the edge bounds
	region: RegionID,
}

/// A convex polygon of the mesh
#[derive(Clone, Copy, Debug, Reflect)]
struct Region {
	/// First edge of the boundary loop
	edge: EdgeID,
	/// Number of edges in the boundary loop
	edge_count: u32,
}

/// Plain description of a mesh, as stored on disk
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, Default)]
pub struct NavMeshDescriptor {
	/// Positions of each vertex, `(x, y, z)`
	pub vertices: Vec<(f32, f32, f32)>,
	/// Each polygon as a list of vertex indices
	pub polygons: Vec<Vec<u32>>,
}

/// Half-edge navigation mesh made of convex Regions
#[derive(Component, Clone, Debug, Default, Reflect)]
pub struct NavMesh {
	/// Vertex positions indexed by [VertexID]
	vertices: Vec<Vec3>,
	/// Boundary edges indexed by [EdgeID]
	edges: Vec<HalfEdge>,
	/// Regions indexed by [RegionID]
	regions: Vec<Region>,
}

impl NavMesh {
	/// Create a new instance of [NavMesh] from vertex positions and a list of
	/// convex polygons. Polygons wound clockwise on the `(x, z)` plane are
	/// reversed so every Region is counter-clockwise
	pub fn new(vertices: Vec<Vec3>, polygons: Vec<Vec<u32>>) -> Result<Self, NavMeshError> {
		let mut edges: Vec<HalfEdge> = Vec::new();
		let mut regions = Vec::with_capacity(polygons.len());
		// directed (from, to) -> edge for twin linking
		let mut edge_map: HashMap<(u32, u32), EdgeID> = HashMap::new();
		for (p, polygon) in polygons.iter().enumerate() {
			if polygon.len() < 3 {
				return Err(NavMeshError::DegeneratePolygon(p));
			}
			for v in polygon.iter() {
				if *v as usize >= vertices.len() {
					return Err(NavMeshError::VertexOutOfRange {
						polygon: p,
						vertex: *v,
						count: vertices.len(),
					});
				}
			}
			let mut polygon = polygon.clone();
			let mut area = 0.0;
			for i in 0..polygon.len() {
				let a = to_planar(vertices[polygon[i] as usize]);
				let b = to_planar(vertices[polygon[(i + 1) % polygon.len()] as usize]);
				area += a.perp_dot(b);
			}
			if area < 0.0 {
				polygon.reverse();
			}
			let base = edges.len() as u32;
			let count = polygon.len() as u32;
			let region = RegionID::new(p as u32);
			for i in 0..count {
				let from = polygon[i as usize];
				let to = polygon[((i + 1) % count) as usize];
				let id = EdgeID::new(base + i);
				if edge_map.insert((from, to), id).is_some() {
					return Err(NavMeshError::NonManifoldEdge(from, to));
				}
				edges.push(HalfEdge {
					origin: VertexID::new(from),
					next: EdgeID::new(base + (i + 1) % count),
					prev: EdgeID::new(base + (i + count - 1) % count),
					twin: None,
					region,
				});
			}
			regions.push(Region {
				edge: EdgeID::new(base),
				edge_count: count,
			});
		}
		for ((from, to), id) in edge_map.iter() {
			if let Some(twin) = edge_map.get(&(*to, *from)) {
				edges[id.get() as usize].twin = Some(*twin);
			}
		}
		Ok(NavMesh {
			vertices,
			edges,
			regions,
		})
	}
	/// Create a new instance of [NavMesh] from a [NavMeshDescriptor]
	pub fn from_descriptor(descriptor: NavMeshDescriptor) -> Result<Self, NavMeshError> {
		let vertices = descriptor
			.vertices
			.iter()
			.map(|(x, y, z)| Vec3::new(*x, *y, *z))
			.collect();
		NavMesh::new(vertices, descriptor.polygons)
	}
	/// Read a [NavMeshDescriptor] from a `.ron` file and build the mesh
	#[cfg(feature = "ron")]
	pub fn from_ron(path: String) -> Result<Self, NavMeshError> {
		let file = std::fs::File::open(&path)
			.map_err(|e| NavMeshError::Load(format!("{}: {}", path, e)))?;
		let descriptor: NavMeshDescriptor =
			ron::de::from_reader(file).map_err(|e| NavMeshError::Load(e.to_string()))?;
		NavMesh::from_descriptor(descriptor)
	}
	/// Number of Regions in the mesh
	pub fn region_count(&self) -> usize {
		self.regions.len()
	}
	/// Iterate over every [RegionID]
	pub fn regions(&self) -> impl Iterator<Item = RegionID> + '_ {
		(0..self.regions.len() as u32).map(RegionID::new)
	}
	/// World position of a vertex
	pub fn vertex_position(&self, vertex: VertexID) -> Vec3 {
		self.vertices[vertex.get() as usize]
	}
	/// Position of a vertex on the flow field plane
	pub fn vertex_planar(&self, vertex: VertexID) -> Vec2 {
		to_planar(self.vertex_position(vertex))
	}
	/// Vertex an edge starts from
	pub fn edge_origin(&self, edge: EdgeID) -> VertexID {
		self.edges[edge.get() as usize].origin
	}
	/// Vertex an edge ends at
	pub fn edge_destination(&self, edge: EdgeID) -> VertexID {
		self.edge_origin(self.edge_next(edge))
	}
	/// Next edge counter-clockwise around the Region
	pub fn edge_next(&self, edge: EdgeID) -> EdgeID {
		self.edges[edge.get() as usize].next
	}
	/// Previous edge around the Region
	pub fn edge_prev(&self, edge: EdgeID) -> EdgeID {
		self.edges[edge.get() as usize].prev
	}
	/// Opposite edge in the neighbouring Region, [None] on the outer boundary
	pub fn edge_twin(&self, edge: EdgeID) -> Option<EdgeID> {
		self.edges[edge.get() as usize].twin
	}
	/// Region an edge belongs to
	pub fn edge_region(&self, edge: EdgeID) -> RegionID {
		self.edges[edge.get() as usize].region
	}
	/// Midpoint of an edge on the plane
	pub fn edge_midpoint(&self, edge: EdgeID) -> Vec2 {
		(self.vertex_planar(self.edge_origin(edge)) + self.vertex_planar(self.edge_destination(edge)))
			* 0.5
	}
	/// Whether `vertex` is one of the endpoints of `edge`
	pub fn edge_has_vertex(&self, edge: EdgeID, vertex: VertexID) -> bool {
		self.edge_origin(edge) == vertex || self.edge_destination(edge) == vertex
	}
	/// Number of boundary edges (and vertices) of a Region
	pub fn region_vertex_count(&self, region: RegionID) -> usize {
		self.regions[region.get() as usize].edge_count as usize
	}
	/// Boundary edges of a Region in counter-clockwise order
	pub fn region_edges(&self, region: RegionID) -> Vec<EdgeID> {
		let first = self.regions[region.get() as usize].edge;
		self.edges_from(first)
	}
	/// Boundary edges of the Region owning `start` in counter-clockwise order beginning with `start`
	pub fn edges_from(&self, start: EdgeID) -> Vec<EdgeID> {
		let mut edges = vec![start];
		let mut edge = self.edge_next(start);
		while edge != start {
			edges.push(edge);
			edge = self.edge_next(edge);
		}
		edges
	}
	/// Boundary vertices of a Region in counter-clockwise order
	pub fn region_vertices(&self, region: RegionID) -> Vec<VertexID> {
		self.region_edges(region)
			.iter()
			.map(|e| self.edge_origin(*e))
			.collect()
	}
	/// Average of a Region's corners on the plane
	pub fn region_centroid(&self, region: RegionID) -> Vec2 {
		let vertices = self.region_vertices(region);
		let sum: Vec2 = vertices.iter().map(|v| self.vertex_planar(*v)).sum();
		sum / vertices.len() as f32
	}
	/// Regions sharing a portal with `region`
	pub fn neighbours(&self, region: RegionID) -> Vec<RegionID> {
		self.region_edges(region)
			.iter()
			.filter_map(|e| self.edge_twin(*e))
			.map(|t| self.edge_region(t))
			.collect()
	}
	/// The edge of `from` whose twin lies in `to`
	pub fn portal_between(&self, from: RegionID, to: RegionID) -> Option<EdgeID> {
		self.region_edges(from).into_iter().find(|e| {
			self.edge_twin(*e)
				.is_some_and(|t| self.edge_region(t) == to)
		})
	}
	/// Height of a Region's plane above the point `planar`. The plane is fitted
	/// through the Region's corners (Newell's method)
	pub fn region_height_at(&self, region: RegionID, planar: Vec2) -> f32 {
		let vertices = self.region_vertices(region);
		let mut normal = Vec3::ZERO;
		let mut centre = Vec3::ZERO;
		for (i, v) in vertices.iter().enumerate() {
			let a = self.vertex_position(*v);
			let b = self.vertex_position(vertices[(i + 1) % vertices.len()]);
			normal.x += (a.y - b.y) * (a.z + b.z);
			normal.y += (a.z - b.z) * (a.x + b.x);
			normal.z += (a.x - b.x) * (a.y + b.y);
			centre += a;
		}
		centre /= vertices.len() as f32;
		if normal.y.abs() <= f32::EPSILON {
			return centre.y;
		}
		// n . (p - c) = 0 solved for p.y
		centre.y - (normal.x * (planar.x - centre.x) + normal.z * (planar.y - centre.z)) / normal.y
	}
	/// Whether a point lies within the boundary of a Region (within `epsilon`
	/// on the plane) and within `coplanar_tolerance` of its height
	pub fn region_contains(
		&self,
		region: RegionID,
		point: Vec3,
		epsilon: f32,
		coplanar_tolerance: f32,
	) -> bool {
		let planar = to_planar(point);
		for edge in self.region_edges(region).iter() {
			let a = self.vertex_planar(self.edge_origin(*edge));
			let b = self.vertex_planar(self.edge_destination(*edge));
			let length = (b - a).length();
			if length <= f32::EPSILON {
				continue;
			}
			// counter-clockwise so the inside is on the left
			if (b - a).perp_dot(planar - a) / length < -epsilon {
				return false;
			}
		}
		(self.region_height_at(region, planar) - point.y).abs() <= coplanar_tolerance
	}
	/// Find a Region containing `point` within `coplanar_tolerance` of its
	/// plane, [None] if the point is off the mesh
	pub fn region_containing(
		&self,
		point: Vec3,
		epsilon: f32,
		coplanar_tolerance: f32,
	) -> Option<RegionID> {
		self.regions()
			.find(|r| self.region_contains(*r, point, epsilon, coplanar_tolerance))
	}
	/// Nearest point on the boundary of a Region to `point`, lifted onto the Region's plane
	pub fn closest_point_on_boundary(&self, region: RegionID, point: Vec3) -> Vec3 {
		let planar = to_planar(point);
		let mut best = planar;
		let mut best_distance = f32::MAX;
		for edge in self.region_edges(region).iter() {
			let a = self.vertex_planar(self.edge_origin(*edge));
			let b = self.vertex_planar(self.edge_destination(*edge));
			let candidate = closest_point_on_segment(planar, a, b);
			let distance = candidate.distance_squared(planar);
			if distance < best_distance {
				best_distance = distance;
				best = candidate;
			}
		}
		Vec3::new(best.x, self.region_height_at(region, best), best.y)
	}
}
