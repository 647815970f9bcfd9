//! The triangle an agent currently stands in, its three corners carry the
//! flows blended into a direction.
//!
//! The weight of each corner is the signed area of the sub-triangle formed by
//! the query point and the opposite edge:
//!
//! ```text
//!             c
//!            /\
//!           /  \
//!          / wb \
//!         /  pt  \
//!        /wc    wa\
//!       /__________\
//!      a            b
//! ```
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Three corners with flows
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct FlowTriangle {
	/// Corners `a`, `b` and `c`
	corners: [FlowVertex; 3],
}

impl FlowTriangle {
	/// Create a new instance of [FlowTriangle]
	pub fn new(corners: [FlowVertex; 3]) -> Self {
		FlowTriangle { corners }
	}
	/// Get the corners
	pub fn get_corners(&self) -> &[FlowVertex; 3] {
		&self.corners
	}
	/// Signed area of the whole triangle, positive when counter-clockwise
	pub fn area(&self) -> f32 {
		let [a, b, c] = self.positions();
		signed_area_x2(a, b, c) * 0.5
	}
	/// The weights of `a`, `b` and `c` at `pt`: signed areas of `(pt, b, c)`,
	/// `(a, pt, c)` and `(a, b, pt)`. They sum to [FlowTriangle::area]
	pub fn areas(&self, pt: Vec2) -> [f32; 3] {
		let [a, b, c] = self.positions();
		[
			signed_area_x2(pt, b, c) * 0.5,
			signed_area_x2(a, pt, c) * 0.5,
			signed_area_x2(a, b, pt) * 0.5,
		]
	}
	/// Whether `pt` is within the three edges (and `epsilon` of them)
	pub fn contains(&self, pt: Vec2, epsilon: f32) -> bool {
		let [a, b, c] = self.positions();
		HalfPlane::through(a, b, c).contains(pt, epsilon)
			&& HalfPlane::through(b, c, a).contains(pt, epsilon)
			&& HalfPlane::through(c, a, b).contains(pt, epsilon)
	}
	/// Blend the corner flows at `pt` into `out_dir`, the area weighted
	/// average `sum(area_i * dir_i) / sum(area_i)`. It is shorter than a unit
	/// vector where corners disagree and may be zero where they cancel out.
	///
	/// A degenerate triangle leaves `out_dir` as it was. Degeneracy is judged
	/// against the size of the triangle so tiny triangles still blend
	pub fn calc_dir(&self, pt: Vec2, out_dir: &mut Vec2) {
		let weights = self.areas(pt);
		let total: f32 = weights.iter().sum();
		if !total.is_finite() || total.abs() <= f32::EPSILON * self.longest_edge_squared() {
			return;
		}
		let mut blend = Vec2::ZERO;
		for (corner, weight) in self.corners.iter().zip(weights.iter()) {
			blend += corner.direction_at(pt) * *weight;
		}
		let blend = blend / total;
		if blend.is_finite() {
			*out_dir = blend;
		}
	}
	/// Squared length of the longest edge
	fn longest_edge_squared(&self) -> f32 {
		let [a, b, c] = self.positions();
		a.distance_squared(b)
			.max(b.distance_squared(c))
			.max(c.distance_squared(a))
	}
	/// Planar positions of the corners
	fn positions(&self) -> [Vec2; 3] {
		[
			self.corners[0].get_position(),
			self.corners[1].get_position(),
			self.corners[2].get_position(),
		]
	}
}
