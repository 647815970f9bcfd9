//! Useful structures and tools used by the fields
//!

use bevy::prelude::*;

/// Tolerance used by half-plane and containment tests on the planar projection of the mesh
pub const PLANAR_EPSILON: f32 = 1e-4;
/// How far a position may sit above or below a region's plane and still be considered on it
pub const COPLANAR_TOLERANCE: f32 = 0.5;
/// Distance from the destination at which an agent is considered to have arrived
pub const DEFAULT_ARRIVAL_DISTANCE: f32 = 0.5;
/// Default top speed of an agent
pub const DEFAULT_MAX_SPEED: f32 = 5.0;
/// Maximum number of corridor portals inspected when looking for the target of a portal vertex
pub const PORTAL_LOOKAHEAD: usize = 8;
/// Two static directions whose dot product is at least this are considered to agree
pub const DIRECTION_AGREEMENT: f32 = 0.995;
/// Fields unused for this many seconds get purged from the cache
pub const FIELD_EXPIRY_SECONDS: u64 = 900;
/// Sine of the angle below which two directions out of a point count as collinear
pub const COLLINEAR_SINE: f32 = 1e-4;

/// Project a mesh position onto the plane the flow field operates in, `(x, z)`
pub fn to_planar(position: Vec3) -> Vec2 {
	Vec2::new(position.x, position.z)
}

/// Lift a planar vector back into world space with a zero `y` component
pub fn from_planar(planar: Vec2) -> Vec3 {
	Vec3::new(planar.x, 0.0, planar.y)
}

/// Twice the signed area of the triangle `(a, b, c)`, positive when counter-clockwise
pub fn signed_area_x2(a: Vec2, b: Vec2, c: Vec2) -> f32 {
	(b - a).perp_dot(c - a)
}

/// Whether `to` lies counter-clockwise of `from` as seen from `apex`. The
/// test works on the angle between the two directions so it holds at any scale
pub fn turns_counter_clockwise(apex: Vec2, from: Vec2, to: Vec2) -> bool {
	let a = from - apex;
	let b = to - apex;
	a.perp_dot(b) > COLLINEAR_SINE * a.length() * b.length()
}

/// Nearest point to `point` on the segment `start -> end`
pub fn closest_point_on_segment(point: Vec2, start: Vec2, end: Vec2) -> Vec2 {
	let segment = end - start;
	let length_sq = segment.length_squared();
	if length_sq == 0.0 {
		return start;
	}
	let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
	start + segment * t
}

/// A line through the plane described by `normal . p = offset`. Points with a
/// positive [HalfPlane::side] are on the inside
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct HalfPlane {
	/// Unit normal pointing to the inside
	normal: Vec2,
	/// Distance of the line from the origin along `normal`
	offset: f32,
}

impl HalfPlane {
	/// Create a new instance of [HalfPlane] from a normal and offset
	pub fn new(normal: Vec2, offset: f32) -> Self {
		HalfPlane { normal, offset }
	}
	/// Build the half-plane of the line through `start` and `end` whose inside contains `inside`.
	///
	/// If `inside` is on the line the left-hand side of `start -> end` is taken as the inside
	pub fn through(start: Vec2, end: Vec2, inside: Vec2) -> Self {
		let mut normal = (end - start).perp().normalize_or_zero();
		if normal.dot(inside - start) < 0.0 {
			normal = -normal;
		}
		HalfPlane {
			normal,
			offset: normal.dot(start),
		}
	}
	/// Get the inward normal
	pub fn get_normal(&self) -> Vec2 {
		self.normal
	}
	/// Get the offset
	pub fn get_offset(&self) -> f32 {
		self.offset
	}
	/// Signed distance of `point` from the line, positive on the inside
	pub fn side(&self, point: Vec2) -> f32 {
		self.normal.dot(point) - self.offset
	}
	/// Whether `point` is inside or within `epsilon` of the line
	pub fn contains(&self, point: Vec2, epsilon: f32) -> bool {
		self.side(point) >= -epsilon
	}
}
