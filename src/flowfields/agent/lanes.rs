//! One-step memory of the lane an agent was in and of the lane boundaries it
//! crossed on the way.
//!
//! When an agent moves outwards across a fan spoke the two [FlowVertex] of
//! that spoke are remembered. The next triangle reuses them for any corner it
//! shares with the spoke, so the blended direction carries over unchanged.
//! Moving back inwards breaks the ordering the memory relies on and wipes it.
//!

use crate::prelude::*;
use bevy::prelude::*;

/// The pair of flows along a crossed lane boundary
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct BoundaryFlow {
	/// Flow of the fan apex
	apex: FlowVertex,
	/// Flow of the boundary vertex at the other end of the spoke
	corner: FlowVertex,
}

impl BoundaryFlow {
	/// Create a new instance of [BoundaryFlow]
	pub fn new(apex: FlowVertex, corner: FlowVertex) -> Self {
		BoundaryFlow { apex, corner }
	}
	/// Get the apex flow
	pub fn get_apex(&self) -> &FlowVertex {
		&self.apex
	}
	/// Get the corner flow
	pub fn get_corner(&self) -> &FlowVertex {
		&self.corner
	}
	/// The flow of `vertex` if it's one of the two ends of the boundary
	pub fn flow_of(&self, vertex: VertexID) -> Option<&FlowVertex> {
		if self.apex.get_vertex() == vertex {
			Some(&self.apex)
		} else if self.corner.get_vertex() == vertex {
			Some(&self.corner)
		} else {
			None
		}
	}
}

/// Two optional slots: the boundary crossed most recently and the first
/// boundary crossed since the memory was last wiped
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct ContinuityCache {
	/// Most recently crossed boundary
	previous: Option<BoundaryFlow>,
	/// Oldest boundary still trusted
	confirmed: Option<BoundaryFlow>,
}

impl ContinuityCache {
	/// Get the most recently crossed boundary
	pub fn get_previous(&self) -> Option<&BoundaryFlow> {
		self.previous.as_ref()
	}
	/// Get the oldest trusted boundary
	pub fn get_confirmed(&self) -> Option<&BoundaryFlow> {
		self.confirmed.as_ref()
	}
	/// Remember a boundary crossed moving outwards. It always replaces the
	/// `previous` slot and fills the `confirmed` slot only if it's empty
	pub fn record_crossing(&mut self, boundary: BoundaryFlow) {
		self.previous = Some(boundary);
		if self.confirmed.is_none() {
			self.confirmed = Some(boundary);
		}
	}
	/// Forget both slots
	pub fn invalidate(&mut self) {
		self.previous = None;
		self.confirmed = None;
	}
	/// Replace any corner sharing a vertex with a remembered boundary by the
	/// remembered flow, the `previous` slot wins over `confirmed`
	pub fn substitute(&self, corners: &mut [FlowVertex; 3]) {
		for corner in corners.iter_mut() {
			let cached = [self.previous.as_ref(), self.confirmed.as_ref()]
				.into_iter()
				.flatten()
				.find_map(|b| b.flow_of(corner.get_vertex()));
			if let Some(fv) = cached {
				*corner = *fv;
			}
		}
	}
}

/// The lane an agent was last classified into along with its continuity memory
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct LaneTracker {
	/// Last lane, [None] until classified in the current Region
	lane: Option<i32>,
	/// Crossed boundaries
	continuity: ContinuityCache,
}

impl LaneTracker {
	/// Get the last lane
	pub fn get_lane(&self) -> Option<i32> {
		self.lane
	}
	/// Record the current lane
	pub fn set_lane(&mut self, lane: i32) {
		self.lane = Some(lane);
	}
	/// Forget the lane after moving into a new Region, the continuity memory
	/// is kept to carry flows across the portal
	pub fn reset_lane(&mut self) {
		self.lane = None;
	}
	/// Get the continuity memory
	pub fn get_continuity(&self) -> &ContinuityCache {
		&self.continuity
	}
	/// Get a mutable reference to the continuity memory
	pub fn get_continuity_mut(&mut self) -> &mut ContinuityCache {
		&mut self.continuity
	}
}
