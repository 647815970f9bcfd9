//! A Corridor describes how to get from any Region on it to the destination.
//!
//! It comes in two flavours, either an ordered list of Regions from a source
//! to the destination (typical of a single agent asking for a path) or a
//! distance-to-destination cost map covering every reachable Region, from
//! which the locally optimal next Region can always be picked (typical of a
//! crowd heading to the same place).
//!
//! The cost map is produced by [NavMesh::distance_field], an expanding
//! wavefront from the destination Region across portals:
//!
//! ```text
//!  _______________________
//! |       |       |       |
//! |  2.0  |  1.0  |  0.0  | <- destination
//! |_______|_______|_______|
//! |       |
//! |  3.0  |
//! |_______|
//! ```
//!

use std::collections::{BTreeMap, VecDeque};

use crate::prelude::*;
use bevy::prelude::*;

/// Route data consumed by a [NavMeshFlowField]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Debug, PartialEq)]
pub enum Corridor {
	/// Ordered Regions from a source to the destination Region (the last element)
	Path(Vec<RegionID>),
	/// Cost of reaching the destination from each Region, the destination has a cost of zero
	CostMap(BTreeMap<RegionID, f32>),
}

impl Corridor {
	/// Get the Regions from `node` to the destination inclusive. Returns [None]
	/// if `node` is not on the Corridor or the destination cannot be reached from it
	pub fn route_from(&self, node: RegionID, mesh: &NavMesh) -> Option<Vec<RegionID>> {
		match self {
			Corridor::Path(path) => {
				let index = path.iter().position(|r| *r == node)?;
				Some(path[index..].to_vec())
			}
			Corridor::CostMap(costs) => {
				let mut current = node;
				let mut current_cost = *costs.get(&current)?;
				let mut route = vec![current];
				while current_cost > 0.0 {
					// costs strictly decrease so this always terminates
					let mut cheapest: Option<(RegionID, f32)> = None;
					for n in mesh.neighbours(current).iter() {
						if let Some(cost) = costs.get(n) {
							if *cost < current_cost
								&& cheapest.is_none_or(|(_, c)| *cost < c)
							{
								cheapest = Some((*n, *cost));
							}
						}
					}
					let (next, cost) = cheapest?;
					route.push(next);
					current = next;
					current_cost = cost;
				}
				Some(route)
			}
		}
	}
	/// The Region a route through this Corridor ends in, if known without a mesh
	pub fn destination_region(&self) -> Option<RegionID> {
		match self {
			Corridor::Path(path) => path.last().copied(),
			Corridor::CostMap(costs) => costs
				.iter()
				.find(|(_, c)| **c <= 0.0)
				.map(|(r, _)| *r),
		}
	}
}

impl NavMesh {
	/// Build a distance-to-destination cost map over every Region reachable
	/// from `destination`. Costs are accumulated distances between Region
	/// centroids across portals
	pub fn distance_field(&self, destination: RegionID) -> BTreeMap<RegionID, f32> {
		let mut costs = BTreeMap::new();
		costs.insert(destination, 0.0);
		let mut queue = VecDeque::from([destination]);
		while let Some(current) = queue.pop_front() {
			let current_cost = costs[&current];
			let centroid = self.region_centroid(current);
			for n in self.neighbours(current).iter() {
				let cost = current_cost + centroid.distance(self.region_centroid(*n));
				// relax, a cheaper route found later re-propagates through the queue
				if costs.get(n).is_none_or(|existing| cost < *existing) {
					costs.insert(*n, cost);
					queue.push_back(*n);
				}
			}
		}
		trace!("Distance field over {} regions", costs.len());
		costs
	}
}
