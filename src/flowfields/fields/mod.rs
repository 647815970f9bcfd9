//! The flow itself: directions bound to mesh vertices, lane decompositions of
//! Regions and the field that grows both along a Corridor.
//!
//! Fields are shared. Every agent heading to the same destination reads from
//! the same [NavMeshFlowField] held in the [FlowFieldCache], so a Region's
//! flow is computed once however many agents cross it.
//!

pub mod flow_field;
pub mod flow_triangulate;
pub mod flow_vertex;

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::prelude::*;
use bevy::prelude::*;

/// Handle of a field stored in a [FlowFieldCache]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default, Hash, Reflect)]
pub struct FieldID(u32);

impl FieldID {
	/// Create a new instance of [FieldID]
	pub fn new(id: u32) -> Self {
		FieldID(id)
	}
	/// Get the raw id
	pub fn get(&self) -> u32 {
		self.0
	}
}

/// Describes a cached field
#[derive(Clone, Copy, Debug, Reflect)]
pub struct FieldMetadata {
	/// Destination of the field
	destination: Vec3,
	//? If a game is running for 136 years bad things will start happening here
	/// Marks the field based on time elapsed since app start, used to purge fields nobody uses anymore
	time_generated: Duration,
}

impl FieldMetadata {
	/// Get the destination
	pub fn get_destination(&self) -> Vec3 {
		self.destination
	}
	/// Get when the field was generated
	pub fn get_time_generated(&self) -> Duration {
		self.time_generated
	}
}

/// Each [NavMeshFlowField] is placed into this cache so that any number of
/// agents can steer with it
#[derive(Component, Default)]
pub struct FlowFieldCache {
	/// Fields and their metadata
	fields: BTreeMap<FieldID, (FieldMetadata, NavMeshFlowField)>,
	/// Id handed to the next inserted field
	next_id: u32,
}

impl FlowFieldCache {
	/// Number of cached fields
	pub fn len(&self) -> usize {
		self.fields.len()
	}
	/// Whether the cache holds no fields
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
	/// Get a field. Returns [None] if it has been purged
	pub fn get_field(&self, id: FieldID) -> Option<&NavMeshFlowField> {
		self.fields.get(&id).map(|(_, field)| field)
	}
	/// Get a mutable reference to a field
	pub fn get_field_mut(&mut self, id: FieldID) -> Option<&mut NavMeshFlowField> {
		self.fields.get_mut(&id).map(|(_, field)| field)
	}
	/// Get the metadata of a field
	pub fn get_metadata(&self, id: FieldID) -> Option<&FieldMetadata> {
		self.fields.get(&id).map(|(meta, _)| meta)
	}
	/// Find a field heading to within `epsilon` of `destination`
	pub fn find_field(&self, destination: Vec3, epsilon: f32) -> Option<FieldID> {
		self.fields
			.iter()
			.find(|(_, (meta, _))| meta.destination.distance(destination) <= epsilon)
			.map(|(id, _)| *id)
	}
	/// Insert a field into the cache, stamped with the current elapsed time
	pub fn insert_field(&mut self, field: NavMeshFlowField, elapsed_duration: Duration) -> FieldID {
		let id = FieldID::new(self.next_id);
		self.next_id = self.next_id.wrapping_add(1);
		let meta = FieldMetadata {
			destination: field.get_destination(),
			time_generated: elapsed_duration,
		};
		self.fields.insert(id, (meta, field));
		id
	}
	/// Remove a field from the cache
	pub fn remove_field(&mut self, id: FieldID) -> Option<NavMeshFlowField> {
		self.fields.remove(&id).map(|(_, field)| field)
	}
	/// Refresh the generation time of a field still in use
	pub fn touch_field(&mut self, id: FieldID, elapsed_duration: Duration) {
		if let Some((meta, _)) = self.fields.get_mut(&id) {
			meta.time_generated = elapsed_duration;
		}
	}
	/// Remove every field older than [FIELD_EXPIRY_SECONDS] that isn't in
	/// `in_use`, returns the ids purged
	pub fn purge_expired(
		&mut self,
		elapsed_duration: Duration,
		in_use: &BTreeSet<FieldID>,
	) -> Vec<FieldID> {
		let mut to_purge = Vec::new();
		for (id, (meta, _)) in self.fields.iter() {
			let diff = elapsed_duration.saturating_sub(meta.time_generated);
			if diff.as_secs() > FIELD_EXPIRY_SECONDS && !in_use.contains(id) {
				to_purge.push(*id);
			}
		}
		for id in to_purge.iter() {
			self.fields.remove(id);
		}
		to_purge
	}
}
