//! Groups the components a navmesh entity needs for agents to steer across it
//!

use crate::prelude::*;
use bevy::prelude::*;

/// Configuration of the fields built for a navmesh
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[derive(Component, Clone, Copy, Debug, PartialEq, Reflect)]
pub struct FlowFieldSettings {
	/// Which side of the direction of travel holds the positive lanes
	pub handedness: Handedness,
	/// Whether fields keep their caches
	pub lifecycle: FieldLifecycle,
	/// Requests for destinations within this distance of each other share a field
	pub destination_epsilon: f32,
	/// Steering used by agents without their own parameters
	pub steering: SteeringParams,
}

impl Default for FlowFieldSettings {
	fn default() -> Self {
		FlowFieldSettings {
			handedness: Handedness::default(),
			lifecycle: FieldLifecycle::default(),
			destination_epsilon: PLANAR_EPSILON,
			steering: SteeringParams::default(),
		}
	}
}

/// Components of a navmesh entity
#[derive(Bundle)]
pub struct NavMeshFlowFieldBundle {
	/// The mesh
	nav_mesh: NavMesh,
	/// Fields built over the mesh
	flow_field_cache: FlowFieldCache,
	/// How fields are built and agents steered
	settings: FlowFieldSettings,
}

impl NavMeshFlowFieldBundle {
	/// Create a new instance of [NavMeshFlowFieldBundle] with default settings
	pub fn new(nav_mesh: NavMesh) -> Self {
		NavMeshFlowFieldBundle {
			nav_mesh,
			flow_field_cache: FlowFieldCache::default(),
			settings: FlowFieldSettings::default(),
		}
	}
	/// Replace the settings
	pub fn with_settings(mut self, settings: FlowFieldSettings) -> Self {
		self.settings = settings;
		self
	}
	/// Create a new instance of [NavMeshFlowFieldBundle] where the [NavMesh] is read from disk
	#[cfg(feature = "ron")]
	pub fn from_ron(path: &str) -> Result<Self, NavMeshError> {
		let nav_mesh = NavMesh::from_ron(path.to_string())?;
		Ok(NavMeshFlowFieldBundle::new(nav_mesh))
	}
}
