//! `use bevy_navmesh_flowfield_plugin::prelude::*;` to import common structures and methods
//!

#[doc(hidden)]
pub use crate::flowfields::{
	agent::{flow_triangle::*, lanes::*, *},
	fields::{flow_field::*, flow_triangulate::*, flow_vertex::*, *},
	navmesh::{corridor::*, *},
	utilities::*,
	*,
};

#[doc(hidden)]
pub use crate::{
	bundle::*,
	plugin::{field_layer::*, steering_layer::*, *},
};
