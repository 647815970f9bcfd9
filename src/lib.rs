//! This is a plugin for Bevy game engine to steer crowds of agents across a navigation mesh with smooth, continuous flow fields
//!

pub mod flowfields;
pub mod bundle;
pub mod plugin;

pub mod prelude;
