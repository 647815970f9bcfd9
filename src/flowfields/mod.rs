//! Flow fields over a navigation mesh give a crowd of agents smooth,
//! continuous steering towards a destination without the stair-stepping of
//! waypoint following.
//!
//! [Crowd Pathfinding and Steering Using Flow Field Tiles](https://www.gameaipro.com/GameAIPro/GameAIPro_Chapter23_Crowd_Pathfinding_and_Steering_Using_Flow_Field_Tiles.pdf)
//!
//! [Navigation meshes and pathfinding](https://www.gamedev.net/tutorials/programming/artificial-intelligence/navigation-meshes-and-pathfinding-r4880/)
//!
//! A mesh is a series of convex polygon Regions joined by Portals. A Corridor
//! lists the Regions a path crosses. Rather than storing a direction per grid
//! cell each mesh vertex gets a direction and an agent blends the directions
//! of the three corners of the triangle it stands in.
//!
//! Definitions:
//!
//! * Region - a convex polygon of the mesh, identified by a stable node index
//! * Portal - a boundary edge shared by two Regions
//! * Corridor - the Regions a path crosses, or a cost map picking the next one
//! * Flow vertex - the direction bound to a mesh vertex
//! * Lane - a triangle of a Region relative to the Portals an agent enters and
//! leaves by. `0` is the main lane between the Portals, negative lanes fan
//! out to the left and positive lanes to the right
//!
//! ```text
//!            exit
//!          ________
//!         /\      /\
//!        /  \ 0  /  \
//!       / -1 \  / +1 \
//!      /______\/______\
//!           entry
//! ```
//!
//! * Radial vertex - a vertex with no single sensible direction (the inside
//! corner of a turn), it points from itself towards whoever asks so the flow
//! curves around it
//!

pub mod agent;
pub mod fields;
pub mod navmesh;
pub mod utilities;
