//! Core domain types for the busmap client.
//!
//! This crate provides the fundamental types used throughout the system:
//! - `VehicleId`: stable vehicle identity, primary key of the marker set
//! - `PositionUpdate`: one feed-carried position report
//! - `Marker`: the live client-side entity for one tracked vehicle
//! - `ProjectedPoint` and the Web Mercator projection

pub mod geo;
pub mod vehicle;

pub use geo::{project_lon_lat, ProjectedPoint};
pub use vehicle::{Marker, PositionUpdate, VehicleId};
