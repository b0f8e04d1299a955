//! Spherical geodesy for the map overlay.

pub mod projection;
