//! Consumption estimation and aggregation over allocator readings.
//!
//! This crate turns sparse cumulative readings into daily estimates and
//! chart-ready series. Everything here is a pure function over in-memory
//! snapshots; the one fallible collaborator (the temperature archive) is
//! consumed as an `Option` so its absence degrades the math instead of
//! failing it.

pub mod interpolation;
pub mod series;
pub mod summary;
