//! Heuristics module for route covering.
//!
//! This module exports all construction and improvement heuristics.

pub mod beam;
pub mod construction;
pub mod dijkstra;
pub mod local_search;
pub mod scoring;

pub use beam::*;
pub use construction::*;
pub use dijkstra::*;
pub use local_search::*;
pub use scoring::*;
