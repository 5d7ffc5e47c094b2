//! # System Interaction Layer
//!
//! The boundary between the resolver's in-memory world and the operating
//! system: dispatching a flattened execution plan as real processes.

pub mod executor;
