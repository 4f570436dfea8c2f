//! Modules layer - Infrastructure components behind the features
//!
//! Contains the report store implementations and photo storage.

pub mod storage;
pub mod store;
