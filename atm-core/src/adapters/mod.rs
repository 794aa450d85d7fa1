//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - JSON file on local disk for the AccountRepository port
//! - In-memory map for tests

pub mod json_file;
pub mod memory;
