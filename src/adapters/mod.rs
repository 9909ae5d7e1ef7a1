//! Concrete adapter implementations for ports.

pub mod csv_source;
pub mod file_config_adapter;
pub mod memory_source;
