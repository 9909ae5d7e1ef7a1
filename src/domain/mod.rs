//! Core domain types and logic.

pub mod bar;
pub mod bar_lookup;
pub mod error;
pub mod instrument;
pub mod lookup_config;
pub mod universe;
