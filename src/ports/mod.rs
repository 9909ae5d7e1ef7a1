//! Port traits at the boundary between the lookup core and its collaborators.

pub mod bar_source;
pub mod config_port;
