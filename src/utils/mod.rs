//! Helpers shared by devices, config and CLI

pub mod paths;
pub mod system;
pub mod xml;
