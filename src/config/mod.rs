//! Device-set files

pub mod schema;
pub mod store;
