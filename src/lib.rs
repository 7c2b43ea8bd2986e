//! virtdev - libvirt device descriptors
//!
//! Graphics and video device configuration, validated on assignment and
//! rendered to the XML fragments libvirt consumes.

pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod utils;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use config::schema::DeviceSet;
pub use device::context::DeviceContext;
pub use device::graphics::GraphicsDevice;
pub use device::video::VideoDevice;
pub use error::DeviceError;

/// Library error type
pub type Result<T> = anyhow::Result<T>;
