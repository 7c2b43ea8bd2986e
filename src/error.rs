//! Device error types

use thiserror::Error;

/// Errors raised while configuring or rendering a device.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// A setter argument or the device state at render time is invalid.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The host environment lacks something rendering needs (e.g. DISPLAY).
    #[error("environment unavailable: {0}")]
    EnvironmentUnavailable(String),

    /// Device XML could not be read.
    #[error("malformed device xml: {0}")]
    Xml(String),
}

impl DeviceError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        DeviceError::InvalidValue(msg.into())
    }
}

impl From<quick_xml::Error> for DeviceError {
    fn from(e: quick_xml::Error) -> Self {
        DeviceError::Xml(e.to_string())
    }
}
