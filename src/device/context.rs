//! Connection and host collaborators shared by every device

use crate::utils::system::SystemHost;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Optional hypervisor features a connection may support
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    /// The hypervisor picks the guest keymap itself when none is given
    KeymapAutodetect,
}

/// Capability query against a hypervisor connection
pub trait Capabilities: fmt::Debug {
    fn supports(&self, feature: Feature) -> bool;
}

/// Host-side facts devices consult while resolving or rendering
pub trait Host: fmt::Debug {
    /// Guest keymap matching the host keyboard
    fn default_keymap(&self) -> Option<String>;
    /// X display target for SDL output
    fn display(&self) -> Option<String>;
    fn home_dir(&self) -> Option<PathBuf>;
}

/// Driver name and version of a hypervisor connection.
///
/// Versions compare as `major * 1_000_000 + minor * 1_000 + micro`, the same
/// encoding libvirt uses for driver versions.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnInfo {
    pub driver: String,
    pub version: String,
}

impl ConnInfo {
    pub fn new(driver: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            version: version.into(),
        }
    }

    /// Encoded driver version, `None` if the version string is malformed
    pub fn version_number(&self) -> Option<u64> {
        let mut parts = self.version.trim().split('.');
        let mut num = 0u64;
        for _ in 0..3 {
            let part = match parts.next() {
                Some(p) => p.parse::<u64>().ok()?,
                None => 0,
            };
            if part >= 1000 {
                return None;
            }
            num = num * 1000 + part;
        }
        if parts.next().is_some() {
            return None;
        }
        Some(num)
    }
}

impl Capabilities for ConnInfo {
    fn supports(&self, feature: Feature) -> bool {
        // (driver, minimum driver version)
        let required: &[(&str, u64)] = match feature {
            Feature::KeymapAutodetect => &[("qemu", 11_000)],
        };
        let Some(version) = self.version_number() else {
            return false;
        };
        required
            .iter()
            .any(|(drv, min)| self.driver.eq_ignore_ascii_case(drv) && version >= *min)
    }
}

/// What a device needs from its surroundings: the connection it will be
/// defined on (if any) and the host it is being configured from.
#[derive(Debug, Clone)]
pub struct DeviceContext {
    conn: Option<Arc<dyn Capabilities>>,
    host: Arc<dyn Host>,
}

impl DeviceContext {
    pub fn new(conn: Option<Arc<dyn Capabilities>>, host: Arc<dyn Host>) -> Self {
        Self { conn, host }
    }

    /// No connection, real host
    pub fn system() -> Self {
        Self::new(None, Arc::new(SystemHost))
    }

    pub fn with_conn(mut self, conn: Arc<dyn Capabilities>) -> Self {
        self.conn = Some(conn);
        self
    }

    pub fn conn_supports(&self, feature: Feature) -> bool {
        self.conn.as_ref().is_some_and(|c| c.supports(feature))
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }
}
