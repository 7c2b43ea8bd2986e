//! Device-set file schema

use crate::device::context::{ConnInfo, DeviceContext};
use crate::device::graphics::{GraphicsDevice, KeymapSetting};
use crate::device::video::VideoDevice;
use crate::error::DeviceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A set of devices for one guest
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct DeviceSet {
    /// Connection the devices will be defined on; decides keymap autodetection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnInfo>,
    #[serde(default)]
    pub graphics: Vec<GraphicsConfig>,
    #[serde(default)]
    pub video: Vec<VideoConfig>,
}

/// Port given as a number or a numeric string
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PortValue {
    Num(i64),
    Text(String),
}

/// Graphics entry
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GraphicsConfig {
    #[serde(rename = "type", default = "default_graphics_type")]
    pub gtype: String, // vnc | sdl | rdp | spice
    #[serde(default)]
    pub port: Option<PortValue>,
    #[serde(default)]
    pub tls_port: Option<PortValue>,
    #[serde(default)]
    pub listen: Option<String>,
    #[serde(default)]
    pub passwd: Option<String>,
    #[serde(default = "default_keymap")]
    pub keymap: Option<String>, // null drops the attribute
    #[serde(default)]
    pub channels: BTreeMap<String, String>, // channel type -> mode
}

/// Video entry
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct VideoConfig {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub vram: Option<u64>, // KiB
    #[serde(default)]
    pub heads: Option<u32>,
}

fn default_graphics_type() -> String {
    "vnc".to_string()
}

fn default_keymap() -> Option<String> {
    Some(KeymapSetting::DEFAULT.to_string())
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            gtype: default_graphics_type(),
            port: None,
            tls_port: None,
            listen: None,
            passwd: None,
            keymap: default_keymap(),
            channels: BTreeMap::new(),
        }
    }
}

impl DeviceSet {
    /// System host, plus the configured connection if any
    pub fn context(&self) -> DeviceContext {
        let ctx = DeviceContext::system();
        match &self.connection {
            Some(conn) => ctx.with_conn(Arc::new(conn.clone())),
            None => ctx,
        }
    }

    /// Build and render every device, graphics first
    pub fn render(&self, ctx: &DeviceContext) -> Result<Vec<String>, DeviceError> {
        let mut out = Vec::with_capacity(self.graphics.len() + self.video.len());
        for g in &self.graphics {
            out.push(g.build(ctx.clone())?.to_xml()?);
        }
        for v in &self.video {
            out.push(v.build().to_xml()?);
        }
        Ok(out)
    }
}

impl GraphicsConfig {
    pub fn build(&self, ctx: DeviceContext) -> Result<GraphicsDevice, DeviceError> {
        let mut dev = GraphicsDevice::new(ctx);
        dev.set_type(&self.gtype)?;
        match &self.port {
            Some(PortValue::Num(n)) => dev.set_port(Some(*n))?,
            Some(PortValue::Text(s)) => dev.set_port_str(s)?,
            None => dev.set_port(None)?,
        }
        match &self.tls_port {
            Some(PortValue::Num(n)) => dev.set_tls_port(Some(*n))?,
            Some(PortValue::Text(s)) => dev.set_tls_port_str(s)?,
            None => dev.set_tls_port(None)?,
        }
        dev.set_keymap(self.keymap.as_deref())?;
        dev.set_listen(self.listen.clone());
        dev.set_passwd(self.passwd.clone());
        for (chan, mode) in &self.channels {
            dev.set_channel_mode(chan.parse()?, Some(mode.parse()?));
        }
        Ok(dev)
    }
}

impl VideoConfig {
    pub fn build(&self) -> VideoDevice {
        let mut dev = VideoDevice::new();
        dev.set_model_type(self.model.clone());
        dev.set_vram(self.vram);
        dev.set_heads(self.heads);
        dev
    }
}
