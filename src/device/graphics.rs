//! Graphics (display) device: VNC, SDL, SPICE, RDP

use crate::device::context::{DeviceContext, Feature};
use crate::device::keymap;
use crate::error::DeviceError;
use crate::utils::xml::{attributes, Element};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Port value meaning "let the hypervisor allocate one"
pub const AUTO_PORT: i64 = -1;
pub const MIN_PORT: i64 = 5900;
pub const MAX_PORT: i64 = 65535;
const MAX_KEYMAP_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsType {
    #[default]
    Vnc,
    Sdl,
    Rdp,
    Spice,
}

impl GraphicsType {
    pub const ALL: [GraphicsType; 4] = [
        GraphicsType::Vnc,
        GraphicsType::Sdl,
        GraphicsType::Rdp,
        GraphicsType::Spice,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GraphicsType::Vnc => "vnc",
            GraphicsType::Sdl => "sdl",
            GraphicsType::Rdp => "rdp",
            GraphicsType::Spice => "spice",
        }
    }
}

impl fmt::Display for GraphicsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphicsType {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GraphicsType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DeviceError::invalid("unknown graphics type"))
    }
}

/// SPICE sub-protocol streams, in the order libvirt lists them
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChannelType {
    Main,
    Display,
    Inputs,
    Cursor,
    Playback,
    Record,
}

impl ChannelType {
    pub const ALL: [ChannelType; 6] = [
        ChannelType::Main,
        ChannelType::Display,
        ChannelType::Inputs,
        ChannelType::Cursor,
        ChannelType::Playback,
        ChannelType::Record,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelType::Main => "main",
            ChannelType::Display => "display",
            ChannelType::Inputs => "inputs",
            ChannelType::Cursor => "cursor",
            ChannelType::Playback => "playback",
            ChannelType::Record => "record",
        }
    }
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelType {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChannelType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DeviceError::invalid(format!("unknown channel type '{s}'")))
    }
}

/// Transport security required on a SPICE channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelMode {
    Secure,
    Insecure,
    Any,
}

impl ChannelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelMode::Secure => "secure",
            ChannelMode::Insecure => "insecure",
            ChannelMode::Any => "any",
        }
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelMode {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secure" => Ok(ChannelMode::Secure),
            "insecure" => Ok(ChannelMode::Insecure),
            "any" => Ok(ChannelMode::Any),
            other => Err(DeviceError::invalid(format!("unknown channel mode '{other}'"))),
        }
    }
}

/// Stored keymap. The two sentinels are resolved each time the keymap is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeymapSetting {
    Literal(String),
    /// Let the hypervisor autodetect if it can, else use the host keymap
    Default,
    /// Always the host keymap
    Local,
}

impl KeymapSetting {
    pub const DEFAULT: &'static str = "default";
    pub const LOCAL: &'static str = "local";
}

fn check_port(val: Option<i64>, what: &str) -> Result<i64, DeviceError> {
    let val = val.unwrap_or(AUTO_PORT);
    if val != AUTO_PORT && !(MIN_PORT..=MAX_PORT).contains(&val) {
        return Err(DeviceError::invalid(format!(
            "{what} port must be a number between {MIN_PORT} and {MAX_PORT}, or -1 for auto allocation"
        )));
    }
    Ok(val)
}

fn parse_port(val: &str, what: &str) -> Result<i64, DeviceError> {
    let n = val.trim().parse::<i64>().map_err(|_| {
        DeviceError::invalid(format!(
            "{what} port must be a number between {MIN_PORT} and {MAX_PORT}, or -1 for auto allocation"
        ))
    })?;
    check_port(Some(n), what)
}

/// A graphics device as libvirt describes it
#[derive(Debug, Clone)]
pub struct GraphicsDevice {
    ctx: DeviceContext,
    gtype: GraphicsType,
    port: i64,
    tls_port: i64,
    listen: Option<String>,
    passwd: Option<String>,
    keymap: Option<KeymapSetting>,
    channels: BTreeMap<ChannelType, ChannelMode>,
}

macro_rules! channel_mode_accessors {
    ($($get:ident, $set:ident => $chan:expr;)*) => {
        $(
            pub fn $get(&self) -> Option<ChannelMode> {
                self.channel_mode($chan)
            }

            pub fn $set(&mut self, mode: Option<ChannelMode>) {
                self.set_channel_mode($chan, mode)
            }
        )*
    };
}

impl GraphicsDevice {
    /// VNC with auto-allocated ports and the `default` keymap
    pub fn new(ctx: DeviceContext) -> Self {
        Self {
            ctx,
            gtype: GraphicsType::Vnc,
            port: AUTO_PORT,
            tls_port: AUTO_PORT,
            listen: None,
            passwd: None,
            keymap: Some(KeymapSetting::Default),
            channels: BTreeMap::new(),
        }
    }

    pub fn graphics_type(&self) -> GraphicsType {
        self.gtype
    }

    /// Set the display type from its libvirt name
    pub fn set_type(&mut self, val: &str) -> Result<(), DeviceError> {
        self.gtype = val.parse()?;
        Ok(())
    }

    pub fn port(&self) -> i64 {
        self.port
    }

    /// `None` means auto allocation
    pub fn set_port(&mut self, val: Option<i64>) -> Result<(), DeviceError> {
        self.port = check_port(val, "VNC")?;
        Ok(())
    }

    pub fn set_port_str(&mut self, val: &str) -> Result<(), DeviceError> {
        self.port = parse_port(val, "VNC")?;
        Ok(())
    }

    pub fn tls_port(&self) -> i64 {
        self.tls_port
    }

    pub fn set_tls_port(&mut self, val: Option<i64>) -> Result<(), DeviceError> {
        self.tls_port = check_port(val, "TLS")?;
        Ok(())
    }

    pub fn set_tls_port_str(&mut self, val: &str) -> Result<(), DeviceError> {
        self.tls_port = parse_port(val, "TLS")?;
        Ok(())
    }

    pub fn listen(&self) -> Option<&str> {
        self.listen.as_deref()
    }

    pub fn set_listen(&mut self, val: Option<String>) {
        self.listen = val;
    }

    pub fn passwd(&self) -> Option<&str> {
        self.passwd.as_deref()
    }

    pub fn set_passwd(&mut self, val: Option<String>) {
        self.passwd = val;
    }

    /// The stored keymap, sentinels unresolved
    pub fn keymap_setting(&self) -> Option<&KeymapSetting> {
        self.keymap.as_ref()
    }

    /// The keymap to hand to the hypervisor.
    ///
    /// `default` yields nothing when the connection autodetects keymaps and
    /// the host keymap otherwise; `local` always yields the host keymap.
    pub fn keymap(&self) -> Option<String> {
        match self.keymap.as_ref()? {
            KeymapSetting::Literal(k) => Some(k.clone()),
            KeymapSetting::Default => {
                if self.ctx.conn_supports(Feature::KeymapAutodetect) {
                    debug!("connection autodetects keymap, leaving it unset");
                    None
                } else {
                    self.ctx.host().default_keymap()
                }
            }
            KeymapSetting::Local => self.ctx.host().default_keymap(),
        }
    }

    pub fn set_keymap(&mut self, val: Option<&str>) -> Result<(), DeviceError> {
        let Some(val) = val else {
            self.keymap = None;
            return Ok(());
        };

        self.keymap = match val {
            KeymapSetting::DEFAULT => Some(KeymapSetting::Default),
            KeymapSetting::LOCAL => Some(KeymapSetting::Local),
            // other spellings of "local" are resolved now, not on read
            v if v.eq_ignore_ascii_case(KeymapSetting::LOCAL) => {
                self.ctx.host().default_keymap().map(KeymapSetting::Literal)
            }
            v if v.len() > MAX_KEYMAP_LEN => {
                return Err(DeviceError::invalid(format!(
                    "keymap must be at most {MAX_KEYMAP_LEN} characters"
                )));
            }
            v if !v
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') =>
            {
                return Err(DeviceError::invalid(
                    "keymap can only contain alphanumeric, '_', or '-' characters",
                ));
            }
            v => Some(KeymapSetting::Literal(v.to_string())),
        };
        Ok(())
    }

    pub fn channel_mode(&self, chan: ChannelType) -> Option<ChannelMode> {
        self.channels.get(&chan).copied()
    }

    /// `None` clears the channel so it is left out of the XML
    pub fn set_channel_mode(&mut self, chan: ChannelType, mode: Option<ChannelMode>) {
        match mode {
            Some(m) => {
                self.channels.insert(chan, m);
            }
            None => {
                self.channels.remove(&chan);
            }
        }
    }

    pub fn channels(&self) -> impl Iterator<Item = (ChannelType, ChannelMode)> + '_ {
        self.channels.iter().map(|(c, m)| (*c, *m))
    }

    channel_mode_accessors! {
        channel_main_mode, set_channel_main_mode => ChannelType::Main;
        channel_display_mode, set_channel_display_mode => ChannelType::Display;
        channel_inputs_mode, set_channel_inputs_mode => ChannelType::Inputs;
        channel_cursor_mode, set_channel_cursor_mode => ChannelType::Cursor;
        channel_playback_mode, set_channel_playback_mode => ChannelType::Playback;
        channel_record_mode, set_channel_record_mode => ChannelType::Record;
    }

    /// Keymap identifiers the hypervisor understands
    pub fn valid_keymaps(&self) -> Vec<&'static str> {
        keymap::valid_keymaps()
    }

    /// Render the `<graphics>` element for the current display type
    pub fn to_xml(&self) -> Result<String, DeviceError> {
        let el = match self.gtype {
            GraphicsType::Sdl => self.sdl_element()?,
            GraphicsType::Spice => self.spice_element(),
            GraphicsType::Vnc => self.vnc_element(),
            GraphicsType::Rdp => return Err(DeviceError::invalid("unknown graphics type")),
        };
        Ok(el.render())
    }

    fn sdl_element(&self) -> Result<Element, DeviceError> {
        let host = self.ctx.host();
        let display = host.display().ok_or_else(|| {
            DeviceError::EnvironmentUnavailable("no display target available".into())
        })?;
        let home = host.home_dir().ok_or_else(|| {
            DeviceError::EnvironmentUnavailable("no home directory found".into())
        })?;
        let xauth = home.join(".Xauthority");

        Ok(Element::new("graphics")
            .attr("type", GraphicsType::Sdl)
            .attr("display", display)
            .attr("xauth", xauth.display()))
    }

    fn spice_element(&self) -> Element {
        let mut el = Element::new("graphics")
            .attr("type", GraphicsType::Spice)
            .attr("port", self.port)
            .attr("tlsPort", self.tls_port);
        // Either port on auto turns autoport on for both
        if self.port == AUTO_PORT || self.tls_port == AUTO_PORT {
            el = el.attr("autoport", "yes");
        }
        el = self.common_attrs(el);
        for (chan, mode) in self.channels() {
            el = el.child(
                Element::new("channel")
                    .attr("name", chan)
                    .attr("mode", mode),
            );
        }
        el
    }

    fn vnc_element(&self) -> Element {
        let el = Element::new("graphics")
            .attr("type", GraphicsType::Vnc)
            .attr("port", self.port);
        self.common_attrs(el)
    }

    fn common_attrs(&self, el: Element) -> Element {
        el.attr_opt("keymap", self.keymap().as_deref())
            .attr_opt("listen", self.listen())
            .attr_opt("passwd", self.passwd())
    }

    /// Build a device from the first `<graphics>` element in `xml`.
    ///
    /// Values go through the same setters as hand-built devices, so invalid
    /// ports or keymaps in the XML are rejected.
    pub fn from_xml(xml: &str, ctx: DeviceContext) -> Result<Self, DeviceError> {
        let mut dev = GraphicsDevice::new(ctx);
        dev.keymap = None;

        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut found = false;
        let mut in_graphics = false;
        loop {
            let event = reader.read_event()?;
            let (e, empty) = match &event {
                Event::Start(e) => (e, false),
                Event::Empty(e) => (e, true),
                Event::End(e) if e.name().as_ref() == b"graphics" => {
                    in_graphics = false;
                    continue;
                }
                Event::Eof => break,
                _ => continue,
            };
            match e.name().as_ref() {
                b"graphics" if !found => {
                    found = true;
                    in_graphics = !empty;
                    dev.apply_attributes(&attributes(e)?)?;
                }
                b"channel" if in_graphics => {
                    let attrs = attributes(e)?;
                    if let (Some(name), Some(mode)) = (attrs.get("name"), attrs.get("mode")) {
                        match (name.parse::<ChannelType>(), mode.parse::<ChannelMode>()) {
                            (Ok(chan), Ok(mode)) => dev.set_channel_mode(chan, Some(mode)),
                            _ => debug!(name = %name, mode = %mode, "skipping unsupported channel"),
                        }
                    }
                }
                _ => {}
            }
        }

        if !found {
            return Err(DeviceError::Xml("no <graphics> element".into()));
        }
        Ok(dev)
    }

    fn apply_attributes(
        &mut self,
        attrs: &HashMap<String, String>,
    ) -> Result<(), DeviceError> {
        if let Some(t) = attrs.get("type") {
            self.set_type(t)?;
        }
        if let Some(p) = attrs.get("port") {
            self.set_port_str(p)?;
        }
        if let Some(p) = attrs.get("tlsPort") {
            self.set_tls_port_str(p)?;
        }
        if let Some(k) = attrs.get("keymap") {
            self.set_keymap(Some(k))?;
        }
        self.listen = attrs.get("listen").cloned();
        self.passwd = attrs.get("passwd").cloned();
        Ok(())
    }
}
