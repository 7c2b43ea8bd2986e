//! Host environment probing

use crate::device::context::Host;
use crate::device::keymap::{self, FALLBACK_KEYMAP};
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

const SYSCONFIG_KEYBOARD: &str = "/etc/sysconfig/keyboard";
const VCONSOLE_CONF: &str = "/etc/vconsole.conf";

/// The real host: environment variables, home directory, keyboard config
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHost;

impl Host for SystemHost {
    fn default_keymap(&self) -> Option<String> {
        Some(default_keymap())
    }

    fn display(&self) -> Option<String> {
        display_target()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
}

/// X display the SDL window would open on
pub fn display_target() -> Option<String> {
    std::env::var("DISPLAY").ok()
}

/// Guest keymap matching the host keyboard, `en-us` when undetectable
pub fn default_keymap() -> String {
    match host_keyboard_name() {
        Some(name) => keymap_for_host_name(&name),
        None => FALLBACK_KEYMAP.to_string(),
    }
}

fn keymap_for_host_name(name: &str) -> String {
    match keymap::lookup(name) {
        Some(k) => k.to_string(),
        None => {
            debug!(layout = name, "host keyboard layout not found in keytable");
            FALLBACK_KEYMAP.to_string()
        }
    }
}

fn host_keyboard_name() -> Option<String> {
    if let Ok(contents) = fs::read_to_string(SYSCONFIG_KEYBOARD) {
        if let Some(name) = parse_keyboard_config(&contents, &["KEYTABLE", "LAYOUT"]) {
            return Some(name);
        }
    }
    if let Ok(contents) = fs::read_to_string(VCONSOLE_CONF) {
        if let Some(name) = parse_keyboard_config(&contents, &["KEYMAP"]) {
            return Some(name);
        }
    }
    localectl_keymap()
}

/// Pull the first of `keys` out of a shell-style `KEY="value"` file
pub fn parse_keyboard_config(contents: &str, keys: &[&str]) -> Option<String> {
    for line in contents.lines() {
        let line = line.trim();
        for key in keys {
            let Some(rest) = line.strip_prefix(key).and_then(|r| r.strip_prefix('=')) else {
                continue;
            };
            let value = rest.trim().trim_matches('"').trim_matches('\'');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn localectl_keymap() -> Option<String> {
    let bin = which::which("localectl").ok()?;
    let output = Command::new(bin).arg("status").output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_localectl(&String::from_utf8_lossy(&output.stdout))
}

/// Read the console keymap (or X11 layout) from `localectl status` output
pub fn parse_localectl(output: &str) -> Option<String> {
    let field = |label: &str| {
        output.lines().find_map(|line| {
            let value = line.trim().strip_prefix(label)?.trim();
            match value {
                "" | "n/a" | "(unset)" => None,
                v => Some(v.to_string()),
            }
        })
    };
    field("VC Keymap:").or_else(|| field("X11 Layout:"))
}
