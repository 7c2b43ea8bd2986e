//! CLI command definitions

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// virtdev CLI (Rust)
#[derive(Parser, Debug)]
#[command(name = "virtdev", about = "libvirt device XML generator in Rust")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Render a <graphics> element
    Graphics {
        /// Display type (vnc|sdl|rdp|spice)
        #[arg(long = "type", default_value = "vnc")]
        gtype: String,

        /// VNC/SPICE port, -1 for auto allocation
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        port: String,

        /// SPICE TLS port, -1 for auto allocation
        #[arg(long, default_value = "-1", allow_hyphen_values = true)]
        tls_port: String,

        /// Address to listen on
        #[arg(long)]
        listen: Option<String>,

        /// Console password
        #[arg(long)]
        passwd: Option<String>,

        /// Keymap (e.g., en-us, de), or 'default' / 'local'
        #[arg(long, default_value = "default")]
        keymap: String,

        /// Leave the keymap attribute out entirely
        #[arg(long, conflicts_with = "keymap")]
        no_keymap: bool,

        /// SPICE channel security as NAME=MODE (repeatable)
        #[arg(long = "channel", value_name = "NAME=MODE")]
        channels: Vec<String>,

        // Connection
        /// Hypervisor driver of the target connection (e.g., qemu, xen)
        #[arg(long)]
        driver: Option<String>,
        /// Driver version (e.g., 0.12.1)
        #[arg(long, requires = "driver")]
        driver_version: Option<String>,
    },

    /// Render a <video> element
    Video {
        /// Adapter model (cirrus|vga|vmvga|xen|…)
        #[arg(long)]
        model: Option<String>,
        /// Video RAM (KiB)
        #[arg(long)]
        vram: Option<u64>,
        #[arg(long)]
        heads: Option<u32>,
    },

    /// Render every device in a device-set JSON file
    Render {
        /// Device file (default: ~/virtdev/devices.json)
        #[arg(env = "VIRTDEV_DEVICES")]
        file: Option<PathBuf>,
    },

    /// List keymaps accepted by the hypervisor
    Keymaps,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Install Fish shell completions automatically
    InstallFish,

    /// Generate man page
    ManPage,
}
