//! Command handlers

use crate::cli::commands::{Cli, Cmd};
use crate::cli::completions::{generate_man_page, install_fish_completions, print_completions};
use crate::config::store::load_devices;
use crate::device::context::{ConnInfo, DeviceContext};
use crate::device::graphics::GraphicsDevice;
use crate::device::keymap;
use crate::device::video::VideoDevice;
use crate::utils::paths::find_devices_file;
use crate::Result;
use anyhow::anyhow;
use clap::CommandFactory;
use std::sync::Arc;
use tracing::info;

/// Settings for the `graphics` command
pub struct GraphicsParams {
    pub gtype: String,
    pub port: String,
    pub tls_port: String,
    pub listen: Option<String>,
    pub passwd: Option<String>,
    pub keymap: Option<String>,
    pub channels: Vec<String>,
    pub conn: Option<ConnInfo>,
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.cmd {
        Cmd::Graphics {
            gtype,
            port,
            tls_port,
            listen,
            passwd,
            keymap,
            no_keymap,
            channels,
            driver,
            driver_version,
        } => {
            let params = GraphicsParams {
                gtype,
                port,
                tls_port,
                listen,
                passwd,
                keymap: if no_keymap { None } else { Some(keymap) },
                channels,
                conn: driver.map(|d| ConnInfo::new(d, driver_version.unwrap_or_default())),
            };
            println!("{}", graphics_xml(params)?);
        }

        Cmd::Video { model, vram, heads } => {
            let mut dev = VideoDevice::new();
            dev.set_model_type(model);
            dev.set_vram(vram);
            dev.set_heads(heads);
            println!("{}", dev.to_xml()?);
        }

        Cmd::Render { file } => {
            let path = find_devices_file(file.as_deref())?;
            let set = load_devices(&path)?;
            let ctx = set.context();
            for xml in set.render(&ctx)? {
                println!("{xml}");
            }
            info!(path = %path.display(), "rendered device set");
        }

        Cmd::Keymaps => {
            for k in keymap::valid_keymaps() {
                println!("{k}");
            }
        }

        Cmd::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }

        Cmd::InstallFish => install_fish_completions()?,

        Cmd::ManPage => generate_man_page()?,
    }

    Ok(())
}

/// Build a graphics device from command-line settings and render it
pub fn graphics_xml(params: GraphicsParams) -> Result<String> {
    let mut ctx = DeviceContext::system();
    if let Some(conn) = params.conn {
        ctx = ctx.with_conn(Arc::new(conn));
    }

    let mut dev = GraphicsDevice::new(ctx);
    dev.set_type(&params.gtype)?;
    dev.set_port_str(&params.port)?;
    dev.set_tls_port_str(&params.tls_port)?;
    dev.set_keymap(params.keymap.as_deref())?;
    dev.set_listen(params.listen);
    dev.set_passwd(params.passwd);

    for arg in &params.channels {
        let (name, mode) = arg
            .split_once('=')
            .ok_or_else(|| anyhow!("channel must be NAME=MODE, got '{arg}'"))?;
        dev.set_channel_mode(name.trim().parse()?, Some(mode.trim().parse()?));
    }

    let xml = dev.to_xml()?;
    info!(kind = %dev.graphics_type(), "rendered graphics device");
    Ok(xml)
}
