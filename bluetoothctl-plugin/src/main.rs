/*!
 * bluetoothctl media-center plugin
 * Bluetooth discovery, pairing, connection and trust through directory listings
 *
 * Every page is a fresh invocation: `bluetoothctl-plugin <base-url> <handle> <query>`.
 */

use anyhow::Result;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing::debug;

mod actions;
mod config;
mod error;
mod plugin;
mod render;
mod request;

use actions::register_actions;
use bluetoothctl_core::DeviceController;
use config::PluginConfig;
use plugin::{Plugin, Router};
use render::JsonLinesRenderer;
use request::Request;

#[derive(Parser)]
#[command(name = "bluetoothctl-plugin")]
#[command(about = "Bluetooth device management via bluetoothctl")]
struct Cli {
    /// Base URL that re-invokes this plugin
    base_url: String,

    /// Handle of the listing being rendered
    #[arg(allow_negative_numbers = true)]
    handle: i32,

    /// Query string carrying the action and its parameters
    #[arg(default_value = "")]
    query: String,

    /// Extra host arguments such as `resume:false`, ignored
    #[arg(hide = true)]
    host_args: Vec<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "/etc/bluetoothctl-plugin/config.toml")]
    config: PathBuf,

    /// Path of the bluetoothctl executable (overrides the config file)
    #[arg(long)]
    bluetoothctl: Option<PathBuf>,

    /// Scan duration in seconds (overrides the config file)
    #[arg(long)]
    scan_timeout: Option<u32>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // stdout carries directives, logs go to stderr
    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "bluetoothctl_plugin={0},bluetoothctl_core={0}",
            log_level
        ))
        .with_writer(io::stderr)
        .init();

    let mut config = PluginConfig::load(&cli.config)?;
    if let Some(path) = cli.bluetoothctl {
        config.bluetoothctl.path = path;
    }
    if let Some(timeout) = cli.scan_timeout {
        config.bluetoothctl.scan_timeout = timeout;
    }
    if !cli.host_args.is_empty() {
        debug!("ignoring host arguments {:?}", cli.host_args);
    }

    let mut router = Router::default();
    register_actions(&mut router)?;
    debug!("actions registered: {:?}", router.actions().collect::<Vec<_>>());

    let controller = DeviceController::new(&config.bluetoothctl);
    debug!("fetched bluetoothctl path {}", controller.executable().display());
    debug!("fetched bluetoothctl timeout {}", controller.scan_timeout());
    let renderer = JsonLinesRenderer::new(io::stdout());
    let mut plugin = Plugin::new(cli.base_url, cli.handle, config, controller, Box::new(renderer));
    debug!("{} handling listing {}", plugin.name(), cli.handle);

    let request = Request::from_query(&cli.query);
    router.dispatch(&mut plugin, &request)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_host_invocation() {
        let cli = Cli::try_parse_from([
            "bluetoothctl-plugin",
            "plugin://plugin.program.bluetoothctl/",
            "-1",
            "?action=connect&device=Headphones&address=AA:BB:CC:DD:EE:FF",
        ])
        .unwrap();

        assert_eq!(cli.base_url, "plugin://plugin.program.bluetoothctl/");
        assert_eq!(cli.handle, -1);
        assert_eq!(Request::from_query(&cli.query).action(), "connect");
        assert_eq!(cli.config, PathBuf::from("/etc/bluetoothctl-plugin/config.toml"));
    }

    #[test]
    fn query_is_optional() {
        let cli = Cli::try_parse_from(["bluetoothctl-plugin", "plugin://x/", "3"]).unwrap();

        assert_eq!(cli.handle, 3);
        assert_eq!(Request::from_query(&cli.query).action(), "root");
    }

    #[test]
    fn trailing_host_arguments_are_accepted() {
        let cli = Cli::try_parse_from([
            "bluetoothctl-plugin",
            "plugin://plugin.program.bluetoothctl/",
            "1",
            "?action=root",
            "resume:false",
        ])
        .unwrap();

        assert_eq!(cli.handle, 1);
        assert_eq!(Request::from_query(&cli.query).action(), "root");
        assert_eq!(cli.host_args, ["resume:false"]);
    }

    #[test]
    fn tool_overrides() {
        let cli = Cli::try_parse_from([
            "bluetoothctl-plugin",
            "--bluetoothctl",
            "/opt/bin/bluetoothctl",
            "--scan-timeout",
            "10",
            "plugin://x/",
            "0",
        ])
        .unwrap();

        assert_eq!(cli.bluetoothctl, Some(PathBuf::from("/opt/bin/bluetoothctl")));
        assert_eq!(cli.scan_timeout, Some(10));
    }
}
