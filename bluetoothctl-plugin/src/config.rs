use anyhow::{Context, Result};
use bluetoothctl_core::BluetoothctlConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PluginConfig {
    pub addon: AddonConfig,
    pub bluetoothctl: BluetoothctlConfig,
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AddonConfig {
    /// Heading of every notification.
    pub name: String,
    /// Art attached to every list item.
    pub icon: Option<String>,
}

/// Display strings for menu entries, overridable for localisation.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Labels {
    pub paired_devices: String,
    pub available_devices: String,
    pub connect: String,
    pub disconnect: String,
    pub pair: String,
    pub unpair: String,
    pub trust: String,
    pub untrust: String,
    pub info: String,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            name: "Bluetooth".to_string(),
            icon: None,
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            paired_devices: "Paired Devices".to_string(),
            available_devices: "Available Devices".to_string(),
            connect: "Connect".to_string(),
            disconnect: "Disconnect".to_string(),
            pair: "Pair".to_string(),
            unpair: "Unpair".to_string(),
            trust: "Trust".to_string(),
            untrust: "Revoke trust".to_string(),
            info: "Info".to_string(),
        }
    }
}

impl Labels {
    /// Label of the menu entry leading to `action`; unknown actions label themselves.
    pub fn for_action<'a>(&'a self, action: &'a str) -> &'a str {
        match action {
            "paired_devices" => &self.paired_devices,
            "available_devices" => &self.available_devices,
            "connect" => &self.connect,
            "disconnect" => &self.disconnect,
            "pair" => &self.pair,
            "remove" => &self.unpair,
            "trust" => &self.trust,
            "untrust" => &self.untrust,
            "info" => &self.info,
            other => other,
        }
    }
}

impl PluginConfig {
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .with_context(|| format!("invalid config file {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => {
                Err(e).with_context(|| format!("failed to read config file {}", path.display()))
            }
        }
    }
}
