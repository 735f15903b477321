/*!
 * Action handlers
 * Device listings, per-device menus and the single-shot device operations
 */

use anyhow::Result;
use bluetoothctl_core::{Address, DeviceController, DeviceList, OperationOutcome};
use tracing::{debug, error, info};

use crate::error::RouteError;
use crate::plugin::{Plugin, Router};
use crate::render::NotificationIcon;
use crate::request::{DeviceTarget, Pairing, Params};

/// Controller method driven by a single-shot action.
pub type DeviceOperation = fn(&DeviceController, &Address) -> OperationOutcome;

const PAIRED_MENU: &[&str] = &["connect", "disconnect", "remove", "trust", "untrust", "info"];
const UNPAIRED_MENU: &[&str] = &["pair", "connect", "info"];

pub fn register_actions(router: &mut Router) -> Result<(), RouteError> {
    router.register("root", root)?;
    router.register("paired_devices", paired_devices)?;
    router.register("available_devices", available_devices)?;
    router.register("device", device)?;
    router.register(
        "connect",
        device_action("connect", "connecting", DeviceController::connect),
    )?;
    router.register(
        "disconnect",
        device_action("disconnect", "disconnecting", DeviceController::disconnect),
    )?;
    router.register("pair", device_action("pair", "pairing", DeviceController::pair))?;
    router.register(
        "remove",
        device_action("remove", "removing", DeviceController::remove),
    )?;
    router.register("trust", device_action("trust", "trusting", DeviceController::trust))?;
    router.register(
        "untrust",
        device_action("revoke trust", "revoking trust", DeviceController::untrust),
    )?;
    router.register("info", info)?;
    Ok(())
}

fn root(plugin: &mut Plugin, _params: &Params) -> Result<()> {
    for action in ["paired_devices", "available_devices"] {
        let label = plugin.labels().for_action(action).to_string();
        let url = plugin.build_url(action, &[]);
        plugin.add_directory_item(label, url, true);
    }

    plugin.end_of_directory();
    Ok(())
}

fn paired_devices(plugin: &mut Plugin, _params: &Params) -> Result<()> {
    let devices = plugin.controller().list_paired();
    list_devices(plugin, &devices, Pairing::Paired);
    Ok(())
}

fn available_devices(plugin: &mut Plugin, _params: &Params) -> Result<()> {
    let scan = plugin.while_busy(DeviceController::scan);
    if scan.succeeded {
        debug!("scanning succeeded.\nstdout: {}", scan.stdout);
    } else {
        error!(
            exit_code = scan.exit_code,
            stdout = %scan.stdout,
            stderr = %scan.stderr,
            "scanning failed"
        );
    }

    let available = plugin.controller().list_available();
    let paired = plugin.controller().list_paired();
    list_devices(plugin, &available.without(&paired), Pairing::Unpaired);
    Ok(())
}

fn list_devices(plugin: &mut Plugin, devices: &DeviceList, pairing: Pairing) {
    for record in devices {
        debug!("listing device {}", record.friendly_name);
        let url = plugin.build_url(
            "device",
            &[
                ("device", record.friendly_name.as_str()),
                ("address", record.address.as_str()),
                ("paired", pairing.as_param()),
            ],
        );
        plugin.add_directory_item(record.friendly_name.clone(), url, true);
    }

    plugin.end_of_directory();
}

fn device(plugin: &mut Plugin, params: &Params) -> Result<()> {
    let target = DeviceTarget::from_params(params)?;
    let pairing: Pairing = params.require("paired")?.parse()?;

    let menu = match pairing {
        Pairing::Paired => PAIRED_MENU,
        Pairing::Unpaired => UNPAIRED_MENU,
    };

    for &action in menu {
        let label = plugin.labels().for_action(action).to_string();
        let url = plugin.build_url(action, &target.query());
        plugin.add_directory_item(label, url, false);
    }

    plugin.end_of_directory();
    Ok(())
}

/// Build the handler for a single-shot device operation.
///
/// The handler logs the attempt, runs `operation` with the busy indicator up,
/// then raises exactly one notification: `"<present> successful"` with the
/// info icon, or `"<present> failed"` with the error icon.
pub fn device_action(
    infinitive: &'static str,
    present: &'static str,
    operation: DeviceOperation,
) -> impl Fn(&mut Plugin, &Params) -> Result<()> {
    move |plugin: &mut Plugin, params: &Params| -> Result<()> {
        let target = DeviceTarget::from_params(params)?;

        info!("attempting to {}: {} {}", infinitive, target.name, target.address);
        let outcome = plugin.while_busy(|controller| operation(controller, &target.address));

        if outcome.exit_code == 0 {
            debug!("{} successful", present);
            plugin.notify(format!("{present} successful"), NotificationIcon::Info);
        } else {
            error!(
                exit_code = outcome.exit_code,
                stdout = %outcome.stdout,
                stderr = %outcome.stderr,
                "{} failed",
                present
            );
            plugin.notify(format!("{present} failed"), NotificationIcon::Error);
        }

        Ok(())
    }
}

fn info(plugin: &mut Plugin, params: &Params) -> Result<()> {
    let target = DeviceTarget::from_params(params)?;

    let outcome = plugin.while_busy(|controller| controller.info(&target.address));
    if !outcome.succeeded {
        error!(
            exit_code = outcome.exit_code,
            stderr = %outcome.stderr,
            "failed to get information for {} {}",
            target.name,
            target.address
        );
        plugin.notify("failed to get information", NotificationIcon::Error);
        return Ok(());
    }

    debug!("fetched information for {} {}", target.name, target.address);
    plugin.show_text(target.name, outcome.stdout);
    Ok(())
}
