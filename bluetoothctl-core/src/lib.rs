/*!
 * bluetoothctl wrapper
 * Runs the BlueZ command-line utility and turns its output into device records
 */

pub mod controller;
pub mod device;
pub mod error;

pub use controller::{
    BluetoothctlConfig, CommandRunner, DeviceController, OperationOutcome, SystemRunner,
};
pub use device::{parse_devices, Address, DeviceList, DeviceRecord};
pub use error::{AddressError, ToolError};
