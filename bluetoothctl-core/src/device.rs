/*!
 * Device records
 * Parsing of `bluetoothctl devices` / `paired-devices` output
 */

use std::fmt;

use crate::error::AddressError;

/// Hardware address of a device, as printed by bluetoothctl.
///
/// Never empty: every control operation takes one of these as its operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(String);

impl Address {
    pub fn new(address: impl AsRef<str>) -> Result<Self, AddressError> {
        let address = address.as_ref().trim();
        if address.is_empty() {
            return Err(AddressError::Empty);
        }
        Ok(Self(address.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRecord {
    pub friendly_name: String,
    pub address: Address,
}

/// Devices keyed by friendly name, in the order the tool first reported them.
///
/// Inserting a name that is already present replaces its address in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceList {
    records: Vec<DeviceRecord>,
}

impl DeviceList {
    pub fn insert(&mut self, record: DeviceRecord) {
        match self
            .records
            .iter_mut()
            .find(|existing| existing.friendly_name == record.friendly_name)
        {
            Some(existing) => existing.address = record.address,
            None => self.records.push(record),
        }
    }

    pub fn get(&self, friendly_name: &str) -> Option<&Address> {
        self.records
            .iter()
            .find(|record| record.friendly_name == friendly_name)
            .map(|record| &record.address)
    }

    pub fn contains_name(&self, friendly_name: &str) -> bool {
        self.get(friendly_name).is_some()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeviceRecord> {
        self.records.iter()
    }

    /// Devices in `self` whose friendly name does not appear in `other`.
    pub fn without(&self, other: &DeviceList) -> DeviceList {
        self.records
            .iter()
            .filter(|record| !other.contains_name(&record.friendly_name))
            .cloned()
            .collect()
    }
}

impl FromIterator<DeviceRecord> for DeviceList {
    fn from_iter<I: IntoIterator<Item = DeviceRecord>>(iter: I) -> Self {
        let mut list = DeviceList::default();
        for record in iter {
            list.insert(record);
        }
        list
    }
}

impl<'a> IntoIterator for &'a DeviceList {
    type Item = &'a DeviceRecord;
    type IntoIter = std::slice::Iter<'a, DeviceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Parse listing output of the form `Device <address> <friendly name>`.
///
/// Lines that are not device lines, or that lack an address or a name, are
/// skipped. Never fails; garbage in gives an empty list.
pub fn parse_devices(stdout: &str) -> DeviceList {
    let mut devices = DeviceList::default();

    for line in stdout.lines() {
        match parse_device_line(line) {
            Some(record) => devices.insert(record),
            None if line.trim().is_empty() => {}
            None => tracing::debug!("skipping unrecognised line: {:?}", line),
        }
    }

    devices
}

fn parse_device_line(line: &str) -> Option<DeviceRecord> {
    let (keyword, rest) = line.trim().split_once(char::is_whitespace)?;
    if keyword != "Device" {
        return None;
    }

    let (address, name) = rest.trim_start().split_once(char::is_whitespace)?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    Some(DeviceRecord {
        friendly_name: name.to_string(),
        address: Address::new(address).ok()?,
    })
}
