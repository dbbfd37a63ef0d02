//! Parsed interface details
//!
//! Typed, order-preserving views of the parsed `show interfaces` output produced
//! by the network automation layer. Construction from JSON validates the
//! mapping-of-mappings shape up front, so the report generator never has to.
//!
//! Only the MAC address attribute is interpreted. It is optional: loopback and
//! other virtual interfaces do not carry one.

use crate::types::{ReportError, Result, MAC_ADDRESS_FIELD};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::io::Read;

/// Attributes of a single interface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceAttributes {
    mac_address: Option<String>,
    /// Everything else the parser reported, in document order
    other: Map<String, Value>,
}

impl InterfaceAttributes {
    /// Create an attribute set with no MAC address
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the MAC address
    pub fn with_mac_address(mut self, mac_address: impl Into<String>) -> Self {
        self.mac_address = Some(mac_address.into());
        self
    }

    /// Builder method: add a non-MAC attribute (e.g. `ipv4`, `enabled`)
    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.other.insert(key.into(), value);
        self
    }

    /// MAC address, if the parser reported one
    pub fn mac_address(&self) -> Option<&str> {
        self.mac_address.as_deref()
    }

    /// Look up any other attribute reported by the parser
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.other.get(key)
    }

    fn from_value(path: &str, value: Value) -> Result<Self> {
        let mut other = expect_object(path, value)?;

        // Only an absent key means "no MAC"; present values are kept as reported
        let mac_address = other.shift_remove(MAC_ADDRESS_FIELD).map(|value| match value {
            Value::String(mac) => mac,
            Value::Null => String::new(),
            found => found.to_string(),
        });

        Ok(Self { mac_address, other })
    }
}

/// Interface name to attributes, for one device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceMap {
    interfaces: IndexMap<String, InterfaceAttributes>,
}

impl InterfaceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single device's `show interfaces` output
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }

    /// Insert an interface, replacing any previous entry with the same name
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        attributes: InterfaceAttributes,
    ) -> Option<InterfaceAttributes> {
        self.interfaces.insert(name.into(), attributes)
    }

    /// Builder form of [`InterfaceMap::insert`]
    pub fn with_interface(
        mut self,
        name: impl Into<String>,
        attributes: InterfaceAttributes,
    ) -> Self {
        self.insert(name, attributes);
        self
    }

    pub fn get(&self, name: &str) -> Option<&InterfaceAttributes> {
        self.interfaces.get(name)
    }

    /// Interfaces in the order the parser reported them
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InterfaceAttributes)> {
        self.interfaces.iter().map(|(name, attributes)| (name.as_str(), attributes))
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub(crate) fn from_value(path: &str, value: Value) -> Result<Self> {
        let mut map = Self::new();
        for (name, attributes) in expect_object(path, value)? {
            let attributes = InterfaceAttributes::from_value(&join(path, &name), attributes)?;
            map.insert(name, attributes);
        }
        Ok(map)
    }
}

impl TryFrom<Value> for InterfaceMap {
    type Error = ReportError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value("", value)
    }
}

impl FromIterator<(String, InterfaceAttributes)> for InterfaceMap {
    fn from_iter<I: IntoIterator<Item = (String, InterfaceAttributes)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, attributes) in iter {
            map.insert(name, attributes);
        }
        map
    }
}

/// Device identifier to its interfaces, for a whole testbed run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceInterfaceDetails {
    devices: IndexMap<String, InterfaceMap>,
}

impl DeviceInterfaceDetails {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document of the form `{device: {interface: {attribute: value}}}`
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::try_from(value)
    }

    /// Same as [`DeviceInterfaceDetails::from_json_str`], reading from any source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::try_from(value)
    }

    /// Store a device's interfaces, replacing any previous entry for it
    pub fn insert(
        &mut self,
        device: impl Into<String>,
        interfaces: InterfaceMap,
    ) -> Option<InterfaceMap> {
        self.devices.insert(device.into(), interfaces)
    }

    /// Builder form of [`DeviceInterfaceDetails::insert`]
    pub fn with_device(mut self, device: impl Into<String>, interfaces: InterfaceMap) -> Self {
        self.insert(device, interfaces);
        self
    }

    pub fn get(&self, device: &str) -> Option<&InterfaceMap> {
        self.devices.get(device)
    }

    /// Take one device's interfaces out, consuming the rest
    pub fn into_device(mut self, device: &str) -> Result<InterfaceMap> {
        self.devices
            .shift_remove(device)
            .ok_or_else(|| ReportError::DeviceNotFound(device.to_string()))
    }

    /// Devices in collection order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InterfaceMap)> {
        self.devices.iter().map(|(device, interfaces)| (device.as_str(), interfaces))
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Total number of interfaces across all devices
    pub fn interface_count(&self) -> usize {
        self.iter().map(|(_, interfaces)| interfaces.len()).sum()
    }
}

impl TryFrom<Value> for DeviceInterfaceDetails {
    type Error = ReportError;

    fn try_from(value: Value) -> Result<Self> {
        let mut details = Self::new();
        for (device, interfaces) in expect_object("", value)? {
            let interfaces = InterfaceMap::from_value(&device, interfaces)?;
            details.insert(device, interfaces);
        }
        Ok(details)
    }
}

fn expect_object(path: &str, value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ReportError::malformed(
            if path.is_empty() { "$" } else { path },
            format!("an object, found {}", kind(&other)),
        )),
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
