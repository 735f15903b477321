/*!
 * Inbound requests
 * Query-string decoding into an action name and typed parameters
 */

use bluetoothctl_core::Address;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::form_urlencoded;

use crate::error::RouteError;

pub const DEFAULT_ACTION: &str = "root";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Decode `key=value&...`, with or without the leading `?`. The first
    /// occurrence of a repeated key wins.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = BTreeMap::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
        Self(params)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &'static str) -> Result<&str, RouteError> {
        self.get(key)
            .filter(|value| !value.is_empty())
            .ok_or(RouteError::MissingParam(key))
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    action: String,
    params: Params,
}

impl Request {
    pub fn from_query(query: &str) -> Self {
        let Params(mut params) = Params::parse(query);
        let action = params
            .remove("action")
            .filter(|action| !action.is_empty())
            .unwrap_or_else(|| DEFAULT_ACTION.to_string());

        Self {
            action,
            params: Params(params),
        }
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

/// Whether a device menu is for a paired device. Travels as `paired=True|False`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    Paired,
    Unpaired,
}

impl Pairing {
    pub fn as_param(self) -> &'static str {
        match self {
            Pairing::Paired => "True",
            Pairing::Unpaired => "False",
        }
    }
}

impl FromStr for Pairing {
    type Err = RouteError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "True" => Ok(Pairing::Paired),
            "False" => Ok(Pairing::Unpaired),
            other => Err(RouteError::InvalidParam {
                name: "paired",
                value: other.to_string(),
            }),
        }
    }
}

/// The `device`/`address` pair every per-device action carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceTarget {
    pub name: String,
    pub address: Address,
}

impl DeviceTarget {
    pub fn from_params(params: &Params) -> Result<Self, RouteError> {
        let name = params.require("device")?.to_string();
        let raw = params.require("address")?;
        let address = Address::new(raw).map_err(|_| RouteError::InvalidParam {
            name: "address",
            value: raw.to_string(),
        })?;

        Ok(Self { name, address })
    }

    pub fn query(&self) -> [(&str, &str); 2] {
        [("device", self.name.as_str()), ("address", self.address.as_str())]
    }
}
