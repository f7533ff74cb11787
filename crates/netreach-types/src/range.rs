use crate::ParseError;
use ipnet::IpNet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Canonical IPv4/IPv6 network.
///
/// Normalization rules:
/// - host bits are always cleared (`10.1.2.3/8` becomes `10.0.0.0/8`)
/// - a bare address is a host route (`/32` or `/128`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AddressRange(IpNet);

impl AddressRange {
    pub fn new(net: IpNet) -> Self {
        Self(net.trunc())
    }

    pub fn host(addr: IpAddr) -> Self {
        Self(IpNet::from(addr))
    }

    /// `0.0.0.0/0`
    pub fn any_v4() -> Self {
        Self(IpNet::V4(ipnet::Ipv4Net::default()))
    }

    /// `::/0`
    pub fn any_v6() -> Self {
        Self(IpNet::V6(ipnet::Ipv6Net::default()))
    }

    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// True iff the two ranges share at least one address.
    ///
    /// Two prefixes overlap exactly when one contains the other. Ranges of different
    /// address families never overlap.
    pub fn overlaps(&self, other: &AddressRange) -> bool {
        self.0.contains(&other.0) || other.0.contains(&self.0)
    }
}

impl FromStr for AddressRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(net) = trimmed.parse::<IpNet>() {
            return Ok(AddressRange::new(net));
        }
        trimmed
            .parse::<IpAddr>()
            .map(AddressRange::host)
            .map_err(|_| ParseError::InvalidRange(s.to_string()))
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<IpNet> for AddressRange {
    fn from(value: IpNet) -> Self {
        AddressRange::new(value)
    }
}

impl TryFrom<String> for AddressRange {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AddressRange> for String {
    fn from(value: AddressRange) -> Self {
        value.to_string()
    }
}
