use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// IP protocol selector.
///
/// Numeric protocols with a well-known name are folded onto that name, so `"6"` and
/// `"tcp"` compare equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Protocol {
    All,
    Tcp,
    Udp,
    Icmp,
    Esp,
    Ah,
    Sctp,
    Ipip,
    Number(u8),
}

impl Protocol {
    /// `all` on either side matches every protocol.
    pub fn matches(self, other: Protocol) -> bool {
        self == Protocol::All || other == Protocol::All || self == other
    }

    /// Only these protocols carry ports; port lists on anything else are ignored.
    pub fn has_ports(self) -> bool {
        matches!(self, Protocol::Tcp | Protocol::Udp | Protocol::Sctp)
    }

    fn from_number(n: u8) -> Self {
        match n {
            1 => Protocol::Icmp,
            4 => Protocol::Ipip,
            6 => Protocol::Tcp,
            17 => Protocol::Udp,
            50 => Protocol::Esp,
            51 => Protocol::Ah,
            132 => Protocol::Sctp,
            other => Protocol::Number(other),
        }
    }
}

impl FromStr for Protocol {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "all" => Ok(Protocol::All),
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            "icmp" => Ok(Protocol::Icmp),
            "esp" => Ok(Protocol::Esp),
            "ah" => Ok(Protocol::Ah),
            "sctp" => Ok(Protocol::Sctp),
            "ipip" => Ok(Protocol::Ipip),
            other => other
                .parse::<u8>()
                .map(Protocol::from_number)
                .map_err(|_| ParseError::UnknownProtocol(s.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::All => f.write_str("all"),
            Protocol::Tcp => f.write_str("tcp"),
            Protocol::Udp => f.write_str("udp"),
            Protocol::Icmp => f.write_str("icmp"),
            Protocol::Esp => f.write_str("esp"),
            Protocol::Ah => f.write_str("ah"),
            Protocol::Sctp => f.write_str("sctp"),
            Protocol::Ipip => f.write_str("ipip"),
            Protocol::Number(n) => write!(f, "{n}"),
        }
    }
}

impl TryFrom<String> for Protocol {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Protocol> for String {
    fn from(value: Protocol) -> Self {
        value.to_string()
    }
}

/// Inclusive port range. A single port is a range of one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    pub fn single(port: u16) -> Self {
        Self {
            start: port,
            end: port,
        }
    }

    pub fn new(start: u16, end: u16) -> Result<Self, ParseError> {
        if start > end {
            return Err(ParseError::InvalidPort(format!("{start}-{end}")));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, port: u16) -> bool {
        self.start <= port && port <= self.end
    }
}

impl FromStr for PortRange {
    type Err = ParseError;

    /// Accepts `"22"` or `"1000-2000"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::InvalidPort(s.to_string());
        let parse_port = |p: &str| p.trim().parse::<u16>().map_err(|_| invalid());

        match s.split_once('-') {
            Some((lo, hi)) => {
                let (start, end) = (parse_port(lo)?, parse_port(hi)?);
                PortRange::new(start, end).map_err(|_| invalid())
            }
            None => Ok(PortRange::single(parse_port(s)?)),
        }
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl TryFrom<String> for PortRange {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PortRange> for String {
    fn from(value: PortRange) -> Self {
        value.to_string()
    }
}
