//! Zone record model
//!
//! A [`Record`] is one entry of a zone snapshot as returned by a
//! [`DnsProvider`](crate::traits::DnsProvider). The record type is an explicit
//! enum so the primary address check never depends on string comparison at
//! the call site.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

/// DNS record type tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    /// IPv4 address record (the primary address type)
    A,
    /// IPv6 address record
    Aaaa,
    /// Canonical name alias
    Cname,
    /// Text record
    Txt,
    /// Mail exchanger
    Mx,
    /// Name server
    Ns,
    /// Service locator
    Srv,
    /// Certification authority authorization
    Caa,
    /// Any type not listed above, kept verbatim
    Other(String),
}

impl RecordType {
    /// Whether this is the primary address type
    ///
    /// Only primary records establish the reference old address during
    /// reconciliation.
    pub fn is_primary(&self) -> bool {
        matches!(self, RecordType::A)
    }

    /// The wire name of the type (e.g. `"A"`, `"TXT"`)
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Txt => "TXT",
            RecordType::Mx => "MX",
            RecordType::Ns => "NS",
            RecordType::Srv => "SRV",
            RecordType::Caa => "CAA",
            RecordType::Other(name) => name,
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            "TXT" => RecordType::Txt,
            "MX" => RecordType::Mx,
            "NS" => RecordType::Ns,
            "SRV" => RecordType::Srv,
            "CAA" => RecordType::Caa,
            _ => RecordType::Other(value),
        }
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        RecordType::from(value.to_string())
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single record from a zone snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Provider-assigned identifier, unique within the zone
    pub id: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// Host label (not unique)
    pub name: String,
    /// Record content; for `A` records an address, otherwise free-form text
    pub content: String,
}

impl Record {
    /// Create a new record
    pub fn new(
        id: impl Into<String>,
        record_type: impl Into<RecordType>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            record_type: record_type.into(),
            name: name.into(),
            content: content.into(),
        }
    }

    /// Whether the record content embeds `address` as a substring
    pub fn references(&self, address: &str) -> bool {
        self.content.contains(address)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}: id={}, content={}",
            self.record_type, self.name, self.id, self.content
        )
    }
}

/// The caller's current public address
///
/// Only constructible through [`ObservedAddress::parse`], so an empty or
/// malformed discovery response never reaches the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObservedAddress(String);

impl ObservedAddress {
    /// Parse a discovery response body into an observed address
    ///
    /// Surrounding whitespace is trimmed; the remainder must be a valid IPv4
    /// or IPv6 address.
    pub fn parse(raw: &str) -> crate::Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(crate::Error::invalid_input("Observed address is empty"));
        }

        trimmed
            .parse::<IpAddr>()
            .map_err(|_| crate::Error::invalid_input(format!("Invalid IP address: {}", trimmed)))?;

        Ok(Self(trimmed.to_string()))
    }

    /// The address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObservedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObservedAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
