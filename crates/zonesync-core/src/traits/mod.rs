//! Collaborator traits for zonesync
//!
//! The reconciler never performs I/O itself. Everything outside the core
//! decision logic sits behind one of these interfaces:
//!
//! - [`AddressSource`]: Discover the caller's current public address
//! - [`DnsProvider`]: List zone records and update a record's content

pub mod address_source;
pub mod dns_provider;

pub use address_source::AddressSource;
pub use dns_provider::DnsProvider;
