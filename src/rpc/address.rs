//! # Logical network addresses.
//!
//! [`Address`] identifies one process (one [`RpcEnv`](crate::RpcEnv)) in the
//! cluster. The transport behind it is opaque; the client only ever compares
//! addresses and hands them to a [`ResolveMaster`](crate::ResolveMaster)
//! implementation.

use std::fmt;
use std::str::FromStr;

use crate::error::RpcError;

/// A `host:port` pair naming one process.
///
/// Candidate master sets are immutable lists of these; equality is used to
/// match transport disconnect notifications against the active master.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    /// Host name or IP literal.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Address {
    /// Creates an address from host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for Address {
    type Err = RpcError;

    /// Parses `host:port`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RpcError::InvalidAddress {
            input: s.to_string(),
        };
        let (host, port) = s.rsplit_once(':').ok_or_else(invalid)?;
        if host.is_empty() {
            return Err(invalid());
        }
        let port = port.parse::<u16>().map_err(|_| invalid())?;
        Ok(Address::new(host, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_port() {
        let addr: Address = "master-a:7077".parse().unwrap();
        assert_eq!(addr, Address::new("master-a", 7077));
        assert_eq!(addr.to_string(), "master-a:7077");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("no-port".parse::<Address>().is_err());
        assert!(":7077".parse::<Address>().is_err());
        assert!("host:notaport".parse::<Address>().is_err());
        assert!("host:99999".parse::<Address>().is_err());
    }
}
