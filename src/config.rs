//! # Client configuration.
//!
//! [`ClientConfig`] fixes the session's behavior at construction time:
//! the ordered candidate master set, the per-round registration timeout,
//! the retry budget, and the bounded stop timeout.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use driverlink::{Address, ClientConfig};
//!
//! let mut cfg = ClientConfig::new(vec![
//!     Address::new("master-a", 7077),
//!     Address::new("master-b", 7077),
//! ]);
//! cfg.registration_timeout = Duration::from_secs(20);
//! cfg.registration_retries = 3;
//!
//! assert_eq!(cfg.masters.len(), 2);
//! ```

use std::time::Duration;

use crate::rpc::Address;

/// Construction-time configuration for an [`AppClient`](crate::AppClient).
///
/// All fields are fixed for the session's lifetime.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Ordered candidate master addresses. Every round contacts all of them
    /// in parallel; the set never changes size.
    pub masters: Vec<Address>,
    /// How long a registration round may run before the retry timer fires.
    pub registration_timeout: Duration,
    /// Total number of registration rounds before the session is declared dead.
    pub registration_retries: u32,
    /// Upper bound on how long `stop()` blocks waiting for the endpoint to
    /// acknowledge; exceeding it is logged, not raised.
    pub stop_timeout: Duration,
    /// Capacity of the listener fan-out queue; overflow drops the callback
    /// with a warning.
    pub listener_queue: usize,
}

impl ClientConfig {
    /// Creates a configuration for the given candidate masters with defaults:
    /// - `registration_timeout = 20s`
    /// - `registration_retries = 3`
    /// - `stop_timeout = 10s`
    /// - `listener_queue = 1024`
    pub fn new(masters: Vec<Address>) -> Self {
        Self {
            masters,
            registration_timeout: Duration::from_secs(20),
            registration_retries: 3,
            stop_timeout: Duration::from_secs(10),
            listener_queue: 1024,
        }
    }
}
