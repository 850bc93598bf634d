//! Port binding with bounded retry.
//!
//! Each channel prefers a well-known port; when it is taken the channel
//! waits a short fixed delay and tries the next integer port, up to a
//! bounded attempt ceiling. Past the ceiling startup fails instead of
//! looping forever.

use std::time::Duration;

use tokio::net::TcpListener;
use tracing::{info, warn};

use super::error::{BridgeError, BridgeResult};

/// Bounded fixed-delay retry policy for port binding.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            delay: Duration::from_millis(250),
        }
    }
}

/// Bind `host:preferred`, sliding to the next port on conflict.
///
/// Returns the listener and the port actually bound, which callers surface
/// through the channel's health endpoint for self-discovery.
pub async fn bind_with_retry(
    host: &str,
    preferred: u16,
    channel: &'static str,
    policy: &RetryPolicy,
) -> BridgeResult<(TcpListener, u16)> {
    let mut port = preferred;
    for attempt in 1..=policy.max_attempts {
        let address = format!("{host}:{port}");
        match TcpListener::bind(&address).await {
            Ok(listener) => {
                let bound = listener.local_addr()?.port();
                if bound != preferred {
                    info!(channel, preferred, bound, "preferred port taken; bound fallback");
                }
                return Ok((listener, bound));
            }
            Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
                warn!(channel, %address, attempt, "port in use, retrying on next port");
                tokio::time::sleep(policy.delay).await;
                port = match port.checked_add(1) {
                    Some(next) => next,
                    None => break,
                };
            }
            Err(e) => return Err(BridgeError::bind(address, e)),
        }
    }
    Err(BridgeError::BindExhausted {
        channel,
        preferred,
        attempts: policy.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn test_binds_preferred_port_when_free() {
        // Port 0 asks the OS for any free port; the bound port is reported.
        let (_listener, port) = bind_with_retry("127.0.0.1", 0, "data", &fast_policy())
            .await
            .unwrap();
        assert_ne!(port, 0);
    }

    #[tokio::test]
    async fn test_slides_to_next_port_on_conflict() {
        let (held, taken) = bind_with_retry("127.0.0.1", 39841, "data", &fast_policy())
            .await
            .unwrap();
        let (_listener, port) = bind_with_retry("127.0.0.1", taken, "data", &fast_policy())
            .await
            .unwrap();
        assert_eq!(port, taken + 1);
        drop(held);
    }

    #[tokio::test]
    async fn test_exhausts_after_ceiling() {
        let base = 39861;
        let mut held = Vec::new();
        for offset in 0..3 {
            held.push(
                bind_with_retry("127.0.0.1", base + offset, "data", &fast_policy())
                    .await
                    .unwrap(),
            );
        }
        let err = bind_with_retry("127.0.0.1", base, "data", &fast_policy())
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::BindExhausted { attempts: 3, .. }));
    }
}
