use std::future::Future;
use std::time::{Duration, Instant};

use tokio::net::TcpStream;
use tokio::time;
use tracing::debug;

/// Connect timeout applied to every individual probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Measures how long a mirror takes to accept a TCP connection.
///
/// Implementations return `None` for unreachable hosts and must bound
/// themselves with their own timeout, so concurrent probes never hold each
/// other up.
pub trait LatencyProbe: Send + Sync {
    fn measure(&self, host: &str, port: u16) -> impl Future<Output = Option<Duration>> + Send;
}

/// Probe that opens a real TCP connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpProbe;

impl LatencyProbe for TcpProbe {
    async fn measure(&self, host: &str, port: u16) -> Option<Duration> {
        let started = Instant::now();
        match time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, port))).await {
            Ok(Ok(_stream)) => Some(started.elapsed()),
            Ok(Err(err)) => {
                debug!(host, port, %err, "mirror probe failed");
                None
            }
            Err(_) => {
                debug!(host, port, "mirror probe timed out");
                None
            }
        }
    }
}
