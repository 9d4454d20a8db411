//! Mirror reachability probing and fastest-server selection.
//!
//! [`MirrorSelector`] probes TCP connect latency for candidate mirrors
//! under a protocol, memoizes the measurements per `(server, protocol)`,
//! and picks the lowest-latency reachable server. The probe itself is a
//! trait so tests can inject fixed timings.

mod error;
mod probe;

pub use error::ProbeError;
pub use probe::{LatencyProbe, PROBE_TIMEOUT, TcpProbe};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

use pdbmirror_source::{Protocol, Server};

type CacheKey = (Server, Protocol);
type CacheCell = Arc<OnceCell<Option<Duration>>>;

/// Picks the fastest reachable mirror.
///
/// Measurements are memoized for the lifetime of the selector; concurrent
/// lookups of the same `(server, protocol)` share a single in-flight probe.
/// Call [`MirrorSelector::invalidate`] when fresh measurements are needed.
pub struct MirrorSelector<P = TcpProbe> {
    probe: P,
    cache: Mutex<HashMap<CacheKey, CacheCell>>,
}

impl MirrorSelector<TcpProbe> {
    pub fn new() -> Self {
        Self::with_probe(TcpProbe)
    }
}

impl Default for MirrorSelector<TcpProbe> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: LatencyProbe> MirrorSelector<P> {
    pub fn with_probe(probe: P) -> Self {
        Self {
            probe,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Memoized connect time for one mirror. `None` means the mirror did
    /// not answer within [`PROBE_TIMEOUT`].
    pub async fn timing(&self, server: &Server, protocol: Protocol) -> Option<Duration> {
        let cell = {
            let mut cache = self.cache.lock().await;
            cache
                .entry((server.clone(), protocol))
                .or_default()
                .clone()
        };
        let host = server.host(protocol, None);
        let port = protocol.port();
        *cell
            .get_or_init(|| async move { self.probe.measure(&host, port).await })
            .await
    }

    /// Fastest reachable mirror among `candidates` under `protocol`.
    ///
    /// Cache misses are probed concurrently. Candidates are considered in
    /// their given order and only a strictly smaller timing replaces the
    /// current best, so ties go to the first-seen server. Zero timings are
    /// discarded as clock-resolution artifacts.
    pub async fn fastest(
        &self,
        protocol: Protocol,
        candidates: &[Server],
    ) -> Result<Server, ProbeError> {
        let timings = join_all(
            candidates
                .iter()
                .map(|server| self.timing(server, protocol)),
        )
        .await;

        let mut best: Option<(usize, Duration)> = None;
        for (position, timing) in timings.into_iter().enumerate() {
            let Some(timing) = timing else { continue };
            if timing.is_zero() {
                continue;
            }
            if best.is_none_or(|(_, current)| timing < current) {
                best = Some((position, timing));
            }
        }

        match best {
            Some((position, timing)) => {
                let server = candidates[position].clone();
                debug!(server = %server, ?timing, "selected fastest mirror");
                Ok(server)
            }
            None => Err(ProbeError::NoReachableServer { protocol }),
        }
    }

    /// Drop every memoized measurement.
    pub async fn invalidate(&self) {
        self.cache.lock().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProbe {
        timings: HashMap<String, Option<Duration>>,
        calls: AtomicUsize,
    }

    impl FakeProbe {
        fn new(timings: impl IntoIterator<Item = (&'static str, Option<u64>)>) -> Self {
            Self {
                timings: timings
                    .into_iter()
                    .map(|(host, secs)| (host.to_string(), secs.map(Duration::from_secs)))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LatencyProbe for FakeProbe {
        async fn measure(&self, host: &str, _port: u16) -> Option<Duration> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.timings.get(host).copied().flatten()
        }
    }

    fn server(code: &str, domain: &str) -> Server {
        Server {
            code: code.to_string(),
            domain: domain.to_string(),
            label: code.to_string(),
            archive_root: "/pub/pdb".to_string(),
            ftp_subdomain: "ftp".to_string(),
            https_subdomain: "files".to_string(),
        }
    }

    #[tokio::test]
    async fn zero_timings_never_win() {
        let probe = FakeProbe::new([
            ("files.a.org", Some(5)),
            ("files.b.org", Some(0)),
            ("files.c.org", Some(1)),
        ]);
        let selector = MirrorSelector::with_probe(probe);
        let candidates = [
            server("A", "a.org"),
            server("B", "b.org"),
            server("C", "c.org"),
        ];

        let fastest = selector
            .fastest(Protocol::Https, &candidates)
            .await
            .unwrap();
        assert_eq!(fastest.code, "C");
    }

    #[tokio::test]
    async fn unreachable_candidates_are_skipped() {
        let probe = FakeProbe::new([("files.a.org", None), ("files.b.org", Some(3))]);
        let selector = MirrorSelector::with_probe(probe);
        let candidates = [server("A", "a.org"), server("B", "b.org")];

        let fastest = selector
            .fastest(Protocol::Https, &candidates)
            .await
            .unwrap();
        assert_eq!(fastest.code, "B");
    }

    #[tokio::test]
    async fn all_unreachable_is_an_error() {
        let probe = FakeProbe::new([("files.a.org", None), ("files.b.org", None)]);
        let selector = MirrorSelector::with_probe(probe);
        let candidates = [server("A", "a.org"), server("B", "b.org")];

        assert!(matches!(
            selector.fastest(Protocol::Ftp, &candidates).await,
            Err(ProbeError::NoReachableServer {
                protocol: Protocol::Ftp
            })
        ));
    }

    #[tokio::test]
    async fn ties_go_to_the_first_candidate() {
        let probe = FakeProbe::new([("files.a.org", Some(2)), ("files.b.org", Some(2))]);
        let selector = MirrorSelector::with_probe(probe);
        let candidates = [server("A", "a.org"), server("B", "b.org")];

        let fastest = selector
            .fastest(Protocol::Https, &candidates)
            .await
            .unwrap();
        assert_eq!(fastest.code, "A");
    }

    #[tokio::test]
    async fn timings_are_memoized_until_invalidated() {
        let probe = FakeProbe::new([("files.a.org", Some(2))]);
        let selector = MirrorSelector::with_probe(probe);
        let a = server("A", "a.org");

        assert_eq!(
            selector.timing(&a, Protocol::Https).await,
            Some(Duration::from_secs(2))
        );
        assert_eq!(selector.timing(&a, Protocol::Https).await, Some(Duration::from_secs(2)));
        assert_eq!(selector.probe.calls(), 1);

        // A different protocol is a different cache entry.
        selector.timing(&a, Protocol::Ftp).await;
        assert_eq!(selector.probe.calls(), 2);

        selector.invalidate().await;
        selector.timing(&a, Protocol::Https).await;
        assert_eq!(selector.probe.calls(), 3);
    }

    #[tokio::test]
    async fn fastest_reuses_cached_timings() {
        let probe = FakeProbe::new([("files.a.org", Some(2)), ("files.b.org", Some(1))]);
        let selector = MirrorSelector::with_probe(probe);
        let candidates = [server("A", "a.org"), server("B", "b.org")];

        let first = selector
            .fastest(Protocol::Https, &candidates)
            .await
            .unwrap();
        let second = selector
            .fastest(Protocol::Https, &candidates)
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(selector.probe.calls(), 2);
    }
}
