//! Byte acquisition collaborator.

use std::future::Future;
use std::path::Path;

use crate::error::TransportError;

/// Downloads one remote file to a local path.
///
/// The retrieval core never touches the network itself; it hands a URL and
/// a destination to a `Transport`. Implementations must report a missing
/// remote file as [`TransportError::NotFound`] so callers can tell "no such
/// entry" from transient failures.
///
/// # Implementations
///
/// - [`ReqwestTransport`]: production HTTP(S) implementation
/// - Mock implementations for testing
pub trait Transport: Send + Sync {
    fn fetch(
        &self,
        url: &str,
        dest: &Path,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use super::*;

    use futures_util::StreamExt;
    use tokio::fs::File;
    use tokio::io::AsyncWriteExt;
    use tracing::debug;

    /// Production transport backed by `reqwest`, streaming the response
    /// body straight to disk.
    ///
    /// Serves `http://` and `https://` URLs only; anything else fails with
    /// [`TransportError::Scheme`].
    #[derive(Debug, Default, Clone)]
    pub struct ReqwestTransport {
        client: reqwest::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Self {
            Self {
                client: reqwest::Client::new(),
            }
        }
    }

    impl Transport for ReqwestTransport {
        async fn fetch(&self, url: &str, dest: &Path) -> Result<(), TransportError> {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                return Err(TransportError::Scheme {
                    url: url.to_string(),
                });
            }

            debug!(url, "downloading");
            let response =
                self.client
                    .get(url)
                    .send()
                    .await
                    .map_err(|err| TransportError::Transfer {
                        url: url.to_string(),
                        detail: err.to_string(),
                    })?;

            if response.status() == reqwest::StatusCode::NOT_FOUND {
                return Err(TransportError::NotFound {
                    url: url.to_string(),
                });
            }
            let response =
                response
                    .error_for_status()
                    .map_err(|err| TransportError::Transfer {
                        url: url.to_string(),
                        detail: err.to_string(),
                    })?;

            let mut stream = response.bytes_stream();
            let mut file = File::create(dest).await?;
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(|err| TransportError::Transfer {
                    url: url.to_string(),
                    detail: err.to_string(),
                })?;
                file.write_all(&chunk).await?;
            }
            file.flush().await?;
            Ok(())
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestTransport;
