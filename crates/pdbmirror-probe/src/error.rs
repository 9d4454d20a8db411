use pdbmirror_source::Protocol;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// None of the candidate mirrors answered within the probe timeout.
    #[error("unable to connect to any mirror (protocol: {protocol})")]
    NoReachableServer { protocol: Protocol },
}
