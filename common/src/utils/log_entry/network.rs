use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkEntry {
    #[error("Failed to bind http service port: {0}")]
    BindPortError(IoError),
    #[error("Detection service unreachable: {0}")]
    UpstreamUnreachable(String),
    #[error("Detection service returned status {0}")]
    UpstreamFailure(u16),
    #[error("Detection service returned an invalid response: {0}")]
    UpstreamMalformed(String),
}

impl From<NetworkEntry> for String {
    #[inline(always)]
    fn from(value: NetworkEntry) -> Self {
        value.to_string()
    }
}
