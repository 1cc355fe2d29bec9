use serde_json::error::Error as SerdeJsonError;
use std::io::Error as IoError;
use std::path::Display;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IoEntry<'a> {
    #[error("Failed to create directory {0}: {1}")]
    CreateDirectoryError(Display<'a>, IoError),
    #[error("Failed to write file {0}: {1}")]
    WriteFileError(Display<'a>, IoError),
    #[error("Failed to serialize data: {0}")]
    SerdeSerializeError(SerdeJsonError),
}

impl From<IoEntry<'_>> for String {
    #[inline(always)]
    fn from(value: IoEntry) -> Self {
        value.to_string()
    }
}
