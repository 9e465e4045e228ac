use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use cartography_core::LogEntry;
use cartography_world::Config;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const RECORD_DOMAIN: &str = "carto";
const RECORD_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded record payload.
pub(crate) const RECORD_HEADER: &str = "carto:v1";
/// Delimiter used to separate the prefix, grid size and payload.
const FIELD_DELIMITER: char = ':';

/// Everything required to rebuild a session: its parameters and move log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct SessionRecord {
    /// Parameters the session was created with.
    pub(crate) config: Config,
    /// Accepted placements in the order they were recorded.
    pub(crate) entries: Vec<LogEntry>,
}

impl SessionRecord {
    /// Encodes the record into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, LogTransferError> {
        let json = serde_json::to_vec(self).map_err(LogTransferError::Serialize)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{RECORD_HEADER}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{encoded}",
            self.config.layout.size()
        ))
    }

    /// Decodes a record from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, LogTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(LogTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(LogTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(LogTransferError::MissingVersion)?;
        let size = parts.next().ok_or(LogTransferError::MissingSize)?;
        let payload = parts.next().ok_or(LogTransferError::MissingPayload)?;

        if domain != RECORD_DOMAIN {
            return Err(LogTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != RECORD_VERSION {
            return Err(LogTransferError::UnsupportedVersion(version.to_owned()));
        }

        let size = parse_size(size)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(LogTransferError::InvalidEncoding)?;
        let record: Self =
            serde_json::from_slice(&bytes).map_err(LogTransferError::InvalidPayload)?;

        let expected = record.config.layout.size();
        if size != expected {
            return Err(LogTransferError::SizeMismatch {
                declared: size,
                expected,
            });
        }

        Ok(record)
    }
}

/// Errors that can occur while encoding or decoding log transfer strings.
#[derive(Debug, Error)]
pub(crate) enum LogTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("log string was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded record.
    #[error("log string is missing the prefix")]
    MissingPrefix,
    /// The encoded record did not contain a version segment.
    #[error("log string is missing the version")]
    MissingVersion,
    /// The encoded record did not include the grid size.
    #[error("log string is missing the grid size")]
    MissingSize,
    /// The encoded record did not include the payload segment.
    #[error("log string is missing the payload")]
    MissingPayload,
    /// The encoded record used an unexpected prefix segment.
    #[error("log prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded record used an unsupported version identifier.
    #[error("log version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid size could not be parsed from the encoded record.
    #[error("could not parse grid size '{0}'")]
    InvalidSize(String),
    /// The declared grid size disagrees with the recorded layout.
    #[error("log declares a {declared}x{declared} grid but its layout is {expected}x{expected}")]
    SizeMismatch {
        /// Size written in the header.
        declared: usize,
        /// Size of the recorded starting layout.
        expected: usize,
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode log payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse log payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The record could not be serialised.
    #[error("could not serialise log: {0}")]
    Serialize(#[source] serde_json::Error),
}

fn parse_size(size: &str) -> Result<usize, LogTransferError> {
    let parsed = size
        .trim()
        .parse::<usize>()
        .map_err(|_| LogTransferError::InvalidSize(size.to_owned()))?;

    if parsed == 0 {
        return Err(LogTransferError::InvalidSize(size.to_owned()));
    }

    Ok(parsed)
}
