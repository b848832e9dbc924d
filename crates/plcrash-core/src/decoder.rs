//! Seam for the external structured-message decoder.
//!
//! This crate does not decode crash payloads itself. A decoder for the
//! payload schema implements [`CrashRecordDecoder`], and [`decode_report`]
//! chains it behind header validation.

use tracing::debug;

use crate::error::{FormatError, FormatResult};
use crate::header::decode_header;
use crate::types::CrashRecord;

/// Turns container payload bytes into a [`CrashRecord`]
pub trait CrashRecordDecoder
{
    /// Decoder-specific failure, surfaced as [`FormatError::MalformedPayload`].
    type Error: std::error::Error + Send + Sync + 'static;

    /// Decode the payload that follows the container header.
    fn decode(&self, payload: &[u8]) -> Result<CrashRecord, Self::Error>;
}

impl<F, E> CrashRecordDecoder for F
where
    F: Fn(&[u8]) -> Result<CrashRecord, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Error = E;

    fn decode(&self, payload: &[u8]) -> Result<CrashRecord, Self::Error>
    {
        self(payload)
    }
}

/// Validate the container header, then decode the payload
///
/// The decoder is never invoked when the header is rejected.
///
/// ## Errors
///
/// - Any header error from [`decode_header`]
/// - [`FormatError::MalformedPayload`] wrapping the decoder's error unchanged
pub fn decode_report<D>(bytes: &[u8], decoder: &D) -> FormatResult<CrashRecord>
where
    D: CrashRecordDecoder + ?Sized,
{
    let header = decode_header(bytes)?;
    let record = decoder
        .decode(header.payload())
        .map_err(|err| FormatError::MalformedPayload(Box::new(err)))?;

    debug!(
        threads = record.threads.len(),
        images = record.images.len(),
        "decoded crash record"
    );
    Ok(record)
}
