//! # Error Types
//!
//! Error handling for container decoding.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Rendering a report never fails, so every variant here belongs to the path
//! that turns raw bytes into a [`CrashRecord`](crate::types::CrashRecord).

use thiserror::Error;

use crate::header::{HEADER_LEN, MAGIC, SUPPORTED_VERSION};

/// Main error type for container decoding
///
/// Every variant is terminal for the input that produced it: there is no
/// retry and no partial parse.
///
/// ## Error Categories
///
/// 1. **Header errors**: TruncatedHeader, BadMagic, UnsupportedVersion
/// 2. **Input errors**: OversizedInput (raised by callers before decoding)
/// 3. **Payload errors**: MalformedPayload (raised by the external decoder)
/// 4. **I/O errors**: Io (for reading containers from disk)
#[derive(Error, Debug)]
pub enum FormatError
{
    /// Fewer than the 8 header bytes were supplied
    #[error("Truncated header: expected at least {min} bytes, got {len}", min = HEADER_LEN)]
    TruncatedHeader
    {
        /// Number of bytes actually available
        len: usize,
    },

    /// The first 7 bytes are not the ASCII literal `plcrash`
    ///
    /// Checked before the version byte, so a buffer with both a wrong magic
    /// and a wrong version reports this variant.
    #[error("Bad magic: expected {:?}, found {:?}", String::from_utf8_lossy(MAGIC), String::from_utf8_lossy(.found))]
    BadMagic
    {
        /// The 7 bytes found at the start of the buffer
        found: [u8; 7],
    },

    /// The version byte is not one this crate can read
    #[error("Unsupported container version {0} (expected {expected})", expected = SUPPORTED_VERSION)]
    UnsupportedVersion(u8),

    /// The input is larger than the platform can address
    ///
    /// Callers raise this before handing bytes to [`decode_header`](crate::header::decode_header),
    /// typically after looking at file metadata.
    #[error("Input of {len} bytes exceeds the addressable size of this platform")]
    OversizedInput
    {
        /// Length of the rejected input
        len: u64,
    },

    /// The external decoder rejected the payload
    ///
    /// The decoder's own error is kept unchanged as the `source()`.
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    /// I/O error (for file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for `Result<T, FormatError>`
///
/// ```rust
/// use plcrash_core::error::FormatResult;
/// fn foo() -> FormatResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type FormatResult<T> = std::result::Result<T, FormatError>;
