//! Container header validation.
//!
//! A plcrash container is a fixed 8-byte prefix followed by the encoded
//! crash payload:
//!
//! | Offset | Size      | Field   | Constraint      |
//! |--------|-----------|---------|-----------------|
//! | 0      | 7         | magic   | ASCII `plcrash` |
//! | 7      | 1         | version | must equal `1`  |
//! | 8      | remainder | payload | opaque          |
//!
//! Stripping the header is a pure prefix removal: the payload is borrowed from
//! the input buffer without any transformation.

use tracing::trace;

use crate::error::{FormatError, FormatResult};

/// Magic bytes at the start of every container.
pub const MAGIC: &[u8; 7] = b"plcrash";

/// The only container version this crate understands.
pub const SUPPORTED_VERSION: u8 = 1;

/// Size of the fixed header (magic + version).
pub const HEADER_LEN: usize = MAGIC.len() + 1;

/// Validated container header borrowing its payload from the input buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader<'a>
{
    magic: [u8; 7],
    version: u8,
    payload: &'a [u8],
}

impl<'a> ContainerHeader<'a>
{
    /// The magic bytes (always `plcrash` for a validated header).
    pub fn magic(&self) -> &[u8; 7]
    {
        &self.magic
    }

    /// The container version byte.
    pub fn version(&self) -> u8
    {
        self.version
    }

    /// Everything after the 8-byte header, untouched.
    pub fn payload(&self) -> &'a [u8]
    {
        self.payload
    }

    /// The canonical 8-byte prefix for a supported container.
    ///
    /// ```rust
    /// use plcrash_core::header::{decode_header, ContainerHeader};
    ///
    /// let mut bytes = ContainerHeader::encode_prefix().to_vec();
    /// bytes.extend_from_slice(b"payload");
    /// assert_eq!(decode_header(&bytes)?.payload(), b"payload");
    /// # Ok::<(), plcrash_core::error::FormatError>(())
    /// ```
    pub fn encode_prefix() -> [u8; HEADER_LEN]
    {
        let mut prefix = [0u8; HEADER_LEN];
        prefix[..MAGIC.len()].copy_from_slice(MAGIC);
        prefix[MAGIC.len()] = SUPPORTED_VERSION;
        prefix
    }
}

/// Validate and strip the container header
///
/// ## Errors
///
/// - [`FormatError::TruncatedHeader`] if fewer than 8 bytes are supplied
/// - [`FormatError::BadMagic`] if the first 7 bytes are not `plcrash`
/// - [`FormatError::UnsupportedVersion`] if the magic is correct but the
///   version byte is not `1`
///
/// Both checks are evaluated; a bad magic wins over a bad version.
pub fn decode_header(bytes: &[u8]) -> FormatResult<ContainerHeader<'_>>
{
    if bytes.len() < HEADER_LEN {
        return Err(FormatError::TruncatedHeader { len: bytes.len() });
    }

    let (prefix, payload) = bytes.split_at(HEADER_LEN);
    let mut magic = [0u8; 7];
    magic.copy_from_slice(&prefix[..MAGIC.len()]);
    let version = prefix[MAGIC.len()];

    let magic_ok = &magic == MAGIC;
    let version_ok = version == SUPPORTED_VERSION;

    match (magic_ok, version_ok) {
        (false, _) => Err(FormatError::BadMagic { found: magic }),
        (true, false) => Err(FormatError::UnsupportedVersion(version)),
        (true, true) => {
            trace!(payload_len = payload.len(), "stripped container header");
            Ok(ContainerHeader {
                magic,
                version,
                payload,
            })
        }
    }
}

/// Convert an input length into a buffer size this platform can hold
///
/// Callers use this before reading a container into memory, e.g. with the
/// length from file metadata.
///
/// ## Errors
///
/// Returns [`FormatError::OversizedInput`] if `len` does not fit in `usize`
/// or exceeds `isize::MAX` (the largest possible allocation).
pub fn ensure_addressable(len: u64) -> FormatResult<usize>
{
    usize::try_from(len)
        .ok()
        .filter(|&size| isize::try_from(size).is_ok())
        .ok_or(FormatError::OversizedInput { len })
}
