//! # plcrash-core
//!
//! Container validation and crash report formatting for plcrash crash dumps.
//!
//! This crate provides:
//! - Header validation and stripping for the plcrash container format
//! - CPU type resolution from per-image and per-system hints
//! - Attribution of crash addresses to loaded binary images
//! - Rendering of a decoded crash record as a platform-style text report
//!
//! Decoding the payload itself is left to an external decoder plugged in
//! through [`CrashRecordDecoder`]. Symbolication is not performed.
//!
//! ## Example
//!
//! ```rust
//! use plcrash_core::header::ContainerHeader;
//! use plcrash_core::types::CrashRecord;
//! use plcrash_core::{decode_report, render};
//!
//! let mut bytes = ContainerHeader::encode_prefix().to_vec();
//! bytes.extend_from_slice(b"...");
//!
//! let decoder = |_payload: &[u8]| Ok::<_, std::io::Error>(CrashRecord::default());
//! let record = decode_report(&bytes, &decoder)?;
//! let text = render(&record);
//! assert!(text.starts_with("Incident Identifier:"));
//! # Ok::<(), plcrash_core::FormatError>(())
//! ```

pub mod arch;
pub mod decoder;
pub mod error;
pub mod header;
pub mod images;
pub mod report;
pub mod types;

pub use arch::{CodeType, CpuType};
pub use decoder::{decode_report, CrashRecordDecoder};
// Re-export commonly used types
pub use error::{FormatError, FormatResult};
pub use header::{decode_header, ContainerHeader};
pub use images::BinaryImageIndex;
pub use report::{render, ReportFormatter, ReportOptions, ReportTimeZone};
pub use types::CrashRecord;
