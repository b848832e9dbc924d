//! # Crash report formatting
//!
//! Renders a [`CrashRecord`] as a platform-style text crash log. Sections are
//! written in a fixed order, separated by blank lines:
//!
//! 1. Header: incident placeholders, hardware model, process block
//! 2. System: date/time, OS version, report version
//! 3. Exception summary
//! 4. Application specific information (only with an uncaught exception)
//! 5. One backtrace per thread
//! 6. Register dump of the first crashed thread
//! 7. Binary images (opt-in, see [`ReportOptions::include_binary_images`])
//!
//! Rendering never fails. Every field that cannot be sourced from the record
//! falls back to [`PLACEHOLDER`] or causes its line to be omitted.
//!
//! ## Example
//!
//! ```rust
//! use plcrash_core::report::{render, ReportFormatter, ReportOptions, ReportTimeZone};
//! use plcrash_core::types::CrashRecord;
//!
//! let record = CrashRecord::default();
//! let text = ReportFormatter::new(ReportOptions::default().with_time_zone(ReportTimeZone::Utc)).render(&record);
//! assert!(text.contains("OS Version:      Not Reported"));
//! assert_eq!(render(&record).lines().count(), text.lines().count());
//! ```

mod sections;

use std::fmt;

use tracing::debug;

use crate::arch::CodeType;
use crate::images::BinaryImageIndex;
use crate::types::CrashRecord;

/// Value printed for any field missing from the record.
pub const PLACEHOLDER: &str = "???";

/// Fixed crash log format version.
pub const REPORT_VERSION: &str = "104";

/// Time zone used for the `Date/Time` line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportTimeZone
{
    /// The time zone of the machine rendering the report
    #[default]
    Local,
    /// UTC, for reproducible output
    Utc,
}

/// Rendering options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportOptions
{
    /// Time zone for the `Date/Time` line (default: local)
    pub time_zone: ReportTimeZone,
    /// Append a `Binary Images:` section listing every loaded image (default: off)
    pub include_binary_images: bool,
}

impl ReportOptions
{
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: ReportTimeZone) -> Self
    {
        self.time_zone = time_zone;
        self
    }

    #[must_use]
    pub fn with_binary_images(mut self, include: bool) -> Self
    {
        self.include_binary_images = include;
        self
    }
}

/// Turns crash records into text reports
///
/// Holds only immutable options, so one formatter can be shared across
/// threads and used for any number of records.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportFormatter
{
    options: ReportOptions,
}

impl ReportFormatter
{
    pub fn new(options: ReportOptions) -> Self
    {
        Self { options }
    }

    /// Lazily formatted report; write it anywhere with `Display`.
    pub fn report<'a>(&'a self, record: &'a CrashRecord) -> Report<'a>
    {
        Report {
            record,
            options: &self.options,
            code_type: CodeType::resolve(&record.images, record.architecture_hint()),
            images: BinaryImageIndex::new(&record.images),
        }
    }

    /// Render the full report to a string.
    pub fn render(&self, record: &CrashRecord) -> String
    {
        let report = self.report(record);
        let text = report.to_string();
        debug!(
            threads = record.threads.len(),
            images = record.images.len(),
            code_type = %report.code_type,
            bytes = text.len(),
            "rendered crash report"
        );
        text
    }
}

/// Render `record` with default options (local time, no binary image list).
pub fn render(record: &CrashRecord) -> String
{
    ReportFormatter::default().render(record)
}

/// A crash record bound to the state needed to format it
pub struct Report<'a>
{
    record: &'a CrashRecord,
    options: &'a ReportOptions,
    code_type: CodeType,
    images: BinaryImageIndex<'a>,
}

impl fmt::Display for Report<'_>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        sections::write_header(f, self)?;
        writeln!(f)?;
        sections::write_system(f, self)?;
        writeln!(f)?;
        sections::write_exception_summary(f, self)?;
        writeln!(f)?;

        if sections::write_application_info(f, self)? {
            writeln!(f)?;
        }

        for thread in &self.record.threads {
            sections::write_thread(f, self, thread)?;
            writeln!(f)?;
        }

        if let Some(thread) = self.record.crashed_thread() {
            sections::write_registers(f, self, thread)?;
            writeln!(f)?;
        }

        if self.options.include_binary_images {
            sections::write_binary_images(f, self)?;
            writeln!(f)?;
        }

        Ok(())
    }
}
