//! Section writers for [`Report`].
//!
//! Each writer appends complete lines and never rewrites earlier output.

use std::fmt::{self, Write};

use chrono::{Local, TimeZone, Utc};

use super::{Report, ReportTimeZone, PLACEHOLDER, REPORT_VERSION};
use crate::arch::CpuType;
use crate::types::{Address, SystemInfo, Thread};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %z";

/// Label column width for the incident preamble.
const PREAMBLE_WIDTH: usize = 21;
/// Label column width for every other key/value line.
const FIELD_WIDTH: usize = 17;

const REGISTERS_PER_LINE: usize = 4;

fn field(out: &mut impl Write, width: usize, label: &str, value: impl fmt::Display) -> fmt::Result
{
    writeln!(out, "{:<width$}{value}", format!("{label}:"))
}

pub(super) fn write_header(out: &mut impl Write, report: &Report<'_>) -> fmt::Result
{
    let record = report.record;

    // Not carried by the record.
    field(out, PREAMBLE_WIDTH, "Incident Identifier", PLACEHOLDER)?;
    field(out, PREAMBLE_WIDTH, "CrashReporter Key", PLACEHOLDER)?;

    let model = record
        .machine_info
        .as_ref()
        .and_then(|machine| machine.model.as_deref())
        .filter(|model| !model.is_empty())
        .unwrap_or(PLACEHOLDER);
    field(out, PREAMBLE_WIDTH, "Hardware Model", model)?;

    let process = record.process_info.as_ref();
    let (name, pid, path, parent_name, parent_pid) = match process {
        Some(info) => (
            info.name.as_deref().unwrap_or(PLACEHOLDER),
            info.pid.to_string(),
            info.path.as_deref().unwrap_or(PLACEHOLDER),
            info.parent_name.as_deref().unwrap_or(PLACEHOLDER),
            info.parent_pid.to_string(),
        ),
        None => (
            PLACEHOLDER,
            PLACEHOLDER.to_string(),
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER.to_string(),
        ),
    };

    field(out, FIELD_WIDTH, "Process", format_args!("{name} [{pid}]"))?;
    field(out, FIELD_WIDTH, "Path", path)?;
    field(out, FIELD_WIDTH, "Identifier", &record.application_info.identifier)?;
    field(out, FIELD_WIDTH, "Version", &record.application_info.version)?;
    field(out, FIELD_WIDTH, "Code Type", report.code_type)?;
    field(out, FIELD_WIDTH, "Parent Process", format_args!("{parent_name} [{parent_pid}]"))
}

fn format_date(info: &SystemInfo, time_zone: ReportTimeZone) -> Option<String>
{
    let millis = info.timestamp.checked_mul(1000)?;
    match time_zone {
        ReportTimeZone::Local => Local
            .timestamp_millis_opt(millis)
            .earliest()
            .map(|date| date.format(DATE_FORMAT).to_string()),
        ReportTimeZone::Utc => Utc
            .timestamp_millis_opt(millis)
            .earliest()
            .map(|date| date.format(DATE_FORMAT).to_string()),
    }
}

pub(super) fn write_system(out: &mut impl Write, report: &Report<'_>) -> fmt::Result
{
    match report.record.system_info.as_ref() {
        Some(info) => {
            let date = format_date(info, report.options.time_zone);
            field(out, FIELD_WIDTH, "Date/Time", date.as_deref().unwrap_or(PLACEHOLDER))?;
            field(
                out,
                FIELD_WIDTH,
                "OS Version",
                format_args!(
                    "{} {} ({})",
                    info.operating_system,
                    info.os_version,
                    info.os_build.as_deref().unwrap_or(PLACEHOLDER)
                ),
            )?;
        }
        None => {
            field(out, FIELD_WIDTH, "Date/Time", PLACEHOLDER)?;
            field(out, FIELD_WIDTH, "OS Version", "Not Reported")?;
        }
    }

    field(out, FIELD_WIDTH, "Report Version", REPORT_VERSION)
}

pub(super) fn write_exception_summary(out: &mut impl Write, report: &Report<'_>) -> fmt::Result
{
    let signal = &report.record.signal;
    field(out, FIELD_WIDTH, "Exception Type", &signal.name)?;
    field(out, FIELD_WIDTH, "Exception Codes", format_args!("{} at {}", signal.code, signal.address))?;

    if let Some(thread) = report.record.crashed_thread() {
        field(out, FIELD_WIDTH, "Crashed Thread", thread.number)?;
    }

    Ok(())
}

/// Returns whether anything was written.
pub(super) fn write_application_info(out: &mut impl Write, report: &Report<'_>) -> Result<bool, fmt::Error>
{
    let Some(exception) = report.record.exception.as_ref() else {
        return Ok(false);
    };

    writeln!(out, "Application Specific Information:")?;
    writeln!(
        out,
        "*** Terminating app due to uncaught exception '{}', reason: '{}'",
        exception.name, exception.reason
    )?;
    Ok(true)
}

pub(super) fn write_thread(out: &mut impl Write, report: &Report<'_>, thread: &Thread) -> fmt::Result
{
    if thread.crashed {
        writeln!(out, "Thread {} Crashed:", thread.number)?;
    } else {
        writeln!(out, "Thread {}:", thread.number)?;
    }

    for (index, frame) in thread.frames.iter().enumerate() {
        let owner = report.images.lookup(frame.pc);
        let (name, base) = match owner {
            Some(image) => (image.short_name(), image.base_address),
            None => (PLACEHOLDER, Address::ZERO),
        };
        let offset = owner.and_then(|_| frame.pc.offset_from(base)).unwrap_or(0);

        writeln!(out, "{index:<4}{name:<36}0x{:08x} {base} + {offset}", frame.pc)?;
    }

    Ok(())
}

pub(super) fn write_registers(out: &mut impl Write, report: &Report<'_>, thread: &Thread) -> fmt::Result
{
    let code_type = report.code_type;
    writeln!(out, "Thread {} crashed with {code_type} Thread State:", thread.number)?;

    let native_processor = report
        .record
        .machine_info
        .as_ref()
        .is_some_and(|machine| machine.processor.encoding.is_native());
    let rename_ip = native_processor && code_type.cpu() == CpuType::Arm;
    let width = code_type.register_width();

    for chunk in thread.registers.chunks(REGISTERS_PER_LINE) {
        let mut line = String::new();
        for (position, register) in chunk.iter().enumerate() {
            let name = if rename_ip && register.name == "r12" {
                "ip"
            } else {
                register.name.as_str()
            };
            if position > 0 {
                line.push(' ');
            }
            write!(line, "{name:>6}: 0x{:0width$x}", register.value)?;
        }
        writeln!(out, "{line}")?;
    }

    Ok(())
}

pub(super) fn write_binary_images(out: &mut impl Write, report: &Report<'_>) -> fmt::Result
{
    writeln!(out, "Binary Images:")?;
    for image in report.images.images() {
        let last = image.base_address.saturating_add(image.size.saturating_sub(1));
        writeln!(out, "{} - {} {} {}", image.base_address, last, image.short_name(), image.name)?;
    }
    Ok(())
}
