//! CPU type resolution.
//!
//! A crash record carries two kinds of architecture information that can
//! disagree or be missing altogether:
//!
//! - the Mach CPU type recorded for each loaded binary image, and
//! - a coarse architecture hint in the system information.
//!
//! The image CPU types are authoritative; the hint is only consulted when no
//! image carries a usable native CPU type.

use std::fmt;

use tracing::trace;

use crate::types::{BinaryImage, SystemArchitecture};

/// Flag marking a 64-bit ABI variant of a CPU type.
pub const CPU_ARCH_ABI64: i32 = 0x0100_0000;

/// Canonical CPU type
///
/// A closed set of Mach CPU types. Use [`CpuType::code`] for the raw value and
/// [`CpuType::from_raw`] to map a raw value back to a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CpuType
{
    Any,
    Vax,
    Mc680x0,
    X86,
    X86_64,
    Mc98000,
    Hppa,
    Arm,
    Mc88000,
    Sparc,
    I860,
    PowerPc,
    PowerPc64,
}

impl CpuType
{
    /// Every CPU type, in table order.
    pub const ALL: [CpuType; 13] = [
        CpuType::Any,
        CpuType::Vax,
        CpuType::Mc680x0,
        CpuType::X86,
        CpuType::X86_64,
        CpuType::Mc98000,
        CpuType::Hppa,
        CpuType::Arm,
        CpuType::Mc88000,
        CpuType::Sparc,
        CpuType::I860,
        CpuType::PowerPc,
        CpuType::PowerPc64,
    ];

    /// Raw Mach `cpu_type_t` value.
    pub const fn code(self) -> i32
    {
        match self {
            CpuType::Any => -1,
            CpuType::Vax => 1,
            CpuType::Mc680x0 => 6,
            CpuType::X86 => 7,
            CpuType::X86_64 => 7 | CPU_ARCH_ABI64,
            CpuType::Mc98000 => 10,
            CpuType::Hppa => 11,
            CpuType::Arm => 12,
            CpuType::Mc88000 => 13,
            CpuType::Sparc => 14,
            CpuType::I860 => 15,
            CpuType::PowerPc => 18,
            CpuType::PowerPc64 => 18 | CPU_ARCH_ABI64,
        }
    }

    /// Map a raw CPU type, as stored in a [`Processor`](crate::types::Processor), to a variant.
    ///
    /// The raw value is read as a (sign-extended) 64-bit integer, so
    /// `u64::MAX` maps to [`CpuType::Any`].
    ///
    /// ```rust
    /// use plcrash_core::arch::CpuType;
    ///
    /// assert_eq!(CpuType::from_raw(12), Some(CpuType::Arm));
    /// assert_eq!(CpuType::from_raw(0x0100_0007), Some(CpuType::X86_64));
    /// assert_eq!(CpuType::from_raw(99), None);
    /// ```
    pub fn from_raw(raw: u64) -> Option<Self>
    {
        #[allow(clippy::cast_possible_wrap)]
        let raw = raw as i64;
        Self::ALL.into_iter().find(|cpu| i64::from(cpu.code()) == raw)
    }

    /// Returns `true` if the type uses a 64-bit (LP64) ABI.
    pub const fn is_lp64(self) -> bool
    {
        is_lp64(self.code())
    }
}

/// Returns `true` if the raw CPU type code has the 64-bit ABI flag set.
pub const fn is_lp64(code: i32) -> bool
{
    code & CPU_ARCH_ABI64 != 0
}

/// Resolve the code type of a crashed process
///
/// 1. The first image (in list order) with a native-encoded CPU type found in
///    the [`CpuType`] table wins; later images are not consulted.
/// 2. Otherwise the system architecture hint is mapped.
/// 3. Otherwise [`CpuType::Any`].
pub fn resolve(images: &[BinaryImage], hint: Option<SystemArchitecture>) -> CpuType
{
    let from_images = images
        .iter()
        .filter_map(|image| image.code_type)
        .filter(|processor| processor.encoding.is_native())
        .find_map(|processor| CpuType::from_raw(processor.cpu_type));

    if let Some(cpu) = from_images {
        trace!(?cpu, "code type resolved from binary images");
        return cpu;
    }

    let from_hint = hint.and_then(|hint| match hint {
        SystemArchitecture::ArmV6 | SystemArchitecture::ArmV7 => Some(CpuType::Arm),
        SystemArchitecture::X86_32 => Some(CpuType::X86),
        SystemArchitecture::X86_64 => Some(CpuType::X86_64),
        SystemArchitecture::Ppc => Some(CpuType::PowerPc),
        SystemArchitecture::Ppc64 | SystemArchitecture::Unknown => None,
    });

    trace!(?hint, cpu = ?from_hint, "code type resolved from system hint");
    from_hint.unwrap_or(CpuType::Any)
}

/// Display name for a resolved CPU type
///
/// Only ARM, x86, x86-64 and PowerPC have names. Every other type renders as
/// `Unknown (<n>)` where `<n>` is the numeric code of the system architecture
/// *hint*, not of the CPU type; `-1` when no hint was reported.
///
/// ```rust
/// use plcrash_core::arch::{display_name, CpuType};
/// use plcrash_core::types::SystemArchitecture;
///
/// assert_eq!(display_name(CpuType::X86_64, None), "X86-64");
/// assert_eq!(display_name(CpuType::Sparc, Some(SystemArchitecture::Ppc64)), "Unknown (4)");
/// ```
pub fn display_name(cpu: CpuType, hint: Option<SystemArchitecture>) -> String
{
    match cpu {
        CpuType::Arm => "ARM".to_string(),
        CpuType::X86 => "X86".to_string(),
        CpuType::X86_64 => "X86-64".to_string(),
        CpuType::PowerPc => "PPC".to_string(),
        _ => format!("Unknown ({})", hint.map_or(-1, SystemArchitecture::code)),
    }
}

/// Resolved code type together with the hint it was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeType
{
    cpu: CpuType,
    hint: Option<SystemArchitecture>,
}

impl CodeType
{
    /// Resolve from images and the system hint (see [`resolve`]).
    pub fn resolve(images: &[BinaryImage], hint: Option<SystemArchitecture>) -> Self
    {
        Self {
            cpu: resolve(images, hint),
            hint,
        }
    }

    pub fn cpu(&self) -> CpuType
    {
        self.cpu
    }

    pub fn is_lp64(&self) -> bool
    {
        self.cpu.is_lp64()
    }

    /// Number of hex digits used to print a register value.
    pub fn register_width(&self) -> usize
    {
        if self.is_lp64() {
            16
        } else {
            8
        }
    }

    pub fn display_name(&self) -> String
    {
        display_name(self.cpu, self.hint)
    }
}

impl fmt::Display for CodeType
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(&self.display_name())
    }
}
