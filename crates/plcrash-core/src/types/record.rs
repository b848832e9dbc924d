//! Decoded crash record types.
//!
//! These types mirror the schema produced by the external structured-message
//! decoder. The formatter only reads them; nothing in this crate mutates a
//! record once it has been decoded.
//!
//! List order (images, threads, frames, registers) is exactly the order the
//! decoder produced and is never re-sorted.

use std::fmt;

use super::Address;

/// Operating system that produced the crash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingSystem
{
    /// Mac OS X
    MacOsX,
    /// iPhone OS / iOS running on a device
    IphoneOs,
    /// iOS running in the simulator
    IphoneSimulator,
    /// Reported, but not one of the known systems
    Unknown,
}

impl OperatingSystem
{
    /// Human-readable name used on the `OS Version` line.
    pub const fn display_name(self) -> &'static str
    {
        match self {
            OperatingSystem::MacOsX => "Mac OS X",
            OperatingSystem::IphoneOs => "iOS",
            OperatingSystem::IphoneSimulator => "iOS Simulator",
            OperatingSystem::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OperatingSystem
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.display_name())
    }
}

/// Architecture hint recorded alongside the system information
///
/// This is only a hint: the CPU type attached to the loaded images takes
/// precedence when resolving the code type (see [`crate::arch::resolve`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemArchitecture
{
    /// 32-bit x86
    X86_32,
    /// 64-bit x86
    X86_64,
    /// ARMv6
    ArmV6,
    /// 32-bit PowerPC
    Ppc,
    /// 64-bit PowerPC
    Ppc64,
    /// ARMv7
    ArmV7,
    /// Architecture the reporter could not identify
    Unknown,
}

impl SystemArchitecture
{
    /// Wire value used by the decoder schema.
    ///
    /// This is the number shown in `Unknown (<n>)` code type names.
    pub const fn code(self) -> i32
    {
        match self {
            SystemArchitecture::X86_32 => 0,
            SystemArchitecture::X86_64 => 1,
            SystemArchitecture::ArmV6 => 2,
            SystemArchitecture::Ppc => 3,
            SystemArchitecture::Ppc64 => 4,
            SystemArchitecture::ArmV7 => 5,
            SystemArchitecture::Unknown => 6,
        }
    }
}

/// How the raw `type`/`subtype` integers of a [`Processor`] are to be read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProcessorTypeEncoding
{
    /// Encoding not known; raw values cannot be interpreted
    #[default]
    Unknown,
    /// Mach-O `cpu_type_t` / `cpu_subtype_t` values
    Mach,
}

impl ProcessorTypeEncoding
{
    /// Returns `true` for the native (Mach) encoding.
    pub const fn is_native(self) -> bool
    {
        matches!(self, ProcessorTypeEncoding::Mach)
    }
}

/// Processor description: raw type and subtype in a given encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Processor
{
    /// Raw CPU type
    pub cpu_type: u64,
    /// Raw CPU subtype
    pub cpu_subtype: u64,
    /// Encoding of `cpu_type` and `cpu_subtype`
    pub encoding: ProcessorTypeEncoding,
}

impl Processor
{
    /// Processor using the native (Mach) encoding.
    pub const fn mach(cpu_type: u64, cpu_subtype: u64) -> Self
    {
        Self {
            cpu_type,
            cpu_subtype,
            encoding: ProcessorTypeEncoding::Mach,
        }
    }
}

/// Host operating system details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemInfo
{
    pub operating_system: OperatingSystem,
    pub architecture: SystemArchitecture,
    pub os_version: String,
    pub os_build: Option<String>,
    /// Seconds since the Unix epoch at which the crash was recorded.
    pub timestamp: i64,
}

/// Hardware details
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MachineInfo
{
    /// Hardware model identifier, e.g. `iPhone4,1`
    pub model: Option<String>,
    pub processor: Processor,
}

/// Crashed process and its parent
///
/// String fields are "present but possibly empty": an empty name is rendered
/// as-is, only `None` falls back to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessInfo
{
    pub name: Option<String>,
    pub pid: u64,
    pub path: Option<String>,
    pub parent_name: Option<String>,
    pub parent_pid: u64,
}

/// Application bundle identity
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationInfo
{
    /// Bundle identifier, e.g. `com.example.app`
    pub identifier: String,
    /// Bundle version string
    pub version: String,
}

/// A loaded code module (executable, framework or dylib)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage
{
    /// Full path of the image on the device
    pub name: String,
    pub base_address: Address,
    pub size: u64,
    /// CPU type the image was built for, if the reporter recorded it
    pub code_type: Option<Processor>,
}

impl BinaryImage
{
    /// Create an image without code type information.
    pub fn new(name: impl Into<String>, base_address: u64, size: u64) -> Self
    {
        Self {
            name: name.into(),
            base_address: Address::new(base_address),
            size,
            code_type: None,
        }
    }

    /// Attach the CPU type the image was built for.
    #[must_use]
    pub fn with_code_type(mut self, code_type: Processor) -> Self
    {
        self.code_type = Some(code_type);
        self
    }

    /// First address past the end of the image (saturating).
    pub fn end_address(&self) -> Address
    {
        self.base_address.saturating_add(self.size)
    }

    /// Check if an address lies within `[base, base + size)`.
    ///
    /// ```rust
    /// use plcrash_core::types::{Address, BinaryImage};
    ///
    /// let image = BinaryImage::new("/usr/lib/libobjc.A.dylib", 0x1000, 0x1000);
    /// assert!(image.contains(Address::from(0x1000)));
    /// assert!(!image.contains(Address::from(0x2000)));
    /// ```
    pub fn contains(&self, address: Address) -> bool
    {
        address >= self.base_address && address < self.end_address()
    }

    /// Last path component of the image name.
    pub fn short_name(&self) -> &str
    {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

/// A single backtrace entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackFrame
{
    /// Program counter
    pub pc: Address,
}

impl From<u64> for StackFrame
{
    fn from(pc: u64) -> Self
    {
        Self { pc: Address::new(pc) }
    }
}

/// A named register and its value at the time of the crash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterValue
{
    pub name: String,
    pub value: u64,
}

impl RegisterValue
{
    pub fn new(name: impl Into<String>, value: u64) -> Self
    {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// A thread captured in the report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Thread
{
    /// Thread number as assigned by the reporter
    pub number: u64,
    /// Whether this thread triggered the crash
    pub crashed: bool,
    /// Backtrace, innermost frame first
    pub frames: Vec<StackFrame>,
    /// Register state; only meaningful for crashed threads
    pub registers: Vec<RegisterValue>,
}

/// Fatal signal information
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signal
{
    /// Signal name, e.g. `SIGSEGV`
    pub name: String,
    /// Signal code, e.g. `SEGV_MAPERR`
    pub code: String,
    /// Faulting address
    pub address: Address,
}

/// Uncaught language-level exception
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo
{
    pub name: String,
    pub reason: String,
}

/// A fully decoded crash report
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CrashRecord
{
    pub system_info: Option<SystemInfo>,
    pub machine_info: Option<MachineInfo>,
    pub process_info: Option<ProcessInfo>,
    pub application_info: ApplicationInfo,
    pub images: Vec<BinaryImage>,
    pub threads: Vec<Thread>,
    pub signal: Signal,
    pub exception: Option<ExceptionInfo>,
}

impl CrashRecord
{
    /// First thread in list order marked as crashed.
    pub fn crashed_thread(&self) -> Option<&Thread>
    {
        self.threads.iter().find(|thread| thread.crashed)
    }

    /// Architecture hint from the system information, if reported.
    pub fn architecture_hint(&self) -> Option<SystemArchitecture>
    {
        self.system_info.as_ref().map(|info| info.architecture)
    }
}
