//! # Types
//!
//! Data model shared by the decoder seam, the resolvers and the formatter.

pub mod address;
pub mod record;

// Re-export all public types
pub use address::Address;
pub use record::{
    ApplicationInfo, BinaryImage, CrashRecord, ExceptionInfo, MachineInfo, OperatingSystem, ProcessInfo, Processor,
    ProcessorTypeEncoding, RegisterValue, Signal, StackFrame, SystemArchitecture, SystemInfo, Thread,
};
