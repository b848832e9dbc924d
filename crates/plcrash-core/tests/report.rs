//! Tests for crash report rendering

use chrono::{Local, TimeZone};
use plcrash_core::report::{self, ReportFormatter, ReportOptions, ReportTimeZone};
use plcrash_core::types::{
    ApplicationInfo, BinaryImage, CrashRecord, ExceptionInfo, MachineInfo, OperatingSystem, ProcessInfo, Processor,
    ProcessorTypeEncoding, RegisterValue, Signal, StackFrame, SystemArchitecture, SystemInfo, Thread,
};

const CPU_TYPE_ARM: u64 = 12;
const CPU_SUBTYPE_ARM_V7: u64 = 9;

fn utc_formatter() -> ReportFormatter
{
    ReportFormatter::new(ReportOptions::default().with_time_zone(ReportTimeZone::Utc))
}

fn render(record: &CrashRecord) -> String
{
    utc_formatter().render(record)
}

fn frames(pcs: &[u64]) -> Vec<StackFrame>
{
    pcs.iter().copied().map(StackFrame::from).collect()
}

fn sample_record() -> CrashRecord
{
    CrashRecord {
        system_info: Some(SystemInfo {
            operating_system: OperatingSystem::IphoneOs,
            architecture: SystemArchitecture::ArmV7,
            os_version: "6.0".to_string(),
            os_build: Some("10A403".to_string()),
            timestamp: 1_353_848_760,
        }),
        machine_info: Some(MachineInfo {
            model: Some("iPhone4,1".to_string()),
            processor: Processor::mach(CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V7),
        }),
        process_info: Some(ProcessInfo {
            name: Some("Demo".to_string()),
            pid: 42,
            path: Some("/var/mobile/Applications/Demo.app/Demo".to_string()),
            parent_name: Some("launchd".to_string()),
            parent_pid: 1,
        }),
        application_info: ApplicationInfo {
            identifier: "com.example.demo".to_string(),
            version: "1.0".to_string(),
        },
        images: vec![
            BinaryImage::new("/var/mobile/Applications/Demo.app/Demo", 0x1000, 0x1000)
                .with_code_type(Processor::mach(CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V7)),
            BinaryImage::new("/usr/lib/system/libsystem_kernel.dylib", 0x3000_0000, 0x1_0000),
        ],
        threads: vec![
            Thread {
                number: 0,
                crashed: true,
                frames: frames(&[0x3000_0010, 0x1100, 0xdead_0000]),
                registers: vec![
                    RegisterValue::new("r0", 1),
                    RegisterValue::new("r12", 0x2a),
                    RegisterValue::new("lr", 0x1100),
                    RegisterValue::new("pc", 0x3000_0010),
                    RegisterValue::new("sp", 0x2fff_0000),
                ],
            },
            Thread {
                number: 1,
                crashed: false,
                frames: frames(&[0x1200]),
                registers: vec![RegisterValue::new("r0", 7)],
            },
        ],
        signal: Signal {
            name: "SIGSEGV".to_string(),
            code: "SEGV_MAPERR".to_string(),
            address: 0.into(),
        },
        exception: Some(ExceptionInfo {
            name: "NSRangeException".to_string(),
            reason: "index 3 beyond bounds".to_string(),
        }),
    }
}

fn line_starting<'a>(text: &'a str, prefix: &str) -> Option<&'a str>
{
    text.lines().find(|line| line.starts_with(prefix))
}

#[test]
fn test_full_report_layout()
{
    let expected = concat!(
        "Incident Identifier: ???\n",
        "CrashReporter Key:   ???\n",
        "Hardware Model:      iPhone4,1\n",
        "Process:         Demo [42]\n",
        "Path:            /var/mobile/Applications/Demo.app/Demo\n",
        "Identifier:      com.example.demo\n",
        "Version:         1.0\n",
        "Code Type:       ARM\n",
        "Parent Process:  launchd [1]\n",
        "\n",
        "Date/Time:       2012-11-25 13:06:00.000 +0000\n",
        "OS Version:      iOS 6.0 (10A403)\n",
        "Report Version:  104\n",
        "\n",
        "Exception Type:  SIGSEGV\n",
        "Exception Codes: SEGV_MAPERR at 0x0\n",
        "Crashed Thread:  0\n",
        "\n",
        "Application Specific Information:\n",
        "*** Terminating app due to uncaught exception 'NSRangeException', reason: 'index 3 beyond bounds'\n",
        "\n",
        "Thread 0 Crashed:\n",
        "0   libsystem_kernel.dylib              0x30000010 0x30000000 + 16\n",
        "1   Demo                                0x00001100 0x1000 + 256\n",
        "2   ???                                 0xdead0000 0x0 + 0\n",
        "\n",
        "Thread 1:\n",
        "0   Demo                                0x00001200 0x1000 + 512\n",
        "\n",
        "Thread 0 crashed with ARM Thread State:\n",
        "    r0: 0x00000001     ip: 0x0000002a     lr: 0x00001100     pc: 0x30000010\n",
        "    sp: 0x2fff0000\n",
        "\n",
    );

    assert_eq!(render(&sample_record()), expected);
}

#[test]
fn test_missing_system_info_reports_not_reported()
{
    let mut record = sample_record();
    record.system_info = None;

    let text = render(&record);
    assert_eq!(line_starting(&text, "OS Version:"), Some("OS Version:      Not Reported"));
    assert_eq!(line_starting(&text, "Date/Time:"), Some("Date/Time:       ???"));
}

#[test]
fn test_missing_os_build_uses_placeholder()
{
    let mut record = sample_record();
    if let Some(info) = record.system_info.as_mut() {
        info.operating_system = OperatingSystem::MacOsX;
        info.os_version = "10.8.2".to_string();
        info.os_build = None;
    }

    let text = render(&record);
    assert_eq!(line_starting(&text, "OS Version:"), Some("OS Version:      Mac OS X 10.8.2 (???)"));
}

#[test]
fn test_operating_system_names()
{
    for (os, name) in [
        (OperatingSystem::MacOsX, "Mac OS X"),
        (OperatingSystem::IphoneOs, "iOS"),
        (OperatingSystem::IphoneSimulator, "iOS Simulator"),
        (OperatingSystem::Unknown, "Unknown"),
    ] {
        let mut record = sample_record();
        if let Some(info) = record.system_info.as_mut() {
            info.operating_system = os;
        }
        let text = render(&record);
        let expected = format!("OS Version:      {name} 6.0 (10A403)");
        assert_eq!(line_starting(&text, "OS Version:"), Some(expected.as_str()));
    }
}

#[test]
fn test_missing_process_info_uses_placeholders()
{
    let mut record = sample_record();
    record.process_info = None;

    let text = render(&record);
    assert_eq!(line_starting(&text, "Process:"), Some("Process:         ??? [???]"));
    assert_eq!(line_starting(&text, "Path:"), Some("Path:            ???"));
    assert_eq!(line_starting(&text, "Parent Process:"), Some("Parent Process:  ??? [???]"));
}

#[test]
fn test_missing_process_names_keep_pids()
{
    let mut record = sample_record();
    record.process_info = Some(ProcessInfo {
        name: None,
        pid: 0,
        path: None,
        parent_name: None,
        parent_pid: 0,
    });

    let text = render(&record);
    assert_eq!(line_starting(&text, "Process:"), Some("Process:         ??? [0]"));
    assert_eq!(line_starting(&text, "Parent Process:"), Some("Parent Process:  ??? [0]"));
}

#[test]
fn test_hardware_model_fallbacks()
{
    let mut record = sample_record();
    record.machine_info = None;
    assert_eq!(
        line_starting(&render(&record), "Hardware Model:"),
        Some("Hardware Model:      ???")
    );

    record.machine_info = Some(MachineInfo {
        model: Some(String::new()),
        processor: Processor::mach(CPU_TYPE_ARM, CPU_SUBTYPE_ARM_V7),
    });
    assert_eq!(
        line_starting(&render(&record), "Hardware Model:"),
        Some("Hardware Model:      ???")
    );
}

#[test]
fn test_no_crashed_thread_omits_crash_lines()
{
    let mut record = sample_record();
    for thread in &mut record.threads {
        thread.crashed = false;
    }

    let text = render(&record);
    assert!(line_starting(&text, "Crashed Thread:").is_none());
    assert!(!text.contains("Thread State:"));
    assert!(text.contains("Thread 0:\n"));
}

#[test]
fn test_no_exception_omits_application_info()
{
    let mut record = sample_record();
    record.exception = None;

    let text = render(&record);
    assert!(!text.contains("Application Specific Information:"));
    assert!(text.contains("Crashed Thread:  0\n\nThread 0 Crashed:\n"));
}

#[test]
fn test_crashed_thread_is_first_in_list_order()
{
    let mut record = sample_record();
    record.threads[0].crashed = false;
    record.threads[1].crashed = true;
    record.threads.push(Thread {
        number: 2,
        crashed: true,
        frames: Vec::new(),
        registers: vec![RegisterValue::new("r5", 0x55)],
    });

    let text = render(&record);
    assert_eq!(line_starting(&text, "Crashed Thread:"), Some("Crashed Thread:  1"));
    assert!(text.contains("Thread 1 Crashed:\n"));
    assert!(text.contains("Thread 2 Crashed:\n"));
}

#[test]
fn test_register_dump_only_for_first_crashed_thread()
{
    let mut record = sample_record();
    record.threads[1].crashed = true;
    record.threads[1].registers = vec![RegisterValue::new("r9", 0x99)];

    let text = render(&record);
    assert_eq!(text.matches("Thread State:").count(), 1);
    assert!(text.contains("Thread 0 crashed with ARM Thread State:"));
    assert!(!text.contains("r9:"));
}

#[test]
fn test_r12_renamed_to_ip_on_native_arm()
{
    let mut record = sample_record();
    record.threads = vec![Thread {
        number: 0,
        crashed: true,
        frames: Vec::new(),
        registers: vec![RegisterValue::new("r12", 0x1), RegisterValue::new("lr", 0x2)],
    }];

    let text = render(&record);
    assert!(text.contains("    ip: 0x00000001     lr: 0x00000002\n"));
    assert!(!text.contains("r12:"));
}

#[test]
fn test_r12_kept_without_native_processor_encoding()
{
    let mut record = sample_record();
    record.machine_info = Some(MachineInfo {
        model: None,
        processor: Processor {
            cpu_type: CPU_TYPE_ARM,
            cpu_subtype: CPU_SUBTYPE_ARM_V7,
            encoding: ProcessorTypeEncoding::Unknown,
        },
    });

    let text = render(&record);
    assert!(text.contains("   r12: 0x0000002a"));
    assert!(!text.contains("ip:"));
}

#[test]
fn test_r12_kept_on_x86()
{
    let mut record = sample_record();
    record.images[0].code_type = Some(Processor::mach(7, 3));

    let text = render(&record);
    assert_eq!(line_starting(&text, "Code Type:"), Some("Code Type:       X86"));
    assert!(text.contains("   r12: 0x0000002a"));
}

#[test]
fn test_lp64_registers_use_sixteen_digits()
{
    let mut record = sample_record();
    record.images[0].code_type = Some(Processor::mach(0x0100_0007, 3));
    record.threads[0].registers = vec![RegisterValue::new("rip", 0x1_0000_1000)];

    let text = render(&record);
    assert!(text.contains("Thread 0 crashed with X86-64 Thread State:\n"));
    assert!(text.contains("   rip: 0x0000000100001000\n"));
}

#[test]
fn test_unresolved_code_type_uses_sixteen_digits()
{
    let mut record = sample_record();
    record.images.clear();
    record.system_info = None;

    let text = render(&record);
    assert!(text.contains("Thread 0 crashed with Unknown (-1) Thread State:\n"));
    assert!(text.contains("    r0: 0x0000000000000001 "));
    assert!(text.contains("   r12: 0x000000000000002a "));
}

#[test]
fn test_unknown_code_type_uses_hint_number()
{
    let mut record = sample_record();
    record.images.clear();
    if let Some(info) = record.system_info.as_mut() {
        info.architecture = SystemArchitecture::Ppc64;
    }

    let text = render(&record);
    assert_eq!(line_starting(&text, "Code Type:"), Some("Code Type:       Unknown (4)"));
    assert!(text.contains("Thread 0 crashed with Unknown (4) Thread State:"));
}

#[test]
fn test_exception_codes_use_hex_address()
{
    let mut record = sample_record();
    record.signal = Signal {
        name: "SIGBUS".to_string(),
        code: "BUS_ADRALN".to_string(),
        address: 0xdead_beef.into(),
    };

    let text = render(&record);
    assert_eq!(line_starting(&text, "Exception Type:"), Some("Exception Type:  SIGBUS"));
    assert_eq!(
        line_starting(&text, "Exception Codes:"),
        Some("Exception Codes: BUS_ADRALN at 0xdeadbeef")
    );
}

#[test]
fn test_binary_images_section_is_opt_in()
{
    let record = sample_record();
    assert!(!render(&record).contains("Binary Images:"));

    let formatter =
        ReportFormatter::new(ReportOptions::default().with_time_zone(ReportTimeZone::Utc).with_binary_images(true));
    let text = formatter.render(&record);
    assert!(text.ends_with(concat!(
        "Binary Images:\n",
        "0x1000 - 0x1fff Demo /var/mobile/Applications/Demo.app/Demo\n",
        "0x30000000 - 0x3000ffff libsystem_kernel.dylib /usr/lib/system/libsystem_kernel.dylib\n",
        "\n",
    )));
}

#[test]
fn test_default_render_uses_local_time()
{
    let record = sample_record();
    let expected = Local
        .timestamp_opt(1_353_848_760, 0)
        .earliest()
        .map(|date| format!("Date/Time:       {}", date.format("%Y-%m-%d %H:%M:%S%.3f %z")))
        .unwrap();

    let text = report::render(&record);
    assert_eq!(line_starting(&text, "Date/Time:"), Some(expected.as_str()));
}

#[test]
fn test_default_and_utc_agree_apart_from_date()
{
    let record = sample_record();
    let local = report::render(&record);
    let utc = render(&record);

    let without_date = |text: &str| -> Vec<String> {
        text.lines().filter(|line| !line.starts_with("Date/Time:")).map(str::to_string).collect()
    };
    assert_eq!(without_date(&local), without_date(&utc));
}

#[test]
fn test_out_of_range_timestamp_uses_placeholder()
{
    let mut record = sample_record();
    if let Some(info) = record.system_info.as_mut() {
        info.timestamp = i64::MAX;
    }

    assert_eq!(line_starting(&render(&record), "Date/Time:"), Some("Date/Time:       ???"));
}

#[test]
fn test_empty_record_renders()
{
    let text = render(&CrashRecord::default());

    assert!(text.starts_with("Incident Identifier: ???\n"));
    assert_eq!(line_starting(&text, "Code Type:"), Some("Code Type:       Unknown (-1)"));
    assert_eq!(line_starting(&text, "Exception Codes:"), Some("Exception Codes:  at 0x0"));
    assert!(!text.contains("Thread"));
}

#[test]
fn test_render_does_not_mutate_record()
{
    let record = sample_record();
    let before = record.clone();
    let first = render(&record);
    let second = render(&record);

    assert_eq!(record, before);
    assert_eq!(first, second);
}

#[test]
fn test_formatter_shared_across_threads()
{
    let formatter = utc_formatter();
    let record = sample_record();
    let expected = formatter.render(&record);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4).map(|_| scope.spawn(|| formatter.render(&record))).collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
