//! integration tests for vheaderparse

use vheaderparse::*;

const VERILOG_COUNTER: &str = include_str!("counter.v");
const VERILOG_MULTI: &str = include_str!("multi.v");
const VERILOG_UNTERMINATED: &str = include_str!("unterminated.v");

#[test]
fn test_counter() {
  clilog::init_stdout_simple_trace();
  let header = ModuleHeader::parse_str(VERILOG_COUNTER, None).expect("parse error");
  println!("Parsed is: {header:?}");
  assert!(header.diagnostics.is_empty());
  let iface = &header.interface;
  assert_eq!(iface.name, "counter");
  assert_eq!(format!("{iface}"), "\
module counter(input wire clk, input wire rst_n, input wire [7:0] load, \
input wire en, output reg [3:0] q, inout wire [1:0] pad);");
  assert!(!iface.has_clock());
  assert!(!iface.has_reset());
}

#[test]
fn test_select_first_module() {
  clilog::init_stdout_simple_trace();
  let header = ModuleHeader::parse_str(VERILOG_MULTI, None).expect("parse error");
  assert_eq!(header.interface.name, "first");
  assert_eq!(header.interface.ports.len(), 2);
}

#[test]
fn test_select_target_module() {
  clilog::init_stdout_simple_trace();
  let header = ModuleHeader::parse_str(VERILOG_MULTI, Some("second"))
    .expect("parse error");
  let iface = &header.interface;
  assert_eq!(iface.name, "second");
  let names: Vec<&str> = iface.ports.keys().map(|k| k.as_str()).collect();
  assert_eq!(names, vec!["clk", "rst", "q"]);
  let q = iface.port("q").unwrap();
  assert_eq!(q.direction, PortDirection::Output);
  assert_eq!(q.storage, StorageClass::Reg);
  assert_eq!(q.width, 4);
}

#[test]
fn test_duplicate_port_last_wins() {
  clilog::init_stdout_simple_trace();
  let header = ModuleHeader::parse_str(VERILOG_MULTI, Some("third"))
    .expect("parse error");
  let iface = &header.interface;
  assert_eq!(iface.ports.len(), 2);
  assert_eq!(iface.ports.get_index(0).map(|(k, _)| k.as_str()), Some("d"));
  assert_eq!(iface.ports["z"].width, 8);
}

#[test]
fn test_missing_target() {
  clilog::init_stdout_simple_trace();
  match ModuleHeader::parse_str(VERILOG_MULTI, Some("fourth")) {
    Err(HeaderError::TargetModuleNotFound(name)) => assert_eq!(name, "fourth"),
    other => panic!("unexpected result {other:?}"),
  }
  assert!(matches!(ModuleHeader::parse_str("// nothing here\n", Some("fourth")),
                   Err(HeaderError::NoModulesFound)));
  assert!(matches!(ModuleHeader::parse_str("", None),
                   Err(HeaderError::NoModulesFound)));
}

#[test]
fn test_unterminated_comment_truncates() {
  clilog::init_stdout_simple_trace();
  let header = ModuleHeader::parse_str(VERILOG_UNTERMINATED, None)
    .expect("unterminated comments are recoverable");
  let names: Vec<&str> = header.interface.ports.keys().map(|k| k.as_str()).collect();
  assert_eq!(names, vec!["a", "b"]);
  assert_eq!(header.diagnostics.len(), 1);
  assert!(matches!(header.diagnostics[0], HeaderError::UnterminatedBlockComment));
}

#[test]
fn test_parameterized_width() {
  clilog::init_stdout_simple_trace();
  let header = ModuleHeader::parse_str(
    "module p #(parameter W = 7) (input wire [W:0] x, output wire [0:W] y);", None
  ).expect("parse error");
  assert_eq!(header.interface.ports["x"].width, 8);
  assert_eq!(header.interface.ports["y"].width, 8);

  assert!(matches!(
    ModuleHeader::parse_str("module p #(parameter W = 8) (input wire [W-1:0] x);", None),
    Err(HeaderError::InvalidBound { .. })));

  let widest = format!("module w(input wire [{}:{}] x);", isize::MAX, isize::MIN);
  assert!(matches!(ModuleHeader::parse_str(&widest, None),
                   Err(HeaderError::RangeTooWide { .. })));
}

#[test]
fn test_parse_file_and_designation() {
  clilog::init_stdout_simple_trace();
  let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/multi.v");
  let mut iface = ModuleHeader::parse_file(path, Some("second"))
    .expect("parse error").interface;
  let rejected = iface.configure(SignalConfig {
    clock: Some("clock".into()),
    reset: Some(ResetSpec { signal: "rst".into(), polarity: ResetPolarity::LevelLow }),
  });
  assert_eq!(rejected, vec![ModuleError::UnknownSignal {
    role: SignalRole::Clock, name: "clock".into()
  }]);
  assert!(!iface.has_clock());
  assert_eq!(iface.reset, Some(ResetSpec {
    signal: "rst".into(), polarity: ResetPolarity::LevelLow
  }));

  assert!(matches!(ModuleHeader::parse_file("/nonexistent/x.v", None),
                   Err(HeaderError::Io(_))));
}

#[test]
fn test_portless_first_module() {
  clilog::init_stdout_simple_trace();
  let header = ModuleHeader::parse_str(
    "module tb; initial #5 $finish; endmodule", None
  ).expect("parse error");
  assert_eq!(header.interface.name, "tb");
  assert!(header.interface.ports.is_empty());
  assert_eq!(format!("{}", header.interface), "module tb();");
}
