//! testbench text generation

use fuzzbench::*;
use vheaderparse::*;

const VERILOG_SIMPLE: &str = include_str!("simple.v");
const VERILOG_ALU: &str = include_str!("alu.v");

#[test]
fn test_simple_edge_low() {
  clilog::init_stdout_simple_trace();
  let mut iface = ModuleHeader::parse_str(VERILOG_SIMPLE, None)
    .expect("parse error").interface;
  assert!(iface.configure(SignalConfig {
    clock: Some("clk".into()),
    reset: Some(ResetSpec { signal: "rst".into(), polarity: ResetPolarity::EdgeLow }),
  }).is_empty());
  let tb = Testbench::synthesize(&iface, 100);
  assert_eq!(format!("{tb}"), "\
module m_tb;

reg clk;
reg rst;
wire [3:0] q;

m tb_object(
    .clk(clk),
    .rst(rst),
    .q(q)
);

always begin
    clk = #100 ~clk;
end

initial begin
    clk = 1'b0;
    rst = 1'b1;
    rst = #200 1'b0;
    rst = #200 1'b1;
end

endmodule
");
}

#[test]
fn test_no_clock_no_reset() {
  clilog::init_stdout_simple_trace();
  let iface = ModuleHeader::parse_str(VERILOG_SIMPLE, None)
    .expect("parse error").interface;
  let tb = Testbench::synthesize(&iface, 5);
  assert_eq!(format!("{tb}"), "\
module m_tb;

reg clk;
reg rst;
wire [3:0] q;

m tb_object(
    .clk(clk),
    .rst(rst),
    .q(q)
);

initial begin
    clk = 1'b0;
    rst = 1'b0;
end

endmodule
");
}

#[test]
fn test_alu_level_high() {
  clilog::init_stdout_simple_trace();
  let mut iface = ModuleHeader::parse_str(VERILOG_ALU, Some("alu"))
    .expect("parse error").interface;
  let rejected = iface.configure(SignalConfig {
    clock: Some("clk".into()),
    reset: Some(ResetSpec { signal: "reset_n".into(), polarity: ResetPolarity::LevelHigh }),
  });
  assert_eq!(rejected.len(), 1);
  let tb = Testbench::synthesize(&iface, 10);
  assert_eq!(format!("{tb}"), "\
module alu_tb;

reg clock;
reg reset_n;
reg [1:0] op;
reg [15:0] x;
reg [15:0] y;
wire [15:0] z;

alu tb_object(
    .clock(clock),
    .reset_n(reset_n),
    .op(op),
    .x(x),
    .y(y),
    .scan(scan),
    .z(z)
);

initial begin
    clock = 1'b0;
    reset_n = 1'b1;
    op = 2'b00;
    x = 16'b0000000000000000;
    y = 16'b0000000000000000;
end

endmodule
");
}

#[test]
fn test_huge_pulse_saturates() {
  clilog::init_stdout_simple_trace();
  let mut iface = ModuleHeader::parse_str(VERILOG_SIMPLE, None)
    .expect("parse error").interface;
  iface.set_reset("rst", ResetPolarity::EdgeLow).unwrap();
  let text = Testbench::synthesize(&iface, u64::MAX / 2 + 1).to_string();
  assert!(text.contains(&format!("    rst = #{} 1'b0;\n", u64::MAX)));
}

#[test]
fn test_run_rejects_pulse_out_of_range() {
  clilog::init_stdout_simple_trace();
  let dir = tempfile::tempdir().unwrap();
  let mut config = HarnessConfig::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/simple.v"));
  config.output = dir.path().join("m_tb.v");
  for pulse in [0, config::MAX_PULSE + 1] {
    config.pulse = pulse;
    match run(config.clone()) {
      Err(FuzzbenchError::PulseOutOfRange(p)) => assert_eq!(p, pulse),
      other => panic!("unexpected result {other:?}"),
    }
  }
  assert!(!config.output.exists());

  config.pulse = config::MAX_PULSE;
  run(config.clone()).expect("largest pulse is accepted");
  let text = std::fs::read_to_string(&config.output).unwrap();
  assert!(text.starts_with("module m_tb;\n"));
}
