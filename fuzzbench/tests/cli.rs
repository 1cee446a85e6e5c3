//! end-to-end runs of the fuzzbench binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn fixture(name: &str) -> String {
  format!("{}/tests/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fuzzbench(args: &[&str], out: &Path) -> Output {
  let output = Command::new(env!("CARGO_BIN_EXE_fuzzbench"))
    .args(args)
    .arg("--output").arg(out)
    .output()
    .expect("failed to launch fuzzbench");
  println!("stdout: {}", String::from_utf8_lossy(&output.stdout));
  println!("stderr: {}", String::from_utf8_lossy(&output.stderr));
  output
}

#[test]
fn test_cli_simple() {
  let dir = tempfile::tempdir().unwrap();
  let out = dir.path().join("m_tb.v");
  let source = fixture("simple.v");
  let output = fuzzbench(&[source.as_str(), "-c", "clk", "--reset", "rst",
                           "--reset-sensitivity", "edge-low", "-p", "100"], &out);
  assert!(output.status.success());
  let text = fs::read_to_string(&out).unwrap();
  assert!(text.starts_with("module m_tb;\n"));
  assert!(text.contains("reg clk;\nreg rst;\nwire [3:0] q;\n"));
  assert!(text.contains("    clk = #100 ~clk;\n"));
  assert!(text.contains(
    "initial begin\n    clk = 1'b0;\n    rst = 1'b1;\n    rst = #200 1'b0;\n    rst = #200 1'b1;\nend\n"));
}

#[test]
fn test_cli_unknown_clock_continues() {
  let dir = tempfile::tempdir().unwrap();
  let out = dir.path().join("alu_tb.v");
  let source = fixture("alu.v");
  let output = fuzzbench(&[source.as_str(), "-m", "alu", "-c", "clk",
                           "--reset", "reset_n", "--reset-sensitivity", "edge-high"], &out);
  assert!(output.status.success());
  let text = fs::read_to_string(&out).unwrap();
  assert!(!text.contains("always begin"));
  assert!(text.contains("    reset_n = 1'b0;\n"));
  assert!(text.contains("    reset_n = #2000 1'b1;\n    reset_n = #2000 1'b0;\n"));
}

#[test]
fn test_cli_missing_module_writes_nothing() {
  let dir = tempfile::tempdir().unwrap();
  let out = dir.path().join("none_tb.v");
  let source = fixture("alu.v");
  let output = fuzzbench(&[source.as_str(), "-m", "multiplier"], &out);
  assert!(!output.status.success());
  assert!(!out.exists());
  assert!(String::from_utf8_lossy(&output.stderr).contains("multiplier"));
}

#[test]
fn test_cli_rejects_bad_arguments() {
  let dir = tempfile::tempdir().unwrap();
  let out = dir.path().join("x.v");
  let source = fixture("simple.v");
  assert!(!fuzzbench(&[source.as_str(), "-p", "0"], &out).status.success());
  let too_long = (u64::MAX / 2 + 1).to_string();
  assert!(!fuzzbench(&[source.as_str(), "-p", too_long.as_str()], &out).status.success());
  assert!(!fuzzbench(&[source.as_str(), "--reset-sensitivity", "edge"], &out).status.success());
  assert!(!fuzzbench(&["/nonexistent/source.v"], &out).status.success());
  assert!(!out.exists());
}
