//! Generate a minimal testbench out of a verilog module header.
//!
//! The header is parsed with [`vheaderparse`]; the testbench declares a
//! signal per port, instantiates the module, toggles the designated
//! clock, and sequences the designated reset.
//!
//! Basic usage:
//! ```
//! use vheaderparse::{ModuleHeader, ResetPolarity};
//! use fuzzbench::Testbench;
//!
//! let mut iface = ModuleHeader::parse_str(
//!     "module m(input wire clk, input wire rst, output reg [3:0] q);", None
//! ).unwrap().interface;
//! iface.set_clock("clk").unwrap();
//! iface.set_reset("rst", ResetPolarity::EdgeLow).unwrap();
//! let text = Testbench::synthesize(&iface, 100).to_string();
//! assert!(text.contains("clk = #100 ~clk;"));
//! ```

use std::fs;
use vheaderparse::ModuleHeader;

pub mod config;
pub use config::HarnessConfig;

mod error;
pub use error::FuzzbenchError;

pub mod fuzzer;
pub use fuzzer::{Assignments, BitLiteral, Fuzzer, Wave};

mod testbench;
pub use testbench::Testbench;

/// Parse the configured source, apply clock/reset designations, and
/// write the testbench.
///
/// Unknown clock or reset pins are logged and skipped. Any other
/// failure aborts the run before the output file is created.
pub fn run(config: HarnessConfig) -> Result<(), FuzzbenchError> {
    if !config.pulse_in_range() {
        return Err(FuzzbenchError::PulseOutOfRange(config.pulse))
    }
    let source = fs::canonicalize(&config.source).map_err(
        |source| FuzzbenchError::Io { path: config.source.clone(), source })?;
    clilog::info!("Scanning at {}", source.display());

    let header = ModuleHeader::parse_file(&source, config.module.as_deref())?;
    if !header.diagnostics.is_empty() {
        clilog::warn!("{} syntax error(s) recovered in {}",
                      header.diagnostics.len(), source.display());
    }
    let mut interface = header.interface;
    for e in interface.configure(config.signals) {
        clilog::error!("{}", e);
    }

    let testbench = Testbench::synthesize(&interface, config.pulse);
    fs::write(&config.output, testbench.to_string()).map_err(
        |source| FuzzbenchError::Io { path: config.output.clone(), source })?;
    clilog::info!("Testbench {} written to {}",
                  interface.testbench_name(), config.output.display());
    Ok(())
}
