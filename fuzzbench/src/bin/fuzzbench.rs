//! Create a testbench out of a verilog module.

use std::path::PathBuf;
use std::process;
use clap::{Parser, ValueEnum};
use compact_str::CompactString;
use fuzzbench::config::{DEFAULT_OUTPUT, DEFAULT_PULSE, MAX_PULSE};
use fuzzbench::HarnessConfig;
use vheaderparse::{ResetPolarity, ResetSpec, SignalConfig};

/// Reset sensitivity, as accepted on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ResetSensitivity {
    /// Active while high.
    LevelHigh,
    /// Active while low.
    LevelLow,
    /// Asserted on a rising edge.
    EdgeHigh,
    /// Asserted on a falling edge.
    EdgeLow,
}

impl From<ResetSensitivity> for ResetPolarity {
    fn from(s: ResetSensitivity) -> ResetPolarity {
        match s {
            ResetSensitivity::LevelHigh => ResetPolarity::LevelHigh,
            ResetSensitivity::LevelLow => ResetPolarity::LevelLow,
            ResetSensitivity::EdgeHigh => ResetPolarity::EdgeHigh,
            ResetSensitivity::EdgeLow => ResetPolarity::EdgeLow,
        }
    }
}

/// Create testbench out of verilog module.
#[derive(Parser, Debug)]
#[command(name = "fuzzbench", version, about)]
struct Args {
    /// Verilog source containing the module.
    filename: PathBuf,

    /// Output path of the testbench.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Clock half-period, in time units.
    #[arg(short, long, default_value_t = DEFAULT_PULSE,
          value_parser = clap::value_parser!(u64).range(1..=MAX_PULSE))]
    pulse: u64,

    /// Clock pin to toggle.
    #[arg(short, long)]
    clock: Option<String>,

    /// Reset pin to sequence.
    #[arg(long)]
    reset: Option<String>,

    /// How the reset pin is interpreted.
    #[arg(long, value_enum, default_value_t = ResetSensitivity::EdgeLow)]
    reset_sensitivity: ResetSensitivity,

    /// Module to wrap. Defaults to the first module in the file.
    #[arg(short, long)]
    module: Option<String>,
}

impl Args {
    fn into_config(self) -> HarnessConfig {
        let polarity: ResetPolarity = self.reset_sensitivity.into();
        HarnessConfig {
            source: self.filename,
            module: self.module.map(CompactString::from),
            output: self.output,
            pulse: self.pulse,
            signals: SignalConfig {
                clock: self.clock.map(CompactString::from),
                reset: self.reset.map(|signal| ResetSpec {
                    signal: signal.into(), polarity
                }),
            },
        }
    }
}

fn main() {
    clilog::init_stderr_color_debug();
    let args = Args::parse();
    clilog::debug!("{:?}", args);

    if let Err(e) = fuzzbench::run(args.into_config()) {
        clilog::error!("{}", e);
        process::exit(1);
    }
    clilog::info!("Done!");
}
