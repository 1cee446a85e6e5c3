//! Run configuration, built once from the command line and passed by
//! value into [`crate::run`].

use std::path::PathBuf;
use compact_str::CompactString;
use vheaderparse::SignalConfig;

/// Default half-period of the generated clock, in time units.
pub const DEFAULT_PULSE: u64 = 1000;

/// Largest accepted half-period. A full clock period, used as the reset
/// delay, must still fit in a `u64`.
pub const MAX_PULSE: u64 = u64::MAX / 2;

/// Default path of the generated testbench.
pub const DEFAULT_OUTPUT: &str = "testbench.v";

/// Instance name of the module under test inside the testbench.
pub const INSTANCE_NAME: &str = "tb_object";

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// verilog source to scan.
    pub source: PathBuf,
    /// module to wrap; the first module in `source` if `None`.
    pub module: Option<CompactString>,
    /// where the testbench is written.
    pub output: PathBuf,
    /// clock half-period, within `1..=MAX_PULSE`.
    pub pulse: u64,
    /// clock and reset designations.
    pub signals: SignalConfig,
}

impl HarnessConfig {
    /// A configuration with default output, pulse and no designations.
    pub fn new(source: impl Into<PathBuf>) -> HarnessConfig {
        HarnessConfig {
            source: source.into(),
            module: None,
            output: DEFAULT_OUTPUT.into(),
            pulse: DEFAULT_PULSE,
            signals: SignalConfig::default(),
        }
    }

    /// Whether `pulse` lies within `1..=MAX_PULSE`.
    #[inline]
    pub fn pulse_in_range(&self) -> bool {
        (1..=MAX_PULSE).contains(&self.pulse)
    }
}

#[test]
fn test_defaults() {
    let cfg = HarnessConfig::new("a.v");
    assert_eq!(cfg.output, PathBuf::from("testbench.v"));
    assert_eq!(cfg.pulse, 1000);
    assert_eq!(cfg.module, None);
    assert_eq!(cfg.signals, SignalConfig::default());
    assert!(cfg.pulse_in_range());
}

#[test]
fn test_pulse_range() {
    let mut cfg = HarnessConfig::new("a.v");
    for (pulse, ok) in [(0, false), (1, true), (MAX_PULSE, true), (MAX_PULSE + 1, false)] {
        cfg.pulse = pulse;
        assert_eq!(cfg.pulse_in_range(), ok, "pulse {}", pulse);
    }
}
