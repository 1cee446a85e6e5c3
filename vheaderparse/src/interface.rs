//! The module interface model: resolved name, ordered ports, and the
//! optional clock/reset designations.

use std::fmt;
use std::str::FromStr;
use compact_str::CompactString;
use indexmap::IndexMap;

use crate::{BitRange, ModuleError, Port, PortDirection, SignalRole};

/// How the reset line is interpreted.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum ResetPolarity {
    EdgeHigh,
    #[default]
    EdgeLow,
    LevelHigh,
    LevelLow,
}

impl FromStr for ResetPolarity {
    type Err = ModuleError;

    fn from_str(s: &str) -> Result<ResetPolarity, ModuleError> {
        use ResetPolarity::*;
        match s {
            "edge-high" => Ok(EdgeHigh),
            "edge-low" => Ok(EdgeLow),
            "level-high" => Ok(LevelHigh),
            "level-low" => Ok(LevelLow),
            _ => Err(ModuleError::UnknownPolarity(s.to_string()))
        }
    }
}

impl fmt::Display for ResetPolarity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ResetPolarity::*;
        write!(f, "{}", match self {
            EdgeHigh => "edge-high",
            EdgeLow => "edge-low",
            LevelHigh => "level-high",
            LevelLow => "level-low",
        })
    }
}

/// A designated reset pin.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ResetSpec {
    pub signal: CompactString,
    pub polarity: ResetPolarity,
}

/// Clock and reset designations requested by the user, applied to a
/// freshly parsed interface with [`ModuleInterface::configure`].
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct SignalConfig {
    pub clock: Option<CompactString>,
    pub reset: Option<ResetSpec>,
}

/// The port interface of one module.
///
/// The public members are READ-ONLY outside. Clock and reset are set
/// through [`ModuleInterface::set_clock`] and
/// [`ModuleInterface::set_reset`], which validate the pin first.
#[readonly::make]
#[derive(Debug, Clone)]
pub struct ModuleInterface {
    /// module name.
    pub name: CompactString,
    /// ports keyed by name, in declaration order.
    ///
    /// a redeclared name keeps its first position but takes the
    /// last declaration.
    pub ports: IndexMap<CompactString, Port>,
    /// designated clock pin, always one of `ports`.
    pub clock: Option<CompactString>,
    /// designated reset pin, always one of `ports`.
    pub reset: Option<ResetSpec>,
}

impl ModuleInterface {
    pub fn new(
        name: impl Into<CompactString>, ports: IndexMap<CompactString, Port>
    ) -> ModuleInterface {
        ModuleInterface {
            name: name.into(),
            ports,
            clock: None,
            reset: None,
        }
    }

    /// Name of the generated testbench module.
    #[inline]
    pub fn testbench_name(&self) -> CompactString {
        compact_str::format_compact!("{}_tb", self.name)
    }

    #[inline]
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.get(name)
    }

    fn check_pin(&self, role: SignalRole, pin: &str) -> Result<(), ModuleError> {
        match self.ports.contains_key(pin) {
            true => Ok(()),
            false => Err(ModuleError::UnknownSignal { role, name: pin.into() })
        }
    }

    /// Designate `pin` as the clock. Leaves the model untouched on error.
    pub fn set_clock(&mut self, pin: &str) -> Result<(), ModuleError> {
        self.check_pin(SignalRole::Clock, pin)?;
        self.clock = Some(pin.into());
        Ok(())
    }

    #[inline]
    pub fn has_clock(&self) -> bool {
        self.clock.is_some()
    }

    /// Designate `pin` as the reset with the given polarity.
    /// Leaves the model untouched on error.
    pub fn set_reset(
        &mut self, pin: &str, polarity: ResetPolarity
    ) -> Result<(), ModuleError> {
        self.check_pin(SignalRole::Reset, pin)?;
        self.reset = Some(ResetSpec { signal: pin.into(), polarity });
        Ok(())
    }

    #[inline]
    pub fn has_reset(&self) -> bool {
        self.reset.is_some()
    }

    /// Apply all designations in `config`.
    ///
    /// Designations naming unknown pins are skipped and returned, so
    /// the caller decides whether to go on without them.
    pub fn configure(&mut self, config: SignalConfig) -> Vec<ModuleError> {
        let mut rejected = Vec::new();
        if let Some(clock) = config.clock {
            if let Err(e) = self.set_clock(&clock) {
                rejected.push(e);
            }
        }
        if let Some(ResetSpec { signal, polarity }) = config.reset {
            if let Err(e) = self.set_reset(&signal, polarity) {
                rejected.push(e);
            }
        }
        rejected
    }

    /// Testbench-side declaration of a pin: a `reg` driving an input,
    /// or a `wire` observing an output, e.g. `wire [3:0] q`.
    ///
    /// Returns `None` for unknown pins and for `inout` pins, which are
    /// not declared in the harness.
    pub fn declaration_for(&self, pin: &str) -> Option<String> {
        let port = self.ports.get(pin)?;
        let kind = match port.direction {
            PortDirection::Input => "reg",
            PortDirection::Output => "wire",
            PortDirection::InOut => return None,
        };
        Some(match port.width {
            1 => format!("{} {}", kind, port.name),
            w => format!("{} {} {}", kind, BitRange::from_width(w), port.name),
        })
    }
}

#[cfg(test)]
fn sample() -> ModuleInterface {
    use crate::StorageClass::*;
    use PortDirection::*;
    let ports = [
        Port::new("clk", Input, Wire, 1),
        Port::new("rst", Input, Wire, 1),
        Port::new("d", Input, Wire, 8),
        Port::new("q", Output, Reg, 4),
        Port::new("io", InOut, Wire, 2),
    ].into_iter().map(|p| (p.name.clone(), p)).collect();
    ModuleInterface::new("m", ports)
}

#[test]
fn test_declarations() {
    let m = sample();
    assert_eq!(m.declaration_for("clk").as_deref(), Some("reg clk"));
    assert_eq!(m.declaration_for("d").as_deref(), Some("reg [7:0] d"));
    assert_eq!(m.declaration_for("q").as_deref(), Some("wire [3:0] q"));
    assert_eq!(m.declaration_for("io"), None);
    assert_eq!(m.declaration_for("nope"), None);
    assert_eq!(m.testbench_name(), "m_tb");
}

#[test]
fn test_designations() {
    let mut m = sample();
    assert!(!m.has_clock() && !m.has_reset());
    assert_eq!(m.set_clock("clock"), Err(ModuleError::UnknownSignal {
        role: SignalRole::Clock, name: "clock".into()
    }));
    assert!(!m.has_clock());
    m.set_clock("clk").unwrap();
    assert_eq!(m.clock.as_deref(), Some("clk"));

    let rejected = m.configure(SignalConfig {
        clock: None,
        reset: Some(ResetSpec { signal: "reset".into(), polarity: ResetPolarity::LevelHigh }),
    });
    assert_eq!(rejected.len(), 1);
    assert!(!m.has_reset());
    assert!(m.configure(SignalConfig {
        clock: None,
        reset: Some(ResetSpec { signal: "rst".into(), polarity: ResetPolarity::EdgeHigh }),
    }).is_empty());
    assert_eq!(m.reset.as_ref().map(|r| r.polarity), Some(ResetPolarity::EdgeHigh));
}

#[test]
fn test_polarity_names() {
    for p in [ResetPolarity::EdgeHigh, ResetPolarity::EdgeLow,
              ResetPolarity::LevelHigh, ResetPolarity::LevelLow] {
        assert_eq!(p.to_string().parse::<ResetPolarity>(), Ok(p));
    }
    assert_eq!(ResetPolarity::default(), ResetPolarity::EdgeLow);
    assert!(matches!("edge".parse::<ResetPolarity>(),
                     Err(ModuleError::UnknownPolarity(s)) if s == "edge"));
}
