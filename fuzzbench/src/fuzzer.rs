//! Stimulus synthesis: the initial reset wave and the timed reset
//! assert/deassert transitions, derived from a module interface alone.

use std::fmt;
use compact_str::CompactString;
use indexmap::IndexMap;
use vheaderparse::{ModuleInterface, Port, PortDirection, ResetPolarity};

/// A sized binary literal such as `8'b00000000`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitLiteral {
    width: usize,
    /// one `0`/`1` character per bit, msb first.
    bits: CompactString,
}

impl BitLiteral {
    /// All-zero literal of the given width.
    pub fn zeros(width: usize) -> BitLiteral {
        BitLiteral { width, bits: "0".repeat(width).into() }
    }

    /// A single-bit `1'b1` or `1'b0`.
    pub fn bit(high: bool) -> BitLiteral {
        BitLiteral { width: 1, bits: CompactString::from(if high { "1" } else { "0" }) }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
}

impl fmt::Display for BitLiteral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}'b{}", self.width, self.bits)
    }
}

/// Signal to value assignments, kept in insertion order.
pub type Assignments = IndexMap<CompactString, BitLiteral>;

/// A set of assignments taking effect together after `delay` time units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wave {
    pub delay: u64,
    pub values: Assignments,
}

/// Prints the wave as procedural statements, one per line, preceded by
/// a `#delay` line if the delay is nonzero.
impl fmt::Display for Wave {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.delay > 0 && !self.values.is_empty() {
            writeln!(f, "#{}", self.delay)?;
        }
        for (signal, value) in &self.values {
            writeln!(f, "{} = {};", signal, value)?;
        }
        Ok(())
    }
}

/// Level that keeps the reset released.
fn inactive_level(polarity: ResetPolarity) -> bool {
    use ResetPolarity::*;
    match polarity {
        EdgeHigh => false,
        EdgeLow => true,
        LevelHigh => true,
        LevelLow => false,
    }
}

/// Level that asserts an edge-sensitive reset.
///
/// Level-sensitive polarities get no transition at all.
// TODO: decide on assert/release levels for level-high and level-low.
fn edge_active_level(polarity: ResetPolarity) -> Option<bool> {
    use ResetPolarity::*;
    match polarity {
        EdgeHigh => Some(true),
        EdgeLow => Some(false),
        LevelHigh | LevelLow => None,
    }
}

/// Derives stimuli for one module interface.
///
/// The calls are expected in the order [`Fuzzer::reset_wave`],
/// [`Fuzzer::tick_edge_reset_on`], [`Fuzzer::tick_edge_reset_off`];
/// each tick adds its delay to the running [`Fuzzer::elapsed`] total.
pub struct Fuzzer<'i> {
    interface: &'i ModuleInterface,
    elapsed: u64,
}

impl<'i> Fuzzer<'i> {
    pub fn new(interface: &'i ModuleInterface) -> Fuzzer<'i> {
        Fuzzer { interface, elapsed: 0 }
    }

    /// Time units covered by the ticks so far, saturating at `u64::MAX`.
    #[inline]
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// All input ports, clock and reset included.
    pub fn driveable_ports(&self) -> impl Iterator<Item = &'i Port> {
        let interface = self.interface;
        interface.ports.values()
            .filter(|p| p.direction == PortDirection::Input)
    }

    /// Zero every input, then hold the reset (if any) released.
    pub fn reset_wave(&self) -> Wave {
        let mut wave = Wave::default();
        for port in self.driveable_ports() {
            wave.values.insert(port.name.clone(), BitLiteral::zeros(port.width));
        }
        if let Some(reset) = &self.interface.reset {
            wave.values.insert(reset.signal.clone(),
                               BitLiteral::bit(inactive_level(reset.polarity)));
        }
        wave
    }

    /// Assert an edge-sensitive reset after `delay`.
    pub fn tick_edge_reset_on(&mut self, delay: u64, mut diff: Assignments) -> Assignments {
        if let Some(reset) = &self.interface.reset {
            self.elapsed = self.elapsed.saturating_add(delay);
            if let Some(active) = edge_active_level(reset.polarity) {
                diff.insert(reset.signal.clone(), BitLiteral::bit(active));
            }
        }
        diff
    }

    /// Release an edge-sensitive reset after `delay`.
    pub fn tick_edge_reset_off(&mut self, delay: u64, mut diff: Assignments) -> Assignments {
        if let Some(reset) = &self.interface.reset {
            self.elapsed = self.elapsed.saturating_add(delay);
            if let Some(active) = edge_active_level(reset.polarity) {
                diff.insert(reset.signal.clone(), BitLiteral::bit(!active));
            }
        }
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vheaderparse::{ModuleHeader, ResetPolarity::*};

    fn interface(reset: Option<ResetPolarity>) -> ModuleInterface {
        let mut iface = ModuleHeader::parse_str(
            "module m(input wire clk, input wire rst, input wire [7:0] d, \
             output reg [3:0] q, inout wire io);", None
        ).unwrap().interface;
        if let Some(polarity) = reset {
            iface.set_reset("rst", polarity).unwrap();
        }
        iface
    }

    fn show(a: &Assignments) -> Vec<String> {
        a.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }

    #[test]
    fn literal_display() {
        assert_eq!(BitLiteral::zeros(8).to_string(), "8'b00000000");
        assert_eq!(BitLiteral::zeros(1).to_string(), "1'b0");
        assert_eq!(BitLiteral::bit(true).to_string(), "1'b1");
        assert_eq!(BitLiteral::zeros(3).width(), 3);
    }

    #[test]
    fn driveables_are_inputs() {
        let iface = interface(None);
        let fuzzer = Fuzzer::new(&iface);
        let names: Vec<&str> = fuzzer.driveable_ports().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["clk", "rst", "d"]);
    }

    #[test]
    fn no_reset_leaves_accumulator_alone() {
        let iface = interface(None);
        let mut fuzzer = Fuzzer::new(&iface);
        let wave = fuzzer.reset_wave();
        assert_eq!(wave.delay, 0);
        assert_eq!(show(&wave.values), vec!["clk=1'b0", "rst=1'b0", "d=8'b00000000"]);

        let mut acc = Assignments::new();
        acc.insert("d".into(), BitLiteral::zeros(8));
        let on = fuzzer.tick_edge_reset_on(200, acc.clone());
        assert_eq!(on, acc);
        let off = fuzzer.tick_edge_reset_off(200, acc.clone());
        assert_eq!(off, acc);
        assert_eq!(fuzzer.elapsed(), 0);
    }

    #[test]
    fn edge_low_sequence() {
        let iface = interface(Some(EdgeLow));
        let mut fuzzer = Fuzzer::new(&iface);
        assert_eq!(fuzzer.reset_wave().values["rst"].to_string(), "1'b1");
        let on = fuzzer.tick_edge_reset_on(200, Assignments::new());
        assert_eq!(show(&on), vec!["rst=1'b0"]);
        let off = fuzzer.tick_edge_reset_off(200, Assignments::new());
        assert_eq!(show(&off), vec!["rst=1'b1"]);
        assert_eq!(fuzzer.elapsed(), 400);
    }

    #[test]
    fn edge_high_sequence() {
        let iface = interface(Some(EdgeHigh));
        let mut fuzzer = Fuzzer::new(&iface);
        assert_eq!(fuzzer.reset_wave().values["rst"].to_string(), "1'b0");
        assert_eq!(show(&fuzzer.tick_edge_reset_on(10, Assignments::new())),
                   vec!["rst=1'b1"]);
        assert_eq!(show(&fuzzer.tick_edge_reset_off(10, Assignments::new())),
                   vec!["rst=1'b0"]);
    }

    #[test]
    fn level_polarities_have_no_transitions() {
        for (polarity, idle) in [(LevelHigh, "1'b1"), (LevelLow, "1'b0")] {
            let iface = interface(Some(polarity));
            let mut fuzzer = Fuzzer::new(&iface);
            assert_eq!(fuzzer.reset_wave().values["rst"].to_string(), idle);
            assert!(fuzzer.tick_edge_reset_on(5, Assignments::new()).is_empty());
            assert!(fuzzer.tick_edge_reset_off(5, Assignments::new()).is_empty());
            assert_eq!(fuzzer.elapsed(), 10);
        }
    }

    #[test]
    fn elapsed_saturates() {
        let iface = interface(Some(EdgeLow));
        let mut fuzzer = Fuzzer::new(&iface);
        fuzzer.tick_edge_reset_on(u64::MAX, Assignments::new());
        fuzzer.tick_edge_reset_off(u64::MAX, Assignments::new());
        assert_eq!(fuzzer.elapsed(), u64::MAX);
    }

    #[test]
    fn wave_display() {
        let mut wave = Wave::default();
        wave.values.insert("a".into(), BitLiteral::bit(true));
        assert_eq!(wave.to_string(), "a = 1'b1;\n");
        wave.delay = 50;
        assert_eq!(wave.to_string(), "#50\na = 1'b1;\n");
        assert_eq!(Wave { delay: 50, values: Assignments::new() }.to_string(), "");
    }
}
