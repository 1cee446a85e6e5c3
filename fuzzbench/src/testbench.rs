//! Emission of the testbench text.

use std::fmt::{self, Write};
use vheaderparse::{Instantiation, ModuleInterface};

use crate::config::INSTANCE_NAME;
use crate::fuzzer::{Assignments, Fuzzer, Wave};

/// A synthesized testbench for one module interface, printable as
/// verilog through [`fmt::Display`].
pub struct Testbench<'i> {
    interface: &'i ModuleInterface,
    pulse: u64,
    reset_wave: Wave,
    /// delay before each reset transition.
    reset_delay: u64,
    reset_on: Assignments,
    reset_off: Assignments,
}

impl<'i> Testbench<'i> {
    /// Compute all stimuli. Reset transitions are spaced by one full
    /// clock period (`2 * pulse`), saturating at `u64::MAX`.
    pub fn synthesize(interface: &'i ModuleInterface, pulse: u64) -> Testbench<'i> {
        let reset_delay = pulse.saturating_mul(2);
        let mut fuzzer = Fuzzer::new(interface);
        let reset_wave = fuzzer.reset_wave();
        let reset_on = fuzzer.tick_edge_reset_on(reset_delay, Assignments::new());
        let reset_off = fuzzer.tick_edge_reset_off(reset_delay, Assignments::new());
        clilog::debug!(DSTIMULUS, "stimulus of {} spans {} time units",
                       interface.name, fuzzer.elapsed());
        Testbench {
            interface, pulse, reset_wave, reset_delay, reset_on, reset_off
        }
    }
}

impl fmt::Display for Testbench<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let iface = self.interface;
        writeln!(f, "module {};", iface.testbench_name())?;
        writeln!(f)?;
        for decl in iface.ports.keys().filter_map(|p| iface.declaration_for(p)) {
            writeln!(f, "{};", decl)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", Instantiation { interface: iface, instance: INSTANCE_NAME })?;
        writeln!(f)?;

        if let Some(clock) = &iface.clock {
            writeln!(f, "always begin")?;
            let mut ind = indenter::indented(f)
                .with_format(indenter::Format::Uniform { indentation: "    " });
            writeln!(ind, "{} = #{} ~{};", clock, self.pulse, clock)?;
            writeln!(f, "end")?;
            writeln!(f)?;
        }

        writeln!(f, "initial begin")?;
        let mut ind = indenter::indented(f)
            .with_format(indenter::Format::Uniform { indentation: "    " });
        write!(ind, "{}", self.reset_wave)?;
        for diff in [&self.reset_on, &self.reset_off] {
            for (signal, value) in diff {
                writeln!(ind, "{} = #{} {};", signal, self.reset_delay, value)?;
            }
        }
        writeln!(f, "end")?;
        writeln!(f)?;
        writeln!(f, "endmodule")
    }
}
