use std::fmt;
use itertools::Itertools;

use super::*;

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use PortDirection::*;
        write!(f, "{}", match self {
            Input => "input",
            Output => "output",
            InOut => "inout",
        })
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            StorageClass::Wire => "wire",
            StorageClass::Reg => "reg",
        })
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.width {
            1 => write!(f, "{} {} {}", self.direction, self.storage, self.name),
            w => write!(f, "{} {} {} {}", self.direction, self.storage,
                        BitRange::from_width(w), self.name),
        }
    }
}

/// Prints the header back, with resolved widths, e.g.
/// `module m(input wire clk, output reg [3:0] q);`
impl fmt::Display for ModuleInterface {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "module {}({});", self.name, self.ports.values().format(", "))
    }
}

/// An instantiation of a module binding every port to a same-named
/// signal, e.g.
/// ```text
/// m tb_object(
///     .clk(clk),
///     .q(q)
/// );
/// ```
pub struct Instantiation<'i> {
    pub interface: &'i ModuleInterface,
    pub instance: &'i str,
}

impl fmt::Display for Instantiation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let ports = &self.interface.ports;
        if ports.is_empty() {
            return write!(f, "{} {}();", self.interface.name, self.instance)
        }
        writeln!(f, "{} {}(", self.interface.name, self.instance)?;
        writeln!(f, "{}", ports.keys().format_with(",\n", |p, f| {
            f(&format_args!("    .{}({})", p, p))
        }))?;
        write!(f, ");")
    }
}

#[test]
fn test_fmt_roundtrip() {
    let header = ModuleHeader::parse_str(
        "module m(input clk, inout wire [0:1] io, output reg [3:0] q);", None
    ).unwrap();
    assert_eq!(format!("{}", header.interface),
               "module m(input wire clk, inout wire [1:0] io, output reg [3:0] q);");
    assert_eq!(format!("{}", Instantiation {
        interface: &header.interface, instance: "dut"
    }), "m dut(\n    .clk(clk),\n    .io(io),\n    .q(q)\n);");
}
