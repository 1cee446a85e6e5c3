//! A streaming parser for Verilog module headers.
//!
//! Only the port interface of one module is extracted: the module
//! name, its `#(parameter ...)` list (used to resolve bit widths), and
//! its ANSI-style port list. Module bodies are never parsed.
//!
//! # Usage
//!
//! Pass a `&str` to [ModuleHeader::parse_str], optionally naming the
//! module you want. Example:
//! ```
//! use vheaderparse::{ModuleHeader, PortDirection};
//!
//! let header = ModuleHeader::parse_str(r#"
//! module counter #(parameter W = 7) (
//!     input wire clk,       // clock
//!     output reg [W:0] q    /* count */
//! );
//! endmodule
//! "#, None).expect("parse error");
//! let iface = &header.interface;
//! assert_eq!(iface.name, "counter");
//! assert_eq!(iface.ports["q"].width, 8);
//! assert_eq!(iface.ports["clk"].direction, PortDirection::Input);
//! ```

use compact_str::CompactString;
use std::io::{BufRead, BufReader};

/// Direction of a module port.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum PortDirection {
    Input,
    Output,
    InOut,
}

impl PortDirection {
    /// Map a direction keyword to its direction.
    #[inline]
    pub fn from_keyword(kw: &str) -> Option<PortDirection> {
        use PortDirection::*;
        match kw {
            "input" => Some(Input),
            "output" => Some(Output),
            "inout" => Some(InOut),
            _ => None
        }
    }
}

/// Storage class of a module port.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub enum StorageClass {
    #[default]
    Wire,
    Reg,
}

impl StorageClass {
    /// Map a storage keyword to its storage class.
    #[inline]
    pub fn from_keyword(kw: &str) -> Option<StorageClass> {
        match kw {
            "wire" => Some(StorageClass::Wire),
            "reg" => Some(StorageClass::Reg),
            _ => None
        }
    }
}

/// A port at the module boundary. Immutable once parsed.
#[readonly::make]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    /// Port name. E.g. `data`
    pub name: CompactString,
    /// `input`, `output` or `inout`.
    pub direction: PortDirection,
    /// `wire` or `reg`.
    pub storage: StorageClass,
    /// Number of bits, at least 1.
    pub width: usize,
}

impl Port {
    /// Panics if `width` is zero.
    pub fn new(
        name: impl Into<CompactString>,
        direction: PortDirection,
        storage: StorageClass,
        width: usize
    ) -> Port {
        assert!(width >= 1, "port width must be positive");
        Port { name: name.into(), direction, storage, width }
    }
}

mod range;
pub use range::BitRange;

mod error;
pub use error::{HeaderError, ModuleError, SignalRole};

pub mod token_stream;
pub use token_stream::TokenStream;

mod params;
pub use params::{ParameterTable, parse_parameters};

mod port;
pub use port::parse_port;

mod interface;
pub use interface::{ModuleInterface, ResetPolarity, ResetSpec, SignalConfig};

mod module;

mod fmt;
pub use fmt::Instantiation;

/// A parsed module header together with the recoverable syntax errors
/// met along the way.
#[derive(Debug)]
pub struct ModuleHeader {
    /// The module's port interface.
    pub interface: ModuleInterface,
    /// Recoverable errors, in the order they were found.
    pub diagnostics: Vec<HeaderError>,
}

impl ModuleHeader {
    /// Parses the header of module `target` (or of the first module if
    /// `None`) from any buffered reader. Lines are read on demand.
    #[inline]
    pub fn parse_reader(
        source: impl BufRead, target: Option<&str>
    ) -> Result<ModuleHeader, HeaderError> {
        module::ModuleParser::new(TokenStream::new(source), target).run()
    }

    /// Parses a module header from a string of verilog code.
    #[inline]
    pub fn parse_str(
        s: &str, target: Option<&str>
    ) -> Result<ModuleHeader, HeaderError> {
        ModuleHeader::parse_reader(s.as_bytes(), target)
    }

    /// Parses a module header from the verilog file at the specific path.
    #[inline]
    pub fn parse_file(
        path: impl AsRef<std::path::Path>, target: Option<&str>
    ) -> Result<ModuleHeader, HeaderError> {
        let file = std::fs::File::open(path)?;
        ModuleHeader::parse_reader(BufReader::new(file), target)
    }
}
