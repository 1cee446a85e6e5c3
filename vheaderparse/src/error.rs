//! Error types reported while parsing a module header or
//! designating its clock and reset pins.

use compact_str::CompactString;
use std::fmt;

use crate::BitRange;

/// Errors raised while locating and parsing a module header.
///
/// [`HeaderError::UnterminatedBlockComment`] and
/// [`HeaderError::UnexpectedToken`] are recoverable: the parser records
/// them in [`ModuleHeader::diagnostics`](crate::ModuleHeader) and keeps
/// going. All other kinds abort the parse.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
    /// The source does not contain a single `module` keyword.
    #[error("no modules in the specified source")]
    NoModulesFound,

    /// Modules exist, but none carries the requested name.
    #[error("no module `{0}` found in the specified source")]
    TargetModuleNotFound(CompactString),

    /// A `/*` whose closing `*/` never appears.
    #[error("syntax error: expected matching \"*/\"")]
    UnterminatedBlockComment,

    /// A token that does not fit the header grammar.
    #[error("syntax error: expected {expected}, found \"{found}\"")]
    UnexpectedToken {
        /// What the parser was looking for.
        expected: &'static str,
        /// What it got instead.
        found: CompactString,
    },

    /// The source ended in the middle of a header.
    #[error("unexpected end of source while parsing {context}")]
    UnexpectedEof {
        /// The construct being parsed.
        context: &'static str,
    },

    /// A range bound that is neither an integer literal nor a parameter
    /// holding one.
    #[error("cannot resolve range bound \"{bound}\" to an integer")]
    InvalidBound {
        /// The bound as written.
        bound: CompactString,
    },

    /// A range whose bit count does not fit in a `usize`.
    #[error("range {range} is too wide")]
    RangeTooWide {
        range: BitRange,
    },

    /// The source could not be read.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which special role a designated pin plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalRole {
    Clock,
    Reset,
}

impl fmt::Display for SignalRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            SignalRole::Clock => "clock",
            SignalRole::Reset => "reset",
        })
    }
}

/// Errors raised by the module interface model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModuleError {
    /// A clock or reset designation names a pin the module lacks.
    #[error("module error: {role} signal \"{name}\" not found, but was expected")]
    UnknownSignal {
        role: SignalRole,
        name: CompactString,
    },

    /// A reset sensitivity string outside the supported four.
    #[error("unknown reset sensitivity \"{0}\", expected one of \
             level-high, level-low, edge-high, edge-low")]
    UnknownPolarity(String),
}

#[test]
fn test_error_display() {
    let e = HeaderError::TargetModuleNotFound("alu".into());
    assert_eq!(e.to_string(), "no module `alu` found in the specified source");
    let e = HeaderError::UnexpectedToken {
        expected: "\"//\" or \"/*\"", found: "/x".into()
    };
    assert!(e.to_string().contains("found \"/x\""));
    let e = ModuleError::UnknownSignal {
        role: SignalRole::Clock, name: "clk".into()
    };
    assert_eq!(e.to_string(),
               "module error: clock signal \"clk\" not found, but was expected");
}
