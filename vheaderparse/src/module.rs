//! Locating a module and parsing its header, as an explicit state machine.

use std::io::BufRead;
use compact_str::CompactString;
use indexmap::IndexMap;

use crate::{
    parse_parameters, parse_port, HeaderError, ModuleHeader,
    ModuleInterface, ParameterTable, Port, TokenStream,
};

/// Parser states. The payload is the module name once known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ParseState {
    SeekingModule,
    FoundModule(CompactString),
    MatchedTarget(CompactString),
    ParsingParameters(CompactString),
    ParsingPorts(CompactString),
    Done(CompactString),
}

pub(crate) struct ModuleParser<'t, R> {
    stream: TokenStream<R>,
    target: Option<&'t str>,
    modules_seen: usize,
    params: ParameterTable,
    ports: IndexMap<CompactString, Port>,
    diagnostics: Vec<HeaderError>,
}

impl<'t, R: BufRead> ModuleParser<'t, R> {
    pub(crate) fn new(stream: TokenStream<R>, target: Option<&'t str>) -> Self {
        ModuleParser {
            stream, target,
            modules_seen: 0,
            params: ParameterTable::new(),
            ports: IndexMap::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Drive the state machine to `Done` and assemble the header.
    pub(crate) fn run(mut self) -> Result<ModuleHeader, HeaderError> {
        let mut state = ParseState::SeekingModule;
        let name = loop {
            state = match state {
                ParseState::Done(name) => break name,
                state => self.step(state)?
            };
        };
        if let Some(e) = self.stream.take_io_error() {
            return Err(e.into())
        }
        Ok(ModuleHeader {
            interface: ModuleInterface::new(name, self.ports),
            diagnostics: self.diagnostics,
        })
    }

    /// Perform one transition.
    pub(crate) fn step(&mut self, state: ParseState) -> Result<ParseState, HeaderError> {
        use ParseState::*;
        Ok(match state {
            SeekingModule => {
                loop {
                    match self.stream.peek() {
                        None => return Err(self.not_found()),
                        Some("module") => break,
                        Some("/") => self.skip_comment(false),
                        Some(_) => { self.stream.poll(); }
                    }
                }
                self.stream.poll();
                let Some(candidate) = self.stream.poll() else {
                    return Err(self.not_found())
                };
                self.modules_seen += 1;
                FoundModule(candidate)
            },
            FoundModule(candidate) => match self.target {
                Some(t) if candidate != t => {
                    clilog::debug!(DSKIPMOD, "Skipping module {}", candidate);
                    SeekingModule
                },
                _ => {
                    clilog::info!("Found module: {}", candidate);
                    MatchedTarget(candidate)
                }
            },
            MatchedTarget(name) => {
                // `#` opens parameters only right after the name.
                let mut leading = true;
                loop {
                    match self.stream.peek() {
                        None => return Err(self.eof("module port list")),
                        Some("#") if leading => break ParsingParameters(name),
                        Some("(") => {
                            self.stream.poll();
                            break ParsingPorts(name)
                        },
                        Some(";") => {
                            clilog::debug!(DNOPORTS, "module {} has no port list", name);
                            break Done(name)
                        },
                        Some("/") => self.skip_comment(false),
                        Some(_) => {
                            self.stream.poll();
                            leading = false;
                        }
                    }
                }
            },
            ParsingParameters(name) => {
                self.params = parse_parameters(&mut self.stream);
                if self.stream.advance_until("(").is_none() {
                    return Err(self.eof("module port list"))
                }
                self.stream.poll();
                ParsingPorts(name)
            },
            ParsingPorts(name) => {
                self.skip_comments();
                while !matches!(self.stream.peek(), None | Some(")")) {
                    let port = match parse_port(&mut self.stream, &self.params) {
                        Ok(port) => port,
                        Err(e) => return Err(self.io_or(e))
                    };
                    if self.ports.contains_key(&port.name) {
                        clilog::warn!(WDUPPORT, "port {} redeclared, the last declaration wins",
                                      port.name);
                    }
                    self.ports.insert(port.name.clone(), port);

                    self.skip_comments();
                    if self.stream.peek() == Some(",") {
                        self.stream.poll();
                    }
                    self.skip_comments();
                }
                self.stream.poll();
                Done(name)
            },
            Done(name) => Done(name),
        })
    }

    /// Skip consecutive comments inside the port list.
    fn skip_comments(&mut self) {
        while self.stream.peek() == Some("/") {
            self.skip_comment(true);
        }
    }

    /// Skip one `//` or `/* */` comment; the stream is at `/`.
    ///
    /// A `/` not followed by `/` or `*` is reported only when
    /// `report_stray` is set, as it is legal outside the port list.
    fn skip_comment(&mut self, report_stray: bool) {
        self.stream.poll();
        match self.stream.peek() {
            Some("/") => {
                self.stream.poll();
                self.stream.drop_line();
            },
            Some("*") => {
                self.stream.poll();
                if self.stream.find_sequence(&["*", "/"]).is_none() {
                    self.report(HeaderError::UnterminatedBlockComment);
                }
            },
            found if report_stray => {
                let found = compact_str::format_compact!("/{}", found.unwrap_or(""));
                self.report(HeaderError::UnexpectedToken {
                    expected: "\"//\" or \"/*\"", found
                });
            },
            _ => {}
        }
    }

    fn report(&mut self, e: HeaderError) {
        clilog::warn!(WSYNTAX, "{} (line {})", e, self.stream.line_no());
        self.diagnostics.push(e);
    }

    /// Prefer a pending I/O error over a parse error caused by it.
    fn io_or(&mut self, e: HeaderError) -> HeaderError {
        match self.stream.take_io_error() {
            Some(io) => HeaderError::Io(io),
            None => e
        }
    }

    fn eof(&mut self, context: &'static str) -> HeaderError {
        self.io_or(HeaderError::UnexpectedEof { context })
    }

    fn not_found(&mut self) -> HeaderError {
        let e = match (self.target, self.modules_seen) {
            (Some(t), seen) if seen > 0 => HeaderError::TargetModuleNotFound(t.into()),
            _ => HeaderError::NoModulesFound
        };
        self.io_or(e)
    }
}

#[cfg(test)]
fn parser<'t>(s: &'static str, target: Option<&'t str>) -> ModuleParser<'t, &'static [u8]> {
    ModuleParser::new(TokenStream::new(s.as_bytes()), target)
}

#[test]
fn test_state_transitions() {
    use ParseState::*;
    let mut p = parser("// module fake\nmodule a(); module b #(parameter W = 1) (input [W:0] x);",
                       Some("b"));
    let mut state = p.step(SeekingModule).unwrap();
    assert_eq!(state, FoundModule("a".into()));
    state = p.step(state).unwrap();
    assert_eq!(state, SeekingModule);
    state = p.step(state).unwrap();
    assert_eq!(state, FoundModule("b".into()));
    state = p.step(state).unwrap();
    assert_eq!(state, MatchedTarget("b".into()));
    state = p.step(state).unwrap();
    assert_eq!(state, ParsingParameters("b".into()));
    state = p.step(state).unwrap();
    assert_eq!(state, ParsingPorts("b".into()));
    assert_eq!(p.params["W"], "1");
    state = p.step(state).unwrap();
    assert_eq!(state, Done("b".into()));
    assert_eq!(p.ports["x"].width, 2);
    assert_eq!(p.stream.poll().as_deref(), Some(";"));
}

#[test]
fn test_not_found() {
    let mut p = parser("wire a; // module\n", None);
    assert!(matches!(p.step(ParseState::SeekingModule), Err(HeaderError::NoModulesFound)));

    let mut p = parser("", Some("x"));
    assert!(matches!(p.step(ParseState::SeekingModule), Err(HeaderError::NoModulesFound)));

    let p = parser("module a(); endmodule\nmodule b(); endmodule", Some("c"));
    assert!(matches!(p.run(), Err(HeaderError::TargetModuleNotFound(t)) if t == "c"));
}

#[test]
fn test_unterminated_comment_in_ports() {
    use ParseState::*;
    let mut p = parser("input a, /* open\n input b\n", None);
    let state = p.step(ParsingPorts("m".into())).unwrap();
    assert_eq!(state, Done("m".into()));
    assert_eq!(p.ports.len(), 1);
    assert!(matches!(&p.diagnostics[..], [HeaderError::UnterminatedBlockComment]));
}

#[test]
fn test_stray_slash_in_ports() {
    use ParseState::*;
    let mut p = parser("input a, / input b)", None);
    assert_eq!(p.step(ParsingPorts("m".into())).unwrap(), Done("m".into()));
    assert_eq!(p.ports.keys().map(|k| k.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
    assert!(matches!(&p.diagnostics[..],
                     [HeaderError::UnexpectedToken { found, .. }] if found.as_str() == "/input"));
}

#[test]
fn test_portless_module() {
    use ParseState::*;
    let mut p = parser("; initial #5 $finish; endmodule", None);
    assert_eq!(p.step(MatchedTarget("tb".into())).unwrap(), Done("tb".into()));
    assert_eq!(p.stream.peek(), Some(";"));

    let header = parser("module tb; initial #5 $finish; endmodule\nmodule m(input a);", None)
        .run().unwrap();
    assert_eq!(header.interface.name, "tb");
    assert!(header.interface.ports.is_empty());

    let header = parser("module tb; endmodule\nmodule m(input a);", Some("m")).run().unwrap();
    assert_eq!(header.interface.ports.len(), 1);
}

#[test]
fn test_late_hash_is_not_parameters() {
    use ParseState::*;
    let mut p = parser("/* c */ #(parameter W = 1) (input a);", None);
    assert_eq!(p.step(MatchedTarget("m".into())).unwrap(), ParsingParameters("m".into()));
    let mut p = parser("x #5 (input a);", None);
    assert_eq!(p.step(MatchedTarget("m".into())).unwrap(), ParsingPorts("m".into()));
}
