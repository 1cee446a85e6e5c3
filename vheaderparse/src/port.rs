//! Parsing of a single ANSI port declaration:
//! `<direction> [<storage>] [signed] [ [<msb>:<lsb>] ] <name>`.

use std::io::BufRead;
use compact_str::CompactString;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{
    BitRange, HeaderError, ParameterTable, Port, PortDirection,
    StorageClass, TokenStream,
};

lazy_static! {
    static ref RE_SAFE_IDENT: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_\$]*$").unwrap();
}

fn poll_or_eof<R: BufRead>(
    stream: &mut TokenStream<R>, context: &'static str
) -> Result<CompactString, HeaderError> {
    stream.poll().ok_or(HeaderError::UnexpectedEof { context })
}

fn expect<R: BufRead>(
    stream: &mut TokenStream<R>, token: &'static str, expected: &'static str
) -> Result<(), HeaderError> {
    let found = poll_or_eof(stream, "port range")?;
    if found != token {
        return Err(HeaderError::UnexpectedToken { expected, found })
    }
    Ok(())
}

/// Resolve one range bound through the parameter table.
fn resolve_bound(
    bound: CompactString, params: &ParameterTable
) -> Result<isize, HeaderError> {
    let text = params.get(&bound).unwrap_or(&bound);
    text.parse::<isize>().map_err(|_| HeaderError::InvalidBound { bound })
}

/// Parse one port declaration, resolving its width through `params`.
///
/// A missing range gives width 1. A missing storage keyword defaults
/// to `wire`.
pub fn parse_port<R: BufRead>(
    stream: &mut TokenStream<R>, params: &ParameterTable
) -> Result<Port, HeaderError> {
    let dir_kw = poll_or_eof(stream, "port direction")?;
    let Some(direction) = PortDirection::from_keyword(&dir_kw) else {
        return Err(HeaderError::UnexpectedToken {
            expected: "\"input\", \"output\" or \"inout\"",
            found: dir_kw
        })
    };

    let mut storage = StorageClass::default();
    if let Some(s) = stream.peek().and_then(StorageClass::from_keyword) {
        storage = s;
        stream.poll();
    }
    if matches!(stream.peek(), Some("signed" | "unsigned")) {
        stream.poll();
    }

    let mut width = 1;
    if stream.peek() == Some("[") {
        stream.poll();
        let msb = resolve_bound(poll_or_eof(stream, "port range")?, params)?;
        expect(stream, ":", "\":\"")?;
        let lsb = resolve_bound(poll_or_eof(stream, "port range")?, params)?;
        expect(stream, "]", "\"]\"")?;
        let range = BitRange(msb, lsb);
        width = range.width().ok_or(HeaderError::RangeTooWide { range })?;
    }

    let name = poll_or_eof(stream, "port name")?;
    if !RE_SAFE_IDENT.is_match(&name) {
        return Err(HeaderError::UnexpectedToken {
            expected: "port name", found: name
        })
    }

    clilog::debug!(DPORT, "Pin {}, class: {}, storage: {}, size: {}",
                   name, direction, storage, width);
    Ok(Port::new(name, direction, storage, width))
}

#[cfg(test)]
fn parse(s: &str, params: &[(&str, &str)]) -> Result<Port, HeaderError> {
    let params = params.iter()
        .map(|(k, v)| (CompactString::from(*k), CompactString::from(*v)))
        .collect();
    parse_port(&mut TokenStream::new(s.as_bytes()), &params)
}

#[test]
fn test_port_plain() {
    use PortDirection::*;
    assert_eq!(parse("input wire [7:0] data", &[]).unwrap(),
               Port::new("data", Input, StorageClass::Wire, 8));
    assert_eq!(parse("output reg q", &[]).unwrap(),
               Port::new("q", Output, StorageClass::Reg, 1));
    assert_eq!(parse("inout wire [0:7] bus", &[]).unwrap().width, 8);
    assert_eq!(parse("input [3:0] a", &[]).unwrap(),
               Port::new("a", Input, StorageClass::Wire, 4));
    assert_eq!(parse("input wire signed [15:0] s", &[]).unwrap().width, 16);
}

#[test]
fn test_port_parameterized() {
    let p = parse("input wire [W:0] x", &[("W", "7")]).unwrap();
    assert_eq!(p.width, 8);
    let p = parse("input wire [LO:HI] x", &[("LO", "2"), ("HI", "5")]).unwrap();
    assert_eq!(p.width, 4);
    assert!(matches!(parse("input wire [W-1:0] x", &[("W", "8")]),
                     Err(HeaderError::InvalidBound { bound }) if bound == "W-1"));
    assert!(matches!(parse("input wire [N:0] x", &[]),
                     Err(HeaderError::InvalidBound { .. })));
}

#[test]
fn test_port_extreme_range() {
    let widest = format!("input wire [{}:{}] x", isize::MAX, isize::MIN);
    assert!(matches!(parse(&widest, &[]),
                     Err(HeaderError::RangeTooWide { range })
                     if range == BitRange(isize::MAX, isize::MIN)));
    let (hi, lo) = (isize::MAX.to_string(), (-isize::MAX).to_string());
    let p = parse("input wire [HI:LO] x", &[("HI", hi.as_str()), ("LO", lo.as_str())]).unwrap();
    assert_eq!(p.width, usize::MAX);
}

#[test]
fn test_port_malformed() {
    assert!(matches!(parse("wire a", &[]),
                     Err(HeaderError::UnexpectedToken { found, .. }) if found == "wire"));
    assert!(matches!(parse("input wire [7 0] a", &[]),
                     Err(HeaderError::UnexpectedToken { .. })));
    assert!(matches!(parse("input wire", &[]),
                     Err(HeaderError::UnexpectedEof { context: "port name" })));
    assert!(matches!(parse("input wire )", &[]),
                     Err(HeaderError::UnexpectedToken { expected: "port name", .. })));
}
