//! Parameter list resolution: `#( parameter W = 8, ... )`.

use std::collections::HashMap;
use std::io::BufRead;
use compact_str::CompactString;

use crate::TokenStream;

/// Parameter name to its literal value as written.
///
/// Values are kept as text; only those that parse as integers are
/// useful for width resolution.
pub type ParameterTable = HashMap<CompactString, CompactString>;

/// Skip tokens until the next `parameter` keyword at nesting depth 0.
///
/// Returns false if the list closed or the stream ended first.
fn skip_to_keyword<R: BufRead>(
    stream: &mut TokenStream<R>, mut depth: usize
) -> bool {
    loop {
        match stream.peek() {
            None => return false,
            Some("parameter") if depth == 0 => return true,
            Some(")") if depth == 0 => {
                stream.poll();
                return false
            },
            Some("(") => depth += 1,
            Some(")") => depth -= 1,
            Some(_) => {}
        }
        stream.poll();
    }
}

/// Parse a parenthesized parameter list, starting anywhere before its
/// opening `(` and consuming through the matching `)`.
///
/// Tokens between clauses are skipped until the next `parameter`
/// keyword. Any type or range between the keyword and the name is
/// skipped as well: the name is the last token before `=`.
pub fn parse_parameters<R: BufRead>(stream: &mut TokenStream<R>) -> ParameterTable {
    let mut params = ParameterTable::new();
    if stream.advance_until("(").is_none() {
        return params
    }
    stream.poll();

    let mut depth = 0;
    while skip_to_keyword(stream, depth) {
        depth = 0;
        stream.poll(); // `parameter`

        let mut name = None;
        loop {
            let Some(token) = stream.poll() else { return params };
            match token.as_str() {
                "=" => break,
                "(" => depth += 1,
                ")" if depth == 0 => return params,
                ")" => depth -= 1,
                _ => name = Some(token),
            }
        }
        depth = 0;
        let Some(value) = stream.poll() else { return params };
        match value.as_str() {
            ")" => return params,
            "(" => {
                // a parenthesized value expression is not evaluated.
                depth = 1;
                continue
            },
            _ => {}
        }
        let Some(name) = name else {
            clilog::warn!(WPARAMNAME, "parameter without a name near line {}",
                          stream.line_no());
            continue
        };
        // a value naming an earlier parameter takes over its value.
        let value = params.get(&value).cloned().unwrap_or(value);
        clilog::debug!(DPARAM, "Parameter {} = {}", name, value);
        params.insert(name, value);
    }
    params
}

#[cfg(test)]
fn parse(s: &str) -> (ParameterTable, Option<CompactString>) {
    let mut stream = TokenStream::new(s.as_bytes());
    let params = parse_parameters(&mut stream);
    (params, stream.poll())
}

#[test]
fn test_parameters() {
    let (p, rest) = parse("#(parameter W = 8, parameter D=4) (input");
    assert_eq!(p.len(), 2);
    assert_eq!(p["W"], "8");
    assert_eq!(p["D"], "4");
    assert_eq!(rest.as_deref(), Some("("));
}

#[test]
fn test_parameters_typed_and_chained() {
    let (p, _) = parse("#(\n parameter integer W = 16,\n parameter [3:0] N = W\n)");
    assert_eq!(p["W"], "16");
    assert_eq!(p["N"], "16");
}

#[test]
fn test_parameters_empty_and_nested() {
    let (p, rest) = parse("#() (a");
    assert!(p.is_empty());
    assert_eq!(rest.as_deref(), Some("("));

    let (p, rest) = parse("#(parameter A = 2, parameter B = $clog2(A), parameter C = 3) x");
    assert_eq!(p["A"], "2");
    assert_eq!(p["B"], "$clog2");
    assert_eq!(p["C"], "3");
    assert_eq!(rest.as_deref(), Some("x"));
}

#[test]
fn test_parameters_truncated() {
    let (p, rest) = parse("#(parameter A = 1, parameter B");
    assert_eq!(p.len(), 1);
    assert_eq!(rest, None);
}
