//! A lazy token stream over line-oriented source text.
//!
//! Lines are fetched from the underlying [`BufRead`] only when the
//! tokens of the current line are used up, so the whole file is never
//! buffered. Every run of whitespace separates tokens, and every
//! configured delimiter character is a token of its own, even when it
//! is glued to an identifier (`a[7:0]` gives `a`, `[`, `7`, `:`, `0`, `]`).

use std::io::{self, BufRead};
use compact_str::CompactString;
use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

/// Delimiters used when scanning Verilog module headers.
pub const VERILOG_DELIMITERS: &[char] = &[
    ',', '(', ')', '[', ']', ':', ';', '/', '*', '#', '=',
];

lazy_static! {
    static ref VERILOG_PATTERN: Option<Regex> = build_pattern(VERILOG_DELIMITERS);
}

/// Build a regex matching exactly one of the given delimiter characters.
///
/// Returns `None` for an empty delimiter set, in which case only
/// whitespace separates tokens.
pub fn build_pattern(delimiters: &[char]) -> Option<Regex> {
    if delimiters.is_empty() {
        return None
    }
    let class = delimiters.iter()
        .map(|c| regex::escape(c.encode_utf8(&mut [0u8; 4])))
        .join("");
    // every member is escaped, so the class is always well-formed.
    Some(Regex::new(&format!("[{}]", class))
         .expect("escaped delimiter class is a valid regex"))
}

/// Split one line into tokens, appending them to `out`.
pub fn tokenize_line(
    line: &str, pattern: Option<&Regex>, out: &mut Vec<CompactString>
) {
    for word in line.split_whitespace() {
        let Some(pattern) = pattern else {
            out.push(word.into());
            continue
        };
        let mut last = 0;
        for m in pattern.find_iter(word) {
            if m.start() > last {
                out.push(word[last..m.start()].into());
            }
            out.push(m.as_str().into());
            last = m.end();
        }
        if last < word.len() {
            out.push(word[last..].into());
        }
    }
}

/// Token stream with one line of lookahead at most.
///
/// `None` returned from any accessor is the end-of-stream marker.
pub struct TokenStream<R> {
    source: R,
    pattern: Option<Regex>,
    /// tokens of the current line.
    tokens: Vec<CompactString>,
    /// position of the current token inside `tokens`.
    offset: usize,
    line_no: usize,
    buf: String,
    exhausted: bool,
    io_error: Option<io::Error>,
}

impl<R: BufRead> TokenStream<R> {
    /// Create a token stream using [`VERILOG_DELIMITERS`].
    pub fn new(source: R) -> TokenStream<R> {
        Self::with_pattern(source, VERILOG_PATTERN.clone())
    }

    /// Create a token stream splitting on a custom delimiter set.
    pub fn with_delimiters(source: R, delimiters: &[char]) -> TokenStream<R> {
        Self::with_pattern(source, build_pattern(delimiters))
    }

    fn with_pattern(source: R, pattern: Option<Regex>) -> TokenStream<R> {
        TokenStream {
            source, pattern,
            tokens: Vec::new(),
            offset: 0,
            line_no: 0,
            buf: String::new(),
            exhausted: false,
            io_error: None,
        }
    }

    /// Read the next line into the token buffer.
    /// Returns false if the source is exhausted.
    fn fetch_next_line(&mut self) -> bool {
        if self.exhausted {
            return false
        }
        self.buf.clear();
        self.tokens.clear();
        self.offset = 0;
        match self.source.read_line(&mut self.buf) {
            Ok(0) => {
                self.exhausted = true;
                false
            },
            Ok(_) => {
                self.line_no += 1;
                tokenize_line(&self.buf, self.pattern.as_ref(), &mut self.tokens);
                true
            },
            Err(e) => {
                clilog::error!(EREADLINE, "read failed after line {}: {}",
                               self.line_no, e);
                self.io_error = Some(e);
                self.exhausted = true;
                false
            }
        }
    }

    /// The current token, without consuming it.
    ///
    /// Lines without any token are skipped silently.
    pub fn peek(&mut self) -> Option<&str> {
        while self.offset >= self.tokens.len() {
            if !self.fetch_next_line() {
                return None
            }
        }
        Some(self.tokens[self.offset].as_str())
    }

    /// The current token, advancing one position.
    pub fn poll(&mut self) -> Option<CompactString> {
        self.peek()?;
        let token = std::mem::take(&mut self.tokens[self.offset]);
        self.offset += 1;
        Some(token)
    }

    /// Consume tokens until one equals `target`, which is left as the
    /// current token.
    pub fn advance_until(&mut self, target: &str) -> Option<&str> {
        loop {
            let hit = match self.peek() {
                None => return None,
                Some(t) => t == target
            };
            if hit { break }
            self.offset += 1;
        }
        self.peek()
    }

    /// Consume tokens while they equal `target`.
    pub fn advance_until_not(&mut self, target: &str) -> Option<&str> {
        loop {
            let hit = match self.peek() {
                None => return None,
                Some(t) => t == target
            };
            if !hit { break }
            self.offset += 1;
        }
        self.peek()
    }

    /// Consume tokens until the exact ordered `sequence` has been consumed.
    ///
    /// Returns the last token of the sequence, or `None` if the stream
    /// ran out first.
    pub fn find_sequence(&mut self, sequence: &[&str]) -> Option<CompactString> {
        let first = *sequence.first()?;
        while self.advance_until(first).is_some() {
            let mut matched = 0;
            let mut last = None;
            while matched < sequence.len() && self.peek() == Some(sequence[matched]) {
                last = self.poll();
                matched += 1;
            }
            if matched == sequence.len() {
                return last
            }
        }
        None
    }

    /// Discard the remaining tokens of the current line.
    #[inline]
    pub fn drop_line(&mut self) {
        self.offset = self.tokens.len();
    }

    /// 1-based number of the line the current token comes from.
    #[inline]
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    /// Take the I/O error that terminated the stream, if any.
    pub fn take_io_error(&mut self) -> Option<io::Error> {
        self.io_error.take()
    }
}

impl<R: BufRead> Iterator for TokenStream<R> {
    type Item = CompactString;

    #[inline]
    fn next(&mut self) -> Option<CompactString> {
        self.poll()
    }
}

#[cfg(test)]
fn collect(s: &str) -> Vec<CompactString> {
    TokenStream::new(s.as_bytes()).collect()
}

#[test]
fn test_tokenize_glued_delimiters() {
    assert_eq!(collect("input wire a[7:0],"),
               vec!["input", "wire", "a", "[", "7", ":", "0", "]", ","]);
    assert_eq!(collect("#(parameter W=8)"),
               vec!["#", "(", "parameter", "W", "=", "8", ")"]);
}

#[test]
fn test_skip_blank_lines() {
    let mut s = TokenStream::new("\n   \n\t\u{3000}\nmodule\n\n m".as_bytes());
    assert_eq!(s.peek(), Some("module"));
    assert_eq!(s.line_no(), 4);
    assert_eq!(s.poll().as_deref(), Some("module"));
    assert_eq!(s.poll().as_deref(), Some("m"));
    assert_eq!(s.peek(), None);
    assert_eq!(s.poll(), None);
}

#[test]
fn test_never_whitespace_tokens() {
    let src = "  a\t\tb  (c ,d)\r\n\u{a0}e//f \n";
    for pattern in [build_pattern(&[]), build_pattern(&['(', ',']),
                    build_pattern(VERILOG_DELIMITERS)] {
        let mut out = Vec::new();
        for line in src.lines() {
            tokenize_line(line, pattern.as_ref(), &mut out);
        }
        assert!(out.iter().all(|t| !t.is_empty() && !t.contains(char::is_whitespace)));
        // joining tokens recovers the text modulo whitespace.
        let joined: String = out.iter().map(|t| t.as_str()).collect();
        let stripped: String = src.chars().filter(|c| !c.is_whitespace()).collect();
        assert_eq!(joined, stripped);
    }
}

#[test]
fn test_advance() {
    let mut s = TokenStream::new("a b\nc c c d\ne".as_bytes());
    assert_eq!(s.advance_until("c"), Some("c"));
    assert_eq!(s.advance_until_not("c"), Some("d"));
    assert_eq!(s.advance_until("x"), None);
    assert_eq!(s.advance_until_not("x"), None);
}

#[test]
fn test_find_sequence() {
    let mut s = TokenStream::new("/* a * b\n ** c */ d".as_bytes());
    s.poll();
    s.poll();
    assert_eq!(s.find_sequence(&["*", "/"]).as_deref(), Some("/"));
    assert_eq!(s.poll().as_deref(), Some("d"));

    let mut s = TokenStream::new("/* never closed *\n x".as_bytes());
    assert_eq!(s.find_sequence(&["*", "/"]), None);
    assert_eq!(s.peek(), None);
}

#[test]
fn test_drop_line() {
    let mut s = TokenStream::new("a // rest of line\nb".as_bytes());
    assert_eq!(s.poll().as_deref(), Some("a"));
    s.poll();
    s.poll();
    s.drop_line();
    assert_eq!(s.poll().as_deref(), Some("b"));
}

#[test]
fn test_custom_delimiters() {
    let mut s = TokenStream::with_delimiters("a=b;c\n\nd;;e=f".as_bytes(), &[';']);
    let tokens: Vec<CompactString> = s.by_ref().collect();
    assert_eq!(tokens, vec!["a=b", ";", "c", "d", ";", ";", "e=f"]);
    assert_eq!(s.line_no(), 3);

    let mut s = TokenStream::with_delimiters("x(y)\n".as_bytes(), &[]);
    assert_eq!(s.poll().as_deref(), Some("x(y)"));
    assert_eq!(s.poll(), None);
}
