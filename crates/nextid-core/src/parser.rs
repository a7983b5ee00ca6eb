//! Identifier parser for flat `Name = value,` enumerations
//!
//! A small line scanner rather than a grammar: the artifact is a flat list
//! of name/value pairs wrapped in a handful of structural lines.
//!
//! Scanner states:
//! - `Default`: collecting code on the current line
//! - `InComment`: inside a `/* ... */` block (may span lines)
//! - `Accepted`: an entry and its `,` separator were captured; only
//!   whitespace and comments may follow on this line
//!
//! The parser never fails. Lines it does not understand are skipped.

use crate::id_set::{Identifier, IdentifierSet, DEFAULT_THRESHOLD};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Scanner state carried from character to character (and across lines
/// while inside a block comment)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Default,
    InComment { after_entry: bool },
    Accepted,
}

impl ScanState {
    /// State at the start of a new line
    fn next_line(self) -> Self {
        match self {
            Self::InComment { .. } => Self::InComment { after_entry: false },
            Self::Default | Self::Accepted => Self::Default,
        }
    }
}

/// Extracts used identifiers from one snapshot of the enumeration artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierParser {
    threshold: Identifier,
}

impl Default for IdentifierParser {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl IdentifierParser {
    /// Create parser that drops values below `threshold`
    #[inline]
    #[must_use]
    pub fn new(threshold: Identifier) -> Self {
        Self { threshold }
    }

    /// Configured threshold
    #[inline]
    #[must_use]
    pub fn threshold(&self) -> Identifier {
        self.threshold
    }

    /// Parse snapshot text into an identifier set
    ///
    /// Empty or unrecognised input yields an empty set; the caller decides
    /// what emptiness means.
    #[must_use]
    pub fn parse(&self, text: &str) -> IdentifierSet {
        let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);
        let mut state = ScanState::Default;

        text.lines()
            .filter_map(|line| {
                state = state.next_line();
                scan_line(line, &mut state)
            })
            .collect::<IdentifierSet>()
            .at_or_above(self.threshold)
    }
}

/// Scan one line, returning its entry value if the line is a well-formed
/// `Name = value[,]` entry once comments are removed
fn scan_line(line: &str, state: &mut ScanState) -> Option<Identifier> {
    let mut code = String::new();
    let mut value = None;
    let mut rejected = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match *state {
            ScanState::InComment { after_entry } => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    *state = if after_entry {
                        ScanState::Accepted
                    } else {
                        ScanState::Default
                    };
                }
            }
            ScanState::Default | ScanState::Accepted => {
                if c == '/' && chars.peek() == Some(&'*') {
                    chars.next();
                    *state = ScanState::InComment {
                        after_entry: *state == ScanState::Accepted,
                    };
                    code.push(' ');
                    continue;
                }
                if c == '/' && chars.peek() == Some(&'/') {
                    break;
                }

                if *state == ScanState::Accepted {
                    rejected |= !c.is_whitespace();
                } else if c == ',' {
                    match parse_entry(&code) {
                        Some(id) => {
                            value = Some(id);
                            *state = ScanState::Accepted;
                        }
                        None => rejected = true,
                    }
                } else {
                    code.push(c);
                }
            }
        }
    }

    if rejected {
        return None;
    }
    // Last entry of an enum may omit the separator
    value.or_else(|| parse_entry(&code))
}

/// Parse `Name = digits` with surrounding whitespace
fn parse_entry(code: &str) -> Option<Identifier> {
    let code = code.trim();
    if code.is_empty() || is_structural(code) {
        return None;
    }

    let (name, value) = code.split_once('=')?;
    if !is_identifier(name.trim()) {
        return None;
    }

    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Entries are C# enum members; anything outside u32 is not one
    value.parse::<u32>().ok().map(Identifier::from)
}

fn is_structural(code: &str) -> bool {
    const KEYWORDS: &[&str] = &[
        "namespace", "using", "public", "internal", "private", "protected", "enum", "class",
        "struct",
    ];

    code.starts_with(['{', '}', '[', '#'])
        || KEYWORDS.iter().any(|kw| {
            code.strip_prefix(kw)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(char::is_whitespace))
        })
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> Vec<Identifier> {
        IdentifierParser::default().parse(text).to_vec()
    }

    #[test]
    fn parses_simple_enum() {
        let text = r"
        public enum DiagnosticId
        {
            None = 0,
            TestMethodName = 2000,
            EmptyXmlComments = 2001,
            AssertAreEqual = 2003,
        }
        ";
        assert_eq!(parse(text), vec![2000, 2001, 2003]);
    }

    #[test]
    fn handles_comments_and_whitespace() {
        let text = r"
        public enum DiagnosticId
        {
            // This is a comment
            None = 0,

            /* Multi-line
               comment */
            TestMethodName = 2000,

            EmptyXmlComments = 2001,  // Inline comment

            /* Another comment */ AssertAreEqual = 2003,
        }
        ";
        assert_eq!(parse(text), vec![2000, 2001, 2003]);
    }

    #[test]
    fn entries_inside_block_comment_are_ignored() {
        let text = "/*\n Retired = 2050,\n*/\nLive = 2051,";
        assert_eq!(parse(text), vec![2051]);
    }

    #[test]
    fn comment_after_separator_is_accepted() {
        assert_eq!(parse("Name = 2010, /* trailing */"), vec![2010]);
        assert_eq!(parse("Name = 2011 // no comma"), vec![2011]);
    }

    #[test]
    fn block_comment_opened_after_entry_keeps_entry() {
        let text = "Name = 2012, /* opens\n Hidden = 2013,\n closes */\nNext = 2014,";
        assert_eq!(parse(text), vec![2012, 2014]);
    }

    #[test]
    fn last_entry_without_separator() {
        assert_eq!(parse("{\n  Last = 2020\n}"), vec![2020]);
    }

    #[test]
    fn empty_and_invalid_input_yield_empty_set() {
        assert!(IdentifierParser::default().parse("").is_empty());
        assert!(IdentifierParser::default().parse("not valid C# code").is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let text = r"
            Two = 2000, Three = 2001,
            Negative = -2002,
            Hex = 0x7D3,
            Spaced Name = 2004,
            Huge = 99999999999,
            1Bad = 2005,
            Ok = 2006,
            Trailing = 2007, junk
            Equality == 2008,
        ";
        assert_eq!(parse(text), vec![2006]);
    }

    #[test]
    fn structural_lines_are_skipped() {
        let text = r"
            namespace Philips.CodeAnalysis.Common
            {
                public enum DiagnosticId
                {
                    [Obsolete]
                    Old = 2030,
                }
            }
        ";
        assert_eq!(parse(text), vec![2030]);
    }

    #[test]
    fn strips_byte_order_mark() {
        let text = "\u{feff}First = 2000,\nSecond = 2001,";
        assert_eq!(parse(text), vec![2000, 2001]);
    }

    #[test]
    fn custom_threshold() {
        let parser = IdentifierParser::new(10);
        let ids = parser.parse("A = 9,\nB = 10,\nC = 11,");
        assert_eq!(ids.to_vec(), vec![10, 11]);
        assert_eq!(parser.threshold(), 10);
    }

    #[test]
    fn largest_accepted_value() {
        assert_eq!(parse("Top = 4294967295,\nOver = 4294967296,"), vec![4_294_967_295]);
    }

    #[test]
    fn crlf_line_endings() {
        assert_eq!(parse("A = 2000,\r\nB = 2001,\r\n"), vec![2000, 2001]);
    }
}
