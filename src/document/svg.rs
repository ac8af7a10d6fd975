//! In-memory model of an SVG source: verbatim prolog, parsed root start tag,
//! verbatim body.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{ParseError, Span};

use super::error::DocumentError;
use super::lexer::{lex, Token};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Quote character used around an attribute value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
}

impl Quote {
    fn as_char(self) -> char {
        match self {
            Quote::Double => '"',
            Quote::Single => '\'',
        }
    }
}

/// A single attribute on the root element, value kept exactly as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub quote: Quote,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            quote: Quote::Double,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = self.quote.as_char();
        write!(f, "{}={}{}{}", self.name, q, self.value, q)
    }
}

/// The root `<svg>` start tag
///
/// Attributes keep their source order. `width`, `height` and `viewBox` have
/// typed accessors; everything else passes through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootElement {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
}

impl RootElement {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, keeping its position and quote style if it already exists
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    pub fn width(&self) -> Option<&str> {
        self.attribute("width")
    }

    pub fn height(&self) -> Option<&str> {
        self.attribute("height")
    }

    pub fn view_box(&self) -> Option<&str> {
        self.attribute("viewBox")
    }
}

impl fmt::Display for RootElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for attr in &self.attributes {
            write!(f, " {}", attr)?;
        }
        if self.self_closing {
            write!(f, "/>")
        } else {
            write!(f, ">")
        }
    }
}

/// A `width`/`height` value in user units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length(f64);

impl Length {
    /// Parse a plain number or a `px` length; other units yield None
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let number = text.strip_suffix("px").unwrap_or(text).trim_end();
        let value: f64 = number.parse().ok()?;
        (value.is_finite() && value >= 0.0).then_some(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<u32> for Length {
    fn from(pixels: u32) -> Self {
        Self(f64::from(pixels))
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A parsed SVG source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorDocument {
    /// Everything before the root start tag
    pub prolog: String,
    pub root: RootElement,
    /// Everything after the root start tag
    pub body: String,
}

impl VectorDocument {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let start = find_root_start(source)?;
        let (root, end) = parse_start_tag(source, start)?;
        Ok(Self {
            prolog: source[..start].to_string(),
            root,
            body: source[end..].to_string(),
        })
    }

    /// Read and parse an SVG file
    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path).map_err(|e| DocumentError::io(path, e))?;
        Self::parse(&text).map_err(|e| DocumentError::parse(path, text, e))
    }

    pub fn to_svg_string(&self) -> String {
        self.to_string()
    }

    /// Write the document, replacing whatever is at `path`
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.to_svg_string())
    }
}

impl fmt::Display for VectorDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prolog, self.root, self.body)
    }
}

/// Skip the prolog and return the byte offset of the root element's `<`
fn find_root_start(source: &str) -> Result<usize, ParseError> {
    let mut pos = if source.starts_with(BYTE_ORDER_MARK) {
        BYTE_ORDER_MARK.len_utf8()
    } else {
        0
    };

    loop {
        let rest = &source[pos..];
        let trimmed = rest.trim_start();
        pos += rest.len() - trimmed.len();

        if trimmed.is_empty() {
            return Err(ParseError::MissingRoot { span: pos..pos });
        } else if trimmed.starts_with("<?") {
            pos += skip_delimited(trimmed, pos, "<?", "?>", "processing instruction")?;
        } else if trimmed.starts_with("<!--") {
            pos += skip_delimited(trimmed, pos, "<!--", "-->", "comment")?;
        } else if trimmed.starts_with("<!DOCTYPE") || trimmed.starts_with("<!doctype") {
            pos += doctype_len(trimmed, pos)?;
        } else if trimmed.starts_with('<') {
            return Ok(pos);
        } else {
            let len = trimmed.chars().next().map_or(1, char::len_utf8);
            return Err(ParseError::syntax(
                pos..pos + len,
                "Unexpected text before the root element",
                &["'<'"],
            ));
        }
    }
}

/// Length of a construct that runs from `open` to the first `close` after it
fn skip_delimited(
    text: &str,
    offset: usize,
    open: &str,
    close: &str,
    what: &str,
) -> Result<usize, ParseError> {
    text[open.len()..]
        .find(close)
        .map(|i| open.len() + i + close.len())
        .ok_or_else(|| {
            let expected = format!("'{}'", close);
            ParseError::syntax(
                offset..offset + open.len(),
                format!("Unterminated {}", what),
                &[expected.as_str()],
            )
        })
}

/// Length of a doctype declaration, honoring an internal `[...]` subset, quoted
/// literals, and comments or processing instructions inside the subset
fn doctype_len(text: &str, offset: usize) -> Result<usize, ParseError> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if depth > 0 && bytes[i..].starts_with(b"<!--") => {
                i += skip_delimited(&text[i..], offset + i, "<!--", "-->", "comment")?;
                continue;
            }
            None if depth > 0 && bytes[i..].starts_with(b"<?") => {
                i += skip_delimited(
                    &text[i..],
                    offset + i,
                    "<?",
                    "?>",
                    "processing instruction",
                )?;
                continue;
            }
            None => match c {
                b'"' | b'\'' => quote = Some(c),
                b'[' => depth += 1,
                b']' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => return Ok(i + 1),
                _ => {}
            },
        }
        i += 1;
    }
    Err(ParseError::syntax(
        offset..offset + "<!DOCTYPE".len(),
        "Unterminated doctype",
        &["'>'"],
    ))
}

/// Parse the root start tag beginning at `start`; returns the element and the
/// offset just past its closing `>` or `/>`
fn parse_start_tag(source: &str, start: usize) -> Result<(RootElement, usize), ParseError> {
    let shift = |span: Span| span.start + start..span.end + start;
    let mut tokens = lex(&source[start..]).map(|(tok, span)| (tok, shift(span)));
    let eof = source.len();

    let name = match tokens.next() {
        Some((Ok(Token::TagOpen(name)), span)) => {
            let local = name.rsplit(':').next().unwrap_or(&name);
            if local != "svg" {
                return Err(ParseError::NotSvg { span, name });
            }
            name
        }
        other => return Err(ParseError::unexpected(source, other, &["'<svg'"], eof)),
    };

    let mut attributes: Vec<Attribute> = Vec::new();
    loop {
        match tokens.next() {
            Some((Ok(Token::Name(attr)), span)) => {
                match tokens.next() {
                    Some((Ok(Token::Equals), _)) => {}
                    other => return Err(ParseError::unexpected(source, other, &["'='"], eof)),
                }
                let (value, quote) = match tokens.next() {
                    Some((Ok(Token::DoubleQuoted(v)), _)) => (v, Quote::Double),
                    Some((Ok(Token::SingleQuoted(v)), _)) => (v, Quote::Single),
                    other => {
                        return Err(ParseError::unexpected(
                            source,
                            other,
                            &["quoted attribute value"],
                            eof,
                        ))
                    }
                };
                if attributes.iter().any(|a| a.name == attr) {
                    return Err(ParseError::DuplicateAttribute { span, name: attr });
                }
                attributes.push(Attribute {
                    name: attr,
                    value,
                    quote,
                });
            }
            Some((Ok(Token::TagClose), span)) => {
                let root = RootElement {
                    name,
                    attributes,
                    self_closing: false,
                };
                return Ok((root, span.end));
            }
            Some((Ok(Token::TagSelfClose), span)) => {
                let root = RootElement {
                    name,
                    attributes,
                    self_closing: true,
                };
                return Ok((root, span.end));
            }
            other => {
                return Err(ParseError::unexpected(
                    source,
                    other,
                    &["attribute name", "'>'", "'/>'"],
                    eof,
                ))
            }
        }
    }
}
