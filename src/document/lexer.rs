//! Lexer for the root element start tag of an SVG document using logos
//!
//! Only the start tag is tokenized. Callers stop pulling tokens once the
//! closing `>` or `/>` has been seen, so element content never reaches the lexer.

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token {
    /// `<name`, carrying the element name
    #[regex(r"<[A-Za-z_][A-Za-z0-9_.:-]*", |lex| lex.slice()[1..].to_string())]
    TagOpen(String),

    #[regex(r"[A-Za-z_:][A-Za-z0-9_.:-]*", |lex| lex.slice().to_string())]
    Name(String),

    #[token("=")]
    Equals,

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    DoubleQuoted(String),

    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        s[1..s.len()-1].to_string()
    })]
    SingleQuoted(String),

    #[token(">")]
    TagClose,

    #[token("/>")]
    TagSelfClose,
}

/// Lex input string into tokens with spans
///
/// Unrecognized input is yielded as `Err(())` so the parser can point at it.
pub fn lex(input: &str) -> impl Iterator<Item = (Result<Token, ()>, Span)> + '_ {
    Token::lexer(input).spanned()
}

/// Format a token for human-readable error messages
pub fn format_token(tok: &Token) -> String {
    match tok {
        Token::TagOpen(name) => format!("start tag '<{}'", name),
        Token::Name(name) => format!("name '{}'", name),
        Token::Equals => "'='".to_string(),
        Token::DoubleQuoted(v) => format!("value \"{}\"", v),
        Token::SingleQuoted(v) => format!("value '{}'", v),
        Token::TagClose => "'>'".to_string(),
        Token::TagSelfClose => "'/>'".to_string(),
    }
}
