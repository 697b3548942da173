//! Token types for the Lipona lexer.
//!
//! Defines [`TokenKind`] covering every lexeme in the language and
//! [`Token`], which pairs a kind with its source text and [`Span`].

use lipona_types::ast::StringPart;
use lipona_types::Span;
use std::fmt;

/// All reserved words.
///
/// These cannot be used as variable, function or parameter names. The lexer
/// emits a keyword token for each instead of [`TokenKind::Identifier`].
pub const ALL_KEYWORDS: &[&str] = &[
    // Statements
    "jo", "la", "open", "pini", "taso", "wile", "ilo", "pana",
    // Literals
    "lon", "ala",
    // Comparisons
    "suli", "lili", "suli_sama", "lili_sama", "sama",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The exact source text the token was scanned from.
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    /// Create a new token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// Returns `true` if this token is a reserved word.
    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

/// Every token kind in the Lipona language.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────

    /// Numeric literal (integer or decimal): `42`, `3.14`
    Number(f64),
    /// String literal, pre-split into text and embedded-expression segments.
    String(Vec<StringPart>),

    // ── Identifiers ──────────────────────────────────────────

    /// User-defined name: `x`, `kulupu_sin`, `sum`
    Identifier(String),

    // ── Statement Keywords ───────────────────────────────────

    /// `jo` — assignment
    Jo,
    /// `la` — ends a condition
    La,
    /// `open` — starts a block
    Open,
    /// `pini` — ends a block
    Pini,
    /// `taso` — else
    Taso,
    /// `wile` — while
    Wile,
    /// `ilo` — function definition
    Ilo,
    /// `pana` — return
    Pana,

    // ── Literal Keywords ─────────────────────────────────────

    /// `lon` — true
    Lon,
    /// `ala` — false / nothing
    Ala,

    // ── Comparison Keywords ──────────────────────────────────

    /// `suli` — greater than
    Suli,
    /// `lili` — less than
    Lili,
    /// `suli_sama` — greater than or equal
    SuliSama,
    /// `lili_sama` — less than or equal
    LiliSama,
    /// `sama` — structural equality
    Sama,

    // ── Operators & Punctuation ──────────────────────────────

    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,

    // ── Special ──────────────────────────────────────────────

    /// End of input.
    Eof,
}

impl TokenKind {
    /// Map a reserved word to its keyword token.
    ///
    /// Returns `None` if `s` is not reserved.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "jo" => TokenKind::Jo,
            "la" => TokenKind::La,
            "open" => TokenKind::Open,
            "pini" => TokenKind::Pini,
            "taso" => TokenKind::Taso,
            "wile" => TokenKind::Wile,
            "ilo" => TokenKind::Ilo,
            "pana" => TokenKind::Pana,
            "lon" => TokenKind::Lon,
            "ala" => TokenKind::Ala,
            "suli" => TokenKind::Suli,
            "lili" => TokenKind::Lili,
            "suli_sama" => TokenKind::SuliSama,
            "lili_sama" => TokenKind::LiliSama,
            "sama" => TokenKind::Sama,
            _ => return None,
        })
    }

    /// Returns `true` if this token kind is a reserved word.
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Jo
                | TokenKind::La
                | TokenKind::Open
                | TokenKind::Pini
                | TokenKind::Taso
                | TokenKind::Wile
                | TokenKind::Ilo
                | TokenKind::Pana
                | TokenKind::Lon
                | TokenKind::Ala
                | TokenKind::Suli
                | TokenKind::Lili
                | TokenKind::SuliSama
                | TokenKind::LiliSama
                | TokenKind::Sama
        )
    }

    /// Returns `true` if an expression may begin with this token.
    pub fn starts_expression(&self) -> bool {
        matches!(
            self,
            TokenKind::Number(_)
                | TokenKind::String(_)
                | TokenKind::Identifier(_)
                | TokenKind::Lon
                | TokenKind::Ala
                | TokenKind::LParen
                | TokenKind::Minus
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{n}"),
            TokenKind::String(_) => f.write_str("string"),
            TokenKind::Identifier(s) => f.write_str(s),
            TokenKind::Jo => f.write_str("jo"),
            TokenKind::La => f.write_str("la"),
            TokenKind::Open => f.write_str("open"),
            TokenKind::Pini => f.write_str("pini"),
            TokenKind::Taso => f.write_str("taso"),
            TokenKind::Wile => f.write_str("wile"),
            TokenKind::Ilo => f.write_str("ilo"),
            TokenKind::Pana => f.write_str("pana"),
            TokenKind::Lon => f.write_str("lon"),
            TokenKind::Ala => f.write_str("ala"),
            TokenKind::Suli => f.write_str("suli"),
            TokenKind::Lili => f.write_str("lili"),
            TokenKind::SuliSama => f.write_str("suli_sama"),
            TokenKind::LiliSama => f.write_str("lili_sama"),
            TokenKind::Sama => f.write_str("sama"),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::Comma => f.write_str(","),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keywords_count() {
        assert_eq!(ALL_KEYWORDS.len(), 15);
    }

    #[test]
    fn test_from_keyword_recognises_all() {
        for &kw in ALL_KEYWORDS {
            let kind = TokenKind::from_keyword(kw);
            assert!(kind.is_some(), "from_keyword should recognise '{kw}'");
            assert!(kind.unwrap().is_keyword(), "'{kw}' should be a keyword");
        }
    }

    #[test]
    fn test_removed_draft_words_are_identifiers() {
        for name in ["li", "e", "pali", "toki", "kulupu_sin", "suli_", "Sama"] {
            assert!(
                TokenKind::from_keyword(name).is_none(),
                "'{name}' must not be reserved"
            );
        }
    }

    #[test]
    fn test_is_keyword_false_for_non_keywords() {
        let kinds = [
            TokenKind::Number(1.0),
            TokenKind::String(vec![]),
            TokenKind::Identifier("x".into()),
            TokenKind::Plus,
            TokenKind::LParen,
            TokenKind::Eof,
        ];
        for kind in &kinds {
            assert!(!kind.is_keyword(), "{kind:?} is not a keyword");
        }
    }

    #[test]
    fn test_starts_expression() {
        assert!(TokenKind::Ala.starts_expression());
        assert!(TokenKind::Minus.starts_expression());
        assert!(TokenKind::Identifier("x".into()).starts_expression());
        assert!(!TokenKind::Pini.starts_expression());
        assert!(!TokenKind::Sama.starts_expression());
        assert!(!TokenKind::Eof.starts_expression());
    }

    #[test]
    fn test_display_roundtrip_keywords() {
        for &kw in ALL_KEYWORDS {
            let kind = TokenKind::from_keyword(kw).unwrap();
            assert_eq!(kind.to_string(), kw);
        }
    }

    #[test]
    fn test_display_literals_and_punctuation() {
        assert_eq!(TokenKind::Number(42.0).to_string(), "42");
        assert_eq!(TokenKind::Number(3.5).to_string(), "3.5");
        assert_eq!(TokenKind::Comma.to_string(), ",");
        assert_eq!(TokenKind::Eof.to_string(), "end of input");
    }

    #[test]
    fn test_token_construction() {
        let span = Span::new(1, 1, 1, 4);
        let token = Token::new(TokenKind::Pini, "pini", span);
        assert!(token.is_keyword());
        assert_eq!(token.lexeme, "pini");
        assert_eq!(token.span, span);
    }
}
