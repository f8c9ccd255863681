//! Cooked tokens handed to the parser.

use jet_ir::Span;
use std::fmt;

/// Token kind. Identifier-like tokens carry no text; the parser slices it
/// out of the source with the token span.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals and names
    Number(f64),
    /// Whole string literal, quotes included.
    Str,
    /// `foo`
    Ident,
    /// `.foo`
    Field,
    /// `$foo`
    Variable,
    /// `$__loc__`
    Loc,
    /// `@foo`
    Format,

    // Keywords
    Def,
    If,
    Then,
    Elif,
    Else,
    End,
    As,
    Reduce,
    Foreach,
    Try,
    Catch,
    Label,
    Import,
    Include,
    And,
    Or,

    // Punctuation
    Dot,
    DotDot,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Pipe,
    Comma,
    Colon,
    Semicolon,
    Question,

    // Assignment
    Eq,
    PipeEq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AltEq,

    // Operators
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Alt,

    Eof,
}

impl TokenKind {
    /// Keywords may be used as object keys (`{if: 1}`) and in patterns.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Def
                | TokenKind::If
                | TokenKind::Then
                | TokenKind::Elif
                | TokenKind::Else
                | TokenKind::End
                | TokenKind::As
                | TokenKind::Reduce
                | TokenKind::Foreach
                | TokenKind::Try
                | TokenKind::Catch
                | TokenKind::Label
                | TokenKind::Import
                | TokenKind::Include
                | TokenKind::And
                | TokenKind::Or
        )
    }

    /// Human-readable description for error messages.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Number(_) => "number",
            TokenKind::Str => "string",
            TokenKind::Ident => "identifier",
            TokenKind::Field => "field access",
            TokenKind::Variable | TokenKind::Loc => "variable",
            TokenKind::Format => "format",
            TokenKind::Def => "`def`",
            TokenKind::If => "`if`",
            TokenKind::Then => "`then`",
            TokenKind::Elif => "`elif`",
            TokenKind::Else => "`else`",
            TokenKind::End => "`end`",
            TokenKind::As => "`as`",
            TokenKind::Reduce => "`reduce`",
            TokenKind::Foreach => "`foreach`",
            TokenKind::Try => "`try`",
            TokenKind::Catch => "`catch`",
            TokenKind::Label => "`label`",
            TokenKind::Import => "`import`",
            TokenKind::Include => "`include`",
            TokenKind::And => "`and`",
            TokenKind::Or => "`or`",
            TokenKind::Dot => "`.`",
            TokenKind::DotDot => "`..`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::Pipe => "`|`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Question => "`?`",
            TokenKind::Eq => "`=`",
            TokenKind::PipeEq => "`|=`",
            TokenKind::PlusEq => "`+=`",
            TokenKind::MinusEq => "`-=`",
            TokenKind::StarEq => "`*=`",
            TokenKind::SlashEq => "`/=`",
            TokenKind::PercentEq => "`%=`",
            TokenKind::AltEq => "`//=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::Alt => "`//`",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Token stream, always terminated by a single `Eof` token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Token at `index`, or the trailing `Eof` when out of range.
    pub fn get(&self, index: usize) -> Token {
        self.tokens
            .get(index)
            .or_else(|| self.tokens.last())
            .copied()
            .unwrap_or(Token {
                kind: TokenKind::Eof,
                span: jet_ir::Span::DUMMY,
            })
    }

    pub fn kinds(&self) -> impl Iterator<Item = TokenKind> + '_ {
        self.tokens.iter().map(|t| t.kind)
    }
}
