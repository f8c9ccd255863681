//! Lexer for jet filters using logos.
//!
//! [`lex`] turns filter text into a [`TokenList`]. String literals are
//! kept whole (interpolations included) and split by [`cook_string`] when
//! the parser reaches them, so an interpolated expression is lexed again
//! from its own source span with [`lex_at`].

mod cook_string;
mod lex_error;
mod raw_token;
mod token;

use jet_ir::Span;
use logos::Logos;
use raw_token::RawToken;

pub use cook_string::{cook_string, CookedPart};
pub use lex_error::{LexError, LexErrorKind};
pub use token::{Token, TokenKind, TokenList};

/// Lex a complete filter.
pub fn lex(source: &str) -> Result<TokenList, LexError> {
    lex_at(source, 0)
}

/// Lex `source`, which begins at byte `base` of the enclosing filter.
pub fn lex_at(source: &str, base: u32) -> Result<TokenList, LexError> {
    if u32::try_from(source.len()).is_err() {
        return Err(LexError::new(Span::DUMMY, LexErrorKind::SourceTooLarge));
    }

    let mut tokens = TokenList::default();
    let mut lexer = RawToken::lexer(source);

    while let Some(raw) = lexer.next() {
        let span = Span::from_range(lexer.span()).offset_by(base);
        let slice = lexer.slice();
        let kind = match raw {
            Ok(RawToken::LineComment) => continue,
            Ok(raw) => convert(raw),
            Err(()) => return Err(LexError::new(span, classify_error(slice))),
        };
        tokens.push(Token { kind, span });
    }

    let end = u32::try_from(source.len()).unwrap_or(u32::MAX);
    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::new(end, end).offset_by(base),
    });
    Ok(tokens)
}

fn classify_error(slice: &str) -> LexErrorKind {
    match slice.chars().next() {
        Some('"') => LexErrorKind::UnterminatedString,
        Some(c) if c.is_ascii_digit() => LexErrorKind::MalformedNumber(slice.to_owned()),
        Some(c) => LexErrorKind::UnexpectedCharacter(c),
        None => LexErrorKind::UnexpectedCharacter('\0'),
    }
}

fn convert(raw: RawToken) -> TokenKind {
    match raw {
        RawToken::Def => TokenKind::Def,
        RawToken::If => TokenKind::If,
        RawToken::Then => TokenKind::Then,
        RawToken::Elif => TokenKind::Elif,
        RawToken::Else => TokenKind::Else,
        RawToken::End => TokenKind::End,
        RawToken::As => TokenKind::As,
        RawToken::Reduce => TokenKind::Reduce,
        RawToken::Foreach => TokenKind::Foreach,
        RawToken::Try => TokenKind::Try,
        RawToken::Catch => TokenKind::Catch,
        RawToken::Label => TokenKind::Label,
        RawToken::Import => TokenKind::Import,
        RawToken::Include => TokenKind::Include,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::Loc => TokenKind::Loc,
        RawToken::Dot => TokenKind::Dot,
        RawToken::DotDot => TokenKind::DotDot,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Question => TokenKind::Question,
        RawToken::Eq => TokenKind::Eq,
        RawToken::PipeEq => TokenKind::PipeEq,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::StarEq => TokenKind::StarEq,
        RawToken::SlashEq => TokenKind::SlashEq,
        RawToken::PercentEq => TokenKind::PercentEq,
        RawToken::AltEq => TokenKind::AltEq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Alt => TokenKind::Alt,
        RawToken::Number(n) => TokenKind::Number(n),
        RawToken::Str => TokenKind::Str,
        RawToken::Field => TokenKind::Field,
        RawToken::Variable => TokenKind::Variable,
        RawToken::Format => TokenKind::Format,
        RawToken::Ident => TokenKind::Ident,
        RawToken::LineComment => TokenKind::Eof,
    }
}

#[cfg(test)]
mod tests;
