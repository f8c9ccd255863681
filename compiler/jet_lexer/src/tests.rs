use super::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn kinds(src: &str) -> Vec<TokenKind> {
    lex(src).map(|t| t.kinds().collect()).unwrap_or_default()
}

#[test]
fn path_expression() {
    assert_eq!(
        kinds(".foo[0].bar[]?"),
        vec![
            TokenKind::Field,
            TokenKind::LBracket,
            TokenKind::Number(0.0),
            TokenKind::RBracket,
            TokenKind::Field,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Question,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn keywords_after_dot_are_fields() {
    assert_eq!(
        kinds(".as .if"),
        vec![TokenKind::Field, TokenKind::Field, TokenKind::Eof]
    );
}

#[test]
fn field_names_may_look_like_exponents() {
    assert_eq!(
        kinds(".e0, .E - 1"),
        vec![
            TokenKind::Field,
            TokenKind::Comma,
            TokenKind::Field,
            TokenKind::Minus,
            TokenKind::Number(1.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn numbers_with_fraction_and_exponent() {
    assert_eq!(
        kinds("1e+0 0.001e3 .5"),
        vec![
            TokenKind::Number(1.0),
            TokenKind::Number(1.0),
            TokenKind::Number(0.5),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn assignment_operators_lex_longest_first() {
    assert_eq!(
        kinds("|= //= // += =="),
        vec![
            TokenKind::PipeEq,
            TokenKind::AltEq,
            TokenKind::Alt,
            TokenKind::PlusEq,
            TokenKind::EqEq,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn variables_loc_and_formats() {
    assert_eq!(
        kinds("$x $__loc__ @base64"),
        vec![
            TokenKind::Variable,
            TokenKind::Loc,
            TokenKind::Format,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn comments_are_skipped() {
    assert_eq!(
        kinds("1 # one\n| 2"),
        vec![
            TokenKind::Number(1.0),
            TokenKind::Pipe,
            TokenKind::Number(2.0),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn interpolated_string_is_one_token() {
    let src = r#""a\("b\(1)c") d" | ."#;
    let tokens = lex(src).unwrap_or_default();
    let first = tokens.get(0);
    assert_eq!(first.kind, TokenKind::Str);
    assert_eq!(&src[first.span.to_range()], r#""a\("b\(1)c") d""#);
    assert_eq!(tokens.get(1).kind, TokenKind::Pipe);
}

#[test]
fn unterminated_string_is_an_error() {
    let err = lex(r#""abc"#).err().map(|e| e.kind);
    assert_eq!(err, Some(LexErrorKind::UnterminatedString));
}

#[test]
fn unexpected_character_is_an_error() {
    let err = lex("1 ! 2").err().map(|e| e.kind);
    assert_eq!(err, Some(LexErrorKind::UnexpectedCharacter('!')));
}

#[test]
fn lex_at_offsets_spans() {
    let tokens = lex_at(".a", 7).unwrap_or_default();
    assert_eq!(tokens.get(0).span, jet_ir::Span::new(7, 9));
    assert_eq!(tokens.get(5).kind, TokenKind::Eof);
}

proptest! {
    #[test]
    fn identifiers_lex_as_single_token(name in "[a-z_][a-z0-9_]{0,12}") {
        let expected = match name.as_str() {
            "def" | "if" | "then" | "elif" | "else" | "end" | "as" | "reduce" | "foreach"
            | "try" | "catch" | "label" | "import" | "include" | "and" | "or" => return Ok(()),
            _ => TokenKind::Ident,
        };
        prop_assert_eq!(kinds(&name), vec![expected, TokenKind::Eof]);
    }

    #[test]
    fn integers_lex_to_their_value(n in 0u32..1_000_000) {
        prop_assert_eq!(kinds(&n.to_string()), vec![TokenKind::Number(f64::from(n)), TokenKind::Eof]);
    }
}
