//! Operator enums shared by parser and evaluator.

use std::fmt;

/// Arithmetic and comparison operators.
///
/// `and`, `or` and `//` short-circuit and are separate expression kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_symbol())
    }
}

/// Assignment operators (`=`, `|=`, `+=` ..., `//=`).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum UpdateOp {
    /// `lhs = rhs`
    Assign,
    /// `lhs |= f`
    Modify,
    /// `lhs op= rhs` for an arithmetic `op`.
    Arith(BinaryOp),
    /// `lhs //= rhs`
    Alternative,
}

impl fmt::Display for UpdateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateOp::Assign => f.write_str("="),
            UpdateOp::Modify => f.write_str("|="),
            UpdateOp::Arith(op) => write!(f, "{op}="),
            UpdateOp::Alternative => f.write_str("//="),
        }
    }
}

/// `@name` string formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Format {
    Text,
    Json,
    Html,
    Uri,
    Csv,
    Tsv,
    Sh,
    Base64,
    Base64d,
}

impl Format {
    /// Parse the identifier following `@`.
    pub fn from_name(name: &str) -> Option<Format> {
        Some(match name {
            "text" => Format::Text,
            "json" => Format::Json,
            "html" => Format::Html,
            "uri" => Format::Uri,
            "csv" => Format::Csv,
            "tsv" => Format::Tsv,
            "sh" => Format::Sh,
            "base64" => Format::Base64,
            "base64d" => Format::Base64d,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Text => "text",
            Format::Json => "json",
            Format::Html => "html",
            Format::Uri => "uri",
            Format::Csv => "csv",
            Format::Tsv => "tsv",
            Format::Sh => "sh",
            Format::Base64 => "base64",
            Format::Base64d => "base64d",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_ops_render_as_source() {
        assert_eq!(UpdateOp::Arith(BinaryOp::Add).to_string(), "+=");
        assert_eq!(UpdateOp::Alternative.to_string(), "//=");
        assert_eq!(UpdateOp::Modify.to_string(), "|=");
    }

    #[test]
    fn formats_round_trip_names() {
        for name in ["text", "json", "html", "uri", "csv", "tsv", "sh", "base64", "base64d"] {
            let format = Format::from_name(name);
            assert_eq!(format.map(Format::name), Some(name));
        }
        assert_eq!(Format::from_name("yaml"), None);
    }

    #[test]
    fn comparison_classification() {
        assert!(BinaryOp::LtEq.is_comparison());
        assert!(!BinaryOp::Rem.is_comparison());
    }
}
