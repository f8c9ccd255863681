//! Parser tests.
//!
//! - `parser`: precedence, terms, sugar removal
//! - `errors`: error kinds, spans and contexts
//!
//! Most assertions compare against [`sexpr`], a compact rendering of the
//! tree, so precedence mistakes show up as a readable diff.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]


use crate::{parse, Parsed};
use jet_ir::{
    ExprId, ExprKind, Literal, Param, Pattern, PatternKey, StringInterner, StringPart,
};
use std::fmt::Write;

/// Parse `source` and render it with [`sexpr`].
fn render(source: &str) -> String {
    let interner = StringInterner::new();
    let parsed = parse(source, &interner).unwrap_or_else(|e| panic!("{source}: {e}"));
    sexpr(&parsed, parsed.root, &interner)
}

fn sexpr(parsed: &Parsed, id: ExprId, interner: &StringInterner) -> String {
    jet_stack::ensure_sufficient_stack(|| {
        let mut out = String::new();
        write_expr(&mut out, parsed, id, interner);
        out
    })
}

fn write_expr(out: &mut String, parsed: &Parsed, id: ExprId, interner: &StringInterner) {
    let arena = &parsed.arena;
    let sub = |id: ExprId| sexpr(parsed, id, interner);
    let name = |n| interner.lookup(n);
    let text = match arena.kind(id) {
        ExprKind::Identity => ".".to_owned(),
        ExprKind::Literal(Literal::Null) => "null".to_owned(),
        ExprKind::Literal(Literal::Bool(b)) => b.to_string(),
        ExprKind::Literal(Literal::Number(n)) => n.to_string(),
        ExprKind::Literal(Literal::String(s)) => format!("{s:?}"),
        ExprKind::Str { format, parts } => {
            let mut s = String::from("(str");
            if let Some(format) = format {
                let _ = write!(s, " @{}", format.name());
            }
            for part in parts {
                match part {
                    StringPart::Literal(text) => {
                        let _ = write!(s, " {text:?}");
                    }
                    StringPart::Interp(e) => {
                        let _ = write!(s, " {}", sub(*e));
                    }
                }
            }
            s + ")"
        }
        ExprKind::Format(format) => format!("@{}", format.name()),
        ExprKind::Loc { line } => format!("(loc {line})"),
        ExprKind::Field { target, name } => format!("(field {} {name})", sub(*target)),
        ExprKind::Index { target, index } => format!("(index {} {})", sub(*target), sub(*index)),
        ExprKind::Slice { target, from, to } => format!(
            "(slice {} {} {})",
            sub(*target),
            from.map_or("_".to_owned(), sub),
            to.map_or("_".to_owned(), sub)
        ),
        ExprKind::Iterate { target } => format!("(iter {})", sub(*target)),
        ExprKind::Optional(e) => format!("(? {})", sub(*e)),
        ExprKind::Pipe(a, b) => format!("(| {} {})", sub(*a), sub(*b)),
        ExprKind::Comma(a, b) => format!("(, {} {})", sub(*a), sub(*b)),
        ExprKind::Neg(e) => format!("(neg {})", sub(*e)),
        ExprKind::Binary { op, left, right } => {
            format!("({} {} {})", op.as_symbol(), sub(*left), sub(*right))
        }
        ExprKind::And(a, b) => format!("(and {} {})", sub(*a), sub(*b)),
        ExprKind::Or(a, b) => format!("(or {} {})", sub(*a), sub(*b)),
        ExprKind::Alternative(a, b) => format!("(// {} {})", sub(*a), sub(*b)),
        ExprKind::Update { op, target, value } => {
            format!("({op} {} {})", sub(*target), sub(*value))
        }
        ExprKind::Array(inner) => format!("[{}]", inner.map_or(String::new(), sub)),
        ExprKind::Object(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|e| format!("{}: {}", sub(e.key), sub(e.value)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
        ExprKind::If {
            cond,
            then_branch,
            else_branch,
        } => format!(
            "(if {} {} {})",
            sub(*cond),
            sub(*then_branch),
            else_branch.map_or("_".to_owned(), sub)
        ),
        ExprKind::Try { body, handler } => {
            format!("(try {} {})", sub(*body), handler.map_or("_".to_owned(), sub))
        }
        ExprKind::Reduce {
            source,
            pattern,
            init,
            update,
        } => format!(
            "(reduce {} {} {} {})",
            sub(*source),
            render_pattern(parsed, pattern, interner),
            sub(*init),
            sub(*update)
        ),
        ExprKind::Foreach {
            source,
            pattern,
            init,
            update,
            extract,
        } => format!(
            "(foreach {} {} {} {} {})",
            sub(*source),
            render_pattern(parsed, pattern, interner),
            sub(*init),
            sub(*update),
            extract.map_or("_".to_owned(), sub)
        ),
        ExprKind::Label { name: label, body } => format!("(label ${} {})", name(*label), sub(*body)),
        ExprKind::Break(label) => format!("(break ${})", name(*label)),
        ExprKind::FuncDefs { defs, rest } => {
            let mut s = String::from("(defs");
            for def in defs {
                let params: Vec<String> = def
                    .params
                    .iter()
                    .map(|p| match p {
                        Param::Filter(n) => name(*n).to_owned(),
                        Param::Value(n) => format!("${}", name(*n)),
                    })
                    .collect();
                let _ = write!(
                    s,
                    " ({}/{} [{}] {})",
                    name(def.name),
                    def.arity(),
                    params.join(" "),
                    sub(def.body)
                );
            }
            let _ = write!(s, " {})", sub(*rest));
            s
        }
        ExprKind::Call { name: f, args } => {
            if args.is_empty() {
                name(*f).to_owned()
            } else {
                let args: Vec<String> = args.iter().map(|a| sub(*a)).collect();
                format!("({} {})", name(*f), args.join(" "))
            }
        }
        ExprKind::Var(v) => format!("${}", name(*v)),
        ExprKind::Bind {
            source,
            pattern,
            body,
        } => format!(
            "(as {} {} {})",
            sub(*source),
            render_pattern(parsed, pattern, interner),
            sub(*body)
        ),
    };
    out.push_str(&text);
}

fn render_pattern(parsed: &Parsed, pattern: &Pattern, interner: &StringInterner) -> String {
    match pattern {
        Pattern::Var(n) => format!("${}", interner.lookup(*n)),
        Pattern::Array(items) => {
            let items: Vec<String> = items
                .iter()
                .map(|p| render_pattern(parsed, p, interner))
                .collect();
            format!("[{}]", items.join(" "))
        }
        Pattern::Object(entries) => {
            let entries: Vec<String> = entries
                .iter()
                .map(|e| {
                    let key = match e.key {
                        PatternKey::Var(n) => format!("${}", interner.lookup(n)),
                        PatternKey::Expr(id) => sexpr(parsed, id, interner),
                    };
                    match &e.pattern {
                        Some(p) => format!("{key}: {}", render_pattern(parsed, p, interner)),
                        None => key,
                    }
                })
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}
