use super::*;
use crate::StringInterner;
use pretty_assertions::assert_eq;

#[test]
fn arena_hands_out_sequential_ids() {
    let mut arena = ExprArena::new();
    let dot = arena.alloc(ExprKind::Identity, Span::new(0, 1));
    let one = arena.alloc(ExprKind::Literal(Literal::Number(1.0)), Span::new(4, 5));
    let pipe = arena.alloc(ExprKind::Pipe(dot, one), Span::new(0, 5));

    assert_eq!(dot, ExprId::new(0));
    assert_eq!(arena.len(), 3);
    assert_eq!(arena.kind(pipe), &ExprKind::Pipe(dot, one));
    assert_eq!(arena[one].span, Span::new(4, 5));
}

#[test]
fn pattern_lists_bound_names_in_order() {
    let interner = StringInterner::new();
    let a = interner.intern("a");
    let b = interner.intern("b");
    let c = interner.intern("c");
    let mut arena = ExprArena::new();
    let key = arena.alloc(ExprKind::Literal(Literal::String("k".into())), Span::DUMMY);

    // [$a, {$b, k: $c}]
    let pattern = Pattern::Array(vec![
        Pattern::Var(a),
        Pattern::Object(vec![
            ObjectPatternEntry {
                key: PatternKey::Var(b),
                pattern: None,
            },
            ObjectPatternEntry {
                key: PatternKey::Expr(key),
                pattern: Some(Pattern::Var(c)),
            },
        ]),
    ]);

    let mut names = Vec::new();
    pattern.bound_names(&mut names);
    assert_eq!(names, vec![a, b, c]);
}

#[test]
fn func_def_arity_counts_both_param_modes() {
    let interner = StringInterner::new();
    let def = FuncDef {
        name: interner.intern("f"),
        params: vec![
            Param::Filter(interner.intern("g")),
            Param::Value(interner.intern("x")),
        ],
        body: ExprId::new(0),
        span: Span::DUMMY,
    };
    assert_eq!(def.arity(), 2);
    assert_eq!(def.params[1].name(), interner.intern("x"));
}
