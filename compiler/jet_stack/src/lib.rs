//! Stack growth for deeply nested filters.
//!
//! Both the parser and the evaluator recurse on the shape of the program:
//! the parser once per nesting level of the source text, the evaluator once
//! per nested generator that is being resumed. A filter such as
//! `reduce range(100000) as $i ([]; [.])` or a user-defined recursive
//! function can therefore push the native stack far past its default size.
//!
//! Every recursive entry point wraps its body in [`ensure_sufficient_stack`],
//! which switches to a freshly allocated segment when the remaining space
//! drops below [`RED_ZONE`].
//!
//! On `wasm32` the guard is a plain call.

/// Remaining stack below which a new segment is allocated.
pub const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment.
pub const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] bytes remain.
///
/// ```text
/// fn resume(&mut self) -> Step {
///     ensure_sufficient_stack(|| self.inner.resume())
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// `wasm32` has no segmented stacks; call through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Bytes of stack left on the current segment, when the platform reports it.
#[cfg(not(target_arch = "wasm32"))]
pub fn remaining_stack() -> Option<usize> {
    stacker::remaining_stack()
}

/// Bytes of stack left on the current segment, when the platform reports it.
#[cfg(target_arch = "wasm32")]
pub fn remaining_stack() -> Option<usize> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    enum Tree {
        Leaf(u32),
        Node(Box<Tree>),
    }

    fn nest(depth: u32) -> Tree {
        let mut tree = Tree::Leaf(depth);
        for _ in 0..depth {
            tree = Tree::Node(Box::new(tree));
        }
        tree
    }

    fn leaf_of(tree: &Tree) -> u32 {
        ensure_sufficient_stack(|| match tree {
            Tree::Leaf(n) => *n,
            Tree::Node(inner) => leaf_of(inner),
        })
    }

    fn unnest(tree: Tree) {
        let mut tree = tree;
        while let Tree::Node(inner) = tree {
            tree = *inner;
        }
    }

    #[test]
    fn walks_shallow_tree() {
        let tree = nest(8);
        assert_eq!(leaf_of(&tree), 8);
        unnest(tree);
    }

    #[test]
    fn walks_tree_deeper_than_default_stack() {
        let tree = nest(200_000);
        assert_eq!(leaf_of(&tree), 200_000);
        unnest(tree);
    }

    #[test]
    fn passes_through_results() {
        let ok: Result<u8, String> = ensure_sufficient_stack(|| Ok(7));
        assert_eq!(ok, Ok(7));
        let err: Result<u8, String> = ensure_sufficient_stack(|| Err("boom".to_owned()));
        assert_eq!(err, Err("boom".to_owned()));
    }

    #[test]
    fn reports_remaining_stack_on_native_targets() {
        if cfg!(not(target_arch = "wasm32")) {
            assert!(remaining_stack().is_some_and(|n| n > 0));
        }
    }
}
