use log::debug;
use std::collections::HashMap;

use crate::{
    convert::TryAsRef,
    id::Id,
    node::Node,
    program::{NodeContainer, Program, ProgramBuilder},
    symbol::Symbol,
};

/// Per-kind clone protocol.
///
/// Implementations must clone their children through the context in declared
/// left-to-right order, one child per binding, *before* constructing the new
/// node: construction order determines the identity numbering the generators
/// and golden tests rely on, and argument evaluation order inside a
/// constructor call would not be deterministic across edits.
pub trait CloneNode: Sized {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self;
}

/// Deep-clones a subtree from a source program into a destination builder,
/// rewriting the positions registered in its replacement map.
///
/// Every source node is cloned at most once per pass: re-cloning the same
/// handle returns the cached destination node, so sharing is preserved
/// rather than duplicated. Spans are copied verbatim; symbols are re-interned
/// in the destination's table with their spelling preserved. The context
/// carries no state beyond these maps, scoped to one pass invocation.
pub struct CloneContext<'a> {
    src: &'a Program,
    dst: &'a mut ProgramBuilder,
    replaced: HashMap<u32, u32>,
    cloned: HashMap<u32, u32>,
    symbols: HashMap<Symbol, Symbol>,
}

impl<'a> CloneContext<'a> {
    pub fn new(src: &'a Program, dst: &'a mut ProgramBuilder) -> Self {
        Self {
            src,
            dst,
            replaced: HashMap::new(),
            cloned: HashMap::new(),
            symbols: HashMap::new(),
        }
    }

    pub fn src(&self) -> &Program {
        self.src
    }

    pub fn dst(&mut self) -> &mut ProgramBuilder {
        self.dst
    }

    /// Registers a replacement: wherever `old` is referenced in the source,
    /// the clone will reference `new` instead of a structural copy. `new`
    /// must already live in the destination.
    pub fn replace<T>(&mut self, old: Id<T>, new: Id<T>) {
        assert_eq!(
            old.program(),
            self.src.program_id(),
            "replaced handle does not belong to the source program",
        );
        assert_eq!(
            new.program(),
            self.dst.program_id(),
            "replacement handle does not belong to the destination program",
        );

        self.replaced.insert(old.index() as u32, new.index() as u32);
    }

    /// Clones one node into the destination, honoring the replacement map
    /// and the one-clone-per-node cache.
    pub fn clone<T>(&mut self, id: Id<T>) -> Id<T>
    where
        T: CloneNode + Clone,
        Node: From<T> + TryAsRef<T>,
    {
        assert_eq!(
            id.program(),
            self.src.program_id(),
            "cloned handle does not belong to the source program",
        );

        let index = id.index() as u32;

        if let Some(&to) = self.replaced.get(&index) {
            return Id::new(self.dst.program_id(), to);
        }
        if let Some(&to) = self.cloned.get(&index) {
            return Id::new(self.dst.program_id(), to);
        }

        // Checks that `id` belongs to the source program.
        let node = self.src.node(id).clone();
        let node = node.clone_node(self);
        let new_id = self.dst.insert(node);

        self.cloned.insert(index, new_id.index() as u32);

        new_id
    }

    /// Clones an optional child; an absent child stays absent.
    pub fn clone_opt<T>(&mut self, id: Option<Id<T>>) -> Option<Id<T>>
    where
        T: CloneNode + Clone,
        Node: From<T> + TryAsRef<T>,
    {
        id.map(|id| self.clone(id))
    }

    /// Clones an ordered child list, preserving order.
    pub fn clone_all<T>(&mut self, ids: &[Id<T>]) -> Vec<Id<T>>
    where
        T: CloneNode + Clone,
        Node: From<T> + TryAsRef<T>,
    {
        ids.iter().map(|&id| self.clone(id)).collect()
    }

    /// Remaps a symbol into the destination's table, preserving its spelling
    /// but allocating a fresh interned identity there.
    pub fn clone_symbol(&mut self, symbol: Symbol) -> Symbol {
        if let Some(&mapped) = self.symbols.get(&symbol) {
            return mapped;
        }

        let spelling = self.src.symbols().resolve(symbol).to_owned();
        let mapped = self.dst.intern(spelling);
        self.symbols.insert(symbol, mapped);

        mapped
    }
}

/// Clones a whole program with an empty replacement map.
///
/// The new program carries no semantic overlay; callers that need one must
/// re-run the resolver over the clone.
pub fn clone_program(src: &Program) -> Program {
    let mut dst = ProgramBuilder::new();

    debug!(
        "cloning program {} ({} nodes) into program {}",
        src.program_id(),
        src.count(),
        dst.program_id(),
    );

    let root = {
        let mut ctx = CloneContext::new(src, &mut dst);
        ctx.clone(src.root_id())
    };

    dst.finish(root)
}

#[cfg(test)]
mod tests {
    use glaze_span::Span;

    use super::*;
    use crate::{
        dump::{NoNotes, TreeDump},
        node::{self, Lit},
    };

    // fn main() { if (cond) { discard; } else { x = 1; } }
    fn sample_program() -> Program {
        let mut b = ProgramBuilder::new();
        let span = Span::new(0, 1);

        let cond_name = b.intern("cond");
        let cond = b.insert(node::Ident {
            span,
            name: cond_name,
        });
        let cond = b.insert(node::Expr::Ident(cond));

        let discard = b.insert(node::Discard { span });
        let discard = b.insert(node::Stmt::Discard(discard));
        let then_body = b.insert(node::Block {
            span,
            stmts: vec![discard],
        });

        let x_name = b.intern("x");
        let x = b.insert(node::Ident { span, name: x_name });
        let x = b.insert(node::Expr::Ident(x));
        let one = b.insert(node::Literal {
            span,
            value: Lit::I32(1),
        });
        let one = b.insert(node::Expr::Literal(one));
        let assign = b.insert(node::Assign {
            span,
            target: x,
            value: one,
        });
        let assign = b.insert(node::Stmt::Assign(assign));
        let else_body = b.insert(node::Block {
            span,
            stmts: vec![assign],
        });
        let final_else = b.insert(node::Else {
            span,
            cond: None,
            body: else_body,
        });

        let if_ = b.insert(node::If {
            span,
            cond,
            body: then_body,
            elses: vec![final_else],
        });
        let if_ = b.insert(node::Stmt::If(if_));
        let body = b.insert(node::Block {
            span,
            stmts: vec![if_],
        });

        let main = b.intern("main");
        let func = b.insert(node::Func {
            span,
            name: main,
            params: vec![],
            ret: None,
            body,
            attrs: vec![],
        });
        let func = b.insert(node::Decl::Func(func));
        let module = b.insert(node::Module {
            span,
            decls: vec![func],
        });

        b.finish(module)
    }

    fn dump(program: &Program) -> String {
        TreeDump::new(program, &NoNotes).to_string()
    }

    #[test]
    fn structural_clone_dumps_identically() {
        let src = sample_program();
        let out = clone_program(&src);

        assert_ne!(src.program_id(), out.program_id());
        assert_eq!(dump(&src), dump(&out));
        assert_eq!(out.is_valid(), src.is_valid());
    }

    #[test]
    fn clone_twice_yields_identical_dumps() {
        let src = sample_program();

        let a = clone_program(&src);
        let b = clone_program(&src);

        assert_eq!(dump(&a), dump(&b));
    }

    #[test]
    fn symbols_keep_their_spelling() {
        let src = sample_program();
        let out = clone_program(&src);

        for name in ["main", "cond", "x"] {
            let mapped = out.symbols().lookup(name);
            assert!(mapped.is_some(), "{name} missing after clone");
            assert_eq!(out.symbols().resolve(mapped.unwrap()), name);
        }
    }

    #[test]
    fn recloning_a_handle_is_idempotent() {
        let src = sample_program();
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&src, &mut dst);

        let first = ctx.clone(src.root_id());
        let second = ctx.clone(src.root_id());

        assert_eq!(first, second);
    }

    #[test]
    fn replacement_takes_precedence_over_structural_copy() {
        let src = sample_program();
        let mut dst = ProgramBuilder::new();

        // Find the `cond` identifier expression in the source module.
        let span = Span::new(0, 1);
        let cond_expr = src
            .iter_nodes()
            .enumerate()
            .find_map(|(index, n)| match n {
                Node::Expr(node::Expr::Ident(id)) => {
                    let name = src.symbols().resolve(id.get(&src).name);
                    (name == "cond").then_some(index)
                }
                _ => None,
            })
            .expect("sample program has a cond identifier");

        // Replace it with `true`.
        let lit = dst.insert(node::Literal {
            span,
            value: Lit::Bool(true),
        });
        let replacement = dst.insert(node::Expr::Literal(lit));

        let root = {
            let mut ctx = CloneContext::new(&src, &mut dst);
            let old = Id::new(src.program_id(), cond_expr as u32);
            ctx.replace::<node::Expr>(old, replacement);
            ctx.clone(src.root_id())
        };
        let out = dst.finish(root);

        let text = TreeDump::new(&out, &NoNotes).to_string();
        assert!(text.contains("Literal[none]{true}"), "dump was:\n{text}");
        assert!(!text.contains("Ident[none]{cond}"), "dump was:\n{text}");
        assert!(out.is_valid());
    }

    #[test]
    #[should_panic(expected = "does not belong to the destination program")]
    fn replacement_must_live_in_the_destination() {
        let src = sample_program();
        let mut dst = ProgramBuilder::new();
        let mut ctx = CloneContext::new(&src, &mut dst);

        // A handle from the source used as a replacement.
        let root = src.root_id();
        let bogus = Id::new(src.program_id(), root.index() as u32);
        ctx.replace::<node::Module>(root, bogus);
    }
}
