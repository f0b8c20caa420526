//! Hand-built single-function programs for writer tests.

use glaze_semantic::Info;
use glaze_span::Span;
use glaze_tree::prelude::*;

pub type FuncBody = fn(&mut ProgramBuilder) -> Vec<Id<node::Stmt>>;

/// A program holding `fn main()` with the given statements and an empty
/// overlay.
pub fn func_program(body: FuncBody) -> (Program, Info) {
    let mut builder = ProgramBuilder::new();

    let stmts = body(&mut builder);
    let block = builder.insert(node::Block {
        span: Span::default(),
        stmts,
    });

    let name = builder.intern("main");
    let func = builder.insert(node::Func {
        span: Span::default(),
        name,
        params: vec![],
        ret: None,
        body: block,
        attrs: vec![],
    });
    let func = builder.insert(node::Decl::Func(func));
    let module = builder.insert(node::Module {
        span: Span::default(),
        decls: vec![func],
    });

    let program = builder.finish(module);
    let info = Info::new(&program);

    (program, info)
}

pub fn ident(builder: &mut ProgramBuilder, name: &str) -> Id<node::Expr> {
    let name = builder.intern(name);
    let ident = builder.insert(node::Ident {
        span: Span::default(),
        name,
    });

    builder.insert(node::Expr::Ident(ident))
}

pub fn literal(builder: &mut ProgramBuilder, value: node::Lit) -> Id<node::Expr> {
    let literal = builder.insert(node::Literal {
        span: Span::default(),
        value,
    });

    builder.insert(node::Expr::Literal(literal))
}

/// A block holding a single `discard;`.
pub fn discard_block(builder: &mut ProgramBuilder) -> Id<node::Block> {
    let discard = builder.insert(node::Discard {
        span: Span::default(),
    });
    let discard = builder.insert(node::Stmt::Discard(discard));

    builder.insert(node::Block {
        span: Span::default(),
        stmts: vec![discard],
    })
}
