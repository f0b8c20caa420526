use derive_more::From;
use glaze_span::Span;
use serde::{Deserialize, Serialize};

use super::{Expr, TypeExpr};
use crate::{
    clone::{CloneContext, CloneNode},
    id::Id,
    program::NodeContainer,
    symbol::Symbol,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub span: Span,
    pub stmts: Vec<Id<Stmt>>,
}

impl Block {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        self.stmts.iter().all(|stmt| stmt.get(tree).is_valid(tree))
    }
}

impl CloneNode for Block {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let stmts = ctx.clone_all(&self.stmts);

        Self {
            span: self.span,
            stmts,
        }
    }
}

/// A conditional with zero or more alternatives, in source order. Only the
/// final alternative may be unconditional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub span: Span,
    pub cond: Id<Expr>,
    pub body: Id<Block>,
    pub elses: Vec<Id<Else>>,
}

impl If {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        if !self.cond.get(tree).is_valid(tree) || !self.body.get(tree).is_valid(tree) {
            return false;
        }

        for (pos, id) in self.elses.iter().enumerate() {
            let alt = id.get(tree);

            if !alt.is_valid(tree) {
                return false;
            }
            // An unconditional branch anywhere but last would shadow the
            // branches after it.
            if alt.cond.is_none() && pos != self.elses.len() - 1 {
                return false;
            }
        }

        true
    }
}

impl CloneNode for If {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let cond = ctx.clone(self.cond);
        let body = ctx.clone(self.body);
        let elses = ctx.clone_all(&self.elses);

        Self {
            span: self.span,
            cond,
            body,
            elses,
        }
    }
}

/// One alternative of an [`If`]; no condition means a final `else`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Else {
    pub span: Span,
    pub cond: Option<Id<Expr>>,
    pub body: Id<Block>,
}

impl Else {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        self.cond
            .map_or(true, |cond| cond.get(tree).is_valid(tree))
            && self.body.get(tree).is_valid(tree)
    }
}

impl CloneNode for Else {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let cond = ctx.clone_opt(self.cond);
        let body = ctx.clone(self.body);

        Self {
            span: self.span,
            cond,
            body,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discard {
    pub span: Span,
}

impl Discard {
    pub fn is_valid(&self, _tree: &impl NodeContainer) -> bool {
        true
    }
}

impl CloneNode for Discard {
    fn clone_node(&self, _ctx: &mut CloneContext<'_>) -> Self {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Return {
    pub span: Span,
    pub value: Option<Id<Expr>>,
}

impl Return {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        self.value
            .map_or(true, |value| value.get(tree).is_valid(tree))
    }
}

impl CloneNode for Return {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let value = ctx.clone_opt(self.value);

        Self {
            span: self.span,
            value,
        }
    }
}

/// A function-scope variable declaration. Needs a type annotation, an
/// initializer, or both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Var {
    pub span: Span,
    pub name: Symbol,
    pub ty: Option<Id<TypeExpr>>,
    pub init: Option<Id<Expr>>,
}

impl Var {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        if tree.symbols().resolve(self.name).is_empty() {
            return false;
        }
        if self.ty.is_none() && self.init.is_none() {
            return false;
        }

        self.ty.map_or(true, |ty| ty.get(tree).is_valid(tree))
            && self.init.map_or(true, |init| init.get(tree).is_valid(tree))
    }
}

impl CloneNode for Var {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let name = ctx.clone_symbol(self.name);
        let ty = ctx.clone_opt(self.ty);
        let init = ctx.clone_opt(self.init);

        Self {
            span: self.span,
            name,
            ty,
            init,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub span: Span,
    pub target: Id<Expr>,
    pub value: Id<Expr>,
}

impl Assign {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        self.target.get(tree).is_valid(tree) && self.value.get(tree).is_valid(tree)
    }
}

impl CloneNode for Assign {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let target = ctx.clone(self.target);
        let value = ctx.clone(self.value);

        Self {
            span: self.span,
            target,
            value,
        }
    }
}

/// A statement position: one of the concrete statement kinds.
#[derive(Debug, Clone, Copy, PartialEq, From, Serialize, Deserialize)]
pub enum Stmt {
    Block(Id<Block>),
    If(Id<If>),
    Discard(Id<Discard>),
    Return(Id<Return>),
    Var(Id<Var>),
    Assign(Id<Assign>),
}

impl Stmt {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        match self {
            Self::Block(id) => id.get(tree).is_valid(tree),
            Self::If(id) => id.get(tree).is_valid(tree),
            Self::Discard(id) => id.get(tree).is_valid(tree),
            Self::Return(id) => id.get(tree).is_valid(tree),
            Self::Var(id) => id.get(tree).is_valid(tree),
            Self::Assign(id) => id.get(tree).is_valid(tree),
        }
    }

    pub fn span_in(&self, tree: &impl NodeContainer) -> Span {
        match self {
            Self::Block(id) => id.get(tree).span,
            Self::If(id) => id.get(tree).span,
            Self::Discard(id) => id.get(tree).span,
            Self::Return(id) => id.get(tree).span,
            Self::Var(id) => id.get(tree).span,
            Self::Assign(id) => id.get(tree).span,
        }
    }
}

impl CloneNode for Stmt {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        match self {
            Self::Block(id) => Self::Block(ctx.clone(*id)),
            Self::If(id) => Self::If(ctx.clone(*id)),
            Self::Discard(id) => Self::Discard(ctx.clone(*id)),
            Self::Return(id) => Self::Return(ctx.clone(*id)),
            Self::Var(id) => Self::Var(ctx.clone(*id)),
            Self::Assign(id) => Self::Assign(ctx.clone(*id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use glaze_span::Span;

    use super::*;
    use crate::{node, program::ProgramBuilder};

    fn ident(b: &mut ProgramBuilder, name: &str) -> Id<Expr> {
        let name = b.intern(name);
        let ident = b.insert(node::Ident {
            span: Span::default(),
            name,
        });

        b.insert(Expr::Ident(ident))
    }

    fn empty_block(b: &mut ProgramBuilder) -> Id<Block> {
        b.insert(Block {
            span: Span::default(),
            stmts: vec![],
        })
    }

    #[test]
    fn unconditional_else_must_come_last() {
        let mut b = ProgramBuilder::new();

        let cond = ident(&mut b, "c");
        let body = empty_block(&mut b);
        let unconditional = empty_block(&mut b);
        let unconditional = b.insert(Else {
            span: Span::default(),
            cond: None,
            body: unconditional,
        });
        let trailing_cond = ident(&mut b, "d");
        let trailing = empty_block(&mut b);
        let trailing = b.insert(Else {
            span: Span::default(),
            cond: Some(trailing_cond),
            body: trailing,
        });

        let bad = If {
            span: Span::default(),
            cond,
            body,
            elses: vec![unconditional, trailing],
        };
        assert!(!bad.is_valid(&b));

        let good = If {
            span: Span::default(),
            cond,
            body,
            elses: vec![trailing, unconditional],
        };
        assert!(good.is_valid(&b));
    }

    #[test]
    fn var_needs_a_type_or_an_initializer() {
        let mut b = ProgramBuilder::new();

        let name = b.intern("x");
        let bare = Var {
            span: Span::default(),
            name,
            ty: None,
            init: None,
        };
        assert!(!bare.is_valid(&b));

        let init = ident(&mut b, "y");
        let initialized = Var {
            span: Span::default(),
            name,
            ty: None,
            init: Some(init),
        };
        assert!(initialized.is_valid(&b));
    }

    #[test]
    fn invalid_children_invalidate_the_parent() {
        let mut b = ProgramBuilder::new();

        // An identifier with an empty spelling is invalid on its own.
        let broken = ident(&mut b, "");
        assert!(!broken.get(&b).is_valid(&b));

        let ret = b.insert(Return {
            span: Span::default(),
            value: Some(broken),
        });
        let ret = b.insert(Stmt::Return(ret));
        let block = b.insert(Block {
            span: Span::default(),
            stmts: vec![ret],
        });

        assert!(!block.get(&b).is_valid(&b));
    }
}
