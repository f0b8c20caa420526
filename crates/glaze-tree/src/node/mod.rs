pub use decl::*;
pub use expr::*;
pub use module::*;
pub use stmt::*;
pub use ty::*;

mod decl;
mod expr;
mod module;
mod stmt;
mod ty;

use derive_more::From;
use glaze_span::Span;
use serde::{Deserialize, Serialize};

use crate::{impl_try_as, program::NodeContainer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    // Expressions
    Literal,
    Ident,
    Unary,
    Binary,
    Call,
    Expr,
    // Statements
    Block,
    If,
    Else,
    Discard,
    Return,
    Var,
    Assign,
    Stmt,
    // Declarations
    Func,
    Param,
    Global,
    Const,
    Struct,
    Member,
    Decl,
    // Types
    TypeExpr,
    // Modules
    Module,
}

/// The closed set of node variants. Every node lives in exactly one
/// program's storage and is immutable once constructed.
#[derive(Debug, Clone, PartialEq, From, Serialize, Deserialize)]
pub enum Node {
    Literal(Literal),
    Ident(Ident),
    Unary(Unary),
    Binary(Binary),
    Call(Call),
    Expr(Expr),
    Block(Block),
    If(If),
    Else(Else),
    Discard(Discard),
    Return(Return),
    Var(Var),
    Assign(Assign),
    Stmt(Stmt),
    Func(Func),
    Param(Param),
    Global(Global),
    Const(Const),
    Struct(Struct),
    Member(Member),
    Decl(Decl),
    TypeExpr(TypeExpr),
    Module(Module),
}

impl_try_as!(
    Node,
    Literal(Literal),
    Ident(Ident),
    Unary(Unary),
    Binary(Binary),
    Call(Call),
    Expr(Expr),
    Block(Block),
    If(If),
    Else(Else),
    Discard(Discard),
    Return(Return),
    Var(Var),
    Assign(Assign),
    Stmt(Stmt),
    Func(Func),
    Param(Param),
    Global(Global),
    Const(Const),
    Struct(Struct),
    Member(Member),
    Decl(Decl),
    TypeExpr(TypeExpr),
    Module(Module),
);

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Literal(_) => NodeKind::Literal,
            Self::Ident(_) => NodeKind::Ident,
            Self::Unary(_) => NodeKind::Unary,
            Self::Binary(_) => NodeKind::Binary,
            Self::Call(_) => NodeKind::Call,
            Self::Expr(_) => NodeKind::Expr,
            Self::Block(_) => NodeKind::Block,
            Self::If(_) => NodeKind::If,
            Self::Else(_) => NodeKind::Else,
            Self::Discard(_) => NodeKind::Discard,
            Self::Return(_) => NodeKind::Return,
            Self::Var(_) => NodeKind::Var,
            Self::Assign(_) => NodeKind::Assign,
            Self::Stmt(_) => NodeKind::Stmt,
            Self::Func(_) => NodeKind::Func,
            Self::Param(_) => NodeKind::Param,
            Self::Global(_) => NodeKind::Global,
            Self::Const(_) => NodeKind::Const,
            Self::Struct(_) => NodeKind::Struct,
            Self::Member(_) => NodeKind::Member,
            Self::Decl(_) => NodeKind::Decl,
            Self::TypeExpr(_) => NodeKind::TypeExpr,
            Self::Module(_) => NodeKind::Module,
        }
    }

    /// Structural sanity of this node and its subtree. Invalid children make
    /// the parent invalid; this is not a type check.
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        match self {
            Self::Literal(n) => n.is_valid(tree),
            Self::Ident(n) => n.is_valid(tree),
            Self::Unary(n) => n.is_valid(tree),
            Self::Binary(n) => n.is_valid(tree),
            Self::Call(n) => n.is_valid(tree),
            Self::Expr(n) => n.is_valid(tree),
            Self::Block(n) => n.is_valid(tree),
            Self::If(n) => n.is_valid(tree),
            Self::Else(n) => n.is_valid(tree),
            Self::Discard(n) => n.is_valid(tree),
            Self::Return(n) => n.is_valid(tree),
            Self::Var(n) => n.is_valid(tree),
            Self::Assign(n) => n.is_valid(tree),
            Self::Stmt(n) => n.is_valid(tree),
            Self::Func(n) => n.is_valid(tree),
            Self::Param(n) => n.is_valid(tree),
            Self::Global(n) => n.is_valid(tree),
            Self::Const(n) => n.is_valid(tree),
            Self::Struct(n) => n.is_valid(tree),
            Self::Member(n) => n.is_valid(tree),
            Self::Decl(n) => n.is_valid(tree),
            Self::TypeExpr(n) => n.is_valid(tree),
            Self::Module(n) => n.is_valid(tree),
        }
    }

    /// The source span of this node, looking through wrapper kinds.
    pub fn span_in(&self, tree: &impl NodeContainer) -> Span {
        match self {
            Self::Literal(n) => n.span,
            Self::Ident(n) => n.span,
            Self::Unary(n) => n.span,
            Self::Binary(n) => n.span,
            Self::Call(n) => n.span,
            Self::Expr(n) => n.span_in(tree),
            Self::Block(n) => n.span,
            Self::If(n) => n.span,
            Self::Else(n) => n.span,
            Self::Discard(n) => n.span,
            Self::Return(n) => n.span,
            Self::Var(n) => n.span,
            Self::Assign(n) => n.span,
            Self::Stmt(n) => n.span_in(tree),
            Self::Func(n) => n.span,
            Self::Param(n) => n.span,
            Self::Global(n) => n.span,
            Self::Const(n) => n.span,
            Self::Struct(n) => n.span,
            Self::Member(n) => n.span,
            Self::Decl(n) => n.span_in(tree),
            Self::TypeExpr(n) => n.span,
            Self::Module(n) => n.span,
        }
    }
}
