use derive_more::{Display, From};
use glaze_span::Span;
use half::f16;
use serde::{Deserialize, Serialize};

use crate::{
    clone::{CloneContext, CloneNode},
    id::Id,
    program::NodeContainer,
    symbol::Symbol,
};

/// Literal payload of a [`Literal`] expression.
#[derive(Debug, Clone, Copy, PartialEq, From, Serialize, Deserialize)]
pub enum Lit {
    Bool(bool),
    I32(i32),
    U32(u32),
    F32(f32),
    F16(f16),
}

impl std::fmt::Display for Lit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v:.6}"),
            // Rendered at half precision, not at the source literal's.
            Self::F16(v) => write!(f, "{:.6}", f32::from(*v)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub span: Span,
    pub value: Lit,
}

impl Literal {
    pub fn is_valid(&self, _tree: &impl NodeContainer) -> bool {
        true
    }
}

impl CloneNode for Literal {
    fn clone_node(&self, _ctx: &mut CloneContext<'_>) -> Self {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub span: Span,
    pub name: Symbol,
}

impl Ident {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        !tree.symbols().resolve(self.name).is_empty()
    }
}

impl CloneNode for Ident {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let name = ctx.clone_symbol(self.name);

        Self {
            span: self.span,
            name,
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    #[display("negation")]
    Neg,
    #[display("not")]
    Not,
}

impl UnaryOp {
    /// The operator's source token, shared by the textual writers.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Unary {
    pub span: Span,
    pub op: UnaryOp,
    pub expr: Id<Expr>,
}

impl Unary {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        self.expr.get(tree).is_valid(tree)
    }
}

impl CloneNode for Unary {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let expr = ctx.clone(self.expr);

        Self {
            span: self.span,
            op: self.op,
            expr,
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    #[display("add")]
    Add,
    #[display("subtract")]
    Sub,
    #[display("multiply")]
    Mul,
    #[display("divide")]
    Div,
    #[display("modulo")]
    Mod,
    #[display("equal")]
    Eq,
    #[display("not_equal")]
    NotEq,
    #[display("less_than")]
    Less,
    #[display("less_than_equal")]
    LessEq,
    #[display("greater_than")]
    Greater,
    #[display("greater_than_equal")]
    GreaterEq,
    #[display("and")]
    And,
    #[display("or")]
    Or,
}

impl BinaryOp {
    /// The operator's source token, shared by the textual writers.
    pub fn token(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Binary {
    pub span: Span,
    pub op: BinaryOp,
    pub lhs: Id<Expr>,
    pub rhs: Id<Expr>,
}

impl Binary {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        self.lhs.get(tree).is_valid(tree) && self.rhs.get(tree).is_valid(tree)
    }
}

impl CloneNode for Binary {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let lhs = ctx.clone(self.lhs);
        let rhs = ctx.clone(self.rhs);

        Self {
            span: self.span,
            op: self.op,
            lhs,
            rhs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub span: Span,
    pub func: Id<Expr>,
    pub args: Vec<Id<Expr>>,
}

impl Call {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        self.func.get(tree).is_valid(tree)
            && self.args.iter().all(|arg| arg.get(tree).is_valid(tree))
    }
}

impl CloneNode for Call {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let func = ctx.clone(self.func);
        let args = ctx.clone_all(&self.args);

        Self {
            span: self.span,
            func,
            args,
        }
    }
}

/// An expression position: one of the concrete expression kinds.
#[derive(Debug, Clone, Copy, PartialEq, From, Serialize, Deserialize)]
pub enum Expr {
    Literal(Id<Literal>),
    Ident(Id<Ident>),
    Unary(Id<Unary>),
    Binary(Id<Binary>),
    Call(Id<Call>),
}

impl Expr {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        match self {
            Self::Literal(id) => id.get(tree).is_valid(tree),
            Self::Ident(id) => id.get(tree).is_valid(tree),
            Self::Unary(id) => id.get(tree).is_valid(tree),
            Self::Binary(id) => id.get(tree).is_valid(tree),
            Self::Call(id) => id.get(tree).is_valid(tree),
        }
    }

    pub fn span_in(&self, tree: &impl NodeContainer) -> Span {
        match self {
            Self::Literal(id) => id.get(tree).span,
            Self::Ident(id) => id.get(tree).span,
            Self::Unary(id) => id.get(tree).span,
            Self::Binary(id) => id.get(tree).span,
            Self::Call(id) => id.get(tree).span,
        }
    }
}

impl CloneNode for Expr {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        match self {
            Self::Literal(id) => Self::Literal(ctx.clone(*id)),
            Self::Ident(id) => Self::Ident(ctx.clone(*id)),
            Self::Unary(id) => Self::Unary(ctx.clone(*id)),
            Self::Binary(id) => Self::Binary(ctx.clone(*id)),
            Self::Call(id) => Self::Call(ctx.clone(*id)),
        }
    }
}
