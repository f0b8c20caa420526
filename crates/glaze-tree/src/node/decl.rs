use derive_more::{Display, From};
use glaze_span::Span;
use serde::{Deserialize, Serialize};

use super::{Block, Expr, TypeExpr};
use crate::{
    clone::{CloneContext, CloneNode},
    id::Id,
    program::NodeContainer,
    symbol::Symbol,
};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[display("vertex")]
    Vertex,
    #[display("fragment")]
    Fragment,
    #[display("compute")]
    Compute,
}

/// Attributes attached to declarations. Payload data, not nodes: attributes
/// have no children and clone verbatim with their owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Attr {
    Location(u32),
    Group(u32),
    Binding(u32),
    Stage(Stage),
}

impl std::fmt::Display for Attr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Location(n) => write!(f, "location({n})"),
            Self::Group(n) => write!(f, "group({n})"),
            Self::Binding(n) => write!(f, "binding({n})"),
            Self::Stage(stage) => write!(f, "stage({stage})"),
        }
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Storage {
    #[display("private")]
    Private,
    #[display("uniform")]
    Uniform,
    #[display("workgroup")]
    Workgroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Func {
    pub span: Span,
    pub name: Symbol,
    pub params: Vec<Id<Param>>,
    pub ret: Option<Id<TypeExpr>>,
    pub body: Id<Block>,
    pub attrs: Vec<Attr>,
}

impl Func {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        !tree.symbols().resolve(self.name).is_empty()
            && self.params.iter().all(|p| p.get(tree).is_valid(tree))
            && self.ret.map_or(true, |ret| ret.get(tree).is_valid(tree))
            && self.body.get(tree).is_valid(tree)
    }
}

impl CloneNode for Func {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let name = ctx.clone_symbol(self.name);
        let params = ctx.clone_all(&self.params);
        let ret = ctx.clone_opt(self.ret);
        let body = ctx.clone(self.body);

        Self {
            span: self.span,
            name,
            params,
            ret,
            body,
            attrs: self.attrs.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub span: Span,
    pub name: Symbol,
    pub ty: Id<TypeExpr>,
}

impl Param {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        !tree.symbols().resolve(self.name).is_empty() && self.ty.get(tree).is_valid(tree)
    }
}

impl CloneNode for Param {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let name = ctx.clone_symbol(self.name);
        let ty = ctx.clone(self.ty);

        Self {
            span: self.span,
            name,
            ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Global {
    pub span: Span,
    pub name: Symbol,
    pub ty: Id<TypeExpr>,
    pub storage: Storage,
    pub init: Option<Id<Expr>>,
    pub attrs: Vec<Attr>,
}

impl Global {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        !tree.symbols().resolve(self.name).is_empty()
            && self.ty.get(tree).is_valid(tree)
            && self.init.map_or(true, |init| init.get(tree).is_valid(tree))
    }
}

impl CloneNode for Global {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let name = ctx.clone_symbol(self.name);
        let ty = ctx.clone(self.ty);
        let init = ctx.clone_opt(self.init);

        Self {
            span: self.span,
            name,
            ty,
            storage: self.storage,
            init,
            attrs: self.attrs.clone(),
        }
    }
}

/// A module-scope constant. The initializer slot may be filled exactly once
/// while the program is still being built; a constant left without one is
/// structurally invalid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Const {
    pub span: Span,
    pub name: Symbol,
    pub ty: Option<Id<TypeExpr>>,
    pub init: Option<Id<Expr>>,
}

impl Const {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        !tree.symbols().resolve(self.name).is_empty()
            && self.ty.map_or(true, |ty| ty.get(tree).is_valid(tree))
            && self
                .init
                .map_or(false, |init| init.get(tree).is_valid(tree))
    }
}

impl CloneNode for Const {
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Struct {
    pub span: Span,
    pub name: Symbol,
    pub members: Vec<Id<Member>>,
}

impl Struct {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        !tree.symbols().resolve(self.name).is_empty()
            && self.members.iter().all(|m| m.get(tree).is_valid(tree))
    }
}

impl CloneNode for Struct {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let name = ctx.clone_symbol(self.name);
        let members = ctx.clone_all(&self.members);

        Self {
            span: self.span,
            name,
            members,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub span: Span,
    pub name: Symbol,
    pub ty: Id<TypeExpr>,
}

impl Member {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        !tree.symbols().resolve(self.name).is_empty() && self.ty.get(tree).is_valid(tree)
    }
}

impl CloneNode for Member {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let name = ctx.clone_symbol(self.name);
        let ty = ctx.clone(self.ty);

        Self {
            span: self.span,
            name,
            ty,
        }
    }
}

/// A declaration position: one of the concrete declaration kinds.
#[derive(Debug, Clone, Copy, PartialEq, From, Serialize, Deserialize)]
pub enum Decl {
    Func(Id<Func>),
    Global(Id<Global>),
    Const(Id<Const>),
    Struct(Id<Struct>),
}

impl Decl {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        match self {
            Self::Func(id) => id.get(tree).is_valid(tree),
            Self::Global(id) => id.get(tree).is_valid(tree),
            Self::Const(id) => id.get(tree).is_valid(tree),
            Self::Struct(id) => id.get(tree).is_valid(tree),
        }
    }

    pub fn span_in(&self, tree: &impl NodeContainer) -> Span {
        match self {
            Self::Func(id) => id.get(tree).span,
            Self::Global(id) => id.get(tree).span,
            Self::Const(id) => id.get(tree).span,
            Self::Struct(id) => id.get(tree).span,
        }
    }
}

impl CloneNode for Decl {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        match self {
            Self::Func(id) => Self::Func(ctx.clone(*id)),
            Self::Global(id) => Self::Global(ctx.clone(*id)),
            Self::Const(id) => Self::Const(ctx.clone(*id)),
            Self::Struct(id) => Self::Struct(ctx.clone(*id)),
        }
    }
}
