use glaze_span::Span;
use serde::{Deserialize, Serialize};

use crate::{
    clone::{CloneContext, CloneNode},
    id::Id,
    program::NodeContainer,
    symbol::Symbol,
};

/// A structural type annotation as written in source, e.g. `f32` or
/// `vec3<f32>`. Resolution to a concrete type lives in the semantic overlay,
/// never in the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeExpr {
    pub span: Span,
    pub name: Symbol,
    pub args: Vec<Id<TypeExpr>>,
}

impl TypeExpr {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        !tree.symbols().resolve(self.name).is_empty()
            && self.args.iter().all(|arg| arg.get(tree).is_valid(tree))
    }

    /// The annotation's source spelling, e.g. `vec3<f32>`.
    pub fn spelling(&self, tree: &impl NodeContainer) -> String {
        let name = tree.symbols().resolve(self.name);

        if self.args.is_empty() {
            return name.to_owned();
        }

        let args = self
            .args
            .iter()
            .map(|arg| arg.get(tree).spelling(tree))
            .collect::<Vec<_>>()
            .join(", ");

        format!("{name}<{args}>")
    }
}

impl CloneNode for TypeExpr {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let name = ctx.clone_symbol(self.name);
        let args = ctx.clone_all(&self.args);

        Self {
            span: self.span,
            name,
            args,
        }
    }
}
