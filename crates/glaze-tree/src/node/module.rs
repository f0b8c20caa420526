use glaze_span::Span;
use serde::{Deserialize, Serialize};

use super::Decl;
use crate::{
    clone::{CloneContext, CloneNode},
    id::Id,
    program::NodeContainer,
};

/// The root of a compilation unit: its top-level declarations in source
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub span: Span,
    pub decls: Vec<Id<Decl>>,
}

impl Module {
    pub fn is_valid(&self, tree: &impl NodeContainer) -> bool {
        self.decls.iter().all(|decl| decl.get(tree).is_valid(tree))
    }
}

impl CloneNode for Module {
    fn clone_node(&self, ctx: &mut CloneContext<'_>) -> Self {
        let decls = ctx.clone_all(&self.decls);

        Self {
            span: self.span,
            decls,
        }
    }
}
