use serde::{Deserialize, Serialize};
use std::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

use crate::{
    convert::{TryAsMut, TryAsRef},
    id::{Id, RawId},
    node::{Module, Node},
    symbol::{Symbol, SymbolTable},
};

static NEXT_PROGRAM_ID: AtomicU32 = AtomicU32::new(0);

/// Process-unique identity of one program (one compilation unit).
///
/// Every node handle is tagged with the id of the program that allocated it,
/// which is what makes cross-program handle use detectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProgramId(u32);

impl ProgramId {
    fn fresh() -> Self {
        Self(NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Read access to node storage, shared by [`ProgramBuilder`] and [`Program`].
pub trait NodeContainer {
    fn program_id(&self) -> ProgramId;

    fn get(&self, index: usize) -> &Node;

    fn count(&self) -> usize;

    fn symbols(&self) -> &SymbolTable;

    /// Resolves a typed handle, checking program identity.
    fn node<T>(&self, id: Id<T>) -> &T
    where
        Node: TryAsRef<T>,
    {
        assert_eq!(
            id.program(),
            self.program_id(),
            "node handle belongs to program {} but was used with program {}",
            id.program(),
            self.program_id(),
        );

        self.get(id.index())
            .try_as_ref()
            .expect("node kind does not match its typed handle")
    }

    fn iter_nodes(&self) -> std::slice::Iter<'_, Node>;
}

/// Allocates nodes for one program under construction.
///
/// Parsers and the clone engine insert nodes here; `finish` seals the storage
/// into an immutable [`Program`]. Handles issued by the builder stay valid
/// for the finished program since identity and slots are preserved.
#[derive(Debug)]
pub struct ProgramBuilder {
    id: ProgramId,
    nodes: Vec<Node>,
    symbols: SymbolTable,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeContainer for ProgramBuilder {
    fn program_id(&self) -> ProgramId {
        self.id
    }

    fn get(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    fn count(&self) -> usize {
        self.nodes.len()
    }

    fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn iter_nodes(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self {
            id: ProgramId::fresh(),
            nodes: Vec::new(),
            symbols: SymbolTable::new(),
        }
    }

    /// Allocates a node, returning its handle.
    ///
    /// Slots are issued in insertion order; passes that rely on deterministic
    /// identity numbering get it from inserting children before parents in a
    /// fixed order.
    pub fn insert<T>(&mut self, node: T) -> Id<T>
    where
        Node: From<T>,
    {
        let index = self.nodes.len() as u32;
        self.nodes.push(node.into());

        Id::new(self.id, index)
    }

    pub fn intern(&mut self, name: impl AsRef<str>) -> Symbol {
        self.symbols.intern(name)
    }

    /// Mutable access to a node, for payload slots that are filled exactly
    /// once before the program is finished. Structural shape is never edited
    /// in place.
    pub fn node_mut<T>(&mut self, id: Id<T>) -> &mut T
    where
        Node: TryAsMut<T>,
    {
        assert_eq!(
            id.program(),
            self.id,
            "node handle belongs to program {} but was used with program {}",
            id.program(),
            self.id,
        );

        self.nodes[id.index()]
            .try_as_mut()
            .expect("node kind does not match its typed handle")
    }

    /// Seals the builder into an immutable program rooted at `root`.
    pub fn finish(self, root: Id<Module>) -> Program {
        let Self { id, nodes, symbols } = self;

        assert_eq!(
            root.program(),
            id,
            "root handle belongs to program {} but was used with program {}",
            root.program(),
            id,
        );

        Program {
            id,
            nodes,
            symbols,
            root,
        }
    }
}

/// A finalized compilation unit: flat node storage, the symbol table, and
/// the root module. All nodes share the program's lifetime and are released
/// together with it.
#[derive(Debug)]
pub struct Program {
    id: ProgramId,
    nodes: Vec<Node>,
    symbols: SymbolTable,
    root: Id<Module>,
}

impl NodeContainer for Program {
    fn program_id(&self) -> ProgramId {
        self.id
    }

    fn get(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    fn count(&self) -> usize {
        self.nodes.len()
    }

    fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn iter_nodes(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }
}

impl Program {
    pub fn root_id(&self) -> Id<Module> {
        self.root
    }

    /// Structural sanity of the whole tree, as left behind by the last pass.
    pub fn is_valid(&self) -> bool {
        self.node(self.root).is_valid(self)
    }

    /// The source span of an arbitrary node, looking through wrapper kinds.
    pub fn span_of(&self, id: RawId) -> glaze_span::Span {
        assert_eq!(
            id.program,
            self.id,
            "node handle belongs to program {} but was used with program {}",
            id.program,
            self.id,
        );

        self.nodes[id.index as usize].span_in(self)
    }
}

#[cfg(test)]
mod tests {
    use glaze_span::Span;

    use super::*;
    use crate::node;

    #[test]
    fn builder_issues_slots_in_insertion_order() {
        let mut builder = ProgramBuilder::new();

        let a = builder.insert(node::Discard { span: Span::default() });
        let b = builder.insert(node::Discard { span: Span::default() });

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(builder.count(), 2);
    }

    #[test]
    #[should_panic(expected = "node handle belongs to program")]
    fn cross_program_handle_is_a_hard_error() {
        let mut theirs = ProgramBuilder::new();
        let id = theirs.insert(node::Discard { span: Span::default() });

        let ours = ProgramBuilder::new();
        ours.node(id);
    }

    #[test]
    fn placeholder_slots_fill_before_finish() {
        let mut builder = ProgramBuilder::new();

        let name = builder.intern("limit");
        let constant = builder.insert(node::Const {
            span: Span::default(),
            name,
            ty: None,
            init: None,
        });

        let lit = builder.insert(node::Literal {
            span: Span::default(),
            value: node::Lit::U32(8),
        });
        let lit = builder.insert(node::Expr::Literal(lit));
        builder.node_mut(constant).init = Some(lit);

        assert!(constant.get(&builder).is_valid(&builder));
    }

    #[test]
    fn fresh_programs_have_distinct_identity() {
        let a = ProgramBuilder::new();
        let b = ProgramBuilder::new();

        assert_ne!(a.program_id(), b.program_id());
    }
}
