//! The arena-owned syntax tree of one compilation unit.
//!
//! A [`program::Program`] owns flat storage for every node reachable from its
//! root module, together with the symbol table interning the names those
//! nodes mention. Nodes reference each other through typed [`id::Id`]s that
//! carry the identity of the owning program; using a handle against any other
//! program is a hard error in every build profile.
//!
//! Rewrite passes never mutate a finalized program. They build a new one
//! through [`clone::CloneContext`], substituting subtrees via its replacement
//! map.

pub mod clone;
pub mod convert;
pub mod dump;
pub mod id;
pub mod node;
pub mod program;
pub mod symbol;

pub mod prelude {
    pub use crate::clone::{clone_program, CloneContext, CloneNode};
    pub use crate::convert::{TryAsMut, TryAsRef};
    pub use crate::dump::{NoNotes, TreeDump, TypeNotes};
    pub use crate::id::{Id, RawId};
    pub use crate::node::{self, Node, NodeKind};
    pub use crate::program::{NodeContainer, Program, ProgramBuilder, ProgramId};
    pub use crate::symbol::{Symbol, SymbolTable};
}
