use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash, marker::PhantomData};

use crate::{
    convert::TryAsRef,
    node::Node,
    program::{NodeContainer, ProgramId},
};

/// A typed handle to a node, valid only for the program that allocated it.
///
/// The handle carries its owner's [`ProgramId`]; every dereference checks the
/// tag, so a handle that outlives its program (or is smuggled into another
/// one) fails fast instead of silently reading a stranger's node.
#[derive(Serialize, Deserialize)]
pub struct Id<T> {
    program: ProgramId,
    index: u32,
    t: PhantomData<T>,
}

impl<T> Id<T> {
    pub(crate) fn new(program: ProgramId, index: u32) -> Self {
        Self {
            program,
            index,
            t: PhantomData,
        }
    }

    /// The program this handle belongs to.
    pub fn program(&self) -> ProgramId {
        self.program
    }

    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Drops the type tag, keeping program identity and slot.
    pub fn erase(self) -> RawId {
        RawId {
            program: self.program,
            index: self.index,
        }
    }

    /// Resolves the handle against its owning program.
    pub fn get<C>(self, tree: &C) -> &T
    where
        C: NodeContainer,
        Node: TryAsRef<T>,
    {
        tree.node(self)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({}:{})", self.program, self.index)
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.program == other.program && self.index == other.index
    }
}

impl<T> Eq for Id<T> {}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.program, self.index).cmp(&(other.program, other.index))
    }
}

impl<T> Hash for Id<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.program.hash(state);
        self.index.hash(state);
    }
}

/// An [`Id`] with the node-kind tag erased, used as a side-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RawId {
    pub program: ProgramId,
    pub index: u32,
}
