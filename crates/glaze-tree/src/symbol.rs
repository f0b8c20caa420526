use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt};

/// An interned name, scoped to the program whose [`SymbolTable`] issued it.
///
/// Equality is interned identity, not spelling. Comparing symbols from two
/// different programs is meaningless; the clone engine remaps symbols when a
/// tree crosses into a new program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol(u32);

impl Symbol {
    pub fn as_usize(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'s{}", self.0)
    }
}

/// Interns name spellings to [`Symbol`]s, one table per program.
///
/// Each unique spelling is stored exactly once; interning the same spelling
/// twice yields the same symbol.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolTable {
    names: Vec<String>,
    map: HashMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a spelling, returning its symbol.
    pub fn intern(&mut self, name: impl AsRef<str>) -> Symbol {
        let name = name.as_ref();

        if let Some(&id) = self.map.get(name) {
            return Symbol(id);
        }

        let id = self.names.len() as u32;
        self.names.push(name.to_owned());
        self.map.insert(name.to_owned(), id);

        Symbol(id)
    }

    /// Looks up a spelling without interning it.
    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.map.get(name).copied().map(Symbol)
    }

    /// Gets the spelling of a symbol, if the symbol belongs to this table.
    pub fn get(&self, symbol: Symbol) -> Option<&str> {
        self.names.get(symbol.as_usize()).map(String::as_str)
    }

    /// Gets the spelling of a symbol issued by this table.
    ///
    /// Panics when handed a symbol from another program's table.
    pub fn resolve(&self, symbol: Symbol) -> &str {
        self.get(symbol)
            .expect("symbol used with a symbol table it does not belong to")
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
