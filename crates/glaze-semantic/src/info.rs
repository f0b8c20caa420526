use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use glaze_ir::Value;
use glaze_tree::prelude::{NodeContainer, Program, ProgramId, RawId, TypeNotes};

use crate::ty::Type;

/// How an identifier position was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// Names a value (a variable, constant, or parameter).
    Value,
    /// Names addressable storage.
    Pointer,
    /// Names a type.
    Type,
    /// Names a function.
    Function,
}

/// Everything the resolver learned about one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolved {
    pub ty: Type,
    pub kind: Resolution,
    /// Filled when constant evaluation produced a value for this node.
    pub constant: Option<Value>,
}

impl Resolved {
    pub fn value(ty: Type) -> Self {
        Self {
            ty,
            kind: Resolution::Value,
            constant: None,
        }
    }

    pub fn constant(ty: Type, value: Value) -> Self {
        Self {
            ty,
            kind: Resolution::Value,
            constant: Some(value),
        }
    }
}

/// The resolved-info side table of one program.
///
/// The tree stays purely structural; everything resolution derives lands
/// here, keyed by node slot. Absence of an entry means resolution does not
/// apply to that node. The overlay is tied to the program it was built
/// against and rejects handles from any other program.
///
/// Cloning a program never carries its overlay along; a pass that needs
/// resolved info on the clone must re-resolve it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Info {
    program: ProgramId,
    entries: HashMap<u32, Resolved>,
}

impl Info {
    pub fn new(program: &Program) -> Self {
        Self {
            program: program.program_id(),
            entries: HashMap::new(),
        }
    }

    fn check(&self, id: RawId) {
        assert_eq!(
            id.program, self.program,
            "node handle belongs to program {} but was used with overlay of program {}",
            id.program, self.program,
        );
    }

    pub fn insert(&mut self, id: RawId, resolved: Resolved) {
        self.check(id);
        self.entries.insert(id.index, resolved);
    }

    pub fn get(&self, id: RawId) -> Option<&Resolved> {
        self.check(id);
        self.entries.get(&id.index)
    }

    /// The resolved type of a node, if resolution reached it.
    pub fn type_of(&self, id: RawId) -> Option<&Type> {
        self.get(id).map(|resolved| &resolved.ty)
    }

    /// The constant value of a node, if constant evaluation produced one.
    pub fn constant_of(&self, id: RawId) -> Option<&Value> {
        self.get(id).and_then(|resolved| resolved.constant.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TypeNotes for Info {
    fn type_note(&self, id: RawId) -> Option<String> {
        self.type_of(id).map(|ty| ty.to_string())
    }
}

#[cfg(test)]
mod tests {
    use glaze_span::Span;
    use glaze_tree::prelude::*;

    use super::*;
    use crate::ty::ScalarType;

    fn literal_program() -> (Program, RawId) {
        let mut builder = ProgramBuilder::new();

        let lit = builder.insert(node::Literal {
            span: Span::default(),
            value: node::Lit::I32(1),
        });
        let raw = lit.erase();
        let lit = builder.insert(node::Expr::Literal(lit));
        let ret = builder.insert(node::Return {
            span: Span::default(),
            value: Some(lit),
        });
        let ret = builder.insert(node::Stmt::Return(ret));
        let body = builder.insert(node::Block {
            span: Span::default(),
            stmts: vec![ret],
        });
        let name = builder.intern("main");
        let func = builder.insert(node::Func {
            span: Span::default(),
            name,
            params: vec![],
            ret: None,
            body,
            attrs: vec![],
        });
        let func = builder.insert(node::Decl::Func(func));
        let module = builder.insert(node::Module {
            span: Span::default(),
            decls: vec![func],
        });

        (builder.finish(module), raw)
    }

    #[test]
    fn absent_entries_read_as_none() {
        let (program, raw) = literal_program();
        let info = Info::new(&program);

        assert!(info.get(raw).is_none());
        assert!(info.is_empty());
    }

    #[test]
    fn entries_come_back_by_handle() {
        let (program, raw) = literal_program();
        let mut info = Info::new(&program);

        info.insert(
            raw,
            Resolved::constant(Type::Scalar(ScalarType::I32), Value::I32(1)),
        );

        assert_eq!(info.type_of(raw), Some(&Type::Scalar(ScalarType::I32)));
        assert_eq!(info.constant_of(raw), Some(&Value::I32(1)));
        assert_eq!(info.get(raw).map(|r| r.kind), Some(Resolution::Value));
    }

    #[test]
    #[should_panic(expected = "used with overlay of program")]
    fn overlay_rejects_foreign_handles() {
        let (program, _) = literal_program();
        let (_other, raw) = literal_program();

        let info = Info::new(&program);
        info.get(raw);
    }

    #[test]
    fn overlay_notes_feed_the_dump() {
        let (program, raw) = literal_program();
        let mut info = Info::new(&program);
        info.insert(raw, Resolved::value(Type::Scalar(ScalarType::I32)));

        let text = TreeDump::new(&program, &info).to_string();

        assert!(text.contains("Literal[__i32]{1}"), "got:\n{text}");
    }
}
