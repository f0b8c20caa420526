use std::fmt;

use crate::{
    id::RawId,
    node,
    program::{NodeContainer, Program},
};

/// Resolved-type annotations embedded into a dump, supplied by the semantic
/// overlay. The tree crate only consumes notes; it never produces them.
pub trait TypeNotes {
    /// The mangled resolved-type name for a node (e.g. `__f32`), if the
    /// resolver produced one.
    fn type_note(&self, id: RawId) -> Option<String>;
}

/// A dump without type annotations; every bracket reads `[none]`.
pub struct NoNotes;

impl TypeNotes for NoNotes {
    fn type_note(&self, _id: RawId) -> Option<String> {
        None
    }
}

/// Renders a program as indented `Kind[type]{ ... }` text.
///
/// For diagnostics and tests only: the format carries no node identities, so
/// a clone dumps byte-identically to its original, and it is not a wire
/// format.
pub struct TreeDump<'a, N> {
    program: &'a Program,
    notes: &'a N,
}

const INDENT: &str = "  ";

impl<'a, N: TypeNotes> TreeDump<'a, N> {
    pub fn new(program: &'a Program, notes: &'a N) -> Self {
        Self { program, notes }
    }

    fn note(&self, id: RawId) -> String {
        self.notes.type_note(id).unwrap_or_else(|| "none".into())
    }

    fn pad(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            f.write_str(INDENT)?;
        }
        Ok(())
    }

    fn module(&self, f: &mut fmt::Formatter<'_>, depth: usize, module: &node::Module) -> fmt::Result {
        self.pad(f, depth)?;
        writeln!(f, "Module{{")?;
        for decl in &module.decls {
            self.decl(f, depth + 1, decl.get(self.program))?;
        }
        self.pad(f, depth)?;
        writeln!(f, "}}")
    }

    fn decl(&self, f: &mut fmt::Formatter<'_>, depth: usize, decl: &node::Decl) -> fmt::Result {
        match decl {
            node::Decl::Func(id) => self.func(f, depth, *id),
            node::Decl::Global(id) => self.global(f, depth, *id),
            node::Decl::Const(id) => self.constant(f, depth, *id),
            node::Decl::Struct(id) => self.structure(f, depth, *id),
        }
    }

    fn func(&self, f: &mut fmt::Formatter<'_>, depth: usize, id: crate::id::Id<node::Func>) -> fmt::Result {
        let func = id.get(self.program);

        self.pad(f, depth)?;
        writeln!(f, "Func[{}]{{", self.note(id.erase()))?;

        self.pad(f, depth + 1)?;
        writeln!(f, "name: {}", self.program.symbols().resolve(func.name))?;

        self.attrs(f, depth + 1, &func.attrs)?;

        if func.params.is_empty() {
            self.pad(f, depth + 1)?;
            writeln!(f, "()")?;
        } else {
            self.pad(f, depth + 1)?;
            writeln!(f, "(")?;
            for param in &func.params {
                let param = param.get(self.program);
                self.pad(f, depth + 2)?;
                writeln!(
                    f,
                    "Param{{name: {}, ty: {}}}",
                    self.program.symbols().resolve(param.name),
                    param.ty.get(self.program).spelling(self.program),
                )?;
            }
            self.pad(f, depth + 1)?;
            writeln!(f, ")")?;
        }

        self.pad(f, depth + 1)?;
        match func.ret {
            Some(ret) => writeln!(f, "ret: {}", ret.get(self.program).spelling(self.program))?,
            None => writeln!(f, "ret: void")?,
        }

        self.block(f, depth + 1, func.body)?;

        self.pad(f, depth)?;
        writeln!(f, "}}")
    }

    fn global(&self, f: &mut fmt::Formatter<'_>, depth: usize, id: crate::id::Id<node::Global>) -> fmt::Result {
        let global = id.get(self.program);

        self.pad(f, depth)?;
        writeln!(f, "Global[{}]{{", self.note(id.erase()))?;

        self.pad(f, depth + 1)?;
        writeln!(f, "name: {}", self.program.symbols().resolve(global.name))?;
        self.pad(f, depth + 1)?;
        writeln!(f, "storage: {}", global.storage)?;
        self.pad(f, depth + 1)?;
        writeln!(f, "ty: {}", global.ty.get(self.program).spelling(self.program))?;
        self.attrs(f, depth + 1, &global.attrs)?;

        if let Some(init) = global.init {
            self.pad(f, depth + 1)?;
            writeln!(f, "init:")?;
            self.expr(f, depth + 2, init.get(self.program))?;
        }

        self.pad(f, depth)?;
        writeln!(f, "}}")
    }

    fn constant(&self, f: &mut fmt::Formatter<'_>, depth: usize, id: crate::id::Id<node::Const>) -> fmt::Result {
        let constant = id.get(self.program);

        self.pad(f, depth)?;
        writeln!(f, "Const[{}]{{", self.note(id.erase()))?;

        self.pad(f, depth + 1)?;
        writeln!(f, "name: {}", self.program.symbols().resolve(constant.name))?;

        if let Some(ty) = constant.ty {
            self.pad(f, depth + 1)?;
            writeln!(f, "ty: {}", ty.get(self.program).spelling(self.program))?;
        }
        if let Some(init) = constant.init {
            self.pad(f, depth + 1)?;
            writeln!(f, "init:")?;
            self.expr(f, depth + 2, init.get(self.program))?;
        }

        self.pad(f, depth)?;
        writeln!(f, "}}")
    }

    fn structure(&self, f: &mut fmt::Formatter<'_>, depth: usize, id: crate::id::Id<node::Struct>) -> fmt::Result {
        let structure = id.get(self.program);

        self.pad(f, depth)?;
        writeln!(f, "Struct{{")?;

        self.pad(f, depth + 1)?;
        writeln!(f, "name: {}", self.program.symbols().resolve(structure.name))?;

        for member in &structure.members {
            let member = member.get(self.program);
            self.pad(f, depth + 1)?;
            writeln!(
                f,
                "Member{{name: {}, ty: {}}}",
                self.program.symbols().resolve(member.name),
                member.ty.get(self.program).spelling(self.program),
            )?;
        }

        self.pad(f, depth)?;
        writeln!(f, "}}")
    }

    fn attrs(&self, f: &mut fmt::Formatter<'_>, depth: usize, attrs: &[node::Attr]) -> fmt::Result {
        if attrs.is_empty() {
            return Ok(());
        }

        let rendered = attrs
            .iter()
            .map(|attr| attr.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        self.pad(f, depth)?;
        writeln!(f, "attrs: [{rendered}]")
    }

    fn block(&self, f: &mut fmt::Formatter<'_>, depth: usize, id: crate::id::Id<node::Block>) -> fmt::Result {
        let block = id.get(self.program);

        if block.stmts.is_empty() {
            self.pad(f, depth)?;
            return writeln!(f, "Block{{}}");
        }

        self.pad(f, depth)?;
        writeln!(f, "Block{{")?;
        for stmt in &block.stmts {
            self.stmt(f, depth + 1, stmt.get(self.program))?;
        }
        self.pad(f, depth)?;
        writeln!(f, "}}")
    }

    fn stmt(&self, f: &mut fmt::Formatter<'_>, depth: usize, stmt: &node::Stmt) -> fmt::Result {
        match stmt {
            node::Stmt::Block(id) => self.block(f, depth, *id),
            node::Stmt::If(id) => self.if_stmt(f, depth, *id),
            node::Stmt::Discard(_) => {
                self.pad(f, depth)?;
                writeln!(f, "Discard{{}}")
            }
            node::Stmt::Return(id) => {
                let ret = id.get(self.program);
                match ret.value {
                    None => {
                        self.pad(f, depth)?;
                        writeln!(f, "Return{{}}")
                    }
                    Some(value) => {
                        self.pad(f, depth)?;
                        writeln!(f, "Return{{")?;
                        self.expr(f, depth + 1, value.get(self.program))?;
                        self.pad(f, depth)?;
                        writeln!(f, "}}")
                    }
                }
            }
            node::Stmt::Var(id) => self.var(f, depth, *id),
            node::Stmt::Assign(id) => {
                let assign = id.get(self.program);
                self.pad(f, depth)?;
                writeln!(f, "Assign{{")?;
                self.expr(f, depth + 1, assign.target.get(self.program))?;
                self.expr(f, depth + 1, assign.value.get(self.program))?;
                self.pad(f, depth)?;
                writeln!(f, "}}")
            }
        }
    }

    fn if_stmt(&self, f: &mut fmt::Formatter<'_>, depth: usize, id: crate::id::Id<node::If>) -> fmt::Result {
        let if_ = id.get(self.program);

        self.pad(f, depth)?;
        writeln!(f, "If{{")?;

        self.paren_expr(f, depth + 1, if_.cond)?;
        self.block(f, depth + 1, if_.body)?;

        for alt in &if_.elses {
            let alt = alt.get(self.program);
            self.pad(f, depth + 1)?;
            writeln!(f, "Else{{")?;
            if let Some(cond) = alt.cond {
                self.paren_expr(f, depth + 2, cond)?;
            }
            self.block(f, depth + 2, alt.body)?;
            self.pad(f, depth + 1)?;
            writeln!(f, "}}")?;
        }

        self.pad(f, depth)?;
        writeln!(f, "}}")
    }

    fn var(&self, f: &mut fmt::Formatter<'_>, depth: usize, id: crate::id::Id<node::Var>) -> fmt::Result {
        let var = id.get(self.program);

        self.pad(f, depth)?;
        writeln!(f, "Var[{}]{{", self.note(id.erase()))?;

        self.pad(f, depth + 1)?;
        writeln!(f, "name: {}", self.program.symbols().resolve(var.name))?;

        if let Some(ty) = var.ty {
            self.pad(f, depth + 1)?;
            writeln!(f, "ty: {}", ty.get(self.program).spelling(self.program))?;
        }
        if let Some(init) = var.init {
            self.pad(f, depth + 1)?;
            writeln!(f, "init:")?;
            self.expr(f, depth + 2, init.get(self.program))?;
        }

        self.pad(f, depth)?;
        writeln!(f, "}}")
    }

    fn paren_expr(&self, f: &mut fmt::Formatter<'_>, depth: usize, id: crate::id::Id<node::Expr>) -> fmt::Result {
        self.pad(f, depth)?;
        writeln!(f, "(")?;
        self.expr(f, depth + 1, id.get(self.program))?;
        self.pad(f, depth)?;
        writeln!(f, ")")
    }

    fn expr(&self, f: &mut fmt::Formatter<'_>, depth: usize, expr: &node::Expr) -> fmt::Result {
        match expr {
            node::Expr::Literal(id) => {
                let literal = id.get(self.program);
                self.pad(f, depth)?;
                writeln!(f, "Literal[{}]{{{}}}", self.note(id.erase()), literal.value)
            }
            node::Expr::Ident(id) => {
                let ident = id.get(self.program);
                self.pad(f, depth)?;
                writeln!(
                    f,
                    "Ident[{}]{{{}}}",
                    self.note(id.erase()),
                    self.program.symbols().resolve(ident.name),
                )
            }
            node::Expr::Unary(id) => {
                let unary = id.get(self.program);
                self.pad(f, depth)?;
                writeln!(f, "Unary[{}]{{", self.note(id.erase()))?;
                self.pad(f, depth + 1)?;
                writeln!(f, "{}", unary.op)?;
                self.expr(f, depth + 1, unary.expr.get(self.program))?;
                self.pad(f, depth)?;
                writeln!(f, "}}")
            }
            node::Expr::Binary(id) => {
                let binary = id.get(self.program);
                self.pad(f, depth)?;
                writeln!(f, "Binary[{}]{{", self.note(id.erase()))?;
                self.expr(f, depth + 1, binary.lhs.get(self.program))?;
                self.pad(f, depth + 1)?;
                writeln!(f, "{}", binary.op)?;
                self.expr(f, depth + 1, binary.rhs.get(self.program))?;
                self.pad(f, depth)?;
                writeln!(f, "}}")
            }
            node::Expr::Call(id) => {
                let call = id.get(self.program);
                self.pad(f, depth)?;
                writeln!(f, "Call[{}]{{", self.note(id.erase()))?;
                self.expr(f, depth + 1, call.func.get(self.program))?;
                self.pad(f, depth + 1)?;
                writeln!(f, "(")?;
                for arg in &call.args {
                    self.expr(f, depth + 2, arg.get(self.program))?;
                }
                self.pad(f, depth + 1)?;
                writeln!(f, ")")?;
                self.pad(f, depth)?;
                writeln!(f, "}}")
            }
        }
    }
}

impl<N: TypeNotes> fmt::Display for TreeDump<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.program.root_id().get(self.program);
        self.module(f, 0, root)
    }
}

#[cfg(test)]
mod tests {
    use glaze_span::Span;

    use super::*;
    use crate::{
        node::{self, Lit},
        program::ProgramBuilder,
    };

    fn span() -> Span {
        Span::new(0, 0)
    }

    #[test]
    fn literals_and_idents_render_on_one_line() {
        let mut builder = ProgramBuilder::new();

        let x = builder.intern("x");
        let lit = builder.insert(node::Literal {
            span: span(),
            value: Lit::I32(1),
        });
        let lit = builder.insert(node::Expr::Literal(lit));
        let ident = builder.insert(node::Ident {
            span: span(),
            name: x,
        });
        let ident = builder.insert(node::Expr::Ident(ident));
        let assign = builder.insert(node::Assign {
            span: span(),
            target: ident,
            value: lit,
        });
        let assign = builder.insert(node::Stmt::Assign(assign));
        let body = builder.insert(node::Block {
            span: span(),
            stmts: vec![assign],
        });

        let main = builder.intern("main");
        let func = builder.insert(node::Func {
            span: span(),
            name: main,
            params: vec![],
            ret: None,
            body,
            attrs: vec![],
        });
        let func = builder.insert(node::Decl::Func(func));
        let module = builder.insert(node::Module {
            span: span(),
            decls: vec![func],
        });
        let program = builder.finish(module);

        let text = TreeDump::new(&program, &NoNotes).to_string();

        assert!(text.contains("Ident[none]{x}"), "got:\n{text}");
        assert!(text.contains("Literal[none]{1}"), "got:\n{text}");
        assert!(text.contains("ret: void"), "got:\n{text}");
    }

    #[test]
    fn notes_fill_the_type_bracket() {
        struct OneNote(crate::id::RawId);

        impl TypeNotes for OneNote {
            fn type_note(&self, id: crate::id::RawId) -> Option<String> {
                (id == self.0).then(|| "__i32".into())
            }
        }

        let mut builder = ProgramBuilder::new();

        let lit = builder.insert(node::Literal {
            span: span(),
            value: Lit::I32(7),
        });
        let noted = lit.erase();
        let lit = builder.insert(node::Expr::Literal(lit));
        let ret = builder.insert(node::Return {
            span: span(),
            value: Some(lit),
        });
        let ret = builder.insert(node::Stmt::Return(ret));
        let body = builder.insert(node::Block {
            span: span(),
            stmts: vec![ret],
        });

        let main = builder.intern("main");
        let func = builder.insert(node::Func {
            span: span(),
            name: main,
            params: vec![],
            ret: None,
            body,
            attrs: vec![],
        });
        let func = builder.insert(node::Decl::Func(func));
        let module = builder.insert(node::Module {
            span: span(),
            decls: vec![func],
        });
        let program = builder.finish(module);

        let text = TreeDump::new(&program, &OneNote(noted)).to_string();

        assert!(text.contains("Literal[__i32]{7}"), "got:\n{text}");
    }
}
