use glaze_semantic::Info;
use glaze_tree::prelude::*;

use crate::{
    error::{Error, Result},
    names::Names,
    text::TextWriter,
};

/// WGSL reserved words the writer must rename around.
const RESERVED: &[&str] = &[
    "array", "bool", "break", "case", "compute", "const", "continue", "default", "discard",
    "else", "elseif", "f16", "f32", "fallthrough", "fn", "for", "fragment", "i32", "if", "let",
    "loop", "return", "struct", "switch", "true", "false", "u32", "uniform", "var", "vec2",
    "vec3", "vec4", "vertex", "void", "while", "workgroup",
];

const SUFFIX: &str = "_wgsl";

/// Emits a program back out as WGSL-style source text.
pub struct WgslWriter<'a> {
    program: &'a Program,
    info: &'a Info,
    text: TextWriter,
    names: Names,
}

impl<'a> WgslWriter<'a> {
    pub fn new(program: &'a Program, info: &'a Info) -> Self {
        Self {
            program,
            info,
            text: TextWriter::new(),
            names: Names::new(RESERVED, SUFFIX),
        }
    }

    pub fn generate(mut self) -> Result<String> {
        log::debug!("emitting wgsl for {}", self.program.program_id());

        let module = self.program.root_id().get(self.program);
        for decl in module.decls.clone() {
            self.decl(decl)?;
        }

        Ok(self.text.finish())
    }

    fn name(&mut self, symbol: Symbol) -> String {
        let spelling = self.program.symbols().resolve(symbol).to_owned();
        self.names.sanitize(&spelling)
    }

    fn decl(&mut self, id: Id<node::Decl>) -> Result<()> {
        match *id.get(self.program) {
            node::Decl::Func(id) => self.func(id),
            node::Decl::Global(id) => self.global(id),
            node::Decl::Const(id) => self.constant(id),
            node::Decl::Struct(id) => self.structure(id),
        }
    }

    fn func(&mut self, id: Id<node::Func>) -> Result<()> {
        let func = id.get(self.program).clone();

        for attr in &func.attrs {
            self.text.line(format!("@{attr}"));
        }

        let name = self.name(func.name);
        let params = func
            .params
            .iter()
            .map(|param| {
                let param = param.get(self.program);
                let ty = param.ty.get(self.program).spelling(self.program);
                let name = self.name(param.name);
                format!("{name} : {ty}")
            })
            .collect::<Vec<_>>()
            .join(", ");

        let header = match func.ret {
            Some(ret) => {
                let ret = ret.get(self.program).spelling(self.program);
                format!("fn {name}({params}) -> {ret} {{")
            }
            None => format!("fn {name}({params}) {{"),
        };

        self.text.line(header);
        self.text.indent();
        self.block_body(func.body)?;
        self.text.dedent();
        self.text.line("}");

        Ok(())
    }

    fn global(&mut self, id: Id<node::Global>) -> Result<()> {
        let global = id.get(self.program).clone();

        for attr in &global.attrs {
            self.text.line(format!("@{attr}"));
        }

        let name = self.name(global.name);
        let ty = global.ty.get(self.program).spelling(self.program);

        let line = match global.init {
            Some(init) => {
                let init = self.expr(init)?;
                format!("var<{}> {name} : {ty} = {init};", global.storage)
            }
            None => format!("var<{}> {name} : {ty};", global.storage),
        };
        self.text.line(line);

        Ok(())
    }

    fn constant(&mut self, id: Id<node::Const>) -> Result<()> {
        let constant = *id.get(self.program);

        let init = constant
            .init
            .ok_or_else(|| Error::new("constant declaration has no initializer", constant.span))?;
        let init = self.expr(init)?;
        let name = self.name(constant.name);

        let line = match constant.ty {
            Some(ty) => {
                let ty = ty.get(self.program).spelling(self.program);
                format!("const {name} : {ty} = {init};")
            }
            None => format!("const {name} = {init};"),
        };
        self.text.line(line);

        Ok(())
    }

    fn structure(&mut self, id: Id<node::Struct>) -> Result<()> {
        let structure = id.get(self.program).clone();

        let name = self.name(structure.name);
        self.text.line(format!("struct {name} {{"));
        self.text.indent();
        for member in &structure.members {
            let member = member.get(self.program);
            let ty = member.ty.get(self.program).spelling(self.program);
            let name = self.name(member.name);
            self.text.line(format!("{name} : {ty},"));
        }
        self.text.dedent();
        self.text.line("}");

        Ok(())
    }

    fn block_body(&mut self, id: Id<node::Block>) -> Result<()> {
        for stmt in id.get(self.program).stmts.clone() {
            self.stmt(stmt)?;
        }

        Ok(())
    }

    fn stmt(&mut self, id: Id<node::Stmt>) -> Result<()> {
        match *id.get(self.program) {
            node::Stmt::Block(id) => {
                self.text.line("{");
                self.text.indent();
                self.block_body(id)?;
                self.text.dedent();
                self.text.line("}");
                Ok(())
            }
            node::Stmt::If(id) => self.if_stmt(id),
            node::Stmt::Discard(_) => {
                self.text.line("discard;");
                Ok(())
            }
            node::Stmt::Return(id) => {
                let ret = *id.get(self.program);
                match ret.value {
                    Some(value) => {
                        let value = self.expr(value)?;
                        self.text.line(format!("return {value};"));
                    }
                    None => self.text.line("return;"),
                }
                Ok(())
            }
            node::Stmt::Var(id) => self.var(id),
            node::Stmt::Assign(id) => {
                let assign = *id.get(self.program);
                let target = self.expr(assign.target)?;
                let value = self.expr(assign.value)?;
                self.text.line(format!("{target} = {value};"));
                Ok(())
            }
        }
    }

    /// Conditional chains render as `if` / `elseif` / trailing `else`, the
    /// alternatives in source order.
    fn if_stmt(&mut self, id: Id<node::If>) -> Result<()> {
        let if_ = id.get(self.program).clone();

        let cond = self.expr(if_.cond)?;
        self.text.line(format!("if ({cond}) {{"));
        self.text.indent();
        self.block_body(if_.body)?;
        self.text.dedent();

        for alt in &if_.elses {
            let alt = *alt.get(self.program);
            match alt.cond {
                Some(cond) => {
                    let cond = self.expr(cond)?;
                    self.text.line(format!("}} elseif ({cond}) {{"));
                }
                None => self.text.line("} else {"),
            }
            self.text.indent();
            self.block_body(alt.body)?;
            self.text.dedent();
        }

        self.text.line("}");

        Ok(())
    }

    fn var(&mut self, id: Id<node::Var>) -> Result<()> {
        let var = *id.get(self.program);

        let name = self.name(var.name);
        let ty = var
            .ty
            .map(|ty| ty.get(self.program).spelling(self.program));
        let init = var.init.map(|init| self.expr(init)).transpose()?;

        let line = match (ty, init) {
            (Some(ty), Some(init)) => format!("var {name} : {ty} = {init};"),
            (Some(ty), None) => format!("var {name} : {ty};"),
            (None, Some(init)) => format!("var {name} = {init};"),
            // Annotation-free and initializer-free: only the overlay can
            // still supply a spelling.
            (None, None) => match self.info.type_of(id.erase()).and_then(wgsl_resolved) {
                Some(ty) => format!("var {name} : {ty};"),
                None => {
                    return Err(Error::new(
                        "variable declaration has neither a type nor an initializer",
                        var.span,
                    ))
                }
            },
        };
        self.text.line(line);

        Ok(())
    }

    fn expr(&mut self, id: Id<node::Expr>) -> Result<String> {
        match *id.get(self.program) {
            node::Expr::Literal(id) => Ok(id.get(self.program).value.to_string()),
            node::Expr::Ident(id) => {
                let ident = *id.get(self.program);
                Ok(self.name(ident.name))
            }
            node::Expr::Unary(id) => {
                let unary = *id.get(self.program);
                let inner = self.expr(unary.expr)?;
                Ok(format!("{}({inner})", unary.op.token()))
            }
            node::Expr::Binary(id) => {
                let binary = *id.get(self.program);
                let lhs = self.expr(binary.lhs)?;
                let rhs = self.expr(binary.rhs)?;
                Ok(format!("({lhs} {} {rhs})", binary.op.token()))
            }
            node::Expr::Call(id) => {
                let call = id.get(self.program).clone();
                let func = self.expr(call.func)?;
                let args = call
                    .args
                    .iter()
                    .map(|arg| self.expr(*arg))
                    .collect::<Result<Vec<_>>>()?
                    .join(", ");
                Ok(format!("{func}({args})"))
            }
        }
    }
}

/// The WGSL source spelling of a resolved type, when one exists.
fn wgsl_resolved(ty: &glaze_semantic::Type) -> Option<String> {
    use glaze_semantic::{ScalarType, Type};

    let scalar = |s: &ScalarType| match s {
        ScalarType::Bool => "bool",
        ScalarType::I32 => "i32",
        ScalarType::U32 => "u32",
        ScalarType::F32 => "f32",
        ScalarType::F16 => "f16",
    };

    match ty {
        Type::Void => None,
        Type::Scalar(s) => Some(scalar(s).to_owned()),
        Type::Vector(s, n) => Some(format!("vec{n}<{}>", scalar(s))),
        Type::Struct(name) => Some(name.clone()),
    }
}
