use glaze_semantic::Info;
use glaze_tree::prelude::*;

use crate::{
    error::{Error, Result},
    names::Names,
    text::TextWriter,
};

/// HLSL reserved words the writer must rename around.
const RESERVED: &[&str] = &[
    "bool", "break", "case", "cbuffer", "class", "const", "continue", "default", "discard",
    "do", "double", "else", "extern", "false", "float", "for", "groupshared", "half", "if",
    "in", "inline", "inout", "int", "interface", "linear", "matrix", "namespace", "out",
    "pass", "precise", "register", "return", "sampler", "static", "struct", "switch",
    "technique", "template", "texture", "true", "typedef", "uint", "uniform", "vector",
    "virtual", "void", "volatile", "while",
];

const SUFFIX: &str = "_hlsl";

/// Emits a program as HLSL-style source text.
pub struct HlslWriter<'a> {
    program: &'a Program,
    info: &'a Info,
    text: TextWriter,
    names: Names,
}

impl<'a> HlslWriter<'a> {
    pub fn new(program: &'a Program, info: &'a Info) -> Self {
        Self {
            program,
            info,
            text: TextWriter::new(),
            names: Names::new(RESERVED, SUFFIX),
        }
    }

    pub fn generate(mut self) -> Result<String> {
        log::debug!("emitting hlsl for {}", self.program.program_id());

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

    /// Maps a structural type annotation onto its HLSL spelling.
    fn ty(&mut self, id: Id<node::TypeExpr>) -> Result<String> {
        let ty = id.get(self.program).clone();
        let name = self.program.symbols().resolve(ty.name).to_owned();

        let scalar = |name: &str| match name {
            "f32" => Some("float"),
            "f16" => Some("half"),
            "i32" => Some("int"),
            "u32" => Some("uint"),
            "bool" => Some("bool"),
            _ => None,
        };

        if let Some(spelling) = scalar(&name) {
            return Ok(spelling.to_owned());
        }

        if let Some(size) = name.strip_prefix("vec") {
            let elem = ty
                .args
                .first()
                .map(|arg| self.program.symbols().resolve(arg.get(self.program).name));
            let elem = elem.and_then(scalar).ok_or_else(|| {
                Error::new(
                    format!("vector type {} has no scalar element", ty.spelling(self.program)),
                    ty.span,
                )
            })?;

            return Ok(format!("{elem}{size}"));
        }

        // Struct and other user types keep their (sanitized) name.
        Ok(self.names.sanitize(&name))
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

        let ret = match func.ret {
            Some(ret) => self.ty(ret)?,
            None => "void".to_owned(),
        };
        let name = self.name(func.name);

        let mut params = Vec::with_capacity(func.params.len());
        for param in &func.params {
            let param = *param.get(self.program);
            let ty = self.ty(param.ty)?;
            let name = self.name(param.name);
            params.push(format!("{ty} {name}"));
        }

        self.text
            .line(format!("{ret} {name}({}) {{", params.join(", ")));
        self.text.indent();
        self.block_body(func.body)?;
        self.text.dedent();
        self.text.line("}");

        Ok(())
    }

    fn global(&mut self, id: Id<node::Global>) -> Result<()> {
        let global = id.get(self.program).clone();

        let class = match global.storage {
            node::Storage::Private => "static",
            node::Storage::Uniform => "uniform",
            node::Storage::Workgroup => "groupshared",
        };
        let ty = self.ty(global.ty)?;
        let name = self.name(global.name);

        let line = match global.init {
            Some(init) => {
                let init = self.expr(init)?;
                format!("{class} {ty} {name} = {init};")
            }
            None => format!("{class} {ty} {name};"),
        };
        self.text.line(line);

        Ok(())
    }

    fn constant(&mut self, id: Id<node::Const>) -> Result<()> {
        let constant = *id.get(self.program);

        let init = constant
            .init
            .ok_or_else(|| Error::new("constant declaration has no initializer", constant.span))?;
        let ty = constant.ty.ok_or_else(|| {
            Error::new(
                "constant declaration has no type annotation",
                constant.span,
            )
        })?;

        let ty = self.ty(ty)?;
        let name = self.name(constant.name);
        let init = self.expr(init)?;
        self.text
            .line(format!("static const {ty} {name} = {init};"));

        Ok(())
    }

    fn structure(&mut self, id: Id<node::Struct>) -> Result<()> {
        let structure = id.get(self.program).clone();

        let name = self.name(structure.name);
        self.text.line(format!("struct {name} {{"));
        self.text.indent();
        for member in &structure.members {
            let member = *member.get(self.program);
            let ty = self.ty(member.ty)?;
            let name = self.name(member.name);
            self.text.line(format!("{ty} {name};"));
        }
        self.text.dedent();
        self.text.line("};");

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

    /// Conditional chains render as `if` / `else if` / trailing `else`, the
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
                    self.text.line(format!("}} else if ({cond}) {{"));
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

        let ty = match var.ty {
            Some(ty) => self.ty(ty)?,
            // Without an annotation the resolved type decides the spelling.
            None => match self.info.type_of(id.erase()) {
                Some(ty) => hlsl_resolved(ty).ok_or_else(|| {
                    Error::new(format!("type {ty} has no hlsl spelling"), var.span)
                })?,
                None => {
                    return Err(Error::new(
                        "cannot determine the variable's type",
                        var.span,
                    ))
                }
            },
        };

        let name = self.name(var.name);
        let line = match var.init {
            Some(init) => {
                let init = self.expr(init)?;
                format!("{ty} {name} = {init};")
            }
            None => format!("{ty} {name};"),
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

/// The HLSL spelling of a resolved type, when one exists.
fn hlsl_resolved(ty: &glaze_semantic::Type) -> Option<String> {
    use glaze_semantic::{ScalarType, Type};

    let scalar = |s: &ScalarType| match s {
        ScalarType::Bool => "bool",
        ScalarType::I32 => "int",
        ScalarType::U32 => "uint",
        ScalarType::F32 => "float",
        ScalarType::F16 => "half",
    };

    match ty {
        Type::Void => Some("void".to_owned()),
        Type::Scalar(s) => Some(scalar(s).to_owned()),
        Type::Vector(s, n) => Some(format!("{}{n}", scalar(s))),
        Type::Struct(name) => Some(name.clone()),
    }
}
