use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;

use glaze_ir::Value;
use glaze_semantic::{Info, ScalarType, Type};
use glaze_tree::prelude::*;

use crate::error::{Error, Result};

/// The opcodes this writer emits, with their SPIR-V opcode numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Name,
    TypeVoid,
    TypeBool,
    TypeInt,
    TypeFloat,
    TypeVector,
    TypeStruct,
    ConstantTrue,
    ConstantFalse,
    Constant,
    Variable,
    Load,
    Store,
    SNegate,
    FNegate,
    IAdd,
    FAdd,
    ISub,
    FSub,
    IMul,
    FMul,
    UDiv,
    SDiv,
    FDiv,
    UMod,
    SRem,
    FRem,
    LogicalEqual,
    LogicalNotEqual,
    LogicalOr,
    LogicalAnd,
    LogicalNot,
    IEqual,
    INotEqual,
    UGreaterThan,
    SGreaterThan,
    UGreaterThanEqual,
    SGreaterThanEqual,
    ULessThan,
    SLessThan,
    ULessThanEqual,
    SLessThanEqual,
    FOrdEqual,
    FOrdNotEqual,
    FOrdLessThan,
    FOrdGreaterThan,
    FOrdLessThanEqual,
    FOrdGreaterThanEqual,
    SelectionMerge,
    Label,
    Branch,
    BranchConditional,
    Kill,
    Return,
    ReturnValue,
}

impl Op {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Name => "OpName",
            Self::TypeVoid => "OpTypeVoid",
            Self::TypeBool => "OpTypeBool",
            Self::TypeInt => "OpTypeInt",
            Self::TypeFloat => "OpTypeFloat",
            Self::TypeVector => "OpTypeVector",
            Self::TypeStruct => "OpTypeStruct",
            Self::ConstantTrue => "OpConstantTrue",
            Self::ConstantFalse => "OpConstantFalse",
            Self::Constant => "OpConstant",
            Self::Variable => "OpVariable",
            Self::Load => "OpLoad",
            Self::Store => "OpStore",
            Self::SNegate => "OpSNegate",
            Self::FNegate => "OpFNegate",
            Self::IAdd => "OpIAdd",
            Self::FAdd => "OpFAdd",
            Self::ISub => "OpISub",
            Self::FSub => "OpFSub",
            Self::IMul => "OpIMul",
            Self::FMul => "OpFMul",
            Self::UDiv => "OpUDiv",
            Self::SDiv => "OpSDiv",
            Self::FDiv => "OpFDiv",
            Self::UMod => "OpUMod",
            Self::SRem => "OpSRem",
            Self::FRem => "OpFRem",
            Self::LogicalEqual => "OpLogicalEqual",
            Self::LogicalNotEqual => "OpLogicalNotEqual",
            Self::LogicalOr => "OpLogicalOr",
            Self::LogicalAnd => "OpLogicalAnd",
            Self::LogicalNot => "OpLogicalNot",
            Self::IEqual => "OpIEqual",
            Self::INotEqual => "OpINotEqual",
            Self::UGreaterThan => "OpUGreaterThan",
            Self::SGreaterThan => "OpSGreaterThan",
            Self::UGreaterThanEqual => "OpUGreaterThanEqual",
            Self::SGreaterThanEqual => "OpSGreaterThanEqual",
            Self::ULessThan => "OpULessThan",
            Self::SLessThan => "OpSLessThan",
            Self::ULessThanEqual => "OpULessThanEqual",
            Self::SLessThanEqual => "OpSLessThanEqual",
            Self::FOrdEqual => "OpFOrdEqual",
            Self::FOrdNotEqual => "OpFOrdNotEqual",
            Self::FOrdLessThan => "OpFOrdLessThan",
            Self::FOrdGreaterThan => "OpFOrdGreaterThan",
            Self::FOrdLessThanEqual => "OpFOrdLessThanEqual",
            Self::FOrdGreaterThanEqual => "OpFOrdGreaterThanEqual",
            Self::SelectionMerge => "OpSelectionMerge",
            Self::Label => "OpLabel",
            Self::Branch => "OpBranch",
            Self::BranchConditional => "OpBranchConditional",
            Self::Kill => "OpKill",
            Self::Return => "OpReturn",
            Self::ReturnValue => "OpReturnValue",
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            Self::Name => 5,
            Self::TypeVoid => 19,
            Self::TypeBool => 20,
            Self::TypeInt => 21,
            Self::TypeFloat => 22,
            Self::TypeVector => 23,
            Self::TypeStruct => 30,
            Self::ConstantTrue => 41,
            Self::ConstantFalse => 42,
            Self::Constant => 43,
            Self::Variable => 59,
            Self::Load => 61,
            Self::Store => 62,
            Self::SNegate => 126,
            Self::FNegate => 127,
            Self::IAdd => 128,
            Self::FAdd => 129,
            Self::ISub => 130,
            Self::FSub => 131,
            Self::IMul => 132,
            Self::FMul => 133,
            Self::UDiv => 134,
            Self::SDiv => 135,
            Self::FDiv => 136,
            Self::UMod => 137,
            Self::SRem => 138,
            Self::FRem => 140,
            Self::LogicalEqual => 164,
            Self::LogicalNotEqual => 165,
            Self::LogicalOr => 166,
            Self::LogicalAnd => 167,
            Self::LogicalNot => 168,
            Self::IEqual => 170,
            Self::INotEqual => 171,
            Self::UGreaterThan => 172,
            Self::SGreaterThan => 173,
            Self::UGreaterThanEqual => 174,
            Self::SGreaterThanEqual => 175,
            Self::ULessThan => 176,
            Self::SLessThan => 177,
            Self::ULessThanEqual => 178,
            Self::SLessThanEqual => 179,
            Self::FOrdEqual => 180,
            Self::FOrdNotEqual => 182,
            Self::FOrdLessThan => 184,
            Self::FOrdGreaterThan => 186,
            Self::FOrdLessThanEqual => 188,
            Self::FOrdGreaterThanEqual => 190,
            Self::SelectionMerge => 247,
            Self::Label => 248,
            Self::Branch => 249,
            Self::BranchConditional => 250,
            Self::Kill => 252,
            Self::Return => 253,
            Self::ReturnValue => 254,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single instruction operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A result id reference, rendered `%n`.
    Id(u32),
    /// An immediate scalar carried as a tagged value.
    Value(Value),
    /// An immediate integer literal (bit widths, vector sizes, signedness).
    Int(u32),
    /// A debug-name string.
    String(String),
    /// The empty selection-control mask.
    None,
}

impl Operand {
    fn words(&self, out: &mut Vec<u32>) {
        match self {
            Self::Id(id) => out.push(*id),
            Self::Value(value) => out.push(value_bits(value)),
            Self::Int(int) => out.push(*int),
            Self::String(text) => {
                // UTF-8 bytes, nul-terminated, packed little-endian.
                let mut bytes = text.as_bytes().to_vec();
                bytes.push(0);
                while bytes.len() % 4 != 0 {
                    bytes.push(0);
                }
                for chunk in bytes.chunks_exact(4) {
                    out.push(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
                }
            }
            Self::None => out.push(0),
        }
    }
}

fn value_bits(value: &Value) -> u32 {
    match value {
        Value::None => 0,
        Value::F32(v) => v.to_bits(),
        Value::F16(v) => u32::from(v.to_bits()),
        Value::I32(v) => *v as u32,
        Value::U32(v) => *v,
        Value::Bool(v) => u32::from(*v),
        Value::Temp(id) => *id,
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "%{id}"),
            Self::Value(value) => write!(f, "{value}"),
            Self::Int(int) => write!(f, "{int}"),
            Self::String(text) => write!(f, "\"{text}\""),
            Self::None => write!(f, "None"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub result: Option<u32>,
    pub op: Op,
    pub operands: Vec<Operand>,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(result) = self.result {
            write!(f, "%{result} = ")?;
        }
        write!(f, "{}", self.op)?;
        for operand in &self.operands {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}

const MAGIC: u32 = 0x0723_0203;
const VERSION: u32 = 0x0001_0000;

/// The writer's artifact: the instruction list and the id bound.
///
/// `Display` renders the textual instruction dump; [`SpirvModule::assemble`]
/// packs the module into its word form.
#[derive(Debug, Clone, PartialEq)]
pub struct SpirvModule {
    pub instructions: Vec<Instruction>,
    pub bound: u32,
}

impl SpirvModule {
    pub fn assemble(&self) -> Vec<u32> {
        let mut words = vec![MAGIC, VERSION, 0, self.bound, 0];

        for instruction in &self.instructions {
            let mut body = Vec::new();
            if let Some(result) = instruction.result {
                body.push(result);
            }
            for operand in &instruction.operands {
                operand.words(&mut body);
            }

            let count = body.len() as u32 + 1;
            words.push(count << 16 | instruction.op.code());
            words.append(&mut body);
        }

        words
    }
}

impl fmt::Display for SpirvModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}

/// Lowers a program into a SPIR-V style instruction list.
///
/// Result ids are handed out monotonically from 1 in first-use order; types
/// and constants are deduplicated, so re-mentioning one reuses its id.
pub struct SpirvWriter<'a> {
    program: &'a Program,
    info: &'a Info,
    instructions: Vec<Instruction>,
    next_id: u32,
    types: IndexMap<Type, u32>,
    constants: IndexMap<(Type, u64), u32>,
    vars: HashMap<String, (u32, Type)>,
    named_consts: HashMap<String, (u32, Type)>,
}

impl<'a> SpirvWriter<'a> {
    pub fn new(program: &'a Program, info: &'a Info) -> Self {
        Self {
            program,
            info,
            instructions: Vec::new(),
            next_id: 1,
            types: IndexMap::new(),
            constants: IndexMap::new(),
            vars: HashMap::new(),
            named_consts: HashMap::new(),
        }
    }

    pub fn generate(mut self) -> Result<SpirvModule> {
        log::debug!("emitting spirv for {}", self.program.program_id());

        let module = self.program.root_id().get(self.program);
        for decl in module.decls.clone() {
            match *decl.get(self.program) {
                node::Decl::Func(id) => self.func(id)?,
                node::Decl::Global(id) => self.global(id)?,
                node::Decl::Const(id) => self.module_const(id)?,
                node::Decl::Struct(_) => {}
            }
        }

        Ok(SpirvModule {
            instructions: self.instructions,
            bound: self.next_id,
        })
    }

    fn fresh(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push(&mut self, result: Option<u32>, op: Op, operands: Vec<Operand>) {
        self.instructions.push(Instruction {
            result,
            op,
            operands,
        });
    }

    fn spelling(&self, symbol: Symbol) -> String {
        self.program.symbols().resolve(symbol).to_owned()
    }

    /// The id of a type, emitting its declaration on first use.
    fn type_id(&mut self, ty: &Type) -> u32 {
        if let Some(id) = self.types.get(ty) {
            return *id;
        }

        // Component types precede the types mentioning them.
        let elem = match ty {
            Type::Vector(s, _) => Some(self.type_id(&Type::Scalar(*s))),
            _ => None,
        };

        let id = self.fresh();
        let (op, operands) = match ty {
            Type::Void => (Op::TypeVoid, vec![]),
            Type::Scalar(ScalarType::Bool) => (Op::TypeBool, vec![]),
            Type::Scalar(ScalarType::I32) => (Op::TypeInt, vec![Operand::Int(32), Operand::Int(1)]),
            Type::Scalar(ScalarType::U32) => (Op::TypeInt, vec![Operand::Int(32), Operand::Int(0)]),
            Type::Scalar(ScalarType::F32) => (Op::TypeFloat, vec![Operand::Int(32)]),
            Type::Scalar(ScalarType::F16) => (Op::TypeFloat, vec![Operand::Int(16)]),
            Type::Vector(_, size) => (
                Op::TypeVector,
                vec![
                    Operand::Id(elem.expect("vector element type id")),
                    Operand::Int(u32::from(*size)),
                ],
            ),
            Type::Struct(_) => (Op::TypeStruct, vec![]),
        };
        self.push(Some(id), op, operands);
        self.types.insert(ty.clone(), id);

        id
    }

    /// The id of a scalar constant, deduplicated by type and bit pattern.
    fn constant_id(&mut self, ty: &Type, value: Value) -> u32 {
        let key = (ty.clone(), u64::from(value_bits(&value)));
        if let Some(id) = self.constants.get(&key) {
            return *id;
        }

        let tid = self.type_id(ty);
        let id = self.fresh();
        match value {
            Value::Bool(true) => self.push(Some(id), Op::ConstantTrue, vec![Operand::Id(tid)]),
            Value::Bool(false) => self.push(Some(id), Op::ConstantFalse, vec![Operand::Id(tid)]),
            value => self.push(
                Some(id),
                Op::Constant,
                vec![Operand::Id(tid), Operand::Value(value)],
            ),
        }
        self.constants.insert(key, id);

        id
    }

    /// Maps a structural type annotation onto a resolved type.
    fn resolve_type_expr(&self, id: Id<node::TypeExpr>) -> Result<Type> {
        let ty = id.get(self.program);
        let name = self.program.symbols().resolve(ty.name);

        let scalar = |name: &str| match name {
            "bool" => Some(ScalarType::Bool),
            "i32" => Some(ScalarType::I32),
            "u32" => Some(ScalarType::U32),
            "f32" => Some(ScalarType::F32),
            "f16" => Some(ScalarType::F16),
            _ => None,
        };

        if let Some(s) = scalar(name) {
            return Ok(Type::Scalar(s));
        }

        if let Some(size) = name.strip_prefix("vec") {
            let size: u8 = size.parse().map_err(|_| {
                Error::new(
                    format!("unsupported vector size in {}", ty.spelling(self.program)),
                    ty.span,
                )
            })?;
            let elem = ty
                .args
                .first()
                .map(|arg| self.program.symbols().resolve(arg.get(self.program).name))
                .and_then(scalar)
                .ok_or_else(|| {
                    Error::new(
                        format!("vector type {} has no scalar element", ty.spelling(self.program)),
                        ty.span,
                    )
                })?;

            return Ok(Type::Vector(elem, size));
        }

        Ok(Type::Struct(name.to_owned()))
    }

    fn declare_var(
        &mut self,
        name: Symbol,
        ty: Type,
        init: Option<Id<node::Expr>>,
    ) -> Result<()> {
        let tid = self.type_id(&ty);
        let vid = self.fresh();
        self.push(Some(vid), Op::Variable, vec![Operand::Id(tid)]);

        let spelling = self.spelling(name);
        self.push(
            None,
            Op::Name,
            vec![Operand::Id(vid), Operand::String(spelling.clone())],
        );
        self.vars.insert(spelling, (vid, ty));

        if let Some(init) = init {
            let (value, _) = self.expr(init)?;
            self.push(None, Op::Store, vec![Operand::Id(vid), Operand::Id(value)]);
        }

        Ok(())
    }

    fn global(&mut self, id: Id<node::Global>) -> Result<()> {
        let global = id.get(self.program).clone();
        let ty = self.resolve_type_expr(global.ty)?;

        self.declare_var(global.name, ty, global.init)
    }

    fn module_const(&mut self, id: Id<node::Const>) -> Result<()> {
        let constant = *id.get(self.program);
        let init = constant
            .init
            .ok_or_else(|| Error::new("constant declaration has no initializer", constant.span))?;

        // A folded value from the overlay wins; otherwise the initializer
        // must be a literal.
        let folded = self
            .info
            .get(id.erase())
            .and_then(|resolved| Some((resolved.ty.clone(), resolved.constant.clone()?)));
        let (ty, value) = match folded {
            Some(folded) => folded,
            None => self.literal_value(init)?,
        };

        let cid = self.constant_id(&ty, value);
        let spelling = self.spelling(constant.name);
        self.push(
            None,
            Op::Name,
            vec![Operand::Id(cid), Operand::String(spelling.clone())],
        );
        self.named_consts.insert(spelling, (cid, ty));

        Ok(())
    }

    fn literal_value(&self, id: Id<node::Expr>) -> Result<(Type, Value)> {
        match *id.get(self.program) {
            node::Expr::Literal(id) => {
                let literal = *id.get(self.program);
                Ok(lit_value(literal.value))
            }
            ref expr => Err(Error::new(
                "constant initializer is not a literal",
                expr.span_in(self.program),
            )),
        }
    }

    fn func(&mut self, id: Id<node::Func>) -> Result<()> {
        let func = id.get(self.program).clone();

        let fid = self.fresh();
        let name = self.spelling(func.name);
        self.push(
            None,
            Op::Name,
            vec![Operand::Id(fid), Operand::String(name)],
        );

        let terminated = self.block_body(func.body)?;
        if !terminated {
            self.push(None, Op::Return, vec![]);
        }

        Ok(())
    }

    /// Emits a block's statements, reporting whether it ended in a
    /// terminator.
    fn block_body(&mut self, id: Id<node::Block>) -> Result<bool> {
        let mut terminated = false;
        for stmt in id.get(self.program).stmts.clone() {
            terminated = self.stmt(stmt)?;
        }

        Ok(terminated)
    }

    fn stmt(&mut self, id: Id<node::Stmt>) -> Result<bool> {
        match *id.get(self.program) {
            node::Stmt::Block(id) => self.block_body(id),
            node::Stmt::If(id) => {
                self.if_stmt(id)?;
                Ok(false)
            }
            node::Stmt::Discard(_) => {
                self.push(None, Op::Kill, vec![]);
                Ok(true)
            }
            node::Stmt::Return(id) => {
                let ret = *id.get(self.program);
                match ret.value {
                    Some(value) => {
                        let (value, _) = self.expr(value)?;
                        self.push(None, Op::ReturnValue, vec![Operand::Id(value)]);
                    }
                    None => self.push(None, Op::Return, vec![]),
                }
                Ok(true)
            }
            node::Stmt::Var(id) => {
                let var = *id.get(self.program);
                let ty = match var.ty {
                    Some(ty) => self.resolve_type_expr(ty)?,
                    None => match self.info.type_of(id.erase()) {
                        Some(ty) => ty.clone(),
                        None => {
                            return Err(Error::new(
                                "cannot determine the variable's type",
                                var.span,
                            ))
                        }
                    },
                };
                self.declare_var(var.name, ty, var.init)?;
                Ok(false)
            }
            node::Stmt::Assign(id) => {
                let assign = *id.get(self.program);
                let target = self.lvalue(assign.target)?;
                let (value, _) = self.expr(assign.value)?;
                self.push(None, Op::Store, vec![Operand::Id(target), Operand::Id(value)]);
                Ok(false)
            }
        }
    }

    fn lvalue(&mut self, id: Id<node::Expr>) -> Result<u32> {
        match *id.get(self.program) {
            node::Expr::Ident(id) => {
                let ident = *id.get(self.program);
                let spelling = self.spelling(ident.name);
                self.vars
                    .get(&spelling)
                    .map(|(vid, _)| *vid)
                    .ok_or_else(|| {
                        Error::new(format!("unknown identifier `{spelling}`"), ident.span)
                    })
            }
            ref expr => Err(Error::new(
                "assignment target is not an identifier",
                expr.span_in(self.program),
            )),
        }
    }

    fn if_stmt(&mut self, id: Id<node::If>) -> Result<()> {
        let if_ = id.get(self.program).clone();

        let (cond, _) = self.expr(if_.cond)?;
        let merge = self.fresh();
        self.cond_chain(cond, if_.body, &if_.elses, merge)?;
        self.push(Some(merge), Op::Label, vec![]);

        Ok(())
    }

    /// One link of a conditional chain: branch on `cond`, run `body`, and
    /// lower the remaining alternatives inside the false label, all meeting
    /// at `merge`.
    fn cond_chain(
        &mut self,
        cond: u32,
        body: Id<node::Block>,
        rest: &[Id<node::Else>],
        merge: u32,
    ) -> Result<()> {
        let true_label = self.fresh();
        let false_label = if rest.is_empty() {
            merge
        } else {
            self.fresh()
        };

        self.push(
            None,
            Op::SelectionMerge,
            vec![Operand::Id(merge), Operand::None],
        );
        self.push(
            None,
            Op::BranchConditional,
            vec![
                Operand::Id(cond),
                Operand::Id(true_label),
                Operand::Id(false_label),
            ],
        );

        self.push(Some(true_label), Op::Label, vec![]);
        let terminated = self.block_body(body)?;
        if !terminated {
            self.push(None, Op::Branch, vec![Operand::Id(merge)]);
        }

        if let Some((first, rest)) = rest.split_first() {
            self.push(Some(false_label), Op::Label, vec![]);

            let alt = *first.get(self.program);
            match alt.cond {
                Some(cond) => {
                    let (cond, _) = self.expr(cond)?;
                    self.cond_chain(cond, alt.body, rest, merge)?;
                }
                None => {
                    let terminated = self.block_body(alt.body)?;
                    if !terminated {
                        self.push(None, Op::Branch, vec![Operand::Id(merge)]);
                    }
                }
            }
        }

        Ok(())
    }

    /// Lowers an expression, returning its result id and resolved type.
    fn expr(&mut self, id: Id<node::Expr>) -> Result<(u32, Type)> {
        match *id.get(self.program) {
            node::Expr::Literal(id) => {
                let literal = *id.get(self.program);
                let (ty, value) = lit_value(literal.value);
                let cid = self.constant_id(&ty, value);
                Ok((cid, ty))
            }
            node::Expr::Ident(id) => {
                let ident = *id.get(self.program);
                let spelling = self.spelling(ident.name);
                if let Some((cid, ty)) = self.named_consts.get(&spelling).cloned() {
                    return Ok((cid, ty));
                }
                let (vid, ty) = self
                    .vars
                    .get(&spelling)
                    .cloned()
                    .ok_or_else(|| {
                        Error::new(format!("unknown identifier `{spelling}`"), ident.span)
                    })?;

                let tid = self.type_id(&ty);
                let result = self.fresh();
                self.push(
                    Some(result),
                    Op::Load,
                    vec![Operand::Id(tid), Operand::Id(vid)],
                );
                Ok((result, ty))
            }
            node::Expr::Unary(id) => {
                let unary = *id.get(self.program);
                let (inner, ty) = self.expr(unary.expr)?;

                let scalar = ty.elem().ok_or_else(|| {
                    Error::new("unary operand has no scalar class", unary.span)
                })?;
                let op = unary_op(unary.op, scalar)
                    .ok_or_else(|| Error::new("unsupported unary operation", unary.span))?;

                let tid = self.type_id(&ty);
                let result = self.fresh();
                self.push(Some(result), op, vec![Operand::Id(tid), Operand::Id(inner)]);
                Ok((result, ty))
            }
            node::Expr::Binary(id) => {
                let binary = *id.get(self.program);
                let (lhs, ty) = self.expr(binary.lhs)?;
                let (rhs, _) = self.expr(binary.rhs)?;

                let scalar = ty.elem().ok_or_else(|| {
                    Error::new("binary operand has no scalar class", binary.span)
                })?;
                let (op, comparison) = binary_op(binary.op, scalar)
                    .ok_or_else(|| Error::new("unsupported binary operation", binary.span))?;

                let result_ty = if comparison {
                    Type::Scalar(ScalarType::Bool)
                } else {
                    ty
                };
                let tid = self.type_id(&result_ty);
                let result = self.fresh();
                self.push(
                    Some(result),
                    op,
                    vec![Operand::Id(tid), Operand::Id(lhs), Operand::Id(rhs)],
                );
                Ok((result, result_ty))
            }
            node::Expr::Call(ref call) => {
                let span = call.get(self.program).span;
                Err(Error::new(
                    "function calls are not supported by the spirv writer",
                    span,
                ))
            }
        }
    }
}

fn lit_value(lit: node::Lit) -> (Type, Value) {
    match lit {
        node::Lit::Bool(v) => (Type::Scalar(ScalarType::Bool), Value::Bool(v)),
        node::Lit::I32(v) => (Type::Scalar(ScalarType::I32), Value::I32(v)),
        node::Lit::U32(v) => (Type::Scalar(ScalarType::U32), Value::U32(v)),
        node::Lit::F32(v) => (Type::Scalar(ScalarType::F32), Value::F32(v)),
        node::Lit::F16(v) => (Type::Scalar(ScalarType::F16), Value::F16(v)),
    }
}

fn unary_op(op: node::UnaryOp, scalar: ScalarType) -> Option<Op> {
    match (op, scalar) {
        (node::UnaryOp::Neg, ScalarType::F32 | ScalarType::F16) => Some(Op::FNegate),
        (node::UnaryOp::Neg, ScalarType::I32) => Some(Op::SNegate),
        (node::UnaryOp::Not, ScalarType::Bool) => Some(Op::LogicalNot),
        _ => None,
    }
}

/// Selects the opcode for a binary operation over the given scalar class,
/// flagging comparisons (whose result type is boolean).
fn binary_op(op: node::BinaryOp, scalar: ScalarType) -> Option<(Op, bool)> {
    use node::BinaryOp;
    use ScalarType::*;

    let op = match (op, scalar) {
        (BinaryOp::Add, F32 | F16) => (Op::FAdd, false),
        (BinaryOp::Add, I32 | U32) => (Op::IAdd, false),
        (BinaryOp::Sub, F32 | F16) => (Op::FSub, false),
        (BinaryOp::Sub, I32 | U32) => (Op::ISub, false),
        (BinaryOp::Mul, F32 | F16) => (Op::FMul, false),
        (BinaryOp::Mul, I32 | U32) => (Op::IMul, false),
        (BinaryOp::Div, F32 | F16) => (Op::FDiv, false),
        (BinaryOp::Div, I32) => (Op::SDiv, false),
        (BinaryOp::Div, U32) => (Op::UDiv, false),
        (BinaryOp::Mod, F32 | F16) => (Op::FRem, false),
        (BinaryOp::Mod, I32) => (Op::SRem, false),
        (BinaryOp::Mod, U32) => (Op::UMod, false),
        (BinaryOp::Eq, F32 | F16) => (Op::FOrdEqual, true),
        (BinaryOp::Eq, I32 | U32) => (Op::IEqual, true),
        (BinaryOp::Eq, Bool) => (Op::LogicalEqual, true),
        (BinaryOp::NotEq, F32 | F16) => (Op::FOrdNotEqual, true),
        (BinaryOp::NotEq, I32 | U32) => (Op::INotEqual, true),
        (BinaryOp::NotEq, Bool) => (Op::LogicalNotEqual, true),
        (BinaryOp::Less, F32 | F16) => (Op::FOrdLessThan, true),
        (BinaryOp::Less, I32) => (Op::SLessThan, true),
        (BinaryOp::Less, U32) => (Op::ULessThan, true),
        (BinaryOp::LessEq, F32 | F16) => (Op::FOrdLessThanEqual, true),
        (BinaryOp::LessEq, I32) => (Op::SLessThanEqual, true),
        (BinaryOp::LessEq, U32) => (Op::ULessThanEqual, true),
        (BinaryOp::Greater, F32 | F16) => (Op::FOrdGreaterThan, true),
        (BinaryOp::Greater, I32) => (Op::SGreaterThan, true),
        (BinaryOp::Greater, U32) => (Op::UGreaterThan, true),
        (BinaryOp::GreaterEq, F32 | F16) => (Op::FOrdGreaterThanEqual, true),
        (BinaryOp::GreaterEq, I32) => (Op::SGreaterThanEqual, true),
        (BinaryOp::GreaterEq, U32) => (Op::UGreaterThanEqual, true),
        (BinaryOp::And, Bool) => (Op::LogicalAnd, false),
        (BinaryOp::Or, Bool) => (Op::LogicalOr, false),
        _ => return None,
    };

    Some(op)
}

#[cfg(test)]
mod tests {
    use glaze_span::Span;

    use super::*;
    use crate::testing::{self, FuncBody};

    fn emit(body: FuncBody) -> SpirvModule {
        let (program, info) = testing::func_program(body);
        SpirvWriter::new(&program, &info)
            .generate()
            .expect("spirv generation failed")
    }

    fn f32_var(b: &mut ProgramBuilder, name: &str, init: f32) -> Id<node::Stmt> {
        let init = testing::literal(b, node::Lit::F32(init));
        f32_named_var(b, name, init)
    }

    fn f32_named_var(b: &mut ProgramBuilder, name: &str, init: Id<node::Expr>) -> Id<node::Stmt> {
        let name = b.intern(name);
        let f32_ = b.intern("f32");
        let ty = b.insert(node::TypeExpr {
            span: Span::default(),
            name: f32_,
            args: vec![],
        });
        let var = b.insert(node::Var {
            span: Span::default(),
            name,
            ty: Some(ty),
            init: Some(init),
        });

        b.insert(node::Stmt::Var(var))
    }

    #[test]
    fn ids_number_in_first_use_order() {
        let module = emit(|b| vec![f32_var(b, "x", 1.0)]);

        assert_eq!(
            module.to_string(),
            "OpName %1 \"main\"\n\
             %2 = OpTypeFloat 32\n\
             %3 = OpVariable %2\n\
             OpName %3 \"x\"\n\
             %4 = OpConstant %2 1.000000\n\
             OpStore %3 %4\n\
             OpReturn\n"
        );
        assert_eq!(module.bound, 5);
    }

    #[test]
    fn types_and_constants_are_deduplicated() {
        let module = emit(|b| vec![f32_var(b, "x", 1.0), f32_var(b, "y", 1.0)]);
        let text = module.to_string();

        assert_eq!(text.matches("OpTypeFloat 32").count(), 1);
        assert_eq!(text.matches("OpConstant %2 1.000000").count(), 1);
        assert!(text.contains("OpStore %5 %4"), "got:\n{text}");
    }

    #[test]
    fn module_constants_resolve_without_a_load() {
        let mut builder = ProgramBuilder::new();

        let k = builder.intern("k");
        let init = testing::literal(&mut builder, node::Lit::F32(2.0));
        let constant = builder.insert(node::Const {
            span: Span::default(),
            name: k,
            ty: None,
            init: Some(init),
        });
        let constant = builder.insert(node::Decl::Const(constant));

        let init = testing::ident(&mut builder, "k");
        let var = f32_named_var(&mut builder, "x", init);
        let block = builder.insert(node::Block {
            span: Span::default(),
            stmts: vec![var],
        });
        let main = builder.intern("main");
        let func = builder.insert(node::Func {
            span: Span::default(),
            name: main,
            params: vec![],
            ret: None,
            body: block,
            attrs: vec![],
        });
        let func = builder.insert(node::Decl::Func(func));
        let module = builder.insert(node::Module {
            span: Span::default(),
            decls: vec![constant, func],
        });

        let program = builder.finish(module);
        let info = Info::new(&program);
        let module = SpirvWriter::new(&program, &info)
            .generate()
            .expect("spirv generation failed");

        assert_eq!(
            module.to_string(),
            "%1 = OpTypeFloat 32\n\
             %2 = OpConstant %1 2.000000\n\
             OpName %2 \"k\"\n\
             OpName %3 \"main\"\n\
             %4 = OpVariable %1\n\
             OpName %4 \"x\"\n\
             OpStore %4 %2\n\
             OpReturn\n"
        );
    }

    #[test]
    fn conditional_lowers_to_a_branch_chain() {
        let module = emit(|b| {
            let name = b.intern("c");
            let bool_ = b.intern("bool");
            let ty = b.insert(node::TypeExpr {
                span: Span::default(),
                name: bool_,
                args: vec![],
            });
            let init = testing::literal(b, node::Lit::Bool(true));
            let var = b.insert(node::Var {
                span: Span::default(),
                name,
                ty: Some(ty),
                init: Some(init),
            });
            let var = b.insert(node::Stmt::Var(var));

            let cond = testing::ident(b, "c");
            let body = testing::discard_block(b);
            let ret = b.insert(node::Return {
                span: Span::default(),
                value: None,
            });
            let ret = b.insert(node::Stmt::Return(ret));
            let else_body = b.insert(node::Block {
                span: Span::default(),
                stmts: vec![ret],
            });
            let else_ = b.insert(node::Else {
                span: Span::default(),
                cond: None,
                body: else_body,
            });
            let if_ = b.insert(node::If {
                span: Span::default(),
                cond,
                body,
                elses: vec![else_],
            });
            let if_ = b.insert(node::Stmt::If(if_));

            vec![var, if_]
        });

        assert_eq!(
            module.to_string(),
            "OpName %1 \"main\"\n\
             %2 = OpTypeBool\n\
             %3 = OpVariable %2\n\
             OpName %3 \"c\"\n\
             %4 = OpConstantTrue %2\n\
             OpStore %3 %4\n\
             %5 = OpLoad %2 %3\n\
             OpSelectionMerge %6 None\n\
             OpBranchConditional %5 %7 %8\n\
             %7 = OpLabel\n\
             OpKill\n\
             %8 = OpLabel\n\
             OpReturn\n\
             %6 = OpLabel\n\
             OpReturn\n"
        );
    }

    #[test]
    fn assembled_words_start_with_the_header() {
        let module = emit(|b| vec![f32_var(b, "x", 1.0)]);
        let words = module.assemble();

        assert_eq!(words[0], 0x0723_0203);
        assert_eq!(words[3], module.bound);
        // OpName %1 "main": 1 opcode word + 1 id + 2 string words.
        assert_eq!(words[5], 4 << 16 | 5);
    }

    #[test]
    fn calls_are_rejected() {
        let (program, info) = testing::func_program(|b| {
            let func = testing::ident(b, "f");
            let call = b.insert(node::Call {
                span: Span::default(),
                func,
                args: vec![],
            });
            let call = b.insert(node::Expr::Call(call));
            let ret = b.insert(node::Return {
                span: Span::default(),
                value: Some(call),
            });
            vec![b.insert(node::Stmt::Return(ret))]
        });

        let err = SpirvWriter::new(&program, &info).generate().unwrap_err();

        assert!(err.message.contains("not supported"));
    }
}
