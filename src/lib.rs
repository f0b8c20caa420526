//! Middle and back-end of the glaze shading-language compiler.
//!
//! A front-end (out of scope here) hands over a [`Program`] and the resolved
//! [`Info`] overlay; [`generate`] turns the pair into one target artifact.

pub use glaze_ir::Value;
pub use glaze_semantic::{Info, Resolution, Resolved, ScalarType, Type};
pub use glaze_span::Span;
pub use glaze_tree::prelude::{
    clone_program, CloneContext, CloneNode, Id, NoNotes, Node, NodeContainer, Program,
    ProgramBuilder, ProgramId, RawId, Symbol, TreeDump,
};
pub use glaze_tree::node;
pub use glaze_writer::{HlslWriter, SpirvModule, SpirvWriter, WgslWriter};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Wgsl,
    Hlsl,
    Spirv,
}

/// One generated artifact: source text for the textual targets, a word
/// stream for SPIR-V.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Text(String),
    Words(Vec<u32>),
}

#[derive(Debug, Error)]
pub enum Error {
    /// The tree failed its structural validity check; no writer ran.
    #[error("program failed its validity check")]
    InvalidProgram,
    #[error(transparent)]
    Writer(#[from] glaze_writer::Error),
}

/// Generates the artifact for one target.
///
/// Structural validity is checked up front; an invalid tree never reaches a
/// writer. Failures return the error alone, with no partial artifact.
pub fn generate(program: &Program, info: &Info, target: Target) -> Result<Artifact, Error> {
    if !program.is_valid() {
        return Err(Error::InvalidProgram);
    }

    log::info!("generating {target:?} for {}", program.program_id());

    let artifact = match target {
        Target::Wgsl => Artifact::Text(WgslWriter::new(program, info).generate()?),
        Target::Hlsl => Artifact::Text(HlslWriter::new(program, info).generate()?),
        Target::Spirv => Artifact::Words(SpirvWriter::new(program, info).generate()?.assemble()),
    };

    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_main() -> (Program, Info) {
        let mut builder = ProgramBuilder::new();

        let body = builder.insert(node::Block {
            span: Span::default(),
            stmts: vec![],
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

        let program = builder.finish(module);
        let info = Info::new(&program);

        (program, info)
    }

    #[test]
    fn textual_targets_yield_text() {
        let (program, info) = empty_main();

        let wgsl = generate(&program, &info, Target::Wgsl).expect("wgsl failed");
        let hlsl = generate(&program, &info, Target::Hlsl).expect("hlsl failed");

        assert_eq!(wgsl, Artifact::Text("fn main() {\n}\n".into()));
        assert_eq!(hlsl, Artifact::Text("void main() {\n}\n".into()));
    }

    #[test]
    fn spirv_target_yields_words() {
        let (program, info) = empty_main();

        match generate(&program, &info, Target::Spirv).expect("spirv failed") {
            Artifact::Words(words) => assert_eq!(words[0], 0x0723_0203),
            Artifact::Text(text) => panic!("expected words, got text:\n{text}"),
        }
    }

    #[test]
    fn invalid_programs_are_refused() {
        let mut builder = ProgramBuilder::new();

        // A constant with no initializer is structurally invalid.
        let name = builder.intern("broken");
        let constant = builder.insert(node::Const {
            span: Span::default(),
            name,
            ty: None,
            init: None,
        });
        let constant = builder.insert(node::Decl::Const(constant));
        let module = builder.insert(node::Module {
            span: Span::default(),
            decls: vec![constant],
        });

        let program = builder.finish(module);
        let info = Info::new(&program);

        assert!(matches!(
            generate(&program, &info, Target::Wgsl),
            Err(Error::InvalidProgram)
        ));
    }
}
