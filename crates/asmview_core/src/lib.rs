mod disasm;
mod error;
mod exec_options;
mod naming;
mod parse;
mod policy;
mod runner;
mod types;

pub use disasm::disassembly_args;
pub use error::CompileError;
pub use exec_options::{
    exec_options_for_input, parent_dir, ExecOptions, DEFAULT_MAX_OUTPUT_BYTES,
};
pub use naming::{expected_output_path, DEFAULT_COMPILE_FILENAME};
pub use parse::{parse_output_lines, SOURCE_PLACEHOLDER};
pub use policy::apply_binary_filter;
pub use runner::ToolRunner;
pub use types::{
    ArtifactRef, CompilationRequest, CompilationResult, DisassemblyOutcome, DisassemblyRequest,
    ExecOutput, OutputFilters, OutputLine, Sha256Hex, SourceLocation, ToolInvocation, ToolKind,
};
