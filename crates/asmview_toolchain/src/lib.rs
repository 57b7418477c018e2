mod assembler;
mod exec;
mod locator;
mod objdump;
mod pipeline;

#[cfg(test)]
pub(crate) mod test_support;

pub use assembler::run_assembler;
pub use exec::{tool_available, ProcessRunner};
pub use locator::{describe_artifact, locate_output_artifact};
pub use objdump::{disassemble_into, run_disassembler, DisassemblyRun};
pub use pipeline::{assemble_and_disassemble, stage_source, BuildReport, PipelineConfig};
