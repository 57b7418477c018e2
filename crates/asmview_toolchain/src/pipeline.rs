//! Build orchestration: policy, assemble, locate, disassemble.
//!
//! One call owns one working directory. The result value moves through
//! the stages; configuration is explicit per build, so concurrent builds
//! cannot observe each other.

use std::fs;
use std::path::{Path, PathBuf};

use asmview_core::{
    apply_binary_filter, expected_output_path, parent_dir, ArtifactRef, CompilationRequest,
    CompilationResult, CompileError, DisassemblyRequest, ExecOptions, ToolRunner,
    DEFAULT_COMPILE_FILENAME,
};
use serde::Serialize;

use crate::assembler::run_assembler;
use crate::locator::{describe_artifact, locate_output_artifact};
use crate::objdump::disassemble_into;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Pipeline configuration. One value per build; clone and adjust rather
/// than sharing mutable state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub assembler_bin: String,
    pub objdump_bin: String,
    /// Name sources are staged under; the locator skips it when scanning
    /// for the emitted binary.
    pub compile_filename: String,
    /// Logical output base name, accepted for naming compatibility.
    pub output_base: String,
    /// Baseline execution options applied to both tool invocations.
    pub exec: ExecOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            assembler_bin: "as".to_string(),
            objdump_bin: "objdump".to_string(),
            compile_filename: DEFAULT_COMPILE_FILENAME.to_string(),
            output_base: "output".to_string(),
            exec: ExecOptions::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// What one build produced. `artifact` is present only when assembly
/// succeeded and the binary was located. `expected_output` records the
/// canonical path the pipeline derives up front, which may differ from
/// what the assembler actually wrote.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    pub expected_output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactRef>,
    pub result: CompilationResult,
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Copy `input` into `workdir` under the pipeline's compile filename.
/// Builds must not share working directories: the locator treats every
/// non-source entry as the build output.
pub fn stage_source(
    input: &Path,
    workdir: &Path,
    compile_filename: &str,
) -> Result<PathBuf, CompileError> {
    let staged = workdir.join(compile_filename);
    fs::copy(input, &staged).map_err(|err| CompileError::Io(err.to_string()))?;
    Ok(staged)
}

/// Run the full pipeline for `request`. A failed assembly short-circuits:
/// the report carries the assembler's exit code and diagnostics, no
/// artifact and an empty `asm`, and the disassembler is not invoked.
pub fn assemble_and_disassemble(
    runner: &dyn ToolRunner,
    config: &PipelineConfig,
    request: &CompilationRequest,
) -> Result<BuildReport, CompileError> {
    let workdir = parent_dir(&request.input);
    let expected = expected_output_path(&workdir, &config.output_base, &config.compile_filename);

    let mut filters = request.filters.clone();
    let extra_args = apply_binary_filter(&mut filters);
    let mut staged_request = request.clone();
    staged_request.args.extend(extra_args);
    staged_request.filters = filters.clone();

    let result = run_assembler(runner, &staged_request, Some(&config.exec))?;
    if result.exit_code != 0 {
        return Ok(BuildReport {
            expected_output: expected,
            artifact: None,
            result,
        });
    }

    let artifact_path = locate_output_artifact(&request.input, &config.compile_filename)?;
    let artifact = describe_artifact(&artifact_path)?;
    let disasm_request = DisassemblyRequest {
        artifact: artifact_path,
        max_output_bytes: config.exec.max_output_bytes,
        intel_syntax: filters.intel_syntax,
        demangle: filters.demangle,
    };
    let result = disassemble_into(
        runner,
        &config.objdump_bin,
        &disasm_request,
        result,
        Some(&config.exec),
    )?;

    Ok(BuildReport {
        expected_output: expected,
        artifact: Some(artifact),
        result,
    })
}
