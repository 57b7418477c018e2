//! Assembler invocation stage.
//!
//! Runs the assembler to completion in the input file's directory and
//! reports its exit status as data: a failed assembly is a result to
//! present, not an error to raise. Only spawn, timeout and capture
//! failures propagate.

use asmview_core::{
    exec_options_for_input, parse_output_lines, CompilationRequest, CompilationResult,
    CompileError, ExecOptions, ToolInvocation, ToolKind, ToolRunner,
};

/// Run the assembler for `request` and build the initial result: exit
/// code, parsed stdout/stderr, the input path, empty `asm`. The working
/// directory is derived from the input; `baseline` supplies every other
/// execution default.
pub fn run_assembler(
    runner: &dyn ToolRunner,
    request: &CompilationRequest,
    baseline: Option<&ExecOptions>,
) -> Result<CompilationResult, CompileError> {
    let options = exec_options_for_input(&request.input, baseline);
    let invocation = ToolInvocation {
        tool: ToolKind::Assembler,
        bin: request.assembler.clone(),
        args: request.args.clone(),
    };
    let output = runner.run(&invocation, &options)?;
    Ok(CompilationResult {
        exit_code: output.exit_code,
        stdout: parse_output_lines(&output.stdout, &request.input),
        stderr: parse_output_lines(&output.stderr, &request.input),
        input_filename: request.input.clone(),
        asm: String::new(),
        truncated: output.truncated,
    })
}
