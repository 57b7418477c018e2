//! Disassembly stage.
//!
//! A non-zero disassembler exit is mapped to a diagnostic placeholder in
//! the result, never to a pipeline error, so a successful assembly is
//! still reported when listing the binary fails.

use asmview_core::{
    disassembly_args, CompilationResult, CompileError, DisassemblyOutcome, DisassemblyRequest,
    ExecOptions, ToolInvocation, ToolKind, ToolRunner,
};

/// One finished disassembler run: the tagged outcome plus whether the
/// captured text hit the output cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisassemblyRun {
    pub outcome: DisassemblyOutcome,
    pub truncated: bool,
}

/// Run the disassembler for `request`. The request's cap overrides the
/// baseline's; spawn and timeout failures propagate, exit codes do not.
pub fn run_disassembler(
    runner: &dyn ToolRunner,
    bin: &str,
    request: &DisassemblyRequest,
    baseline: Option<&ExecOptions>,
) -> Result<DisassemblyRun, CompileError> {
    let invocation = ToolInvocation {
        tool: ToolKind::Disassembler,
        bin: bin.to_string(),
        args: disassembly_args(request),
    };
    let mut options = baseline.cloned().unwrap_or_default();
    options.max_output_bytes = request.max_output_bytes;
    let output = runner.run(&invocation, &options)?;
    let truncated = output.truncated;
    Ok(DisassemblyRun {
        outcome: DisassemblyOutcome::from_exec(output),
        truncated,
    })
}

/// Enrich `result` with the disassembly of `request.artifact`: verbatim
/// stdout on success, the placeholder on tool failure. Takes the result
/// by value and hands the same one back.
pub fn disassemble_into(
    runner: &dyn ToolRunner,
    bin: &str,
    request: &DisassemblyRequest,
    mut result: CompilationResult,
    baseline: Option<&ExecOptions>,
) -> Result<CompilationResult, CompileError> {
    let run = run_disassembler(runner, bin, request, baseline)?;
    if run.truncated {
        result.truncated = true;
    }
    result.asm = run.outcome.into_asm_text();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use asmview_core::{OutputLine, ToolKind};

    use super::*;
    use crate::test_support::{FakeResponse, FakeRunner};

    fn request() -> DisassemblyRequest {
        DisassemblyRequest {
            artifact: PathBuf::from("/tmp/b1/a.out"),
            max_output_bytes: 4096,
            intel_syntax: true,
            demangle: false,
        }
    }

    fn seeded_result() -> CompilationResult {
        CompilationResult {
            exit_code: 0,
            stdout: vec![],
            stderr: vec![OutputLine {
                text: "note".to_string(),
                source: None,
            }],
            input_filename: PathBuf::from("/tmp/b1/example.asm"),
            asm: String::new(),
            truncated: false,
        }
    }

    #[test]
    fn success_copies_stdout_verbatim() {
        let runner = FakeRunner::new()
            .with_disassembler(FakeResponse::exit(0).stdout("mov eax, 1\n"));
        let result = disassemble_into(&runner, "objdump", &request(), seeded_result(), None)
            .expect("disassemble");
        assert_eq!(result.asm, "mov eax, 1\n");
    }

    #[test]
    fn nonzero_exit_substitutes_the_placeholder_and_keeps_other_fields() {
        let before = seeded_result();
        let runner = FakeRunner::new()
            .with_disassembler(FakeResponse::exit(3).stdout("garbage\n"));
        let result = disassemble_into(&runner, "objdump", &request(), before.clone(), None)
            .expect("disassemble");
        assert_eq!(result.asm, "<No output: objdump returned 3>");
        assert_eq!(result.exit_code, before.exit_code);
        assert_eq!(result.stdout, before.stdout);
        assert_eq!(result.stderr, before.stderr);
        assert_eq!(result.input_filename, before.input_filename);
        assert_eq!(result.truncated, before.truncated);
    }

    #[test]
    fn runner_receives_the_contract_argument_list() {
        let runner = FakeRunner::new().with_disassembler(FakeResponse::exit(0));
        disassemble_into(&runner, "objdump", &request(), seeded_result(), None)
            .expect("disassemble");
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        let (invocation, options) = &calls[0];
        assert_eq!(invocation.tool, ToolKind::Disassembler);
        assert_eq!(invocation.bin, "objdump");
        assert_eq!(
            invocation.args,
            vec!["-d", "/tmp/b1/a.out", "-l", "--insn-width=16", "-M", "intel"]
        );
        assert_eq!(options.max_output_bytes, 4096);
    }

    #[test]
    fn truncated_capture_marks_the_result() {
        let runner = FakeRunner::new()
            .with_disassembler(FakeResponse::exit(0).stdout("mov").truncated());
        let result = disassemble_into(&runner, "objdump", &request(), seeded_result(), None)
            .expect("disassemble");
        assert!(result.truncated);
        assert_eq!(result.asm, "mov");
    }

    #[test]
    fn spawn_failure_propagates() {
        let runner = FakeRunner::new().failing_spawn(ToolKind::Disassembler);
        let err = disassemble_into(&runner, "objdump", &request(), seeded_result(), None)
            .expect_err("spawn error");
        assert!(matches!(
            err,
            CompileError::Spawn {
                tool: ToolKind::Disassembler,
                ..
            }
        ));
    }
}
