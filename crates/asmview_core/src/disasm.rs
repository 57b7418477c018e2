use crate::types::DisassemblyRequest;

// ---------------------------------------------------------------------------
// Disassembler argument construction
// ---------------------------------------------------------------------------

/// Build the objdump argument list. Order is part of the contract:
/// `-d <artifact> -l --insn-width=16`, then `-C` when demangling, then
/// `-M intel` when Intel syntax is requested.
pub fn disassembly_args(request: &DisassemblyRequest) -> Vec<String> {
    let mut args = vec![
        "-d".to_string(),
        request.artifact.display().to_string(),
        "-l".to_string(),
        "--insn-width=16".to_string(),
    ];
    if request.demangle {
        args.push("-C".to_string());
    }
    if request.intel_syntax {
        args.push("-M".to_string());
        args.push("intel".to_string());
    }
    args
}
