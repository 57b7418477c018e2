use std::fmt;

use crate::types::ToolKind;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Fatal pipeline errors. A non-zero exit from either tool is not one of
/// them: the assembler's code travels as data on the compilation result,
/// and the disassembler's is recovered as `DisassemblyOutcome::ToolFailure`.
#[derive(Debug)]
pub enum CompileError {
    /// Tool executable missing or unrunnable.
    Spawn { tool: ToolKind, message: String },
    /// Subprocess killed after exceeding the execution context's time bound.
    Timeout { tool: ToolKind, timeout_ms: u64 },
    /// Assembly finished but no new file appeared next to the input.
    NoOutputFile,
    Io(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Spawn { tool, message } => {
                write!(f, "{} spawn failed: {}", tool, message)
            }
            CompileError::Timeout { tool, timeout_ms } => {
                write!(f, "{} timed out after {} ms", tool, timeout_ms)
            }
            CompileError::NoOutputFile => write!(f, "No output file was generated"),
            CompileError::Io(err) => write!(f, "io error: {}", err),
        }
    }
}

impl std::error::Error for CompileError {}
