use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tool identity
// ---------------------------------------------------------------------------

/// The two external tools the pipeline drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    Assembler,
    Disassembler,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolKind::Assembler => write!(f, "assembler"),
            ToolKind::Disassembler => write!(f, "disassembler"),
        }
    }
}

/// One concrete subprocess to run: which tool, which executable, which
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool: ToolKind,
    pub bin: String,
    pub args: Vec<String>,
}

/// Captured result of a finished subprocess. `exit_code` is -1 when the
/// process was terminated by a signal. `truncated` is set when either
/// stream hit the configured capture cap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub truncated: bool,
}

// ---------------------------------------------------------------------------
// Hash newtype
// ---------------------------------------------------------------------------

/// Lowercase hex SHA-256 digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sha256Hex(pub String);

impl Sha256Hex {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Compilation request / result
// ---------------------------------------------------------------------------

/// Output shaping flags negotiated for a build. The pipeline forces
/// `binary` on for assembly sources (see `policy`); the other two steer
/// the disassembler invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFilters {
    pub binary: bool,
    pub intel_syntax: bool,
    pub demangle: bool,
}

/// Everything needed to run one assembler invocation. Immutable once the
/// build starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilationRequest {
    /// Staged source file; its parent directory is the build's working
    /// directory.
    pub input: PathBuf,
    pub assembler: String,
    pub args: Vec<String>,
    pub filters: OutputFilters,
}

/// One parsed line of tool output. References to the staged input file
/// are rewritten to `<source>`; diagnostics shaped like
/// `<source>:line[:column]:` carry their position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLine {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

/// The progressively enriched build result. The invoker fills the exit
/// code and parsed outputs, the disassembly stage fills `asm`; stages
/// hand the value off by move, never through a shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilationResult {
    pub exit_code: i32,
    pub stdout: Vec<OutputLine>,
    pub stderr: Vec<OutputLine>,
    pub input_filename: PathBuf,
    /// Disassembly text, or empty when the build never reached that
    /// stage.
    pub asm: String,
    pub truncated: bool,
}

// ---------------------------------------------------------------------------
// Artifacts and disassembly
// ---------------------------------------------------------------------------

/// A located output binary, described for the build report. Valid only
/// while the build's working directory exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRef {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub sha256: Sha256Hex,
}

/// Inputs for one disassembler run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisassemblyRequest {
    pub artifact: PathBuf,
    pub max_output_bytes: usize,
    pub intel_syntax: bool,
    pub demangle: bool,
}

/// Outcome of a disassembler run. A non-zero exit is recovered here, not
/// raised: `ToolFailure` renders as a diagnostic placeholder so an
/// already-successful assembly is still reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisassemblyOutcome {
    Success(String),
    ToolFailure(i32),
}

impl DisassemblyOutcome {
    pub fn from_exec(output: ExecOutput) -> Self {
        if output.exit_code == 0 {
            DisassemblyOutcome::Success(output.stdout)
        } else {
            DisassemblyOutcome::ToolFailure(output.exit_code)
        }
    }

    /// Success text verbatim, or the placeholder embedding the exit code.
    pub fn into_asm_text(self) -> String {
        match self {
            DisassemblyOutcome::Success(text) => text,
            DisassemblyOutcome::ToolFailure(code) => {
                format!("<No output: objdump returned {}>", code)
            }
        }
    }
}
