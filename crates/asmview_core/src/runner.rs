use crate::error::CompileError;
use crate::exec_options::ExecOptions;
use crate::types::{ExecOutput, ToolInvocation};

/// Executes external tool processes on behalf of the pipeline stages.
///
/// The stages are written against this seam so their exit-code and
/// argument contracts can be exercised with scripted runners; the
/// process-backed implementation lives in the toolchain crate.
pub trait ToolRunner {
    /// Run the invocation to completion and capture its output. A
    /// non-zero exit is a successful run; only spawn failures, timeouts
    /// and capture failures are errors.
    fn run(
        &self,
        invocation: &ToolInvocation,
        options: &ExecOptions,
    ) -> Result<ExecOutput, CompileError>;
}
