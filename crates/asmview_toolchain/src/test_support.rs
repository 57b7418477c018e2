//! Scripted `ToolRunner` for exercising stage contracts without real
//! tools.

use std::cell::RefCell;

use asmview_core::{CompileError, ExecOptions, ExecOutput, ToolInvocation, ToolKind, ToolRunner};

#[derive(Debug, Clone)]
pub(crate) struct FakeResponse {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    pub truncated: bool,
}

impl FakeResponse {
    pub fn exit(exit_code: i32) -> Self {
        Self {
            exit_code,
            stdout: String::new(),
            stderr: String::new(),
            truncated: false,
        }
    }

    pub fn stdout(mut self, text: &str) -> Self {
        self.stdout = text.to_string();
        self
    }

    pub fn stderr(mut self, text: &str) -> Self {
        self.stderr = text.to_string();
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncated = true;
        self
    }
}

/// Per-tool scripted responses plus a record of every invocation seen.
pub(crate) struct FakeRunner {
    assembler: FakeResponse,
    disassembler: FakeResponse,
    spawn_failures: Vec<ToolKind>,
    calls: RefCell<Vec<(ToolInvocation, ExecOptions)>>,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            assembler: FakeResponse::exit(0),
            disassembler: FakeResponse::exit(0),
            spawn_failures: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_assembler(mut self, response: FakeResponse) -> Self {
        self.assembler = response;
        self
    }

    pub fn with_disassembler(mut self, response: FakeResponse) -> Self {
        self.disassembler = response;
        self
    }

    pub fn failing_spawn(mut self, tool: ToolKind) -> Self {
        self.spawn_failures.push(tool);
        self
    }

    pub fn calls(&self) -> Vec<(ToolInvocation, ExecOptions)> {
        self.calls.borrow().clone()
    }

    pub fn calls_for(&self, tool: ToolKind) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(invocation, _)| invocation.tool == tool)
            .count()
    }
}

impl ToolRunner for FakeRunner {
    fn run(
        &self,
        invocation: &ToolInvocation,
        options: &ExecOptions,
    ) -> Result<ExecOutput, CompileError> {
        self.calls
            .borrow_mut()
            .push((invocation.clone(), options.clone()));
        if self.spawn_failures.contains(&invocation.tool) {
            return Err(CompileError::Spawn {
                tool: invocation.tool,
                message: format!("{}: scripted spawn failure", invocation.bin),
            });
        }
        let response = match invocation.tool {
            ToolKind::Assembler => &self.assembler,
            ToolKind::Disassembler => &self.disassembler,
        };
        Ok(ExecOutput {
            exit_code: response.exit_code,
            stdout: response.stdout.clone(),
            stderr: response.stderr.clone(),
            truncated: response.truncated,
        })
    }
}
