use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default cap on captured bytes per stream.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 1024 * 1024;

// ---------------------------------------------------------------------------
// Execution options
// ---------------------------------------------------------------------------

/// Per-invocation execution context: working directory, capture cap,
/// optional wall-clock bound, environment overrides. Every invocation
/// receives its own value; there are no shared ambient defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<PathBuf>,
    pub max_output_bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            timeout_ms: None,
            env: BTreeMap::new(),
        }
    }
}

impl ExecOptions {
    pub fn with_cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn with_max_output_bytes(mut self, bytes: usize) -> Self {
        self.max_output_bytes = bytes;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }
}

/// Parent directory with dirname semantics: a bare filename lives in `.`.
pub fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Derive the options for one compilation run: the baseline (or the
/// defaults) with the working directory pinned to the input file's
/// parent. The baseline itself is left untouched.
pub fn exec_options_for_input(input: &Path, baseline: Option<&ExecOptions>) -> ExecOptions {
    let mut options = baseline.cloned().unwrap_or_default();
    options.cwd = Some(parent_dir(input));
    options
}
