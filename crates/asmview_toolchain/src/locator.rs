//! Output artifact discovery.
//!
//! Assemblers driven by this pipeline are not guaranteed to honor a
//! requested output name, so the emitted binary is found by scanning the
//! build's working directory for anything that is not the staged source.
//! The scan is deterministic: candidates are ordered by name and the
//! smallest wins.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use asmview_core::{parent_dir, ArtifactRef, CompileError, Sha256Hex};
use sha2::{Digest, Sha256};

/// Find the file the assembler actually wrote: any entry in the input's
/// directory whose name differs from `compile_filename`, smallest name
/// first. `CompileError::NoOutputFile` when nothing qualifies.
pub fn locate_output_artifact(
    input: &Path,
    compile_filename: &str,
) -> Result<PathBuf, CompileError> {
    let dir = parent_dir(input);
    let excluded = OsString::from(compile_filename);
    let mut candidates = Vec::new();
    for entry in fs::read_dir(&dir).map_err(|err| CompileError::Io(err.to_string()))? {
        let entry = entry.map_err(|err| CompileError::Io(err.to_string()))?;
        if entry.file_name() == excluded {
            continue;
        }
        candidates.push(entry.path());
    }
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or(CompileError::NoOutputFile)
}

/// Describe a located artifact for the build report: size plus content
/// digest.
pub fn describe_artifact(path: &Path) -> Result<ArtifactRef, CompileError> {
    let bytes = fs::read(path).map_err(|err| CompileError::Io(err.to_string()))?;
    Ok(ArtifactRef {
        path: path.to_path_buf(),
        size_bytes: bytes.len() as u64,
        sha256: Sha256Hex::new(sha256_hex(&bytes)),
    })
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
