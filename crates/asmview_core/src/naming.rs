use std::path::{Path, PathBuf};

/// Fixed name sources are staged under inside a build's working
/// directory.
pub const DEFAULT_COMPILE_FILENAME: &str = "example.asm";

// ---------------------------------------------------------------------------
// Canonical output naming
// ---------------------------------------------------------------------------

/// The canonical output path for a build directory. Assembly builds key
/// their output location on the fixed compile filename, so the logical
/// base name is accepted for interface compatibility and ignored; the
/// locator later discovers what the assembler actually wrote.
pub fn expected_output_path(dir: &Path, _output_base: &str, compile_filename: &str) -> PathBuf {
    dir.join(compile_filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_dir_and_compile_filename() {
        let path = expected_output_path(Path::new("/tmp/b1"), "output", DEFAULT_COMPILE_FILENAME);
        assert_eq!(path, Path::new("/tmp/b1/example.asm"));
    }

    #[test]
    fn output_base_does_not_influence_the_path() {
        let a = expected_output_path(Path::new("/tmp/b1"), "alpha", "example.asm");
        let b = expected_output_path(Path::new("/tmp/b1"), "beta", "example.asm");
        assert_eq!(a, b);
    }
}
