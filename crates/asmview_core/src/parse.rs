use std::path::Path;

use crate::types::{OutputLine, SourceLocation};

/// Canonical stand-in for the staged input file in tool output.
pub const SOURCE_PLACEHOLDER: &str = "<source>";

// ---------------------------------------------------------------------------
// Output-line parsing
// ---------------------------------------------------------------------------

/// Split captured tool output into lines, rewrite references to the
/// input file to `<source>`, and extract positions from diagnostics
/// shaped like `<source>:7:` or `<source>:7:12:`.
///
/// Both the input path as given and its bare filename are rewritten;
/// assemblers echo whichever form they were invoked with. A trailing
/// newline does not produce an empty final line, and `\r` line endings
/// are trimmed.
pub fn parse_output_lines(raw: &str, input: &Path) -> Vec<OutputLine> {
    let full = input.display().to_string();
    let base = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| *name != full);

    let mut segments: Vec<&str> = raw.split('\n').collect();
    if segments.last() == Some(&"") {
        segments.pop();
    }

    let mut lines = Vec::with_capacity(segments.len());
    for segment in segments {
        let mut text = segment
            .trim_end_matches('\r')
            .replace(&full, SOURCE_PLACEHOLDER);
        if let Some(base) = &base {
            text = text.replace(base.as_str(), SOURCE_PLACEHOLDER);
        }
        let source = parse_location(&text);
        lines.push(OutputLine { text, source });
    }
    lines
}

/// Position of a diagnostic that starts with the source placeholder.
/// `<source>:7: message` yields line 7; `<source>:7:12: message` adds
/// column 12; anything else yields none.
fn parse_location(text: &str) -> Option<SourceLocation> {
    let rest = text.strip_prefix(SOURCE_PLACEHOLDER)?.strip_prefix(':')?;
    let mut parts = rest.splitn(3, ':');
    let line = parts.next()?.trim().parse::<u32>().ok()?;
    let column = parts.next().and_then(|part| part.trim().parse::<u32>().ok());
    Some(SourceLocation { line, column })
}
