use crate::rewriter::{read, write_in_place};
use crate::token::{substitute, DelimiterPattern, VariableSource};
use crate::{FileSelector, Result, Settings};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub tokens_replaced: usize,
}

/// Substitute the placeholders of a single file in place.
///
/// Returns the number of distinct placeholders replaced. A file without
/// placeholders is left untouched on disk.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn process_file<S: VariableSource + ?Sized>(
    path: &Path,
    pattern: &DelimiterPattern,
    vars: &S,
    fail_on_missing: bool,
) -> Result<usize> {
    let content = read(path)?;

    match substitute(&content, pattern, vars, fail_on_missing, path)? {
        Some(substitution) => {
            write_in_place(path, &substitution.content)?;
            debug!(tokens = substitution.tokens, "Rewrote file");
            Ok(substitution.tokens)
        }
        None => Ok(0),
    }
}

/// Select the files under `root` and substitute each one, in order.
///
/// Stops at the first error. Files rewritten before the failure stay
/// rewritten.
pub fn run<S: VariableSource + ?Sized>(settings: &Settings, root: &Path, vars: &S) -> Result<RunSummary> {
    let pattern = DelimiterPattern::new(&settings.prefix, &settings.suffix)?;
    let files = FileSelector::new(&settings.file_pattern)?.select(root);
    info!("Selected {} files matching {}", files.len(), settings.file_pattern);

    let mut summary = RunSummary::default();
    for file in &files {
        let tokens = process_file(file, &pattern, vars, settings.fail_on_missing)?;
        summary.files_scanned += 1;
        if tokens > 0 {
            summary.files_rewritten += 1;
            summary.tokens_replaced += tokens;
        }
    }

    Ok(summary)
}
