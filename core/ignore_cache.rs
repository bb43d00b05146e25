use crate::patterns::PatternMatcher;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const IGNORE_FILE_NAME: &str = ".gitignore";

/// Lazily loaded per-directory ignore rules, scoped to one selection pass.
///
/// A directory's rules only ever apply to paths beneath it; callers match
/// candidate paths against each ancestor's entry in turn. Both a present
/// rule and its absence are cached, so a directory is probed at most once
/// per pass.
#[derive(Default)]
pub struct IgnoreRuleCache {
    rules: HashMap<PathBuf, Option<PatternMatcher>>,
}

impl IgnoreRuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled rules for `dir`, loading them on first
    /// request. An unreadable or malformed ignore file is treated as no
    /// rule for that directory.
    pub fn get_or_load(&mut self, dir: &Path) -> Option<&PatternMatcher> {
        self.rules
            .entry(dir.to_path_buf())
            .or_insert_with(|| load_dir_rules(dir))
            .as_ref()
    }

    /// Number of directories probed so far.
    pub fn probed(&self) -> usize {
        self.rules.len()
    }
}

fn load_dir_rules(dir: &Path) -> Option<PatternMatcher> {
    let path = dir.join(IGNORE_FILE_NAME);
    if !path.is_file() {
        log::trace!("No ignore file in {}", dir.display());
        return None;
    }
    log::debug!("Loading ignore file {}", path.display());
    PatternMatcher::from_ignore_file(&path)
}
