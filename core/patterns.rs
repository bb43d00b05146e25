use crate::error::{AppError, Result};
use ignore::Match;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Matcher over an ordered sequence of gitignore-syntax pattern lines.
///
/// Evaluation follows standard ignore-file semantics: the last matching
/// pattern wins, `!` negates, a trailing `/` restricts a pattern to
/// directories, and `**` crosses path-segment boundaries.
pub struct PatternMatcher {
    inner: Gitignore,
}

impl PatternMatcher {
    /// Compiles an ordered pattern list. Paths handed to the resulting
    /// matcher must be relative. Fails on the first invalid pattern.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GitignoreBuilder::new("");
        for line in lines {
            let line = line.as_ref();
            builder.add_line(None, line).map_err(|e| {
                log::error!("Invalid glob pattern \"{}\": {}", line, e);
                AppError::Glob(format!("Invalid glob pattern \"{}\": {}", line, e))
            })?;
        }
        Ok(Self {
            inner: builder.build()?,
        })
    }

    /// Loads the patterns of an ignore file on disk, rooted at the file's
    /// directory. Unreadable or empty files yield `None`; individual bad
    /// lines are skipped, matching what git itself does.
    pub fn from_ignore_file(path: &Path) -> Option<Self> {
        let (inner, err) = Gitignore::new(path);
        if let Some(e) = err {
            log::warn!("Problem parsing ignore file {}: {}", path.display(), e);
        }
        if inner.is_empty() {
            return None;
        }
        Some(Self { inner })
    }

    /// Outcome of the last pattern matching `path`: `Some(true)` ignored,
    /// `Some(false)` negated back in, `None` when no pattern matched.
    pub fn decision(&self, path: &Path, is_dir: bool) -> Option<bool> {
        match self.inner.matched(path, is_dir) {
            Match::None => None,
            Match::Ignore(_) => Some(true),
            Match::Whitelist(_) => Some(false),
        }
    }

    /// Like [`decision`](Self::decision), but also consults the path's
    /// parent directories so that directory-only patterns apply to the
    /// files beneath them.
    pub fn decision_with_parents(&self, path: &Path, is_dir: bool) -> Option<bool> {
        match self.inner.matched_path_or_any_parents(path, is_dir) {
            Match::None => None,
            Match::Ignore(_) => Some(true),
            Match::Whitelist(_) => Some(false),
        }
    }

    pub fn matches(&self, path: &Path, is_dir: bool) -> bool {
        self.decision(path, is_dir).unwrap_or(false)
    }
}

/// An immutable, ordered rule set used for the explicit exclude and
/// include filters. Growth across feedback-loop rounds happens by
/// deriving a new, strictly larger set via [`extended`](Self::extended),
/// never by mutation.
pub struct RuleSet {
    patterns: Vec<String>,
    matcher: PatternMatcher,
}

impl RuleSet {
    pub fn new(patterns: Vec<String>) -> Result<Self> {
        let matcher = PatternMatcher::from_lines(&patterns)?;
        Ok(Self { patterns, matcher })
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
            matcher: PatternMatcher {
                inner: Gitignore::empty(),
            },
        }
    }

    /// Derives a new rule set holding this set's patterns plus `more`.
    pub fn extended<I>(&self, more: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut patterns = self.patterns.clone();
        patterns.extend(more);
        Self::new(patterns)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Last-match outcome for a path relative to the match base; `false`
    /// when nothing matched. Directory-only patterns cover the files
    /// beneath the directory as well.
    pub fn matches(&self, relative: &Path, is_dir: bool) -> bool {
        self.matcher
            .decision_with_parents(relative, is_dir)
            .unwrap_or(false)
    }
}
