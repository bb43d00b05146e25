use crate::binary::{BinaryCheck, BinaryClassifier};
use crate::ignore_cache::IgnoreRuleCache;
use crate::patterns::RuleSet;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A file that survived ignore, explicit-rule and binary filtering,
/// together with its decoded text content.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct SelectOptions {
    pub use_gitignore: bool,
    pub binary_check: BinaryCheck,
    /// Drop undecodable byte sequences instead of skipping the file.
    pub lossy_decode: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            use_gitignore: true,
            binary_check: BinaryCheck::default(),
            lossy_decode: true,
        }
    }
}

/// Walks the given roots and produces the filtered, sorted candidate
/// set. One selector instance performs exactly one pass; the ignore
/// cache it owns does not outlive the pass.
pub struct FileSelector<'a> {
    include: &'a RuleSet,
    exclude: &'a RuleSet,
    options: &'a SelectOptions,
    classifier: BinaryClassifier,
    match_base: PathBuf,
    cache: IgnoreRuleCache,
}

impl<'a> FileSelector<'a> {
    pub fn new(
        include: &'a RuleSet,
        exclude: &'a RuleSet,
        options: &'a SelectOptions,
        match_base: &Path,
    ) -> Self {
        Self {
            include,
            exclude,
            options,
            classifier: BinaryClassifier::new(options.binary_check),
            match_base: match_base.to_path_buf(),
            cache: IgnoreRuleCache::new(),
        }
    }

    /// Selects candidate files from `roots` (canonical paths). Multiple
    /// overlapping roots are deduplicated; the result is ordered by
    /// absolute path.
    pub fn select(mut self, roots: &[PathBuf]) -> Vec<CandidateFile> {
        let mut selected: BTreeMap<PathBuf, String> = BTreeMap::new();
        for root in roots {
            let scope = search_scope(root);
            if root.is_file() {
                // An explicit file root skips traversal but not filtering.
                if self.keep_file(root, &scope) {
                    if let Some(content) = self.read_text(root) {
                        selected.insert(root.clone(), content);
                    }
                }
                continue;
            }
            self.walk_root(root, &scope, &mut selected);
        }
        log::debug!(
            "Selection pass complete: {} files, {} directories probed for ignore rules",
            selected.len(),
            self.cache.probed()
        );
        selected
            .into_iter()
            .map(|(path, content)| CandidateFile { path, content })
            .collect()
    }

    fn walk_root(&mut self, root: &Path, scope: &Path, selected: &mut BTreeMap<PathBuf, String>) {
        let mut it = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        loop {
            let entry = match it.next() {
                None => break,
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    log::warn!("Skipping unreadable path during traversal: {}", e);
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let path = entry.path();
            if entry.file_type().is_dir() {
                if self.prune_dir(path, scope) {
                    log::trace!("Pruning directory {}", path.display());
                    it.skip_current_dir();
                }
            } else if entry.file_type().is_file() {
                if self.keep_file(path, scope) {
                    if let Some(content) = self.read_text(path) {
                        selected.insert(path.to_path_buf(), content);
                    }
                }
            }
        }
    }

    /// Directories are pruned before descent, so nothing below an
    /// excluded or ignored directory is ever visited.
    fn prune_dir(&mut self, path: &Path, scope: &Path) -> bool {
        if path.file_name().is_some_and(|n| n == ".git") {
            return true;
        }
        let rel = self.base_relative(path);
        if self.exclude.matches(&rel, true) {
            return true;
        }
        self.options.use_gitignore && self.ignored_by_chain(path, scope, true)
    }

    fn keep_file(&mut self, path: &Path, scope: &Path) -> bool {
        if self.options.use_gitignore && self.ignored_by_chain(path, scope, false) {
            log::trace!("Ignore rules drop {}", path.display());
            return false;
        }
        let rel = self.base_relative(path);
        if self.exclude.matches(&rel, false) {
            log::trace!("Exclude set drops {}", path.display());
            return false;
        }
        if !self.include.is_empty() && !self.include.matches(&rel, false) {
            log::trace!("Include set rejects {}", path.display());
            return false;
        }
        if self.classifier.is_binary(path) {
            log::trace!("Binary filter drops {}", path.display());
            return false;
        }
        true
    }

    /// Consults the ignore rules of every directory from the search
    /// scope down to the path's parent. Each rule set is evaluated
    /// relative to its own directory; the deepest one that produces a
    /// decision wins, so a nested `!pattern` can re-admit a path an
    /// outer file ignored.
    fn ignored_by_chain(&mut self, path: &Path, scope: &Path, is_dir: bool) -> bool {
        let Ok(rel) = path.strip_prefix(scope) else {
            return false;
        };
        let mut decision = None;
        let mut dir = scope.to_path_buf();
        if let Some(matcher) = self.cache.get_or_load(&dir) {
            decision = matcher.decision(path, is_dir).or(decision);
        }
        if let Some(parent_rel) = rel.parent() {
            for comp in parent_rel.components() {
                dir.push(comp);
                if let Some(matcher) = self.cache.get_or_load(&dir) {
                    decision = matcher.decision(path, is_dir).or(decision);
                }
            }
        }
        decision.unwrap_or(false)
    }

    fn base_relative(&self, path: &Path) -> PathBuf {
        pathdiff::diff_paths(path, &self.match_base).unwrap_or_else(|| path.to_path_buf())
    }

    fn read_text(&self, path: &Path) -> Option<String> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Skipping unreadable file {}: {}", path.display(), e);
                return None;
            }
        };
        match String::from_utf8(bytes) {
            Ok(content) => Some(content),
            Err(e) if self.options.lossy_decode => {
                log::debug!("Dropping invalid UTF-8 sequences in {}", path.display());
                let mut content = String::from_utf8_lossy(e.as_bytes()).into_owned();
                content.retain(|c| c != '\u{fffd}');
                Some(content)
            }
            Err(_) => {
                log::warn!("Skipping non-UTF-8 file: {}", path.display());
                None
            }
        }
    }
}

/// Canonicalizes the user-supplied paths, dropping (with a warning)
/// anything that does not resolve. Duplicates collapse to one root.
pub fn resolve_roots(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    for path in paths {
        match fs::canonicalize(path) {
            Ok(canon) => {
                if !roots.contains(&canon) {
                    roots.push(canon);
                }
            }
            Err(e) => log::warn!("Skipping path {}: {}", path.display(), e),
        }
    }
    roots
}

/// The directory pattern matching is anchored at for a root: the root
/// itself when it is a directory, its parent otherwise.
pub fn search_scope(root: &Path) -> PathBuf {
    if root.is_dir() {
        root.to_path_buf()
    } else {
        root.parent().unwrap_or(root).to_path_buf()
    }
}

/// Longest common component-wise prefix of the given paths.
pub fn common_ancestor<P: AsRef<Path>>(paths: &[P]) -> Option<PathBuf> {
    let first = paths.first()?.as_ref();
    let mut shared: Vec<Component> = first.components().collect();
    for path in &paths[1..] {
        let components: Vec<Component> = path.as_ref().components().collect();
        let keep = shared
            .iter()
            .zip(components.iter())
            .take_while(|(a, b)| a == b)
            .count();
        shared.truncate(keep);
    }
    if shared.is_empty() {
        None
    } else {
        Some(shared.iter().collect())
    }
}
