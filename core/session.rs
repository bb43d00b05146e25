use crate::analyze::{self, Offender};
use crate::error::Result;
use crate::patterns::RuleSet;
use crate::select::{self, CandidateFile, FileSelector, SelectOptions};
use std::path::{Path, PathBuf};

/// Decision capability for the feedback loop: shown the flagged large
/// contributors, answers whether they should be excluded and the
/// selection regenerated. Injected so the loop never talks to a
/// terminal itself.
pub trait ConfirmOffenders {
    fn confirm(&mut self, offenders: &[Offender]) -> bool;
}

impl<F: FnMut(&[Offender]) -> bool> ConfirmOffenders for F {
    fn confirm(&mut self, offenders: &[Offender]) -> bool {
        self(offenders)
    }
}

#[derive(Debug)]
pub enum SessionOutcome {
    /// The final selection, possibly oversized if the operator declined.
    Done(Vec<CandidateFile>),
    /// Nothing matched the criteria; a normal outcome, not an error.
    Empty,
}

/// The iterative select → analyze → regenerate loop.
///
/// Roots and the match base persist across iterations; the exclude set
/// only ever grows, each round deriving a strictly larger set, which is
/// what guarantees termination. Everything else (ignore cache,
/// candidate set, size contributions) is rebuilt from scratch per
/// iteration.
pub struct SelectionSession {
    roots: Vec<PathBuf>,
    match_base: PathBuf,
    include: RuleSet,
    exclude: RuleSet,
    options: SelectOptions,
}

impl SelectionSession {
    pub fn new(
        paths: &[PathBuf],
        include: RuleSet,
        exclude: RuleSet,
        options: SelectOptions,
    ) -> Self {
        let roots = select::resolve_roots(paths);
        let scopes: Vec<PathBuf> = roots.iter().map(|r| select::search_scope(r)).collect();
        let match_base =
            select::common_ancestor(&scopes).unwrap_or_else(|| PathBuf::from("/"));
        Self {
            roots,
            match_base,
            include,
            exclude,
            options,
        }
    }

    /// The directory all explicit rule matching and output paths are
    /// anchored at: the common ancestor of the search scopes.
    pub fn match_base(&self) -> &Path {
        &self.match_base
    }

    pub fn exclude_patterns(&self) -> &[String] {
        self.exclude.patterns()
    }

    pub fn run(&mut self, confirm: &mut dyn ConfirmOffenders) -> Result<SessionOutcome> {
        loop {
            let selector =
                FileSelector::new(&self.include, &self.exclude, &self.options, &self.match_base);
            let files = selector.select(&self.roots);
            if files.is_empty() {
                return Ok(SessionOutcome::Empty);
            }

            let file_paths: Vec<&Path> = files.iter().map(|f| f.path.as_path()).collect();
            let common_root = select::common_ancestor(&file_paths)
                .unwrap_or_else(|| self.match_base.clone());
            let offenders = analyze::analyze_content_sizes(&files, &common_root);
            if offenders.is_empty() {
                return Ok(SessionOutcome::Done(files));
            }

            if !confirm.confirm(&offenders) {
                log::info!("Keeping the oversized selection on operator request");
                return Ok(SessionOutcome::Done(files));
            }

            let added = fold_patterns(&offenders, &common_root, &self.match_base);
            log::info!(
                "Regenerating with {} added exclusion(s): {:?}",
                added.len(),
                added
            );
            self.exclude = self.exclude.extended(added)?;
        }
    }
}

/// Turns offenders into exclude patterns anchored at the match base:
/// `/<path>/**` for directories, `/<path>` for files, so an identically
/// named path elsewhere in the tree is not caught.
fn fold_patterns(offenders: &[Offender], common_root: &Path, match_base: &Path) -> Vec<String> {
    offenders
        .iter()
        .map(|off| {
            let abs = common_root.join(&off.path);
            let rel = pathdiff::diff_paths(&abs, match_base).unwrap_or_else(|| off.path.clone());
            if abs.is_dir() {
                format!("/{}/**", rel.display())
            } else {
                format!("/{}", rel.display())
            }
        })
        .collect()
}
