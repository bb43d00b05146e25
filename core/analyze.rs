use crate::select::CandidateFile;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Share of the total output above which a file or directory is flagged.
pub const LARGE_CONTENT_THRESHOLD_PERCENT: f64 = 35.0;

/// A path whose aggregated content size dominates the collected output.
#[derive(Debug, Clone, PartialEq)]
pub struct Offender {
    /// Relative to the common root of the analyzed files.
    pub path: PathBuf,
    pub bytes: u64,
    pub percent: f64,
}

/// Flags the files and directories contributing more than
/// [`LARGE_CONTENT_THRESHOLD_PERCENT`] of the total collected size.
///
/// Every file's size is accumulated into the file itself and each
/// ancestor directory strictly below `common_root`, then the candidates
/// above the threshold are reduced to the nearest ones: when a directory
/// and one of its descendants both exceed the threshold, only the
/// descendant is reported, since excluding it already deflates the
/// ancestor. Contributions are recomputed from scratch on every call.
pub fn analyze_content_sizes(files: &[CandidateFile], common_root: &Path) -> Vec<Offender> {
    let total: u64 = files.iter().map(|f| f.content.len() as u64).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut contributions: BTreeMap<PathBuf, u64> = BTreeMap::new();
    for file in files {
        let Ok(rel) = file.path.strip_prefix(common_root) else {
            log::trace!(
                "{} is outside the analysis root {}",
                file.path.display(),
                common_root.display()
            );
            continue;
        };
        let size = file.content.len() as u64;
        let mut prefix = PathBuf::new();
        for comp in rel.components() {
            prefix.push(comp);
            *contributions.entry(prefix.clone()).or_default() += size;
        }
    }

    let candidates: Vec<Offender> = contributions
        .iter()
        .filter_map(|(path, &bytes)| {
            let percent = bytes as f64 / total as f64 * 100.0;
            (percent > LARGE_CONTENT_THRESHOLD_PERCENT).then(|| Offender {
                path: path.clone(),
                bytes,
                percent,
            })
        })
        .collect();

    // Keep only candidates with no candidate descendant of their own.
    candidates
        .iter()
        .filter(|off| {
            !candidates
                .iter()
                .any(|other| other.path != off.path && other.path.starts_with(&off.path))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, bytes: usize) -> CandidateFile {
        CandidateFile {
            path: PathBuf::from(path),
            content: "x".repeat(bytes),
        }
    }

    #[test]
    fn empty_input_yields_no_offenders() {
        assert!(analyze_content_sizes(&[], Path::new("/p")).is_empty());
    }

    #[test]
    fn zero_total_size_yields_no_offenders() {
        let files = [file("/p/a.txt", 0), file("/p/b.txt", 0)];
        assert!(analyze_content_sizes(&files, Path::new("/p")).is_empty());
    }

    #[test]
    fn dominant_file_is_flagged() {
        let files = [file("/p/big.txt", 800), file("/p/small.txt", 200)];
        let offenders = analyze_content_sizes(&files, Path::new("/p"));
        assert_eq!(offenders.len(), 1);
        assert_eq!(offenders[0].path, PathBuf::from("big.txt"));
        assert_eq!(offenders[0].bytes, 800);
        assert!((offenders[0].percent - 80.0).abs() < 1e-9);
    }

    #[test]
    fn nearest_offender_wins_over_its_ancestor() {
        // d holds 90% of the total, its file f1 holds 80%: only f1 is
        // the minimal unit worth excluding.
        let files = [
            file("/p/d/f1.txt", 800),
            file("/p/d/f2.txt", 100),
            file("/p/other.txt", 100),
        ];
        let offenders = analyze_content_sizes(&files, Path::new("/p"));
        assert_eq!(offenders.len(), 1);
        assert_eq!(offenders[0].path, PathBuf::from("d/f1.txt"));
    }

    #[test]
    fn dominant_directory_without_dominant_file_is_flagged_itself() {
        let files = [
            file("/p/d/f1.txt", 300),
            file("/p/d/f2.txt", 300),
            file("/p/other.txt", 400),
        ];
        let offenders = analyze_content_sizes(&files, Path::new("/p"));
        assert_eq!(offenders.len(), 2);
        assert_eq!(offenders[0].path, PathBuf::from("d"));
        assert_eq!(offenders[1].path, PathBuf::from("other.txt"));
    }

    #[test]
    fn threshold_is_strictly_greater_than() {
        // 35% exactly must not be flagged.
        let files = [
            file("/p/a.txt", 35),
            file("/p/b.txt", 33),
            file("/p/c.txt", 32),
        ];
        assert!(analyze_content_sizes(&files, Path::new("/p")).is_empty());
    }

    #[test]
    fn single_file_equal_to_the_root_contributes_nothing() {
        // The common root of one file is the file itself; its relative
        // path is empty and no offender can be derived from it.
        let files = [file("/p/only.txt", 1000)];
        assert!(analyze_content_sizes(&files, Path::new("/p/only.txt")).is_empty());
    }

    #[test]
    fn offenders_are_sorted_by_path() {
        let files = [
            file("/p/zz.txt", 400),
            file("/p/aa.txt", 400),
            file("/p/mid.txt", 200),
        ];
        let offenders = analyze_content_sizes(&files, Path::new("/p"));
        let paths: Vec<_> = offenders.iter().map(|o| o.path.clone()).collect();
        assert_eq!(paths, vec![PathBuf::from("aa.txt"), PathBuf::from("zz.txt")]);
    }
}
