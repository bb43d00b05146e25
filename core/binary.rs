use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes sampled from the head of a file for content-based detection.
const SAMPLE_LEN: usize = 8 * 1024;
/// Share of non-text bytes above which a sample is considered binary.
const NON_TEXT_RATIO: f64 = 0.30;

/// Known binary and otherwise non-promptable extensions, lowercase.
static BINARY_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Images
        "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "tif", "avif", "heic", "psd",
        "svg",
        // Audio / video
        "mp3", "wav", "ogg", "flac", "aac", "m4a", "wma", "mp4", "avi", "mkv", "mov", "wmv",
        "webm",
        // Archives
        "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar", "zst", "lz4", "jar", "war", "dmg",
        "iso",
        // Compiled objects & executables
        "exe", "dll", "so", "dylib", "a", "o", "obj", "lib", "bin", "class", "pyc", "pyo", "wasm",
        "rlib", "pdb",
        // Databases & data dumps
        "db", "sqlite", "sqlite3", "mdb", "parquet", "pickle", "pkl", "npy", "npz",
        // Fonts
        "ttf", "otf", "woff", "woff2", "eot",
        // Office documents
        "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp",
        // CAD & design
        "dwg", "dxf", "blend", "fbx", "skp", "stl", "3ds", "ai",
    ]
    .into_iter()
    .collect()
});

/// Lockfile basenames excluded regardless of extension: textual, but
/// machine-generated noise in a prompt.
static BINARY_BASENAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Cargo.lock",
        "package-lock.json",
        "yarn.lock",
        "pnpm-lock.yaml",
        "poetry.lock",
        "Pipfile.lock",
        "Gemfile.lock",
        "composer.lock",
        "uv.lock",
        "go.sum",
    ]
    .into_iter()
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BinaryCheck {
    /// Extension deny-list first, then head-of-file content sampling.
    #[default]
    Content,
    /// Extension deny-list only; no I/O per file.
    Extension,
    /// Keep everything.
    Off,
}

pub struct BinaryClassifier {
    mode: BinaryCheck,
}

impl BinaryClassifier {
    pub fn new(mode: BinaryCheck) -> Self {
        Self { mode }
    }

    pub fn is_binary(&self, path: &Path) -> bool {
        match self.mode {
            BinaryCheck::Off => false,
            BinaryCheck::Extension => has_binary_extension(path),
            BinaryCheck::Content => has_binary_extension(path) || has_binary_content(path),
        }
    }
}

/// Case-insensitive check against the extension deny-list and the
/// lockfile basenames. No I/O.
pub fn has_binary_extension(path: &Path) -> bool {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if BINARY_BASENAMES.contains(name) {
            return true;
        }
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => BINARY_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Samples the head of the file. A file that cannot be opened or read is
/// classified binary so it drops out of the selection instead of
/// aborting the run.
pub fn has_binary_content(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("Cannot open {} for sampling: {}", path.display(), e);
            return true;
        }
    };
    let mut buf = vec![0u8; SAMPLE_LEN];
    let mut filled = 0;
    loop {
        match file.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => {
                filled += n;
                if filled == buf.len() {
                    break;
                }
            }
            Err(e) => {
                log::debug!("Cannot sample {}: {}", path.display(), e);
                return true;
            }
        }
    }
    is_binary_sample(&buf[..filled])
}

/// A sample is binary if it contains a NUL byte, or if bytes outside the
/// texty set (printable ASCII, tab, newline, carriage return, or
/// high-bit bytes that may be UTF-8 continuations) exceed the ratio
/// threshold. An empty sample is never binary.
pub fn is_binary_sample(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    let mut suspicious = 0usize;
    for &b in sample {
        if b == 0 {
            return true;
        }
        let texty = matches!(b, 0x20..=0x7e | b'\t' | b'\n' | b'\r') || b >= 0x80;
        if !texty {
            suspicious += 1;
        }
    }
    suspicious as f64 > sample.len() as f64 * NON_TEXT_RATIO
}
