pub mod analyze;
pub mod binary;
pub mod config;
pub mod error;
pub mod ignore_cache;
pub mod patterns;
pub mod render;
pub mod select;
pub mod session;

pub use analyze::{LARGE_CONTENT_THRESHOLD_PERCENT, Offender, analyze_content_sizes};
pub use binary::{BinaryCheck, BinaryClassifier};
pub use config::Config;
pub use error::{AppError, Result};
pub use ignore_cache::IgnoreRuleCache;
pub use patterns::{PatternMatcher, RuleSet};
pub use render::{OutputFormat, render_document, render_tree};
pub use select::{CandidateFile, FileSelector, SelectOptions};
pub use session::{ConfirmOffenders, SelectionSession, SessionOutcome};
