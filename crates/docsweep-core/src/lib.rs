pub mod analysis;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod hasher;
pub mod index;
pub mod model;
pub mod progress;
pub mod scanner;

pub use analysis::canonical::{canonicalize, Canonicalizer, SuffixRule};
pub use analysis::cleanup::{CleanupExecutor, CleanupMode};
pub use analysis::grouping::{
    exact_duplicates, group, group_by_fingerprint, group_by_fingerprint_in, group_with, FingerprintView,
};
pub use analysis::resolution::resolve;
pub use config::AppConfig;
pub use decision::{AutoApprove, DecisionProvider, DeclineAll, GroupDecision, ScriptedDecisions};
pub use engine::{Analysis, GroupReport, SweepEngine};
pub use error::Error;
pub use hasher::Fingerprinter;
pub use index::{SizeIndex, SizeTier};
pub use model::{
    CanonicalKey, CleanupPlan, CleanupReport, ContentFingerprint, DuplicateGroup, ExactDuplicateSet,
    FileRecord, RemovalKind, RemovalOutcome, Resolution, SkippedFile,
};
pub use progress::{ProgressReporter, SilentReporter};
