//! Thread-local context tracking for crash reports.
//!
//! Records which pipeline phase and input file the current thread is
//! working on. Row progress is global and atomic so rayon workers scoring
//! sentiment can bump it concurrently.
//!
//! ## Thread Safety
//!
//! - Thread-local context: Each thread has its own context (via `thread_local!`)
//! - Global progress: Atomic counters for rows processed/total
//! - Context guards use RAII for automatic cleanup on drop

use std::cell::RefCell;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

static ROWS_PROCESSED: AtomicUsize = AtomicUsize::new(0);
static ROWS_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<PipelineContext> = const { RefCell::new(PipelineContext::new()) };
}

/// Snapshot of what the pipeline was doing.
#[derive(Debug, Clone, Default)]
pub struct PipelineContext {
    pub phase: Option<AnalysisPhase>,
    /// Input file currently being read
    pub current_file: Option<PathBuf>,
    /// Report section being built, if any
    pub current_section: Option<String>,
}

impl PipelineContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
            current_section: None,
        }
    }
}

/// Major stages of a run, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    /// Reading and parsing CSV input
    Loading,
    /// Running the sentiment model over tweet text
    SentimentInference,
    /// Deriving per-tweet alignment scores
    AlignmentScoring,
    /// Grouping tweets into the user study
    UserAggregation,
    /// Computing quantile thresholds and labeling camps
    CampClassification,
    /// Building report sections
    Reporting,
    /// Writing reports and CSV files
    OutputGeneration,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::SentimentInference => write!(f, "sentiment_inference"),
            Self::AlignmentScoring => write!(f, "alignment_scoring"),
            Self::UserAggregation => write!(f, "user_aggregation"),
            Self::CampClassification => write!(f, "camp_classification"),
            Self::Reporting => write!(f, "reporting"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// RAII guard restoring the previous context on drop.
pub struct ContextGuard {
    previous: PipelineContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut PipelineContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut *ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current phase until the returned guard drops.
///
/// ```ignore
/// let _phase = set_phase(AnalysisPhase::UserAggregation);
/// ```
#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update(|ctx| ctx.current_file = Some(path))
}

#[must_use]
pub fn set_current_section(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| ctx.current_section = Some(name))
}

/// Set the row counters. Thread-safe.
pub fn set_progress(processed: usize, total: usize) {
    ROWS_PROCESSED.store(processed, Ordering::Relaxed);
    ROWS_TOTAL.store(total, Ordering::Relaxed);
}

/// Thread-safe; called from parallel iterators.
pub fn increment_processed() {
    ROWS_PROCESSED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> PipelineContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        ROWS_PROCESSED.load(Ordering::Relaxed),
        ROWS_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = PipelineContext::new();
    });
}
