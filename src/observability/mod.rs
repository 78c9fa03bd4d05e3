//! Observability infrastructure: logging, crash reports and pipeline context.
//!
//! ## Usage
//!
//! ```ignore
//! use tweetalign::observability::{init_tracing, install_panic_hook, set_phase, AnalysisPhase};
//!
//! fn main() {
//!     install_panic_hook();
//!     init_tracing(1);
//!     let _phase = set_phase(AnalysisPhase::Loading);
//!     // a panic here reports the loading phase
//! }
//! ```

pub mod context;
pub mod panic_hook;
pub mod tracing;

pub use context::{
    get_current_context, get_progress, increment_processed, set_current_file,
    set_current_section, set_phase, set_progress, AnalysisPhase, ContextGuard, PipelineContext,
};
pub use panic_hook::install_panic_hook;
pub use self::tracing::init_tracing;
