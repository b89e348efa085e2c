//! Conclusion Engine — the periodic sweep that estimates P(best) for
//! every running experiment and promotes decisive ones via the Registry's
//! conditional update.

mod annotation;
mod engine;

pub use annotation::{AnnotationSink, HttpAnnotationSink, NoopAnnotationSink};
pub use engine::ConclusionEngine;
