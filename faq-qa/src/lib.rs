//! Retrieval-augmented answering over the FAQ store.
//!
//! Flow of [`FaqPipeline::answer`]: embed the question, retrieve top-K FAQs,
//! render the fixed prompt with them as context, call the generative model and
//! return the answer together with the FAQs it was given.
//!
//! Callers share one [`PipelineHandle`], which builds the pipeline on first use and
//! rebuilds it after [`PipelineHandle::reset`].

mod api_types;
mod cfg;
mod error;
mod generator;
mod handle;
mod pipeline;
pub mod prompt;

#[cfg(test)]
mod testing;

pub use api_types::{AnswerMetadata, AnswerResult};
pub use cfg::{DEFAULT_LIST_LIMIT, DEFAULT_TOP_K, QaConfig};
pub use error::QaError;
pub use generator::{AnswerGenerator, LlmGenerator};
pub use handle::{PipelineBuilder, PipelineHandle};
pub use pipeline::FaqPipeline;
