#![forbid(unsafe_code)]

pub mod ai;
pub mod error;
pub mod export;
pub mod generation;
pub mod reflection;
pub mod remote;
pub mod wire;

pub use calm_core::Clock;

pub use ai::{ModelClient, ModelConfig};
pub use error::{ExportError, GenerationError};
pub use export::{ExportDocument, ExportEntry};
pub use generation::{
    ModelQuestionGenerator, ModelSummaryGenerator, QuestionGenerator, SummaryGenerator,
};
pub use reflection::{DispatchResult, ReflectionLoop};
pub use remote::EndpointClient;
