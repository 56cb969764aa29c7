pub mod validation_generator;

pub use validation_generator::{DispatchMode, GenerationSummary, ValidationGenerator};
