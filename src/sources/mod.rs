pub mod parameter_source;

pub use parameter_source::{record_stream, LdbcValidationSource, ParameterSource, RecordStream};
