pub mod validation_parser;

pub use validation_parser::LineParser;
