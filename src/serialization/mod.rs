pub mod sparql_json;

pub use sparql_json::{term_to_descriptor, DescriptorType, SparqlJsonSerializer, TermDescriptor};
