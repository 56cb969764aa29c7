pub mod query_template;

pub use query_template::QueryTemplate;
