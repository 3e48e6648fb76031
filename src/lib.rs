pub mod api;
pub mod ast;
pub mod config;
pub mod error;
pub mod parser;
pub mod reference;
pub mod resolver;
pub mod types;
pub mod utils;
pub mod validator;
mod serialization;

pub use api::{compile, compile_file, compile_with, generate, generate_with, SourceBundle};
pub use ast::{Definitions, Schema};
pub use config::GeneratorConfig;
pub use error::{SchemaError, Warning, WarningKind};
pub use parser::Parser;
pub use reference::{classify, Reference};
pub use resolver::order;
pub use types::type_of;
pub use validator::validator_of;
