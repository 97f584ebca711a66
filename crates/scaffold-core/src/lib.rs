pub mod condition;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod format;
pub mod generate;
pub mod interview;
pub mod io;
pub mod normalize;
pub mod paths;
pub mod resolver;
pub mod templates;
pub mod token;
pub mod types;
pub mod validator;

pub use context::{Context, ContextValue};
pub use engine::TemplateEngine;
pub use error::{Result, ScaffoldError};
