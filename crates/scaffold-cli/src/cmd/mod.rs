pub mod check;
pub mod config;
pub mod context;
pub mod generate;
pub mod interview;
pub mod render;
pub mod validate;
