pub mod config;
pub mod defaults;
pub mod error_utils;
pub mod loader;
pub mod markup;
pub mod models;
pub mod script;
pub mod validation;
