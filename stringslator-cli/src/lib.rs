//! CLI library for testing purposes

pub mod config;
pub mod prompt;
pub mod render;

pub use config::{DB_ENV, DEFAULT_SEARCH_LANGUAGES, default_db_path, search_languages};
pub use prompt::ask;
