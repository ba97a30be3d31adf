//! Shared helpers: dates, external commands, MIME types and paths.

pub mod date;
pub mod exec;
pub mod mime;
pub mod path;
