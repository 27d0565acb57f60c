pub mod classify;
pub mod impact;
pub mod loader;
pub mod merge;
pub mod project;
