//! Command-line front end

pub mod commands;
pub mod render;

pub use render::format_currency;
