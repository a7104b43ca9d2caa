pub mod help;
pub mod style;
