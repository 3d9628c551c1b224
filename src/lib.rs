pub mod cli;
pub mod core;

pub use cli::{run, Opts};
