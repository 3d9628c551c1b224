pub mod scenarios;
pub mod setup;
