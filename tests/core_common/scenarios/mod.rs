pub mod concurrency;
pub mod exec;
pub mod http;
pub mod screenshot;
pub mod ui;
