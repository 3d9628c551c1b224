pub mod exec;
pub mod screenshot;
pub mod ui;
