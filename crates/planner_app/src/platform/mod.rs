mod app;
mod effects;
mod shell;
mod ui;

pub use app::{run_ingest, run_plan, run_status, CommandOutput, Session};
pub use shell::run_shell;
