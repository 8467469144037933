pub mod log;

pub use log::{collect_projects, run_log, run_log_strict, scan_for_tickets};
