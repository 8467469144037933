pub mod client;
pub mod error;

pub use client::JiraClient;
pub use error::JiraError;
