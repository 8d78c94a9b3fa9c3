pub mod client;
pub mod input;
pub mod output;

pub use client::{ClientError, Endpoint, Outcome, SubmissionClient};
