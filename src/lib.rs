pub mod boundary;
pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod git;
pub mod pipeline;
pub mod ui;
pub mod version;

pub use error::{ReleaseError, Result};
