//! External programs run by the release steps
//!
//! The docs, publish and secondary-build steps hand work to project scripts
//! and registry tools. Each program runs in the repository root with the
//! release context exported as `RELEASE_*` environment variables.

pub mod context;
pub mod executor;

pub use context::StepContext;
pub use executor::{CommandExecutor, CommandStatus};
