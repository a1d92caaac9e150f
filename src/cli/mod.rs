//! Command-line workflow, separated from argument parsing in `main.rs`.

pub mod orchestration;
