//! The release pipeline
//!
//! A release is a fixed sequence of five steps with no branching, retry or
//! rollback: `Bump → Docs → Tag → Publish → SecondaryBuild`.

pub mod runner;

pub use runner::ReleasePipeline;

use std::fmt;

use crate::boundary::ReleaseWarning;
use crate::version::ReleaseVersions;

/// One step of the release pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseStep {
    Bump,
    Docs,
    Tag,
    Publish,
    SecondaryBuild,
}

impl ReleaseStep {
    /// Every step, in execution order
    pub const ALL: [ReleaseStep; 5] = [
        ReleaseStep::Bump,
        ReleaseStep::Docs,
        ReleaseStep::Tag,
        ReleaseStep::Publish,
        ReleaseStep::SecondaryBuild,
    ];

    /// Get the step name as a string
    pub fn name(&self) -> &'static str {
        match self {
            ReleaseStep::Bump => "bump",
            ReleaseStep::Docs => "docs",
            ReleaseStep::Tag => "tag",
            ReleaseStep::Publish => "publish",
            ReleaseStep::SecondaryBuild => "secondary-build",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReleaseStep::Bump => "Bumping version strings",
            ReleaseStep::Docs => "Generating documentation",
            ReleaseStep::Tag => "Tagging the release",
            ReleaseStep::Publish => "Publishing the package",
            ReleaseStep::SecondaryBuild => "Triggering the secondary build",
        }
    }
}

impl fmt::Display for ReleaseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened during one step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub step: ReleaseStep,
    /// Failures that were reported and ignored
    pub warnings: Vec<ReleaseWarning>,
}

impl StepOutcome {
    pub fn new(step: ReleaseStep) -> Self {
        StepOutcome {
            step,
            warnings: Vec::new(),
        }
    }

    /// True when the step ran without any ignored failure
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Result of a full release run
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseReport {
    pub versions: ReleaseVersions,
    pub tag: String,
    pub outcomes: Vec<StepOutcome>,
}

impl ReleaseReport {
    pub fn warning_count(&self) -> usize {
        self.outcomes.iter().map(|o| o.warnings.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(StepOutcome::is_clean)
    }
}
