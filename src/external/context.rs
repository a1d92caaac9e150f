use std::collections::HashMap;

use crate::pipeline::ReleaseStep;
use crate::version::ReleaseVersions;

/// Context information passed to an external program
#[derive(Debug, Clone)]
pub struct StepContext {
    /// Step running the program
    pub step: ReleaseStep,
    /// Version being replaced
    pub old_version: String,
    /// Version being released
    pub new_version: String,
    /// Tag name of the release
    pub tag: String,
}

impl StepContext {
    pub fn new(step: ReleaseStep, versions: &ReleaseVersions, tag: &str) -> Self {
        StepContext {
            step,
            old_version: versions.old.clone(),
            new_version: versions.new.clone(),
            tag: tag.to_string(),
        }
    }

    /// Convert context to environment variables for the program
    ///
    /// Maps context fields to RELEASE_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let mut env = HashMap::new();

        env.insert("RELEASE_OLD_VERSION".to_string(), self.old_version.clone());
        env.insert("RELEASE_NEW_VERSION".to_string(), self.new_version.clone());
        env.insert("RELEASE_TAG".to_string(), self.tag.clone());
        env.insert("RELEASE_STEP".to_string(), self.step.name().to_string());

        env
    }
}
