use serde::{Deserialize, Serialize};
use std::fmt;

/// Boot phase of one loaded module.
///
/// Phases advance strictly forward and are barrier-synchronized across the
/// whole cohort: no module enters phase N+1 before every module finished
/// phase N.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModulePhase {
    Unloaded,
    Prepared,
    Started,
    Completed,
}

impl fmt::Display for ModulePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModulePhase::Unloaded => "unloaded",
            ModulePhase::Prepared => "prepared",
            ModulePhase::Started => "started",
            ModulePhase::Completed => "completed",
        };
        f.write_str(name)
    }
}
