//! Build stages and their outcomes

use std::fmt;

/// A build stage, in pipeline order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Download,
    Format,
    Types,
    Stats,
    Cleanup,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Download => "download",
            Stage::Format => "format",
            Stage::Types => "types",
            Stage::Stats => "stats",
            Stage::Cleanup => "cleanup",
        }
    }

    /// Whether the stage does any work yet
    pub fn is_implemented(self) -> bool {
        matches!(self, Stage::Download)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What running a stage for the selected species amounted to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Completed { species: usize, bytes: u64 },
    /// Requested but not available; nothing was done
    NotImplemented,
}

impl StageOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StageOutcome::Completed { .. })
    }
}
