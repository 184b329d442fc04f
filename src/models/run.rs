use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One provisioning attempt: a database row owning a working directory on
/// disk named by its id.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProvisioningRun {
    pub id: i64,
    pub kind: String,
    /// Caller-supplied variable mapping, stored as JSON text and opaque to
    /// the orchestrator.
    pub variables: String,
    pub status: RunStatus,
    pub output: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[repr(i32)]
pub enum RunStatus {
    Pending = 0,
    Init = 1,
    Planning = 2,
    Success = 3,
    Failed = 4,
    Applying = 5,
    Applied = 6,
    ApplyFailed = 7,
}

impl RunStatus {
    /// Whether a run may move from `self` to `next`. Status only moves
    /// forward along the chain; `Failed`, `Applied` and `ApplyFailed` are
    /// terminal. `Pending` may fail directly when the working directory or
    /// template files cannot be written before init starts.
    pub fn can_advance(self, next: RunStatus) -> bool {
        matches!(
            (self, next),
            (RunStatus::Pending, RunStatus::Init)
                | (RunStatus::Pending, RunStatus::Failed)
                | (RunStatus::Init, RunStatus::Planning)
                | (RunStatus::Init, RunStatus::Failed)
                | (RunStatus::Planning, RunStatus::Success)
                | (RunStatus::Planning, RunStatus::Failed)
                | (RunStatus::Success, RunStatus::Applying)
                | (RunStatus::Applying, RunStatus::Applied)
                | (RunStatus::Applying, RunStatus::ApplyFailed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunStatus::Failed | RunStatus::Applied | RunStatus::ApplyFailed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Init => "init",
            RunStatus::Planning => "planning",
            RunStatus::Success => "success",
            RunStatus::Failed => "failed",
            RunStatus::Applying => "applying",
            RunStatus::Applied => "applied",
            RunStatus::ApplyFailed => "apply_failed",
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
