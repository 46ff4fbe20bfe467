//! Per-resource results of an `up` or `destroy` run

use serde::Serialize;
use std::fmt;

/// What happened to a single resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Resource did not exist and was created
    Created,
    /// Desired state was pushed to an existing resource
    Configured,
    /// Resource already existed and was left alone
    Unchanged,
    /// Existing container was started
    Started,
    /// Resource was removed
    Deleted,
    /// Resource was already gone
    Absent,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Created => "created",
            Action::Configured => "configured",
            Action::Unchanged => "unchanged",
            Action::Started => "started",
            Action::Deleted => "deleted",
            Action::Absent => "absent",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceOutcome {
    pub kind: String,
    pub name: String,
    pub action: Action,
}

impl ResourceOutcome {
    pub fn new(kind: impl Into<String>, name: impl Into<String>, action: Action) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            action,
        }
    }
}
