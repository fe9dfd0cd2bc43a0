use std::fmt;
use std::str::FromStr;

/// Fields of one metric entry, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FileSystemKind,
    AlertChannel,
    Condition,
    Threshold,
    MountPath,
    Email,
    SlackWebhook,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownField(pub String);

impl fmt::Display for UnknownField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field '{}'", self.0)
    }
}

impl std::error::Error for UnknownField {}

impl Field {
    pub const ALL: [Field; 7] = [
        Self::FileSystemKind,
        Self::AlertChannel,
        Self::Condition,
        Self::Threshold,
        Self::MountPath,
        Self::Email,
        Self::SlackWebhook,
    ];

    /// Wire name, as used in submitted JSON and backend error payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FileSystemKind => "fileSystemKind",
            Self::AlertChannel => "alertChannel",
            Self::Condition => "condition",
            Self::Threshold => "threshold",
            Self::MountPath => "mountPath",
            Self::Email => "email",
            Self::SlackWebhook => "slackWebhook",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
