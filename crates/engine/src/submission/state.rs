use super::record::{RecordKey, WorkingRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Create,
    Update,
    Delete,
}

impl OpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Summary shown when the backend fails without structured detail.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Create => "Error creating metric. Please try again.",
            Self::Update => "Error updating metric. Please try again.",
            Self::Delete => "Error deleting metric. Please try again.",
        }
    }
}

/// What a row looked like before an optimistic mutation touched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeforeImage {
    /// The row was created by the operation.
    Absent,
    /// The row and its neighbours' keys at the time; `index` is used only
    /// when neither neighbour is still listed.
    Present {
        index: usize,
        prev: Option<RecordKey>,
        next: Option<RecordKey>,
        record: WorkingRecord,
    },
}

/// Lifecycle of the latest operation on one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpState {
    Idle,
    Pending { kind: OpKind, before: BeforeImage },
    Committed { kind: OpKind },
    RolledBack { kind: OpKind },
}

/// `OpState` without the retained before image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    Idle,
    Pending(OpKind),
    Committed(OpKind),
    RolledBack(OpKind),
}

impl OpState {
    /// Starts an operation. Fails with the active kind while one is pending.
    pub fn begin(&self, kind: OpKind, before: BeforeImage) -> Result<Self, OpKind> {
        match self {
            Self::Pending { kind: active, .. } => Err(*active),
            _ => Ok(Self::Pending { kind, before }),
        }
    }

    /// Resolves a pending operation. A failure hands back the before image so
    /// the caller can undo the mutation; the image is dropped either way.
    pub fn resolve(self, success: bool) -> (Self, Option<BeforeImage>) {
        match (self, success) {
            (Self::Pending { kind, .. }, true) => (Self::Committed { kind }, None),
            (Self::Pending { kind, before }, false) => (Self::RolledBack { kind }, Some(before)),
            (other, _) => (other, None),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn status(&self) -> OpStatus {
        match self {
            Self::Idle => OpStatus::Idle,
            Self::Pending { kind, .. } => OpStatus::Pending(*kind),
            Self::Committed { kind } => OpStatus::Committed(*kind),
            Self::RolledBack { kind } => OpStatus::RolledBack(*kind),
        }
    }
}
