/// Whether a row matches its last committed snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RowState {
    Clean,
    Dirty,
}

impl RowState {
    pub fn as_str(&self) -> &str {
        match self {
            RowState::Clean => "clean",
            RowState::Dirty => "dirty",
        }
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, RowState::Dirty)
    }
}

/// Whether an upload is outstanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UploadState {
    #[default]
    Idle,
    InFlight,
}
