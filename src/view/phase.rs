use std::fmt::{self, Display};

/// Lifecycle of a list view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewPhase {
    #[default]
    Uninitialized,
    LoadingReferenceData,
    Ready,
    Error(String),
}

impl ViewPhase {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::LoadingReferenceData)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

impl Display for ViewPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::LoadingReferenceData => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}
