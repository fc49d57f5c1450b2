//! Load state of a remotely fetched resource.

/// Lifecycle of a fetched value as seen by a view.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ResourceState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    Error(String),
}

impl<T> ResourceState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ResourceState::Loading)
    }

    /// The loaded value, if the last load succeeded.
    pub fn data(&self) -> Option<&T> {
        match self {
            ResourceState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ResourceState::Error(message) => Some(message),
            _ => None,
        }
    }
}
