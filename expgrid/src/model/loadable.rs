//! Loaded / not-yet-loaded values.

/// A value that is either available or still being fetched.
///
/// Row slots and the column schema both arrive asynchronously from the fetch
/// layer. The grid only ever observes the result of that work as one of
/// these two states.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    /// The value is available.
    Loaded(T),
    /// The value has not been fetched yet.
    #[default]
    NotLoaded,
}

impl<T> Loadable<T> {
    /// Check if the value is loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Check if the value is still pending
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, Self::NotLoaded)
    }

    /// Get reference to the loaded value
    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(v) => Some(v),
            Self::NotLoaded => None,
        }
    }

    /// Borrow the inner value
    pub fn as_ref(&self) -> Loadable<&T> {
        match self {
            Self::Loaded(v) => Loadable::Loaded(v),
            Self::NotLoaded => Loadable::NotLoaded,
        }
    }

    /// Map the loaded value
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Loadable<U> {
        match self {
            Self::Loaded(v) => Loadable::Loaded(f(v)),
            Self::NotLoaded => Loadable::NotLoaded,
        }
    }

    /// Convert into an `Option`, dropping the pending state
    pub fn loaded(self) -> Option<T> {
        match self {
            Self::Loaded(v) => Some(v),
            Self::NotLoaded => None,
        }
    }
}

impl<T> From<Option<T>> for Loadable<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Loaded(v),
            None => Self::NotLoaded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_preserves_state() {
        assert_eq!(Loadable::Loaded(2).map(|v| v * 2), Loadable::Loaded(4));
        assert_eq!(Loadable::<i32>::NotLoaded.map(|v| v * 2), Loadable::NotLoaded);
    }

    #[test]
    fn test_default_is_not_loaded() {
        assert!(Loadable::<String>::default().is_not_loaded());
    }
}
