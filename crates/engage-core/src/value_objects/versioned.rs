//! Versioned snapshot - optimistic concurrency token
//!
//! Every load from the aggregation store returns the state together with the
//! version it was read at. A commit carrying a stale version is rejected with
//! `StoreConflict`, which serializes concurrent read-modify-write cycles on
//! the same subject without the controllers holding any lock.

/// A state snapshot paired with the store version it was read at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioned<T> {
    pub state: T,
    pub version: u64,
}

impl<T> Versioned<T> {
    /// Wrap a freshly created state at version zero
    pub const fn initial(state: T) -> Self {
        Self { state, version: 0 }
    }

    /// Wrap a state read at a specific version
    pub const fn at(state: T, version: u64) -> Self {
        Self { state, version }
    }

    /// Map the inner state, keeping the version
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Versioned<U> {
        Versioned {
            state: f(self.state),
            version: self.version,
        }
    }
}
