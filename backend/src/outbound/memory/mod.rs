//! In-process storage adapters.
//!
//! [`InMemoryStore`] implements every repository port over one set of
//! tables guarded by a single mutex. Each port call takes the lock once, so
//! compound writes such as inserting a rating and folding it into the mess
//! aggregate are atomic with respect to every other call.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use smart_mess::outbound::memory::InMemoryStore;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let _users = Arc::clone(&store);
//! ```

mod complaints;
mod messes;
mod ratings;
mod subscriptions;
mod users;

use std::sync::{Mutex, MutexGuard};

use crate::domain::{Complaint, Mess, Rating, Subscription, User};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    messes: Vec<Mess>,
    ratings: Vec<Rating>,
    subscriptions: Vec<Subscription>,
    complaints: Vec<Complaint>,
}

/// Mutex-guarded tables implementing all repository ports.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the tables, reporting a poisoned lock through `query`.
    fn lock<E>(&self, query: impl FnOnce(String) -> E) -> Result<MutexGuard<'_, Tables>, E> {
        self.tables
            .lock()
            .map_err(|err| query(format!("store lock poisoned: {err}")))
    }
}

/// Order rows newest first, keeping insertion order between equal stamps.
fn newest_first<T, K: Ord>(rows: &mut [T], key: impl Fn(&T) -> K) {
    rows.sort_by(|a, b| key(b).cmp(&key(a)));
}
