//! Snapshot storage for live games.
//!
//! The engine works get-mutate-put: every operation loads a full game
//! snapshot, mutates it and writes it back. The store owns expiry;
//! games that sit untouched past their time-to-live disappear. Callers
//! must serialize access per game id themselves; the store does not
//! order concurrent read-modify-write cycles for the same key.

use std::time::{Duration, Instant};

use dashmap::DashMap;
use frontier_core::Game;
use uuid::Uuid;

/// Where game snapshots live between requests.
pub trait SnapshotStore: Send + Sync {
    /// Returns a copy of the stored game, or `None` when the id is
    /// unknown or the snapshot has expired.
    fn load(&self, id: Uuid) -> Option<Game>;

    /// Stores a snapshot, replacing any previous one and resetting its
    /// expiry window.
    fn store(&self, id: Uuid, game: Game, ttl: Duration);

    fn remove(&self, id: Uuid);
}

struct StoredGame {
    game: Game,
    expires_at: Instant,
}

/// A process-local store on a concurrent map. Expired entries are
/// dropped lazily on the next load.
#[derive(Default)]
pub struct InMemoryStore {
    entries: DashMap<Uuid, StoredGame>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            entries: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for InMemoryStore {
    fn load(&self, id: Uuid) -> Option<Game> {
        {
            let entry = self.entries.get(&id)?;
            if entry.expires_at > Instant::now() {
                return Some(entry.game.clone());
            }
            // The map guard must drop before the key can be removed.
        }
        self.entries.remove(&id);
        None
    }

    fn store(&self, id: Uuid, game: Game, ttl: Duration) {
        self.entries.insert(
            id,
            StoredGame {
                game,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    fn remove(&self, id: Uuid) {
        self.entries.remove(&id);
    }
}
