//! Caller-owned registry of named games.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use super::controller::GameController;

/// A controller that can be handed to several owners or threads.
pub type SharedGame = Arc<Mutex<GameController>>;

/// Games keyed by name. Lock a handle to read or mutate its controller.
#[derive(Debug, Default)]
pub struct GameStore {
    games: HashMap<String, SharedGame>,
}

impl GameStore {
    #[must_use]
    pub fn new() -> Self {
        GameStore::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<SharedGame> {
        self.games.get(key).map(Arc::clone)
    }

    /// The game under `key`, created fresh if there is none.
    pub fn get_or_create(&mut self, key: &str) -> SharedGame {
        Arc::clone(
            self.games
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(GameController::new()))),
        )
    }

    /// Store `game` under `key`, returning the handle it replaced.
    pub fn set(&mut self, key: impl Into<String>, game: GameController) -> Option<SharedGame> {
        self.games.insert(key.into(), Arc::new(Mutex::new(game)))
    }

    pub fn remove(&mut self, key: &str) -> Option<SharedGame> {
        self.games.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.games.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
