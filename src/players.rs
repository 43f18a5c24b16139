//! Player records and their storage repository
//!
//! A `PlayerStats` record doubles as the long-lived profile and as the
//! per-match result sheet: a match starts from fresh counters and the store
//! adds them onto the profile afterwards. The simulation core never touches
//! the store; the surrounding application injects a [`PlayerStore`].

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Stats about a player, persisted between matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub id: u32,
    pub name: String,
    pub color: Color,
    pub avatar: String,
    pub wins: u32,
    pub loses: u32,
    pub dmg_dealt: i32,
    pub dmg_received: i32,
    pub kills: u32,
}

impl PlayerStats {
    /// A fresh record with all counters at zero.
    pub fn new_empty(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: Color::BLACK,
            avatar: String::new(),
            wins: 0,
            loses: 0,
            dmg_dealt: 0,
            dmg_received: 0,
            kills: 0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Win ratio in [0, 1]; 0 for a player with no games.
    pub fn win_ratio(&self) -> f32 {
        let games = self.wins + self.loses;
        if games == 0 {
            0.0
        } else {
            self.wins as f32 / games as f32
        }
    }

    /// Tie-break score used by the standings sort
    fn score(&self) -> i64 {
        self.kills as i64 * 10 + self.dmg_dealt as i64 - self.dmg_received as i64
    }
}

/// Sorts players for the standings table: win ratio first, then kills and
/// damage balance.
pub fn sort_players(players: &mut [PlayerStats]) {
    players.sort_by(|a, b| {
        b.win_ratio()
            .partial_cmp(&a.win_ratio())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.score().cmp(&a.score()))
    });
}

/// Repository for player records, injected into the application shell.
pub trait PlayerStore {
    fn get_all(&self) -> Vec<PlayerStats>;
    /// Adds a new player with the given name; returns the assigned record.
    fn save_new(&mut self, name: &str) -> PlayerStats;
    fn remove(&mut self, id: u32);
    /// Adds the given per-match counters onto the stored record.
    fn update(&mut self, result: &PlayerStats);
}

/// In-memory store, mainly for tests and demo runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    players: Vec<PlayerStats>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_id(players: &[PlayerStats]) -> u32 {
    players.iter().map(|p| p.id).max().unwrap_or(0) + 1
}

fn apply_update(players: &mut [PlayerStats], result: &PlayerStats) {
    if let Some(player) = players.iter_mut().find(|p| p.id == result.id) {
        player.wins += result.wins;
        player.loses += result.loses;
        player.dmg_dealt += result.dmg_dealt;
        player.dmg_received += result.dmg_received;
        player.kills += result.kills;
    }
}

impl PlayerStore for MemoryStore {
    fn get_all(&self) -> Vec<PlayerStats> {
        self.players.clone()
    }

    fn save_new(&mut self, name: &str) -> PlayerStats {
        let player = PlayerStats::new_empty(next_id(&self.players), name);
        self.players.push(player.clone());
        player
    }

    fn remove(&mut self, id: u32) {
        self.players.retain(|p| p.id != id);
    }

    fn update(&mut self, result: &PlayerStats) {
        apply_update(&mut self.players, result);
    }
}

/// JSON-file-backed store; the whole player list is one document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    players: Vec<PlayerStats>,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let players = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(players) => players,
                Err(err) => {
                    log::warn!("Ignoring corrupt player file {}: {err}", path.display());
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        log::info!("Loaded {} players from {}", players.len(), path.display());
        Self { path, players }
    }

    fn persist(&self) {
        match serde_json::to_string_pretty(&self.players) {
            Ok(json) => {
                if let Err(err) = fs::write(&self.path, json) {
                    log::error!("Failed to save players to {}: {err}", self.path.display());
                }
            }
            Err(err) => log::error!("Failed to serialize players: {err}"),
        }
    }
}

impl PlayerStore for JsonFileStore {
    fn get_all(&self) -> Vec<PlayerStats> {
        self.players.clone()
    }

    fn save_new(&mut self, name: &str) -> PlayerStats {
        let player = PlayerStats::new_empty(next_id(&self.players), name);
        self.players.push(player.clone());
        self.persist();
        player
    }

    fn remove(&mut self, id: u32) {
        self.players.retain(|p| p.id != id);
        self.persist();
    }

    fn update(&mut self, result: &PlayerStats) {
        apply_update(&mut self.players, result);
        self.persist();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_with(id: u32, wins: u32, loses: u32, kills: u32, dealt: i32) -> PlayerStats {
        let mut p = PlayerStats::new_empty(id, format!("p{id}"));
        p.wins = wins;
        p.loses = loses;
        p.kills = kills;
        p.dmg_dealt = dealt;
        p
    }

    #[test]
    fn test_win_ratio() {
        assert_eq!(PlayerStats::new_empty(1, "a").win_ratio(), 0.0);
        assert_eq!(player_with(1, 1, 1, 0, 0).win_ratio(), 0.5);
    }

    #[test]
    fn test_sort_players_by_ratio_then_score() {
        let mut players = vec![
            player_with(1, 1, 1, 0, 10),
            player_with(2, 2, 0, 0, 0),
            player_with(3, 1, 1, 2, 0),
        ];
        sort_players(&mut players);
        let ids: Vec<u32> = players.iter().map(|p| p.id).collect();
        // Player 2 by ratio; 3 beats 1 on kills*10 vs damage
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_memory_store_assigns_increasing_ids() {
        let mut store = MemoryStore::new();
        let a = store.save_new("a");
        let b = store.save_new("b");
        assert!(b.id > a.id);
        store.remove(a.id);
        assert_eq!(store.get_all().len(), 1);
    }

    #[test]
    fn test_update_accumulates_match_results() {
        let mut store = MemoryStore::new();
        let a = store.save_new("a");
        let mut result = a.clone();
        result.wins = 1;
        result.kills = 2;
        result.dmg_dealt = 34;
        store.update(&result);
        store.update(&result);
        let stored = &store.get_all()[0];
        assert_eq!(stored.wins, 2);
        assert_eq!(stored.kills, 4);
        assert_eq!(stored.dmg_dealt, 68);
    }

    #[test]
    fn test_json_store_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("players.json");
        {
            let mut store = JsonFileStore::open(&path);
            store.save_new("alice");
            store.save_new("bob");
        }
        let store = JsonFileStore::open(&path);
        let names: Vec<String> = store.get_all().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }
}
