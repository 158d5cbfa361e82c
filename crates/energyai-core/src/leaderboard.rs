//! Ranked leaderboard snapshots.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SeedError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionChange {
    Winner,
    Up,
    Down,
    Same,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub points: u64,
    /// 1-based; derived from points, never read from seed data.
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub is_current_user: bool,
    #[serde(default = "default_change")]
    pub change: PositionChange,
    /// Insertion order, used to break ties.
    #[serde(skip)]
    seq: usize,
}

fn default_change() -> PositionChange {
    PositionChange::Same
}

impl LeaderboardEntry {
    pub fn new(id: &str, name: &str, points: u64, is_current_user: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            points,
            rank: 0,
            is_current_user,
            change: PositionChange::Same,
            seq: 0,
        }
    }

    pub fn with_change(mut self, change: PositionChange) -> Self {
        self.change = change;
        self
    }
}

/// Read-only ranked snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Rank entries by descending points; ties keep insertion order.
    ///
    /// # Errors
    /// Fails on duplicate ids or more than one current-user entry.
    pub fn rank(entries: Vec<LeaderboardEntry>) -> Result<Self, SeedError> {
        let mut ids = HashSet::new();
        for e in &entries {
            if !ids.insert(e.id.as_str()) {
                return Err(SeedError::Invariant(format!(
                    "duplicate leaderboard id {}",
                    e.id
                )));
            }
        }
        if entries.iter().filter(|e| e.is_current_user).count() > 1 {
            return Err(SeedError::Invariant(
                "more than one leaderboard entry is the current user".into(),
            ));
        }

        let mut entries: Vec<LeaderboardEntry> = entries
            .into_iter()
            .enumerate()
            .map(|(seq, mut e)| {
                e.seq = seq;
                e
            })
            .collect();
        sort_and_number(&mut entries);
        for e in &mut entries {
            e.change = match (e.rank, e.change) {
                (1, _) => PositionChange::Winner,
                (_, PositionChange::Winner) => PositionChange::Same,
                (_, change) => change,
            };
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn current_user(&self) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.is_current_user)
    }

    /// Snapshot with the current user's points replaced and everyone re-ranked.
    /// Entries whose rank moved get `Up`/`Down`; the leader is always `Winner`.
    pub fn with_user_points(&self, points: u64) -> Leaderboard {
        let mut entries = self.entries.clone();
        let previous: Vec<(String, u32)> =
            entries.iter().map(|e| (e.id.clone(), e.rank)).collect();
        for e in entries.iter_mut().filter(|e| e.is_current_user) {
            e.points = points;
        }
        sort_and_number(&mut entries);
        for e in &mut entries {
            let old_rank = previous
                .iter()
                .find(|(id, _)| *id == e.id)
                .map(|(_, r)| *r)
                .unwrap_or(e.rank);
            e.change = if e.rank == 1 {
                PositionChange::Winner
            } else if e.rank < old_rank {
                PositionChange::Up
            } else if e.rank > old_rank {
                PositionChange::Down
            } else if e.change == PositionChange::Winner {
                PositionChange::Same
            } else {
                e.change
            };
        }
        Leaderboard { entries }
    }
}

fn sort_and_number(entries: &mut [LeaderboardEntry]) {
    entries.sort_by(|a, b| b.points.cmp(&a.points).then(a.seq.cmp(&b.seq)));
    for (i, e) in entries.iter_mut().enumerate() {
        e.rank = i as u32 + 1;
    }
}
