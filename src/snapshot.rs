//! The decoded per-row decision snapshot.
//!
//! Each database row stores a gzipped JSON dictionary describing one
//! decision point. The shape is declared here as a strict record so that
//! malformed rows fail at decode time instead of deep inside event
//! construction.

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::tile::Tile;

/// Per-seat score record, keyed `"0"`..`"3"` in the source dictionary.
#[derive(Debug, Clone, Deserialize)]
pub struct SeatEntry {
    pub points: i32,
    /// Round-end score delta. Only present on round-end snapshots.
    #[serde(rename = "PointsReward", default)]
    pub points_reward: i32,
}

/// One entry of `valid_actions`: parallel tile-id/owner sequences. A
/// negative tile id marks an unused slot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionEntry {
    #[serde(default)]
    pub tiles: Vec<i64>,
    #[serde(default)]
    pub who: Vec<i64>,
}

/// A single decision-point snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub round_wind: u8,
    #[serde(default)]
    pub dora_indicators: Vec<i64>,
    #[serde(default)]
    pub num_honba: u8,
    #[serde(default)]
    pub num_riichi: u8,
    #[serde(default = "default_kyoku")]
    pub kyoku: i64,
    #[serde(default)]
    pub oya: u8,
    /// Seat wind of the acting player. The source never records a true
    /// absolute seat, so the synthetic reconstruction reuses this wind
    /// index as the actor's seat throughout.
    #[serde(rename = "player_wind", default)]
    pub actor_seat: u8,
    /// Concealed hand of the acting seat: 13 tile ids, or 14 when a
    /// self-draw is pending (the drawn tile last).
    #[serde(default)]
    pub hand_tiles: Vec<i64>,
    #[serde(default)]
    pub valid_actions: Option<Vec<ActionEntry>>,
    #[serde(default)]
    pub action_idx: Option<usize>,
    #[serde(rename = "0")]
    pub seat0: SeatEntry,
    #[serde(rename = "1")]
    pub seat1: SeatEntry,
    #[serde(rename = "2")]
    pub seat2: SeatEntry,
    #[serde(rename = "3")]
    pub seat3: SeatEntry,
}

const fn default_kyoku() -> i64 {
    1
}

impl Snapshot {
    pub fn seats(&self) -> [&SeatEntry; 4] {
        [&self.seat0, &self.seat1, &self.seat2, &self.seat3]
    }

    /// The action entry selected by `action_idx`. Missing fields or an
    /// out-of-range index mean the row cannot describe the decision it
    /// claims to record.
    pub fn action_entry(&self) -> Result<&ActionEntry> {
        let actions = self
            .valid_actions
            .as_ref()
            .context("snapshot has no valid_actions")?;
        let idx = self.action_idx.context("snapshot has no action_idx")?;
        actions
            .get(idx)
            .with_context(|| format!("action_idx {idx} out of range ({} actions)", actions.len()))
    }

    /// Actor seat, checked against the 4-seat domain so it can be used as
    /// an index.
    pub fn actor(&self) -> Result<u8> {
        ensure!(self.actor_seat < 4, "actor seat {} out of range", self.actor_seat);
        Ok(self.actor_seat)
    }
}

/// Ownership split of one action entry.
#[derive(Debug, Clone, Default)]
pub struct SplitTiles {
    /// Tiles owned by the actor, in source order.
    pub consumed: Vec<Tile>,
    /// The tile claimed from another seat, if any, with its owner.
    pub claimed: Option<(Tile, u8)>,
}

/// Walk the parallel `(tile_id, owner)` pairs of an action entry, skipping
/// negative (unused) slots. Actor-owned tiles go to `consumed`; any other
/// owner marks the tile as claimed from that seat. Well-formed call actions
/// carry at most one external tile; if more appear, the last wins.
pub fn split_action_tiles(entry: &ActionEntry, actor: u8) -> Result<SplitTiles> {
    let mut split = SplitTiles::default();
    for (&tile_id, &owner) in entry.tiles.iter().zip(&entry.who) {
        if tile_id < 0 {
            continue;
        }
        let tile = Tile::from_tile_id(tile_id)?;
        if owner == i64::from(actor) {
            split.consumed.push(tile);
        } else {
            ensure!((0..4).contains(&owner), "tile owner {owner} out of range");
            split.claimed = Some((tile, owner as u8));
        }
    }
    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(s: &str) -> Tile {
        s.parse().unwrap()
    }

    #[test]
    fn ownership_split() {
        let entry = ActionEntry {
            tiles: vec![5, 9, -1, 13],
            who: vec![0, 1, 0, 0],
        };
        let split = split_action_tiles(&entry, 0).unwrap();
        assert_eq!(split.consumed, vec![tile("2m"), tile("4m")]);
        assert_eq!(split.claimed, Some((tile("3m"), 1)));
    }

    #[test]
    fn split_without_external_tile() {
        let entry = ActionEntry {
            tiles: vec![0, 1, 2, 3],
            who: vec![2, 2, 2, 2],
        };
        let split = split_action_tiles(&entry, 2).unwrap();
        assert_eq!(split.consumed.len(), 4);
        assert_eq!(split.claimed, None);
    }

    #[test]
    fn split_rejects_out_of_range_owner() {
        let entry = ActionEntry {
            tiles: vec![4, 8],
            who: vec![0, 256],
        };
        let err = split_action_tiles(&entry, 0).unwrap_err();
        assert!(err.to_string().contains("owner 256 out of range"), "{err}");

        let entry = ActionEntry {
            tiles: vec![8],
            who: vec![-1],
        };
        split_action_tiles(&entry, 0).unwrap_err();
    }

    #[test]
    fn split_rejects_bad_tile_id() {
        let entry = ActionEntry {
            tiles: vec![999],
            who: vec![0],
        };
        split_action_tiles(&entry, 0).unwrap_err();
    }

    #[test]
    fn decode_minimal_snapshot() {
        let json = serde_json::json!({
            "round_wind": 1,
            "kyoku": 2,
            "player_wind": 3,
            "hand_tiles": [0, 4, 8],
            "0": {"points": 25000},
            "1": {"points": 25000},
            "2": {"points": 25000, "PointsReward": -1000},
            "3": {"points": 25000},
        });
        let snapshot: Snapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot.round_wind, 1);
        assert_eq!(snapshot.actor_seat, 3);
        assert_eq!(snapshot.seats()[2].points_reward, -1000);
        assert_eq!(snapshot.seats()[0].points_reward, 0);
        snapshot.action_entry().unwrap_err();
    }

    #[test]
    fn decode_rejects_oversized_points() {
        let json = serde_json::json!({
            "0": {"points": 3_000_000_000_i64},
            "1": {"points": 25000},
            "2": {"points": 25000},
            "3": {"points": 25000},
        });
        serde_json::from_value::<Snapshot>(json).unwrap_err();
    }

    #[test]
    fn decode_rejects_missing_seat_record() {
        let json = serde_json::json!({
            "0": {"points": 25000},
            "1": {"points": 25000},
            "2": {"points": 25000},
        });
        serde_json::from_value::<Snapshot>(json).unwrap_err();
    }

    #[test]
    fn action_entry_index_checked() {
        let json = serde_json::json!({
            "valid_actions": [{"tiles": [8], "who": [0]}],
            "action_idx": 5,
            "0": {"points": 0}, "1": {"points": 0},
            "2": {"points": 0}, "3": {"points": 0},
        });
        let snapshot: Snapshot = serde_json::from_value(json).unwrap();
        snapshot.action_entry().unwrap_err();
    }

    #[test]
    fn actor_out_of_range() {
        let json = serde_json::json!({
            "player_wind": 4,
            "0": {"points": 0}, "1": {"points": 0},
            "2": {"points": 0}, "3": {"points": 0},
        });
        let snapshot: Snapshot = serde_json::from_value(json).unwrap();
        snapshot.actor().unwrap_err();
    }
}
