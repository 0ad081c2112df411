//! Builds the synthetic mjai event sequence for one snapshot row.
//!
//! Every row becomes a minimal, structurally valid log bracketing the one
//! recorded decision:
//!
//! `start_game` -> `start_kyoku` -> [`tsumo`] -> decision event(s) ->
//! `ryukyoku` -> `end_kyoku` -> `end_game`
//!
//! The reconstructed timeline does not reflect the original replay (the
//! dataset stores no move history), but the emitted log parses as a
//! complete game.

use std::array::from_fn;

use anyhow::{Context, Result, bail, ensure};

use crate::mjai::Event;
use crate::snapshot::{Snapshot, split_action_tiles};
use crate::tile::Tile;

/// The eight decision types recorded in the dataset, one table each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Skip,
    Discard,
    Chi,
    Pon,
    DaiMinKan,
    ShouMinKan,
    AnKan,
    Riichi,
}

impl Category {
    /// Export order, matching the source table order.
    pub const ALL: [Self; 8] = [
        Self::Skip,
        Self::Discard,
        Self::Chi,
        Self::Pon,
        Self::DaiMinKan,
        Self::ShouMinKan,
        Self::AnKan,
        Self::Riichi,
    ];

    /// The database table holding this category's rows.
    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Skip => "Skip",
            Self::Discard => "Discard",
            Self::Chi => "Chi",
            Self::Pon => "Pon",
            Self::DaiMinKan => "DaiMinKan",
            Self::ShouMinKan => "ShouMinKan",
            Self::AnKan => "AnKan",
            Self::Riichi => "Riichi",
        }
    }
}

/// Build the full event sequence for one row.
pub fn build_row_events(category: Category, snapshot: &Snapshot) -> Result<Vec<Event>> {
    let draw = tsumo(snapshot)?;
    let drawn_tile = match draw {
        Some(Event::Tsumo { pai, .. }) => Some(pai),
        _ => None,
    };

    let mut events = vec![start_game(), start_kyoku(snapshot)?];
    events.extend(draw);
    events.extend(decision_events(category, snapshot, drawn_tile)?);
    events.push(ryukyoku(snapshot));
    events.push(Event::EndKyoku);
    events.push(Event::EndGame);
    Ok(events)
}

fn decision_events(
    category: Category,
    snapshot: &Snapshot,
    drawn_tile: Option<Tile>,
) -> Result<Vec<Event>> {
    let events = match category {
        // Skips produce no tangible event; the bracketing alone carries
        // the row.
        Category::Skip => vec![],
        Category::Discard => vec![dahai(snapshot, drawn_tile)?],
        Category::Chi => vec![chi(snapshot)?],
        Category::Pon => vec![pon(snapshot)?],
        Category::DaiMinKan => vec![daiminkan(snapshot)?],
        Category::ShouMinKan => vec![kakan(snapshot)?],
        Category::AnKan => vec![ankan(snapshot)?],
        Category::Riichi => {
            let actor = snapshot.actor()?;
            vec![Event::Reach { actor }, dahai(snapshot, drawn_tile)?]
        }
    };
    Ok(events)
}

fn start_game() -> Event {
    Event::StartGame {
        names: from_fn(|i| format!("Player{i}")),
    }
}

fn start_kyoku(snapshot: &Snapshot) -> Result<Event> {
    let bakaze = Tile::from_wind(snapshot.round_wind);
    // An absent or empty indicator list falls back to tile id 0.
    let dora_marker = Tile::from_tile_id(snapshot.dora_indicators.first().copied().unwrap_or(0))?;
    let scores = snapshot.seats().map(|seat| seat.points);

    let actor = snapshot.actor()?;
    let mut tehais = [[Tile::UNKNOWN; 13]; 4];
    for (slot, &tile_id) in tehais[actor as usize]
        .iter_mut()
        .zip(snapshot.hand_tiles.iter().take(13))
    {
        *slot = Tile::from_tile_id(tile_id)?;
    }

    Ok(Event::StartKyoku {
        bakaze,
        dora_marker,
        kyoku: snapshot.kyoku.clamp(1, 4) as u8,
        honba: snapshot.num_honba,
        kyotaku: snapshot.num_riichi,
        oya: snapshot.oya,
        scores,
        tehais,
    })
}

/// The self-draw event, present iff the hand holds a 14th tile (the drawn
/// tile is last).
fn tsumo(snapshot: &Snapshot) -> Result<Option<Event>> {
    if snapshot.hand_tiles.len() <= 13 {
        return Ok(None);
    }
    let Some(&last) = snapshot.hand_tiles.last() else {
        return Ok(None);
    };
    Ok(Some(Event::Tsumo {
        actor: snapshot.actor()?,
        pai: Tile::from_tile_id(last)?,
    }))
}

fn dahai(snapshot: &Snapshot, drawn_tile: Option<Tile>) -> Result<Event> {
    let actor = snapshot.actor()?;
    let entry = snapshot.action_entry().context("discard action")?;
    let &tile_id = entry.tiles.first().context("discard action has no tile")?;
    let pai = Tile::from_tile_id(tile_id)?;
    Ok(Event::Dahai {
        actor,
        pai,
        tsumogiri: drawn_tile == Some(pai),
    })
}

fn chi(snapshot: &Snapshot) -> Result<Event> {
    let actor = snapshot.actor()?;
    let split = split_action_tiles(snapshot.action_entry()?, actor)?;
    let Some((pai, target)) = split.claimed else {
        bail!("chi action missing target tile");
    };
    Ok(Event::Chi {
        actor,
        target,
        pai,
        consumed: take_consumed(&split.consumed, "chi")?,
    })
}

fn pon(snapshot: &Snapshot) -> Result<Event> {
    let actor = snapshot.actor()?;
    let split = split_action_tiles(snapshot.action_entry()?, actor)?;
    let Some((pai, target)) = split.claimed else {
        bail!("pon action missing target tile");
    };
    Ok(Event::Pon {
        actor,
        target,
        pai,
        consumed: take_consumed(&split.consumed, "pon")?,
    })
}

fn daiminkan(snapshot: &Snapshot) -> Result<Event> {
    let actor = snapshot.actor()?;
    let split = split_action_tiles(snapshot.action_entry()?, actor)?;
    let Some((pai, target)) = split.claimed else {
        bail!("daiminkan missing target tile");
    };
    Ok(Event::Daiminkan {
        actor,
        target,
        pai,
        consumed: take_consumed(&split.consumed, "daiminkan")?,
    })
}

fn kakan(snapshot: &Snapshot) -> Result<Event> {
    let actor = snapshot.actor()?;
    let split = split_action_tiles(snapshot.action_entry()?, actor)?;
    ensure!(
        split.consumed.len() >= 4,
        "shouminkan expects four tiles from actor, got {}",
        split.consumed.len()
    );
    // The first three tiles form the existing triplet; the fourth is the
    // added tile.
    Ok(Event::Kakan {
        actor,
        pai: split.consumed[3],
        consumed: take_consumed(&split.consumed, "shouminkan")?,
    })
}

fn ankan(snapshot: &Snapshot) -> Result<Event> {
    let actor = snapshot.actor()?;
    let split = split_action_tiles(snapshot.action_entry()?, actor)?;
    ensure!(
        split.consumed.len() >= 4,
        "ankan expects four tiles from actor, got {}",
        split.consumed.len()
    );
    Ok(Event::Ankan {
        actor,
        consumed: take_consumed(&split.consumed, "ankan")?,
    })
}

fn ryukyoku(snapshot: &Snapshot) -> Event {
    Event::Ryukyoku {
        deltas: snapshot.seats().map(|seat| seat.points_reward),
    }
}

/// First `N` actor-owned tiles of a call action as a fixed-shape array.
fn take_consumed<const N: usize>(consumed: &[Tile], kind: &str) -> Result<[Tile; N]> {
    let head = consumed
        .get(..N)
        .with_context(|| format!("{kind} action needs {N} actor tiles, got {}", consumed.len()))?;
    Ok(from_fn(|i| head[i]))
}
