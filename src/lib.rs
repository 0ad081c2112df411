//! Converts the Kaggle SQLite mahjong dataset into mjai event logs.
//!
//! The dataset stores one table per decision type; every row is a gzipped
//! JSON snapshot of a single decision point. Each row is rewritten as a
//! tiny synthetic game log (newline-delimited mjai events) so the corpus
//! can be consumed by a gameplay loader for fine-tuning.

pub mod convert;
pub mod export;
pub mod mjai;
pub mod snapshot;
pub mod tile;
