use std::error::Error;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use ahash::AHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of distinct tile kinds (3 suits of 9 plus 7 honors).
pub const TILE_KINDS: u8 = 3 * 9 + 4 + 3;

const PAI_STRINGS_LEN: usize = TILE_KINDS as usize + 1;
const PAI_STRINGS: [&str; PAI_STRINGS_LEN] = [
    "1m", "2m", "3m", "4m", "5m", "6m", "7m", "8m", "9m", // m
    "1p", "2p", "3p", "4p", "5p", "6p", "7p", "8p", "9p", // p
    "1s", "2s", "3s", "4s", "5s", "6s", "7s", "8s", "9s", // s
    "E", "S", "W", "N", "P", "F", "C", // z
    "?", // unknown
];

static PAI_STRINGS_MAP: LazyLock<AHashMap<&'static str, Tile>> = LazyLock::new(|| {
    PAI_STRINGS
        .iter()
        .enumerate()
        .map(|(id, &s)| (s, Tile(id as u8)))
        .collect()
});

/// One of the 34 canonical mjai tile kinds, or the unknown placeholder `?`
/// used for unseen hand slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile(u8);

#[derive(Debug)]
pub enum InvalidTile {
    /// A physical tile identifier outside the 0-135 domain.
    Id(i64),
    String(String),
}

impl Tile {
    pub const UNKNOWN: Self = Self(TILE_KINDS);

    /// Decode a physical tile identifier (0-135) into its kind. Four
    /// consecutive ids map onto one kind.
    pub fn from_tile_id(id: i64) -> Result<Self, InvalidTile> {
        if id < 0 || id / 4 >= i64::from(TILE_KINDS) {
            Err(InvalidTile::Id(id))
        } else {
            Ok(Self((id / 4) as u8))
        }
    }

    /// Wind index (0-3) to its honor tile. Out-of-range winds fall back to
    /// East, mirroring the dataset's defaulting behavior.
    #[must_use]
    pub const fn from_wind(wind: u8) -> Self {
        match wind {
            1 => Self(3 * 9 + 1), // S
            2 => Self(3 * 9 + 2), // W
            3 => Self(3 * 9 + 3), // N
            _ => Self(3 * 9),     // E
        }
    }

    #[inline]
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_unknown(self) -> bool {
        self.0 >= TILE_KINDS
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl TryFrom<usize> for Tile {
    type Error = InvalidTile;

    fn try_from(v: usize) -> Result<Self, Self::Error> {
        if v >= PAI_STRINGS_LEN {
            Err(InvalidTile::Id(v as i64))
        } else {
            Ok(Self(v as u8))
        }
    }
}

impl FromStr for Tile {
    type Err = InvalidTile;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PAI_STRINGS_MAP
            .get(s)
            .copied()
            .ok_or_else(|| InvalidTile::String(s.to_owned()))
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self, f)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(PAI_STRINGS[self.0 as usize])
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tile = String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)?;
        Ok(tile)
    }
}

impl Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl fmt::Display for InvalidTile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(n) => write!(f, "not a valid tile id: {n}"),
            Self::String(s) => write!(f, "not a valid tile: \"{s}\""),
        }
    }
}

impl Error for InvalidTile {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn convert() {
        "E".parse::<Tile>().unwrap();
        "1m".parse::<Tile>().unwrap();
        "?".parse::<Tile>().unwrap();
        Tile::try_from(0_usize).unwrap();
        Tile::try_from(33_usize).unwrap();
        Tile::try_from(34_usize).unwrap();

        "".parse::<Tile>().unwrap_err();
        "0s".parse::<Tile>().unwrap_err();
        "5mr".parse::<Tile>().unwrap_err();
        Tile::try_from(35_usize).unwrap_err();
        Tile::try_from(usize::MAX).unwrap_err();
    }

    #[test]
    fn tile_id_totality() {
        for id in 0..136 {
            let tile = Tile::from_tile_id(id).unwrap();
            assert!(!tile.is_unknown());
        }
        for kind in 0..34 {
            let base = Tile::from_tile_id(kind * 4).unwrap();
            for copy in 1..4 {
                assert_eq!(Tile::from_tile_id(kind * 4 + copy).unwrap(), base);
            }
        }
    }

    #[test]
    fn tile_id_out_of_range() {
        Tile::from_tile_id(-1).unwrap_err();
        Tile::from_tile_id(136).unwrap_err();
        Tile::from_tile_id(i64::MAX).unwrap_err();
        Tile::from_tile_id(i64::MIN).unwrap_err();
    }

    #[test]
    fn tile_id_spot_checks() {
        assert_eq!(Tile::from_tile_id(0).unwrap().to_string(), "1m");
        assert_eq!(Tile::from_tile_id(8).unwrap().to_string(), "3m");
        assert_eq!(Tile::from_tile_id(35).unwrap().to_string(), "9m");
        assert_eq!(Tile::from_tile_id(36).unwrap().to_string(), "1p");
        assert_eq!(Tile::from_tile_id(108).unwrap().to_string(), "E");
        assert_eq!(Tile::from_tile_id(135).unwrap().to_string(), "C");
    }

    #[test]
    fn winds() {
        assert_eq!(Tile::from_wind(0), "E".parse().unwrap());
        assert_eq!(Tile::from_wind(1), "S".parse().unwrap());
        assert_eq!(Tile::from_wind(2), "W".parse().unwrap());
        assert_eq!(Tile::from_wind(3), "N".parse().unwrap());
        // Out-of-range winds default to East.
        assert_eq!(Tile::from_wind(4), "E".parse().unwrap());
        assert_eq!(Tile::from_wind(u8::MAX), "E".parse().unwrap());
    }
}
