//! Wire encoding shared by board squares and the optional player fields.
//!
//! Peers exchange marks as the strings `"X"`, `"O"` and `"EMPTY"`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{Player, Square};

/// A mark as it appears in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) enum WireMark {
    X,
    O,
    #[serde(rename = "EMPTY")]
    Empty,
}

impl From<WireMark> for Square {
    fn from(mark: WireMark) -> Self {
        match mark {
            WireMark::X => Square::Occupied(Player::X),
            WireMark::O => Square::Occupied(Player::O),
            WireMark::Empty => Square::Empty,
        }
    }
}

impl From<Square> for WireMark {
    fn from(square: Square) -> Self {
        match square {
            Square::Empty => WireMark::Empty,
            Square::Occupied(Player::X) => WireMark::X,
            Square::Occupied(Player::O) => WireMark::O,
        }
    }
}

/// `Option<Player>` encoded with `"EMPTY"` for `None`.
///
/// Deserializing also accepts `null` for `None`.
pub(crate) mod optional_player {
    use super::*;

    pub(crate) fn serialize<S: Serializer>(
        player: &Option<Player>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let square = player.map_or(Square::Empty, Square::Occupied);
        WireMark::from(square).serialize(serializer)
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Player>, D::Error> {
        let mark = Option::<WireMark>::deserialize(deserializer)?;
        Ok(mark.and_then(|m| Square::from(m).player()))
    }
}
