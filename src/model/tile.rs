use serde::{de, ser};

use super::*;
use crate::control::string::{tile_number_from_char, tile_type_from_char};
use crate::error::NotationError;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile(pub Type, pub Tnum); // (type index, number index)

impl Tile {
    // "5m", "0p", "7z" のような1牌分の表記から生成
    pub fn from_symbol(s: &str) -> Result<Self, NotationError> {
        let chars: Vec<char> = s.chars().collect();
        match chars.len() {
            0 => {
                return Err(NotationError::MissingDigits {
                    token: s.to_string(),
                })
            }
            1 => {
                return Err(NotationError::MissingSuit {
                    token: s.to_string(),
                })
            }
            2 => {}
            _ => {
                return Err(NotationError::BadChar {
                    token: s.to_string(),
                    ch: chars[2],
                })
            }
        }

        let n = tile_number_from_char(chars[0]).ok_or_else(|| NotationError::BadChar {
            token: s.to_string(),
            ch: chars[0],
        })?;
        let t = tile_type_from_char(chars[1]).ok_or_else(|| NotationError::BadChar {
            token: s.to_string(),
            ch: chars[1],
        })?;

        let tile = Self(t, n);
        if !tile.is_valid() {
            return Err(NotationError::OutOfRange {
                token: s.to_string(),
                digit: chars[0],
                suit: chars[1],
            });
        }
        Ok(tile)
    }

    // 字牌は1~7, 数牌は0~9 (0は赤5)
    #[inline]
    pub fn is_valid(&self) -> bool {
        match self.0 {
            TM | TP | TS => self.1 <= 9,
            TZ => (WE..=DR).contains(&self.1),
            _ => false,
        }
    }

    // 赤5の場合,通常の5を返却. それ以外の場合はコピーをそのまま返却.
    #[inline]
    pub fn to_normal(self) -> Self {
        if self.1 == 0 {
            Self(self.0, 5)
        } else {
            self
        }
    }

    // 赤5と通常5を同一視した比較
    #[inline]
    pub fn is_same(&self, other: &Self) -> bool {
        self.to_normal() == other.to_normal()
    }

    // 数牌
    #[inline]
    pub fn is_suit(&self) -> bool {
        self.0 != TZ
    }

    // 字牌
    #[inline]
    pub fn is_hornor(&self) -> bool {
        self.0 == TZ
    }

    // 風牌
    #[inline]
    pub fn is_wind(&self) -> bool {
        self.0 == TZ && (WE..=WN).contains(&self.1)
    }

    // 三元牌
    #[inline]
    pub fn is_doragon(&self) -> bool {
        self.0 == TZ && (DW..=DR).contains(&self.1)
    }

    #[inline]
    pub fn is_red5(&self) -> bool {
        self.is_suit() && self.1 == 0
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.1, ['m', 'p', 's', 'z'][self.0])
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl PartialOrd for Tile {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tile {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 != other.0 {
            return self.0.cmp(&other.0);
        }

        // 赤5は4.5に変換して比較 (整数で扱うため2倍)
        let a = if self.1 == 0 { 9 } else { self.1 * 2 };
        let b = if other.1 == 0 { 9 } else { other.1 * 2 };
        a.cmp(&b)
    }
}

impl ser::Serialize for Tile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

struct TileVisitor;

impl<'de> de::Visitor<'de> for TileVisitor {
    type Value = Tile;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("tile symbol")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Tile::from_symbol(v).map_err(E::custom)
    }
}

impl<'de> de::Deserialize<'de> for Tile {
    fn deserialize<D>(deserializer: D) -> Result<Self, <D as de::Deserializer<'de>>::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_str(TileVisitor)
    }
}

#[test]
fn test_tile_symbol() {
    assert_eq!(Tile::from_symbol("5m").unwrap(), Tile(TM, 5));
    assert_eq!(Tile::from_symbol("7z").unwrap(), Tile(TZ, DR));
    assert_eq!(Tile::from_symbol("0p").unwrap().to_string(), "0p");
    assert!(Tile::from_symbol("0z").is_err());
    assert!(Tile::from_symbol("8z").is_err());
    assert!(Tile::from_symbol("m5").is_err());
    assert!(Tile::from_symbol("55m").is_err());
}

#[test]
fn test_red5_equivalence() {
    let red = Tile::from_symbol("0p").unwrap();
    let five = Tile::from_symbol("5p").unwrap();
    assert_ne!(red, five);
    assert_ne!(red.to_string(), five.to_string());
    assert!(red.is_same(&five));
    assert!(!red.is_same(&Tile(TS, 5)));
}

#[test]
fn test_tile_order() {
    let mut v = vec![Tile(TZ, 1), Tile(TP, 5), Tile(TP, 0), Tile(TP, 4), Tile(TM, 9)];
    v.sort();
    assert_eq!(format!("{:?}", v), "[9m, 4p, 0p, 5p, 1z]");
}

#[test]
fn test_tile_serde() {
    let t: Tile = serde_json::from_str("\"6z\"").unwrap();
    assert_eq!(t, Tile(TZ, DG));
    assert_eq!(serde_json::to_string(&t).unwrap(), "\"6z\"");
    assert!(serde_json::from_str::<Tile>("\"9z\"").is_err());
}
