use super::string::{split_tokens, tile_type_from_char};
use crate::error::NotationError;
use crate::model::*;

// 副露の表記: "666'm", "23'4s", "111'1p", "4444'z"
// ' は鳴いた牌の目印で, 種別の判定には関係しない
pub fn meld_from_string(exp: &str) -> Result<Meld, NotationError> {
    let token = exp.trim();
    let err_token = || token.to_string();

    let mut chars = token.chars();
    let suit = match chars.next_back() {
        Some(ch) if tile_type_from_char(ch).is_some() => ch,
        Some(ch) if ch.is_ascii_digit() || ch == '\'' => {
            return Err(NotationError::MissingSuit { token: err_token() })
        }
        Some(ch) => return Err(NotationError::BadChar { token: err_token(), ch }),
        None => return Err(NotationError::MissingDigits { token: err_token() }),
    };
    let ti = tile_type_from_char(suit).unwrap_or(TZ);

    let mut digits = vec![];
    for ch in chars {
        match ch {
            '\'' => {}
            '0'..='9' => digits.push(ch),
            _ => return Err(NotationError::BadChar { token: err_token(), ch }),
        }
    }

    if digits.len() != 3 && digits.len() != 4 {
        return Err(NotationError::DigitCount {
            token: err_token(),
            count: digits.len(),
        });
    }

    let mut tiles = vec![];
    for &d in &digits {
        let t = Tile(ti, d.to_digit(10).unwrap_or_default() as Tnum);
        if !t.is_valid() {
            return Err(NotationError::OutOfRange {
                token: err_token(),
                digit: d,
                suit,
            });
        }
        tiles.push(t);
    }

    // 赤5は5として判定
    let mut nis: Vec<Tnum> = tiles.iter().map(|t| t.to_normal().1).collect();
    nis.sort_unstable();
    let all_same = nis.iter().all(|&ni| ni == nis[0]);

    let type_ = match (nis.len(), all_same) {
        (3, true) => MeldType::Triplet,
        (3, false) if ti != TZ && nis[0] + 1 == nis[1] && nis[1] + 1 == nis[2] => MeldType::Run,
        (4, true) => MeldType::Quad,
        _ => return Err(NotationError::InvalidShape { token: err_token() }),
    };

    Ok(Meld {
        type_,
        tiles,
        raw: token.to_string(),
    })
}

// "666'm, 23'4s" のような副露のリスト. 空文字列は副露なし.
pub fn melds_from_string(exp: &str) -> Result<Vec<Meld>, NotationError> {
    split_tokens(exp).into_iter().map(meld_from_string).collect()
}

#[test]
fn test_meld_classification() {
    assert_eq!(meld_from_string("111m").unwrap().type_, MeldType::Triplet);
    assert_eq!(meld_from_string("123m").unwrap().type_, MeldType::Run);
    assert_eq!(meld_from_string("3'42s").unwrap().type_, MeldType::Run);
    assert_eq!(meld_from_string("555'z").unwrap().type_, MeldType::Triplet);
    assert_eq!(meld_from_string("4444'z").unwrap().type_, MeldType::Quad);
    assert_eq!(meld_from_string("50'5p").unwrap().type_, MeldType::Triplet);
    assert_eq!(meld_from_string("406m").unwrap().type_, MeldType::Run);
    assert_eq!(meld_from_string("0555s").unwrap().type_, MeldType::Quad);

    assert!(matches!(
        meld_from_string("123z"),
        Err(NotationError::InvalidShape { .. })
    ));
    assert!(matches!(
        meld_from_string("112m"),
        Err(NotationError::InvalidShape { .. })
    ));
    assert!(matches!(
        meld_from_string("1112m"),
        Err(NotationError::InvalidShape { .. })
    ));
    assert!(matches!(
        meld_from_string("135p"),
        Err(NotationError::InvalidShape { .. })
    ));
}

#[test]
fn test_meld_error() {
    assert_eq!(
        meld_from_string("11m"),
        Err(NotationError::DigitCount {
            token: "11m".to_string(),
            count: 2
        })
    );
    assert!(matches!(
        meld_from_string("11111m"),
        Err(NotationError::DigitCount { count: 5, .. })
    ));
    assert!(matches!(
        meld_from_string("'''m"),
        Err(NotationError::DigitCount { count: 0, .. })
    ));
    assert!(matches!(
        meld_from_string("000z"),
        Err(NotationError::OutOfRange { digit: '0', suit: 'z', .. })
    ));
    assert!(matches!(
        meld_from_string("888z"),
        Err(NotationError::OutOfRange { digit: '8', .. })
    ));
    assert!(matches!(
        meld_from_string("12a3m"),
        Err(NotationError::BadChar { ch: 'a', .. })
    ));
    assert!(matches!(
        meld_from_string("123"),
        Err(NotationError::MissingSuit { .. })
    ));
    assert!(matches!(
        meld_from_string("12m3p"),
        Err(NotationError::BadChar { ch: 'm', .. })
    ));
}

#[test]
fn test_meld_keeps_input() {
    let m = meld_from_string(" 23'4s ").unwrap();
    assert_eq!(m.raw, "23'4s");
    assert_eq!(format!("{:?}", m.tiles), "[2s, 3s, 4s]");
    assert_eq!(m.size(), 3);
}

#[test]
fn test_melds_from_string() {
    let ms = melds_from_string("666'm, 23'4s  4444'z").unwrap();
    assert_eq!(ms.len(), 3);
    assert_eq!(count_meld_tiles(&ms), 10);
    assert!(melds_from_string("").unwrap().is_empty());
    assert!(melds_from_string("666'm, 12z").is_err());
}
