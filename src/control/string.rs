use crate::error::NotationError;
use crate::model::*;

pub fn tile_type_from_char(ch: char) -> Option<Type> {
    match ch {
        'm' => Some(TM),
        'p' => Some(TP),
        's' => Some(TS),
        'z' => Some(TZ),
        _ => None,
    }
}

pub fn tile_type_to_char(ti: Type) -> char {
    match ti {
        TM => 'm',
        TP => 'p',
        TS => 's',
        TZ => 'z',
        _ => panic!("invalid tile type index: {ti}"),
    }
}

pub fn tile_number_from_char(ch: char) -> Option<Tnum> {
    ch.to_digit(10).map(|i| i as Tnum)
}

pub fn tile_number_to_char(ni: Tnum) -> char {
    std::char::from_digit(ni as u32, 10)
        .unwrap_or_else(|| panic!("invalid tile number index: {}", ni))
}

pub fn wind_from_char(ch: char) -> Option<Tnum> {
    match ch {
        'E' => Some(WE),
        'S' => Some(WS),
        'W' => Some(WW),
        'N' => Some(WN),
        _ => None,
    }
}

// 空白・カンマ区切りのトークン列
pub fn split_tokens(exp: &str) -> Vec<&str> {
    exp.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .collect()
}

// 手牌入力から区切り文字を除去
pub fn clean_tile_string(exp: &str) -> String {
    exp.chars()
        .filter(|&c| !c.is_whitespace() && c != '|' && c != ',')
        .collect()
}

// "123m456p11z" => [1m, 2m, 3m, 4p, 5p, 6p, 1z, 1z]
pub fn tiles_from_string(exp: &str) -> Result<Vec<Tile>, NotationError> {
    let mut tiles = vec![];
    let mut digits = vec![];
    for ch in exp.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }

        let ti = tile_type_from_char(ch).ok_or_else(|| NotationError::BadChar {
            token: exp.to_string(),
            ch,
        })?;
        if digits.is_empty() {
            return Err(NotationError::MissingDigits {
                token: exp.to_string(),
            });
        }
        for d in digits.drain(..) {
            let t = Tile(ti, d.to_digit(10).unwrap_or_default() as Tnum);
            if !t.is_valid() {
                return Err(NotationError::OutOfRange {
                    token: exp.to_string(),
                    digit: d,
                    suit: ch,
                });
            }
            tiles.push(t);
        }
    }

    if !digits.is_empty() {
        return Err(NotationError::MissingSuit {
            token: exp.to_string(),
        });
    }
    Ok(tiles)
}

// 牌の並び順は変更せず, 同じ種別が連続する部分をまとめて出力
pub fn tiles_to_string(tiles: &[Tile]) -> String {
    let mut res = String::new();
    let mut last_ti = None;
    for t in tiles {
        if let Some(ti) = last_ti {
            if ti != t.0 {
                res.push(tile_type_to_char(ti));
            }
        }
        last_ti = Some(t.0);
        res.push(tile_number_to_char(t.1));
    }
    if let Some(ti) = last_ti {
        res.push(tile_type_to_char(ti));
    }
    res
}

// 文字列中から "数字+種別" の2文字の組を先頭から最大max個拾う (ドラ表示牌, 正解牌用)
// "1m,2p" や "1m 2p" のどちらの書き方も受け付ける
pub fn tiles_from_matches(exp: &str, max: usize) -> Result<Vec<Tile>, NotationError> {
    let chars: Vec<char> = exp.chars().collect();
    let mut tiles = vec![];
    let mut i = 0;
    while i + 1 < chars.len() && tiles.len() < max {
        let (c0, c1) = (chars[i], chars[i + 1]);
        if c0.is_ascii_digit() && tile_type_from_char(c1).is_some() {
            let symbol: String = [c0, c1].iter().collect();
            tiles.push(Tile::from_symbol(&symbol).map_err(|_| NotationError::OutOfRange {
                token: exp.to_string(),
                digit: c0,
                suit: c1,
            })?);
            i += 2;
        } else {
            i += 1;
        }
    }
    Ok(tiles)
}

// [1m, 2p] => "1m,2p"
pub fn tiles_to_list_string(tiles: &[Tile]) -> String {
    let ts: Vec<String> = tiles.iter().map(|t| t.to_string()).collect();
    ts.join(",")
}

// 表示用の並び替え. ツモ牌(最後の牌)は末尾に固定.
// 萬子,筒子,索子,字牌の順, 赤5は通常5の直前
pub fn tiles_for_display(tiles: &[Tile]) -> Vec<Tile> {
    let mut res = tiles.to_vec();
    if let Some((_, rest)) = res.split_last_mut() {
        rest.sort();
    }
    res
}

pub fn tenhou_url(hand: &[Tile]) -> String {
    format!("https://tenhou.net/2/?q={}", tiles_to_string(hand))
}

#[test]
fn test_tiles_from_string() {
    let tiles = tiles_from_string("123m456p").unwrap();
    assert_eq!(format!("{:?}", tiles), "[1m, 2m, 3m, 4p, 5p, 6p]");

    let tiles = tiles_from_string("0p5p77z").unwrap();
    assert_eq!(tiles, vec![Tile(TP, 0), Tile(TP, 5), Tile(TZ, 7), Tile(TZ, 7)]);

    assert_eq!(tiles_from_string("").unwrap(), vec![]);
}

#[test]
fn test_tiles_from_string_error() {
    assert_eq!(
        tiles_from_string("123x"),
        Err(NotationError::BadChar {
            token: "123x".to_string(),
            ch: 'x'
        })
    );
    assert_eq!(
        tiles_from_string("123m45"),
        Err(NotationError::MissingSuit {
            token: "123m45".to_string()
        })
    );
    assert_eq!(
        tiles_from_string("m123"),
        Err(NotationError::MissingDigits {
            token: "m123".to_string()
        })
    );
    assert!(matches!(
        tiles_from_string("118z"),
        Err(NotationError::OutOfRange { digit: '8', suit: 'z', .. })
    ));
    assert!(tiles_from_string("0z").is_err());
}

#[test]
fn test_tiles_to_string() {
    for s in ["123m456p789s1122z", "0p5p", "1z", "11m22p11m", ""] {
        assert_eq!(tiles_to_string(&tiles_from_string(s).unwrap()), s);
    }
    // 並べ替えは行わない
    let tiles = vec![Tile(TP, 1), Tile(TM, 1), Tile(TP, 2)];
    assert_eq!(tiles_to_string(&tiles), "1p1m2p");
}

#[test]
fn test_tiles_from_matches() {
    let tiles = tiles_from_matches("1m, 2p 3s", 5).unwrap();
    assert_eq!(tiles_to_list_string(&tiles), "1m,2p,3s");

    let tiles = tiles_from_matches("1m2m3m4m5m6m7m", 5).unwrap();
    assert_eq!(tiles.len(), 5);

    // 連続した数字は最後の数字のみ対象
    let tiles = tiles_from_matches("123m", 5).unwrap();
    assert_eq!(tiles, vec![Tile(TM, 3)]);

    assert_eq!(tiles_from_matches("none", 5).unwrap(), vec![]);
    assert!(tiles_from_matches("8z", 5).is_err());
}

#[test]
fn test_tiles_for_display() {
    let tiles = tiles_from_string("1z5p9m0p3s4p1m").unwrap();
    let disp = tiles_for_display(&tiles);
    assert_eq!(tiles_to_string(&disp), "9m405p3s1z1m");
    assert_eq!(disp.last(), tiles.last());
    assert_eq!(tiles_for_display(&[]), vec![]);
}

#[test]
fn test_split_tokens() {
    assert_eq!(split_tokens(" 리치,  도라2 핀즈\t"), vec!["리치", "도라2", "핀즈"]);
    assert!(split_tokens("  , ").is_empty());
    assert_eq!(clean_tile_string("123m | 456p, 7z"), "123m456p7z");
}
