use serde_json::Value;

use super::meld::melds_from_string;
use super::string::*;
use crate::error::{NotationError, ValidationError};
use crate::model::*;
use crate::util::misc::{is_truthy, new_problem_id, value_to_string};

// 数値(1~8), "동1국"形式, "E1"形式を受け付ける. 解釈できない場合は東1局.
pub fn normalize_round(v: &Value) -> Index {
    let from_number = |n: i64| {
        if (1..=ROUNDS.len() as i64).contains(&n) {
            n as Index - 1
        } else {
            0
        }
    };

    match v {
        Value::Number(n) => n.as_f64().map_or(0, |f| from_number(f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) {
                return s.parse().map_or(0, from_number);
            }
            round_from_text(s).unwrap_or(0)
        }
        _ => 0,
    }
}

// "동1국", "남 4", "E3" => index
fn round_from_text(s: &str) -> Option<Index> {
    let (wind, rest) = if let Some(rest) = s.strip_prefix(WINDS[0]) {
        (0, rest)
    } else if let Some(rest) = s.strip_prefix(WINDS[1]) {
        (1, rest)
    } else if let Some(rest) = s.strip_prefix('E') {
        (0, rest)
    } else if let Some(rest) = s.strip_prefix('S') {
        (1, rest)
    } else {
        return None;
    };

    let mut chars = rest.trim_start().chars();
    let n = chars.next()?.to_digit(10)? as Index;
    if !(1..=SEAT).contains(&n) {
        return None;
    }
    match chars.as_str().trim() {
        "" | "국" => Some(wind * SEAT + n - 1),
        _ => None,
    }
}

// 数値または "10순", "10th" のような先頭が数字の文字列. 解釈できない場合は1.
pub fn normalize_turn(v: &Value) -> usize {
    let n = match v {
        Value::Number(n) => n.as_f64().map_or(1, |f| f.trunc() as i64),
        Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap_or(1)
        }
        _ => 1,
    };
    if n < 1 {
        1
    } else {
        n as usize
    }
}

// 数値(1~4), "동"~"북"で始まる文字列, "E"|"S"|"W"|"N"
pub fn normalize_seat_wind(v: &Value) -> Result<Tnum, ValidationError> {
    let s = match v {
        Value::Null => return Ok(WE),
        // 2.0 のような小数も整数部で判定
        Value::Number(n) => match n.as_f64().map(f64::trunc) {
            Some(f) if (WE as f64..=WN as f64).contains(&f) => return Ok(f as Tnum),
            _ => n.to_string(),
        },
        _ => value_to_string(v),
    };
    let s = s.trim();

    if let Ok(n) = s.parse::<Tnum>() {
        if (WE..=WN).contains(&n) {
            return Ok(n);
        }
    }
    if let Some(i) = WINDS.iter().position(|w| s.starts_with(w)) {
        return Ok(i + 1);
    }
    let mut chars = s.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        if let Some(n) = wind_from_char(ch) {
            return Ok(n);
        }
    }
    Err(ValidationError::SeatWind(s.to_string()))
}

fn in_field(field: &'static str) -> impl Fn(NotationError) -> ValidationError {
    move |source| ValidationError::Notation { field, source }
}

// 入力レコードを正規化して検証済みの問題を生成
pub fn validate_problem(raw: &RawProblem) -> Result<Problem, ValidationError> {
    let title = value_to_string(&raw.title).trim().to_string();
    let round = normalize_round(&raw.round);
    let turn = normalize_turn(&raw.turn);
    let seat_wind = normalize_seat_wind(&raw.seat_wind);
    let condition: Vec<String> = split_tokens(&value_to_string(raw.condition_value()))
        .into_iter()
        .map(String::from)
        .collect();

    let melds =
        melds_from_string(&value_to_string(raw.melds_value())).map_err(in_field("melds"))?;
    let dora_text = value_to_string(&raw.dora_indicator);
    let dora_indicators =
        tiles_from_matches(&dora_text, MAX_DORA_INDICATORS).map_err(in_field("doraIndicator"))?;
    let hand_text = clean_tile_string(&value_to_string(&raw.hand));
    let hand = tiles_from_string(&hand_text).map_err(in_field("hand"))?;

    let n_meld = count_meld_tiles(&melds);
    if hand.len() + n_meld != HAND_TOTAL {
        return Err(ValidationError::TileCount {
            hand: hand.len(),
            melds: n_meld,
        });
    }

    let answer_text = value_to_string(&raw.answer);
    let mut answer: Vec<Tile> = vec![];
    for t in tiles_from_matches(&answer_text, usize::MAX).map_err(in_field("answer"))? {
        if !answer.iter().any(|a| a.is_same(&t)) {
            answer.push(t);
        }
    }
    if answer.is_empty() {
        return Err(ValidationError::EmptyAnswer(answer_text));
    }

    if dora_indicators.is_empty() {
        return Err(ValidationError::DoraCount(0));
    }
    let seat_wind = seat_wind?;

    let id = value_to_string(&raw.id).trim().to_string();
    Ok(Problem {
        id: if id.is_empty() { new_problem_id() } else { id },
        title,
        round,
        turn,
        seat_wind,
        condition,
        melds,
        dora_indicators,
        hand,
        answer,
        explanation_link: value_to_string(&raw.explanation_link),
        explanation: value_to_string(&raw.explanation),
        is_favorite: is_truthy(&raw.is_favorite),
    })
}

fn check_tiles(field: &'static str, tiles: &[Tile]) -> Result<(), ValidationError> {
    match tiles.iter().find(|t| !t.is_valid()) {
        Some(t) => Err(ValidationError::Notation {
            field,
            source: NotationError::OutOfRange {
                token: format!("Tile({}, {})", t.0, t.1),
                digit: std::char::from_digit(t.1 as u32, 10).unwrap_or('?'),
                suit: ['m', 'p', 's', 'z'].get(t.0).copied().unwrap_or('?'),
            },
        }),
        None => Ok(()),
    }
}

// 検証済みの問題(と付け替えで得た問題)が満たすべき不変条件
pub fn check_problem(p: &Problem) -> Result<(), ValidationError> {
    if p.round >= ROUNDS.len() {
        return Err(ValidationError::Round(p.round));
    }
    if !(WE..=WN).contains(&p.seat_wind) {
        return Err(ValidationError::SeatWind(p.seat_wind.to_string()));
    }

    check_tiles("hand", &p.hand)?;
    check_tiles("doraIndicator", &p.dora_indicators)?;
    check_tiles("answer", &p.answer)?;
    for m in &p.melds {
        check_tiles("melds", &m.tiles)?;
        if m.size() != 3 && m.size() != 4 {
            return Err(ValidationError::Notation {
                field: "melds",
                source: NotationError::DigitCount {
                    token: m.raw.clone(),
                    count: m.size(),
                },
            });
        }
    }

    let n_meld = count_meld_tiles(&p.melds);
    if p.hand.len() + n_meld != HAND_TOTAL {
        return Err(ValidationError::TileCount {
            hand: p.hand.len(),
            melds: n_meld,
        });
    }
    if p.dora_indicators.is_empty() || p.dora_indicators.len() > MAX_DORA_INDICATORS {
        return Err(ValidationError::DoraCount(p.dora_indicators.len()));
    }
    if p.answer.is_empty() {
        return Err(ValidationError::EmptyAnswer(String::new()));
    }
    Ok(())
}

#[cfg(test)]
use serde_json::json;

#[cfg(test)]
fn raw(v: Value) -> RawProblem {
    serde_json::from_value(v).unwrap()
}

#[cfg(test)]
fn sample() -> Value {
    json!({
        "title": "sample",
        "round": 5,
        "turn": "7순",
        "seatWind": 3,
        "condition": "리치,  도라2",
        "melds": "",
        "doraIndicator": "4p",
        "hand": "123m 456p 789s 1122z 5z",
        "answer": "5z",
        "explanation": "발은 안전패",
        "isFavorite": 1
    })
}

#[test]
fn test_normalize_round() {
    assert_eq!(normalize_round(&json!(1)), 0);
    assert_eq!(normalize_round(&json!(8)), 7);
    assert_eq!(normalize_round(&json!(9)), 0);
    assert_eq!(normalize_round(&json!("6")), 5);
    assert_eq!(normalize_round(&json!("남2국")), 5);
    assert_eq!(normalize_round(&json!("동 3")), 2);
    assert_eq!(normalize_round(&json!("S4")), 7);
    assert_eq!(normalize_round(&json!("서1국")), 0);
    assert_eq!(normalize_round(&json!("")), 0);
    assert_eq!(normalize_round(&Value::Null), 0);
}

#[test]
fn test_normalize_turn() {
    assert_eq!(normalize_turn(&json!(10)), 10);
    assert_eq!(normalize_turn(&json!(3.7)), 3);
    assert_eq!(normalize_turn(&json!("10순")), 10);
    assert_eq!(normalize_turn(&json!("12-th")), 12);
    assert_eq!(normalize_turn(&json!("abc")), 1);
    assert_eq!(normalize_turn(&json!(0)), 1);
    assert_eq!(normalize_turn(&Value::Null), 1);
}

#[test]
fn test_normalize_seat_wind() {
    assert_eq!(normalize_seat_wind(&json!(2)), Ok(WS));
    assert_eq!(normalize_seat_wind(&json!("4")), Ok(WN));
    assert_eq!(normalize_seat_wind(&json!("서")), Ok(WW));
    assert_eq!(normalize_seat_wind(&json!("남가")), Ok(WS));
    assert_eq!(normalize_seat_wind(&json!("E")), Ok(WE));
    assert_eq!(normalize_seat_wind(&Value::Null), Ok(WE));
    assert_eq!(normalize_seat_wind(&json!(2.0)), Ok(WS));
    assert_eq!(normalize_seat_wind(&json!(4.9)), Ok(WN));
    assert!(normalize_seat_wind(&json!(0.5)).is_err());
    assert_eq!(
        normalize_seat_wind(&json!(5)),
        Err(ValidationError::SeatWind("5".to_string()))
    );
    assert!(normalize_seat_wind(&json!("x")).is_err());
}

#[test]
fn test_validate_problem() {
    let p = validate_problem(&raw(sample())).unwrap();
    assert_eq!(p.title, "sample");
    assert_eq!(p.round_token(), "남1국");
    assert_eq!(p.prevalent_wind(), WS);
    assert_eq!(p.turn, 7);
    assert_eq!(p.seat_wind_token(), "서");
    assert_eq!(p.condition, vec!["리치", "도라2"]);
    assert_eq!(p.hand.len(), 14);
    assert_eq!(p.drawn_tile(), Some(Tile(TZ, DW)));
    assert_eq!(p.answer, vec![Tile(TZ, DW)]);
    assert!(p.is_favorite);
    assert!(!p.id.is_empty());
    assert!(check_problem(&p).is_ok());
}

#[test]
fn test_validate_with_melds() {
    let mut v = sample();
    v["melds"] = json!("666'm, 23'4s");
    v["hand"] = json!("789s1123z5z");
    v["answer"] = json!("3z, 0p 5p 3z");
    v["doraIndicator"] = json!("1m,2m,3m,4m,5m,6m");
    let p = validate_problem(&raw(v)).unwrap();
    assert_eq!(p.melds.len(), 2);
    assert_eq!(p.hand.len() + count_meld_tiles(&p.melds), 14);
    // 赤5と通常5は同一の牌として重複除去
    assert_eq!(p.answer, vec![Tile(TZ, 3), Tile(TP, 0)]);
    assert!(p.is_answer(Tile(TP, 5)));
    assert_eq!(p.dora_indicators.len(), 5);
}

#[test]
fn test_validate_error() {
    let mut v = sample();
    v["hand"] = json!("123m456p789s1122z");
    assert_eq!(
        validate_problem(&raw(v)),
        Err(ValidationError::TileCount { hand: 13, melds: 0 })
    );

    let mut v = sample();
    v["melds"] = json!("123z");
    let e = validate_problem(&raw(v)).unwrap_err();
    assert_eq!(e.field(), "melds");

    let mut v = sample();
    v["hand"] = json!("123m456p789s1122z5x");
    assert_eq!(validate_problem(&raw(v)).unwrap_err().field(), "hand");

    let mut v = sample();
    v["answer"] = json!("none");
    assert_eq!(
        validate_problem(&raw(v)),
        Err(ValidationError::EmptyAnswer("none".to_string()))
    );

    let mut v = sample();
    v["doraIndicator"] = json!("");
    assert_eq!(validate_problem(&raw(v)), Err(ValidationError::DoraCount(0)));

    let mut v = sample();
    v["seatWind"] = json!("x");
    assert_eq!(validate_problem(&raw(v)).unwrap_err().field(), "seatWind");
}

#[test]
fn test_record_roundtrip() {
    let mut v = sample();
    v["id"] = json!("p-1");
    v["melds"] = json!("666'm 23'4s");
    v["hand"] = json!("7s8s9s 1123z 5z");
    let p = validate_problem(&raw(v)).unwrap();
    let rec = p.to_record();
    assert_eq!(rec.id, "p-1");
    assert_eq!(rec.hand, "789s1123z5z");
    assert_eq!(rec.melds, "666'm, 23'4s");
    assert_eq!(rec.condition, "리치, 도라2");

    let p2 = validate_problem(&RawProblem::from(&rec)).unwrap();
    assert_eq!(p, p2);
    assert_eq!(p2.to_record(), rec);
}

#[test]
fn test_check_problem() {
    let p = validate_problem(&raw(sample())).unwrap();
    let mut bad = p.clone();
    bad.hand.pop();
    assert!(matches!(
        check_problem(&bad),
        Err(ValidationError::TileCount { hand: 13, .. })
    ));

    let mut bad = p.clone();
    bad.hand[0] = Tile(TZ, 8);
    assert_eq!(check_problem(&bad).unwrap_err().field(), "hand");

    let mut bad = p;
    bad.dora_indicators.clear();
    assert_eq!(check_problem(&bad), Err(ValidationError::DoraCount(0)));
}
