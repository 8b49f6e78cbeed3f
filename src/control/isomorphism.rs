use super::validate::check_problem;
use crate::error::IsomorphismPreconditionError;
use crate::model::*;
use crate::util::misc::permutations3;

// 場風と自風で固定されない2つの風
// 場風と自風が同じ場合など, 自由な風が2つでなければ入れ替えは行わない
pub fn free_winds(p: &Problem) -> Option<(Tnum, Tnum)> {
    let pinned = [p.prevalent_wind(), p.seat_wind];
    let free: Vec<Tnum> = (WE..=WN).filter(|w| !pinned.contains(w)).collect();
    match free[..] {
        [a, b] => Some((a, b)),
        _ => None,
    }
}

// 問題に適用可能なすべての付け替え (先頭は恒等変換)
// 数牌の種別の順列6通り x 三元牌の順列6通り x 風の入れ替え(1 or 2通り)
pub fn relabels_for(p: &Problem) -> Vec<Relabel> {
    let wind_maps = match free_winds(p) {
        Some(ws) => vec![None, Some(ws)],
        None => vec![None],
    };

    let mut res = vec![];
    for suits in permutations3([TM, TP, TS]) {
        for dragons in permutations3([DW, DG, DR]) {
            for &winds in &wind_maps {
                res.push(Relabel {
                    suits,
                    dragons,
                    winds,
                });
            }
        }
    }
    res
}

// 付け替えを適用した新しい問題を生成
// 手牌,ドラ表示牌,正解牌に同じ付け替えを適用し, 副露はそのまま引き継ぐ
pub fn apply_relabel(base: &Problem, relabel: Relabel) -> Variant {
    let problem = Problem {
        hand: relabel.apply_all(&base.hand),
        dora_indicators: relabel.apply_all(&base.dora_indicators),
        answer: relabel.apply_all(&base.answer),
        ..base.clone()
    };
    Variant {
        base_id: base.id.clone(),
        relabel,
        problem,
    }
}

pub fn try_orbit(base: &Problem) -> Result<Vec<Variant>, IsomorphismPreconditionError> {
    check_problem(base).map_err(|source| IsomorphismPreconditionError {
        id: base.id.clone(),
        source,
    })?;
    Ok(relabels_for(base)
        .into_iter()
        .map(|r| apply_relabel(base, r))
        .collect())
}

// 検証済みの問題のみを受け付ける. 不正な問題が渡された場合は呼び出し側のバグなのでpanic.
pub fn orbit(base: &Problem) -> Vec<Variant> {
    match try_orbit(base) {
        Ok(vs) => vs,
        Err(e) => panic!("{}", e),
    }
}

#[cfg(test)]
use serde_json::json;
#[cfg(test)]
use crate::control::string::{tiles_to_list_string, tiles_to_string};
#[cfg(test)]
use crate::control::validate::validate_problem;

#[cfg(test)]
fn problem(round: usize, seat_wind: usize, hand: &str, melds: &str) -> Problem {
    let raw = serde_json::from_value(json!({
        "id": "base",
        "round": round,
        "seatWind": seat_wind,
        "melds": melds,
        "doraIndicator": "5m,7z",
        "hand": hand,
        "answer": "4z,0p",
    }))
    .unwrap();
    validate_problem(&raw).unwrap()
}

#[test]
fn test_wind_pinning() {
    // 東場の南家 => 西と北が入れ替え可能
    let p = problem(1, 2, "123m406p789s12345z", "");
    assert_eq!(free_winds(&p), Some((WW, WN)));
    let rs = relabels_for(&p);
    assert_eq!(rs.len(), 72);
    assert_eq!(rs.iter().filter(|r| r.winds.is_some()).count(), 36);
    assert!(rs.iter().all(|r| r.winds.map_or(true, |w| w == (WW, WN))));
}

#[test]
fn test_degenerate_winds() {
    // 東場の東家 => 自由な風が3つなので入れ替えなし
    let p = problem(1, 1, "123m406p789s12345z", "");
    assert_eq!(free_winds(&p), None);
    assert_eq!(relabels_for(&p).len(), 36);

    // 南場の東家
    let p = problem(5, 1, "123m406p789s12345z", "");
    assert_eq!(free_winds(&p), Some((WW, WN)));

    // 南場の北家
    let p = problem(6, 4, "123m406p789s12345z", "");
    assert_eq!(free_winds(&p), Some((WE, WW)));
}

#[test]
fn test_orbit() {
    let p = problem(1, 2, "123m406p789s12345z", "");
    let vs = orbit(&p);
    assert_eq!(vs.len(), 72);

    // 先頭は恒等変換で基準問題と一致
    assert!(!vs[0].is_variant());
    assert_eq!(vs[0].problem, p);
    assert_eq!(vs.iter().filter(|v| !v.is_variant()).count(), 1);

    for v in &vs {
        assert_eq!(v.base_id, "base");
        assert!(check_problem(&v.problem).is_ok());
        assert_eq!(v.problem.title, p.title);
        assert_eq!(v.problem.melds, p.melds);
    }
    assert_eq!(tiles_to_string(&p.hand), "123m406p789s12345z");
}

#[test]
fn test_orbit_uniform_mapping() {
    let p = problem(1, 2, "123m406p789s12345z", "");
    let r = Relabel {
        suits: [TS, TM, TP],
        dragons: [DG, DR, DW],
        winds: Some((WW, WN)),
    };
    let v = apply_relabel(&p, r);
    assert_eq!(tiles_to_string(&v.problem.hand), "123s406m789p12436z");
    assert_eq!(tiles_to_list_string(&v.problem.dora_indicators), "5s,5z");
    assert_eq!(tiles_to_list_string(&v.problem.answer), "3z,0m");
    assert!(v.judge(Tile(TM, 5)));
    assert!(!v.judge(Tile(TP, 5)));
    // 基準問題は変更されない
    assert_eq!(tiles_to_list_string(&p.answer), "4z,0p");
}

#[test]
fn test_orbit_keeps_melds() {
    let p = problem(1, 2, "406p789s12345z", "123m");
    let vs = orbit(&p);
    for v in &vs {
        assert_eq!(v.problem.melds[0].raw, "123m");
        assert_eq!(v.problem.hand.len() + 3, 14);
    }
}

#[test]
fn test_orbit_precondition() {
    let mut p = problem(1, 2, "123m406p789s12345z", "");
    p.hand.pop();
    let e = try_orbit(&p).unwrap_err();
    assert_eq!(e.id, "base");
    assert_eq!(e.source.field(), "hand");
}

#[test]
#[should_panic]
fn test_orbit_panics_on_invalid() {
    let mut p = problem(1, 2, "123m406p789s12345z", "");
    p.answer.clear();
    orbit(&p);
}
