// 牌表記と付け替えの性質テスト
// ランダムな手牌をjsonのレコードとして検証し, 生成されるすべての問題が基準問題と同じ条件を満たすことを確認

use proptest::prelude::*;
use serde_json::{json, Value};

use nanikiru::control::isomorphism::{orbit, relabels_for};
use nanikiru::control::meld::meld_from_string;
use nanikiru::control::repository::ProblemRepository;
use nanikiru::control::string::{tiles_from_string, tiles_to_list_string, tiles_to_string};
use nanikiru::control::validate::{check_problem, validate_problem};
use nanikiru::model::*;

fn tile() -> impl Strategy<Value = Tile> {
    (0..TYPE, 0..TNUM).prop_map(|(ti, ni)| {
        if ti == TZ {
            Tile(TZ, ni % 7 + 1)
        } else {
            Tile(ti, ni)
        }
    })
}

fn meld() -> impl Strategy<Value = String> {
    prop_oneof![
        (0..3usize, 1..8usize).prop_map(|(ti, n)| format!("{}{}{}m", n, n + 1, n + 2)
            .replace('m', &['m', 'p', 's'][ti].to_string())),
        (1..8usize).prop_map(|n| format!("{}{}'{}z", n, n, n)),
        (1..10usize).prop_map(|n| format!("{}{}{}'{}p", n, n, n, n)),
    ]
}

// 副露0~2個と, 合計14枚になるような手牌
fn raw_problem() -> impl Strategy<Value = Value> {
    (
        prop::collection::vec(meld(), 0..3),
        prop::collection::vec(tile(), 14),
        prop::collection::vec(tile(), 1..=5),
        1..=8usize,
        1..=4usize,
        0..14usize,
    )
        .prop_map(|(melds, hand, dora, round, seat_wind, ai)| {
            let n_meld: usize = melds
                .iter()
                .map(|m| m.chars().filter(|c| c.is_ascii_digit()).count())
                .sum();
            let hand = &hand[..14 - n_meld];
            let answer = hand[ai % hand.len()];
            json!({
                "id": "prop",
                "round": round,
                "seatWind": seat_wind,
                "melds": melds.join(", "),
                "doraIndicator": tiles_to_list_string(&dora),
                "hand": tiles_to_string(hand),
                "answer": answer.to_string(),
            })
        })
}

fn validate(v: Value) -> Problem {
    validate_problem(&serde_json::from_value(v).unwrap()).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn notation_roundtrip(tiles in prop::collection::vec(tile(), 0..20)) {
        let s = tiles_to_string(&tiles);
        let decoded = tiles_from_string(&s).unwrap();
        prop_assert_eq!(&decoded, &tiles);
        prop_assert_eq!(tiles_to_string(&decoded), s);
    }

    #[test]
    fn melds_are_accepted(m in meld()) {
        let meld = meld_from_string(&m).unwrap();
        prop_assert!(meld.size() == 3 || meld.size() == 4);
        prop_assert_eq!(meld.raw, m);
    }

    #[test]
    fn validated_problem_has_14_tiles(v in raw_problem()) {
        let p = validate(v);
        prop_assert_eq!(p.hand.len() + count_meld_tiles(&p.melds), 14);
        prop_assert!(check_problem(&p).is_ok());
    }

    #[test]
    fn orbit_is_closed(v in raw_problem()) {
        let p = validate(v);
        let vs = orbit(&p);
        prop_assert!(vs.len() == 36 || vs.len() == 72);
        prop_assert_eq!(vs.len(), relabels_for(&p).len());

        // 恒等変換は先頭の1つのみで, 基準問題をそのまま再現
        prop_assert!(!vs[0].is_variant());
        prop_assert_eq!(&vs[0].problem, &p);
        prop_assert_eq!(vs.iter().filter(|v| !v.is_variant()).count(), 1);

        for v in &vs {
            prop_assert!(check_problem(&v.problem).is_ok());
            prop_assert_eq!(&v.base_id, &p.id);
            prop_assert_eq!(&v.problem.melds, &p.melds);

            // 付け替え後の表記をもう一度検証しても同じ問題になる
            let again = validate_problem(&RawProblem::from(&v.problem.to_record())).unwrap();
            prop_assert_eq!(&again, &v.problem);
        }
    }

    #[test]
    fn record_roundtrip(v in raw_problem()) {
        let p = validate(v);
        let rec = p.to_record();
        let p2 = validate_problem(&RawProblem::from(&rec)).unwrap();
        prop_assert_eq!(&p2, &p);
        prop_assert_eq!(p2.to_record(), rec);
    }

    #[test]
    fn bulk_import_keeps_valid_records(
        vs in prop::collection::vec((raw_problem(), any::<bool>()), 0..8)
    ) {
        let vs_len = vs.len();
        let mut n_valid = 0;
        let records: Vec<Value> = vs
            .into_iter()
            .map(|(mut v, valid)| {
                if valid {
                    n_valid += 1;
                } else {
                    v["hand"] = json!(format!("{}1m", v["hand"].as_str().unwrap_or("")));
                }
                if let Some(o) = v.as_object_mut() {
                    o.remove("id");
                }
                v
            })
            .collect();

        let mut repo = ProblemRepository::new();
        let report = repo.import_json(&Value::Array(records).to_string()).unwrap();
        prop_assert_eq!(report.imported, n_valid);
        prop_assert_eq!(repo.len(), n_valid);
        prop_assert_eq!(report.skipped, report.errors.len());
        prop_assert_eq!(report.imported + report.skipped, vs_len);
    }
}

#[test]
fn wind_pinning_example() {
    // 東1局の南家
    let p = validate(json!({
        "round": "동1국",
        "seatWind": "남",
        "doraIndicator": "1z",
        "hand": "123m456p789s11234z",
        "answer": "3z",
    }));
    let vs = orbit(&p);
    assert_eq!(vs.len(), 6 * 6 * 2);
    let swapped: Vec<&Variant> = vs.iter().filter(|v| v.relabel.winds.is_some()).collect();
    assert_eq!(swapped.len(), 36);
    for v in swapped {
        assert_eq!(v.relabel.winds, Some((WW, WN)));
        assert_eq!(tiles_to_list_string(&v.problem.answer), "4z");
    }
}
