use rand::Rng;

use super::isomorphism::{apply_relabel, orbit};
use crate::model::*;

#[derive(Debug, Clone, Copy, Default)]
pub struct DrillOptions {
    pub randomize: bool,      // 牌の種類を付け替えた問題も出題
    pub shuffle: bool,        // ランダム出題 (falseなら登録順)
    pub favorites_only: bool, // お気に入りのみ
}

// 出題候補. randomizeがfalseなら基準問題のみ.
pub fn build_pool(problems: &[Problem], randomize: bool) -> Vec<Variant> {
    if randomize {
        problems.iter().flat_map(orbit).collect()
    } else {
        problems
            .iter()
            .map(|p| apply_relabel(p, Relabel::IDENTITY))
            .collect()
    }
}

fn active_base_ids(problems: &[Problem], favorites_only: bool) -> Vec<&str> {
    problems
        .iter()
        .filter(|p| !favorites_only || p.is_favorite)
        .map(|p| p.id.as_str())
        .collect()
}

// 直前と同じ基準問題はなるべく避ける (6回まで引き直し)
pub fn pick_random<'a, R: Rng>(
    pool: &[&'a Variant],
    avoid_base_id: Option<&str>,
    rng: &mut R,
) -> Option<&'a Variant> {
    match pool.len() {
        0 => return None,
        1 => return Some(pool[0]),
        _ => {}
    }

    for _ in 0..6 {
        let v = pool[rng.gen_range(0..pool.len())];
        if avoid_base_id == Some(v.base_id.as_str()) {
            continue;
        }
        return Some(v);
    }
    Some(pool[rng.gen_range(0..pool.len())])
}

// 登録順で次の基準問題 (末尾の次は先頭)
pub fn next_sequential(
    problems: &[Problem],
    favorites_only: bool,
    after_base_id: Option<&str>,
) -> Option<Variant> {
    let list: Vec<&Problem> = problems
        .iter()
        .filter(|p| !favorites_only || p.is_favorite)
        .collect();
    if list.is_empty() {
        return None;
    }

    let i = after_base_id
        .and_then(|id| list.iter().position(|p| p.id == id))
        .map_or(0, |i| i + 1);
    let p = list[if i < list.len() { i } else { 0 }];
    Some(apply_relabel(p, Relabel::IDENTITY))
}

// 出題の履歴と出題候補を保持する
#[derive(Debug)]
pub struct DrillSession<R: Rng> {
    pub options: DrillOptions,
    pool: Vec<Variant>,
    history: Vec<Variant>,
    idx: usize,
    rng: R,
}

impl<R: Rng> DrillSession<R> {
    pub fn new(options: DrillOptions, rng: R) -> Self {
        Self {
            options,
            pool: vec![],
            history: vec![],
            idx: 0,
            rng,
        }
    }

    #[inline]
    pub fn pool(&self) -> &[Variant] {
        &self.pool
    }

    #[inline]
    pub fn current(&self) -> Option<&Variant> {
        self.history.get(self.idx)
    }

    fn choose(&mut self, problems: &[Problem], after_base_id: Option<&str>) -> Option<Variant> {
        let opt = self.options;
        if opt.shuffle {
            let ids = active_base_ids(problems, opt.favorites_only);
            let active: Vec<&Variant> = self
                .pool
                .iter()
                .filter(|v| ids.contains(&v.base_id.as_str()))
                .collect();
            pick_random(&active, after_base_id, &mut self.rng).cloned()
        } else {
            next_sequential(problems, opt.favorites_only, after_base_id)
        }
    }

    // 問題リストの変更後に出題候補を作り直す
    // 現在の問題が出題対象から外れた場合は履歴をリセット
    pub fn rebuild(&mut self, problems: &[Problem]) {
        self.pool = build_pool(problems, self.options.randomize);

        let ids = active_base_ids(problems, self.options.favorites_only);
        let selectable = self
            .current()
            .map_or(false, |v| ids.contains(&v.base_id.as_str()));
        if ids.is_empty() {
            self.history.clear();
            self.idx = 0;
        } else if !selectable {
            self.history = self.choose(problems, None).into_iter().collect();
            self.idx = 0;
        }
    }

    // 指定した基準問題から出題し直す
    pub fn load(&mut self, base: &Problem) -> &Variant {
        self.history = vec![apply_relabel(base, Relabel::IDENTITY)];
        self.idx = 0;
        &self.history[0]
    }

    // 履歴の途中にいる場合, それより後の履歴は破棄
    pub fn next(&mut self, problems: &[Problem]) -> Option<&Variant> {
        let cur = self.current().map(|v| v.base_id.clone());
        let v = self.choose(problems, cur.as_deref())?;
        if self.history.is_empty() {
            self.history.push(v);
            self.idx = 0;
        } else {
            self.history.truncate(self.idx + 1);
            self.history.push(v);
            self.idx += 1;
        }
        self.current()
    }

    pub fn prev(&mut self) -> Option<&Variant> {
        if self.idx == 0 {
            return None;
        }
        self.idx -= 1;
        self.current()
    }

    pub fn judge(&self, tile: Tile) -> Option<bool> {
        self.current().map(|v| v.judge(tile))
    }
}

#[cfg(test)]
use rand::SeedableRng;
#[cfg(test)]
use serde_json::json;
#[cfg(test)]
use crate::control::validate::validate_problem;

#[cfg(test)]
fn problem(id: &str, fav: bool) -> Problem {
    let raw = serde_json::from_value(json!({
        "id": id,
        "round": 1,
        "seatWind": 2,
        "doraIndicator": "1z",
        "hand": "123m456p789s11567z",
        "answer": "5z",
        "isFavorite": fav,
    }))
    .unwrap();
    validate_problem(&raw).unwrap()
}

#[cfg(test)]
fn session(options: DrillOptions) -> DrillSession<rand::rngs::StdRng> {
    DrillSession::new(options, rand::rngs::StdRng::seed_from_u64(0))
}

#[test]
fn test_build_pool() {
    let ps = vec![problem("a", false), problem("b", true)];
    let pool = build_pool(&ps, false);
    assert_eq!(pool.len(), 2);
    assert!(pool.iter().all(|v| !v.is_variant()));

    let pool = build_pool(&ps, true);
    assert_eq!(pool.len(), 144);
    assert_eq!(pool.iter().filter(|v| v.base_id == "b").count(), 72);
}

#[test]
fn test_pick_random() {
    let ps = vec![problem("a", false), problem("b", false)];
    let pool = build_pool(&ps, true);
    let refs: Vec<&Variant> = pool.iter().collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(1);
    assert!(pick_random(&[], None, &mut rng).is_none());
    assert_eq!(pick_random(&refs[..1], Some("a"), &mut rng).unwrap().base_id, "a");

    // 基準問題aとbが半々の候補から, aを避けて200回引く
    // 引き直し6回と最後の1回がすべてaになる確率は1/128
    let n_avoided = (0..200)
        .filter_map(|_| pick_random(&refs, Some("a"), &mut rng))
        .filter(|v| v.base_id == "a")
        .count();
    assert!(n_avoided <= 20, "avoided base picked {} times", n_avoided);

    // 避ける対象がなければ両方とも選ばれる
    let n_a = (0..200)
        .filter_map(|_| pick_random(&refs, None, &mut rng))
        .filter(|v| v.base_id == "a")
        .count();
    assert!((50..=150).contains(&n_a));
}

#[test]
fn test_next_sequential() {
    let ps = vec![problem("a", false), problem("b", true), problem("c", true)];
    assert_eq!(next_sequential(&ps, false, None).unwrap().base_id, "a");
    assert_eq!(next_sequential(&ps, false, Some("a")).unwrap().base_id, "b");
    assert_eq!(next_sequential(&ps, false, Some("c")).unwrap().base_id, "a");
    assert_eq!(next_sequential(&ps, true, Some("b")).unwrap().base_id, "c");
    assert_eq!(next_sequential(&ps, true, Some("c")).unwrap().base_id, "b");
    assert_eq!(next_sequential(&ps, true, Some("x")).unwrap().base_id, "b");
    assert!(next_sequential(&[], false, None).is_none());
}

#[test]
fn test_session_history() {
    let ps = vec![problem("a", false), problem("b", false), problem("c", false)];
    let mut s = session(DrillOptions::default());
    s.rebuild(&ps);
    assert_eq!(s.current().unwrap().base_id, "a");
    assert_eq!(s.next(&ps).unwrap().base_id, "b");
    assert_eq!(s.next(&ps).unwrap().base_id, "c");
    assert_eq!(s.prev().unwrap().base_id, "b");
    assert_eq!(s.prev().unwrap().base_id, "a");
    assert!(s.prev().is_none());

    // 履歴の途中から進むと以降の履歴は破棄
    assert_eq!(s.next(&ps).unwrap().base_id, "b");
    assert_eq!(s.next(&ps).unwrap().base_id, "c");
    assert_eq!(s.next(&ps).unwrap().base_id, "a");

    assert_eq!(s.judge(Tile(TZ, DW)), Some(true));
    assert_eq!(s.judge(Tile(TZ, DG)), Some(false));
}

#[test]
fn test_session_shuffle() {
    let mut ps = vec![problem("a", true), problem("b", false)];
    let mut s = session(DrillOptions {
        randomize: true,
        shuffle: true,
        favorites_only: true,
    });
    s.rebuild(&ps);
    assert_eq!(s.pool().len(), 144);
    for _ in 0..10 {
        assert_eq!(s.next(&ps).unwrap().base_id, "a");
    }

    // お気に入りが無くなると出題できない
    ps[0].is_favorite = false;
    s.rebuild(&ps);
    assert!(s.current().is_none());
    assert!(s.next(&ps).is_none());
}

#[test]
fn test_session_load() {
    let ps = vec![problem("a", false), problem("b", false)];
    let mut s = session(DrillOptions::default());
    s.rebuild(&ps);
    assert_eq!(s.load(&ps[1]).base_id, "b");
    assert!(s.prev().is_none());
    assert_eq!(s.next(&ps).unwrap().base_id, "a");
}
