use serde_json::Value;

use super::validate::validate_problem;
use crate::error::{ImportError, ValidationError};
use crate::model::*;
use crate::util::misc::{new_problem_id, Res};
use crate::{info, warn};

// 一括インポートの結果. 失敗したレコードは (入力中のindex, エラー) で保持.
#[derive(Debug, Default, PartialEq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub errors: Vec<(usize, ValidationError)>,
}

// 基準問題のリスト (新しいものが先頭)
#[derive(Debug, Default, Clone)]
pub struct ProblemRepository {
    problems: Vec<Problem>,
}

impl ProblemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // 保存形式(to_json)から復元. 並び順はそのまま.
    pub fn from_json(text: &str) -> Result<(Self, ImportReport), ImportError> {
        let mut repo = Self::new();
        let report = repo.import_json(text)?;
        Ok((repo, report))
    }

    #[inline]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.problems.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == id)
    }

    pub fn favorites(&self) -> Vec<&Problem> {
        self.problems.iter().filter(|p| p.is_favorite).collect()
    }

    // 既存のidと重複する場合は新しいidを割り当てる
    fn unique_id(&self, mut p: Problem, pending: &[Problem]) -> Problem {
        while self.get(&p.id).is_some() || pending.iter().any(|q| q.id == p.id) {
            p.id = new_problem_id();
        }
        p
    }

    pub fn add(&mut self, raw: &RawProblem) -> Result<&Problem, ValidationError> {
        let p = validate_problem(raw)?;
        let p = self.unique_id(p, &[]);
        self.problems.insert(0, p);
        Ok(&self.problems[0])
    }

    // 各レコードを独立に検証し, 失敗したものは読み飛ばす
    // 取り込んだ問題は入力順のまま既存の問題の前に追加
    pub fn import_records(&mut self, raws: &[RawProblem]) -> ImportReport {
        self.import_parsed(raws.iter().map(validate_problem))
    }

    fn import_parsed<I>(&mut self, results: I) -> ImportReport
    where
        I: IntoIterator<Item = Result<Problem, ValidationError>>,
    {
        let mut report = ImportReport::default();
        let mut imported: Vec<Problem> = vec![];
        for (i, res) in results.into_iter().enumerate() {
            match res {
                Ok(p) => {
                    let p = self.unique_id(p, &imported);
                    imported.push(p);
                }
                Err(e) => {
                    warn!("record {} skipped: {}", i, e);
                    report.errors.push((i, e));
                }
            }
        }

        report.imported = imported.len();
        report.skipped = report.errors.len();
        imported.append(&mut self.problems);
        self.problems = imported;
        info!(
            "imported {} problems ({} skipped)",
            report.imported, report.skipped
        );
        report
    }

    // JSON配列, {"problems": [...]}, [[...]] のいずれかを受け付ける
    pub fn import_json(&mut self, text: &str) -> Result<ImportReport, ImportError> {
        let raws = parse_raw_problems(text)?;
        Ok(self.import_parsed(
            raws.into_iter()
                .map(|raw| raw.and_then(|raw| validate_problem(&raw))),
        ))
    }

    pub fn remove(&mut self, id: &str) -> Option<Problem> {
        let i = self.problems.iter().position(|p| p.id == id)?;
        Some(self.problems.remove(i))
    }

    // 変更後の状態を返却
    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let p = self.problems.iter_mut().find(|p| p.id == id)?;
        p.is_favorite = !p.is_favorite;
        Some(p.is_favorite)
    }

    // 保存用 (id付き, 現在の並び順)
    pub fn to_json(&self) -> Res<String> {
        let records: Vec<ProblemRecord> = self.problems.iter().map(|p| p.to_record()).collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }

    // 共有用 (idなし, 古いものから順)
    pub fn export_json(&self) -> Res<String> {
        let records: Vec<ProblemRecord> = self
            .problems
            .iter()
            .rev()
            .map(|p| ProblemRecord {
                id: String::new(),
                ..p.to_record()
            })
            .collect();
        Ok(serde_json::to_string_pretty(&records)?)
    }
}

// 要素ごとの変換結果を返却. オブジェクト以外の要素はその要素のみエラー.
pub fn parse_raw_problems(
    text: &str,
) -> Result<Vec<Result<RawProblem, ValidationError>>, ImportError> {
    let data: Value = serde_json::from_str(text)?;
    let mut arr = match data {
        Value::Array(arr) => arr,
        Value::Object(mut obj) => match obj.remove("problems") {
            Some(Value::Array(arr)) => arr,
            _ => return Err(ImportError::NotArray),
        },
        _ => return Err(ImportError::NotArray),
    };
    if arr.len() == 1 && arr[0].is_array() {
        if let Some(Value::Array(inner)) = arr.pop() {
            arr = inner;
        }
    }

    Ok(arr
        .into_iter()
        .map(|v| {
            if !v.is_object() {
                return Err(ValidationError::Record(v.to_string()));
            }
            serde_json::from_value(v).map_err(|e| ValidationError::Record(e.to_string()))
        })
        .collect())
}

#[cfg(test)]
use serde_json::json;

#[cfg(test)]
fn record(title: &str, hand: &str) -> Value {
    json!({
        "title": title,
        "round": "동2국",
        "turn": 8,
        "seatWind": "남",
        "doraIndicator": "3s",
        "hand": hand,
        "answer": "9m",
    })
}

#[cfg(test)]
fn sample_json() -> String {
    json!([
        record("a", "123m456p789s1122z9m"),
        record("bad-count", "123m456p789s1122z"),
        record("b", "111m234p567s789s99m"),
        42,
        record("bad-char", "123m456p789s1122z9x"),
    ])
    .to_string()
}

#[test]
fn test_import_json() {
    let mut repo = ProblemRepository::new();
    let report = repo.import_json(&sample_json()).unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(report.skipped, 3);
    let idxs: Vec<usize> = report.errors.iter().map(|e| e.0).collect();
    assert_eq!(idxs, vec![1, 3, 4]);
    assert_eq!(
        report.errors[0].1,
        ValidationError::TileCount { hand: 13, melds: 0 }
    );
    assert_eq!(repo.len(), 2);
    assert_eq!(repo.problems()[0].title, "a");
    assert_eq!(repo.problems()[1].title, "b");

    // 新しく取り込んだ問題は先頭
    let text = json!({ "problems": [record("c", "123m456p789s1122z9m")] }).to_string();
    repo.import_json(&text).unwrap();
    assert_eq!(repo.problems()[0].title, "c");
    assert_eq!(repo.len(), 3);

    let text = json!([[record("d", "123m456p789s1122z9m")]]).to_string();
    repo.import_json(&text).unwrap();
    assert_eq!(repo.problems()[0].title, "d");
}

#[test]
fn test_import_json_error() {
    let mut repo = ProblemRepository::new();
    assert!(matches!(repo.import_json("{"), Err(ImportError::Json(_))));
    assert!(matches!(
        repo.import_json("{\"x\": 1}"),
        Err(ImportError::NotArray)
    ));
    assert!(matches!(repo.import_json("3"), Err(ImportError::NotArray)));
    assert!(repo.is_empty());
}

#[test]
fn test_favorite_and_remove() {
    let mut repo = ProblemRepository::new();
    let id = repo
        .add(&serde_json::from_value(record("a", "123m456p789s1122z9m")).unwrap())
        .unwrap()
        .id
        .clone();
    assert!(repo.favorites().is_empty());
    assert_eq!(repo.toggle_favorite(&id), Some(true));
    assert_eq!(repo.favorites().len(), 1);
    assert_eq!(repo.toggle_favorite(&id), Some(false));
    assert_eq!(repo.toggle_favorite("none"), None);

    assert!(repo.remove(&id).is_some());
    assert!(repo.remove(&id).is_none());
    assert!(repo.is_empty());
}

#[test]
fn test_duplicate_id() {
    let mut repo = ProblemRepository::new();
    let mut r = record("a", "123m456p789s1122z9m");
    r["id"] = json!("same");
    let raw: RawProblem = serde_json::from_value(r).unwrap();
    repo.import_records(&[raw.clone(), raw.clone()]);
    repo.add(&raw).unwrap();
    assert_eq!(repo.len(), 3);
    let mut ids: Vec<&str> = repo.problems().iter().map(|p| p.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
    assert!(repo.get("same").is_some());
}

#[test]
fn test_save_and_load() {
    let mut repo = ProblemRepository::new();
    repo.import_json(&sample_json()).unwrap();
    let first = repo.problems()[0].id.clone();
    repo.toggle_favorite(&first);

    let text = repo.to_json().unwrap();
    let (loaded, report) = ProblemRepository::from_json(&text).unwrap();
    assert_eq!(report.skipped, 0);
    assert_eq!(loaded.problems(), repo.problems());
}

#[test]
fn test_export_json() {
    let mut repo = ProblemRepository::new();
    repo.import_json(&sample_json()).unwrap();
    let text = repo.export_json().unwrap();
    let records: Vec<ProblemRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "b");
    assert!(records.iter().all(|r| r.id.is_empty()));
    assert!(!text.contains("\"id\""));
    assert_eq!(records[1].hand, "123m456p789s1122z9m");
    assert_eq!(records[1].round, "동2국");
    assert_eq!(records[1].seat_wind, "남");
}

#[test]
fn test_import_legacy_field_names() {
    let mut both = record("both", "123m456p789s1122z9m");
    both["melds"] = json!("");
    both["furo"] = json!("555'z");
    both["condition"] = json!("a");
    both["conditions"] = json!("b");

    let mut legacy = record("legacy", "123m456p789s1z9m");
    legacy["furo"] = json!("555'z");
    legacy["conditions"] = json!("b");

    let mut meld = record("meld", "123m456p789s1z9m");
    meld["meld"] = json!("11'1z");

    let mut repo = ProblemRepository::new();
    let report = repo
        .import_json(&json!([both, legacy, meld]).to_string())
        .unwrap();
    assert_eq!(report.errors, vec![]);
    assert_eq!(report.imported, 3);

    // 本来の項目が優先 (空文字列でも別名は使わない)
    let p = &repo.problems()[0];
    assert!(p.melds.is_empty());
    assert_eq!(p.condition, vec!["a"]);

    let p = &repo.problems()[1];
    assert_eq!(p.melds[0].raw, "555'z");
    assert_eq!(p.condition, vec!["b"]);

    assert_eq!(repo.problems()[2].melds[0].raw, "11'1z");
}

#[test]
fn test_import_non_object_record() {
    let mut repo = ProblemRepository::new();
    let report = repo.import_json(&sample_json()).unwrap();
    assert_eq!(report.errors[1], (3, ValidationError::Record("42".to_string())));
    assert_eq!(report.errors[1].1.field(), "record");
}
