use serde_json::Value;

use super::*;
use crate::control::string::{tiles_to_list_string, tiles_to_string};

// 検証済みの問題
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub id: String,
    pub title: String,
    pub round: Index, // ROUNDSのindex (0:東1局 ~ 7:南4局)
    pub turn: usize,  // 巡目 (1~)
    pub seat_wind: Tnum, // WE | WS | WW | WN
    pub condition: Vec<String>,
    pub melds: Vec<Meld>,
    pub dora_indicators: Vec<Tile>,
    pub hand: Vec<Tile>, // 最後の牌はツモ牌
    pub answer: Vec<Tile>,
    pub explanation_link: String,
    pub explanation: String,
    pub is_favorite: bool,
}

impl Problem {
    #[inline]
    pub fn round_token(&self) -> &'static str {
        ROUNDS[self.round]
    }

    #[inline]
    pub fn seat_wind_token(&self) -> &'static str {
        WINDS[self.seat_wind - 1]
    }

    // 場風 (東場:WE, 南場:WS)
    #[inline]
    pub fn prevalent_wind(&self) -> Tnum {
        self.round / SEAT + 1
    }

    #[inline]
    pub fn drawn_tile(&self) -> Option<Tile> {
        self.hand.last().copied()
    }

    // 正解表示用の代表牌
    #[inline]
    pub fn correct_tile(&self) -> Option<Tile> {
        self.answer.first().copied()
    }

    // 赤5と通常5は同一視して判定
    pub fn is_answer(&self, tile: Tile) -> bool {
        self.answer.iter().any(|a| a.is_same(&tile))
    }

    pub fn to_record(&self) -> ProblemRecord {
        ProblemRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            round: self.round_token().to_string(),
            turn: self.turn,
            seat_wind: self.seat_wind_token().to_string(),
            condition: self.condition.join(", "),
            melds: self
                .melds
                .iter()
                .map(|m| m.raw.clone())
                .collect::<Vec<String>>()
                .join(", "),
            dora_indicator: tiles_to_list_string(&self.dora_indicators),
            hand: tiles_to_string(&self.hand),
            answer: tiles_to_list_string(&self.answer),
            explanation_link: self.explanation_link.clone(),
            explanation: self.explanation.clone(),
            is_favorite: self.is_favorite,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}巡 {} hand:{}",
            self.title,
            self.round_token(),
            self.turn,
            self.seat_wind_token(),
            tiles_to_string(&self.hand)
        )?;
        if !self.melds.is_empty() {
            let ms: Vec<String> = self.melds.iter().map(|m| m.to_string()).collect();
            write!(f, " melds:{}", ms.join(","))?;
        }
        write!(f, " dora:{}", tiles_to_list_string(&self.dora_indicators))
    }
}

// 保存・エクスポート用の正規化済みレコード
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRecord {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub title: String,
    pub round: String,
    pub turn: usize,
    pub seat_wind: String,
    pub condition: String,
    pub melds: String,
    pub dora_indicator: String,
    pub hand: String,
    pub answer: String,
    pub explanation_link: String,
    pub explanation: String,
    pub is_favorite: bool,
}

// 外部から入力された未検証のレコード
// 数値/文字列のどちらでも受け付ける項目があるためValueで保持
// conditions, furo, meld は旧形式の別名. 本来の項目がnullの場合のみ使用.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawProblem {
    pub id: Value,
    pub title: Value,
    pub round: Value,
    pub turn: Value,
    pub seat_wind: Value,
    pub condition: Value,
    pub conditions: Value,
    pub melds: Value,
    pub furo: Value,
    pub meld: Value,
    pub dora_indicator: Value,
    pub hand: Value,
    pub answer: Value,
    pub explanation_link: Value,
    pub explanation: Value,
    pub is_favorite: Value,
}

impl RawProblem {
    // 最初にnullでない値 (すべてnullならnull)
    fn coalesce<'a>(vs: &[&'a Value]) -> &'a Value {
        vs.iter().copied().find(|v| !v.is_null()).unwrap_or(&Value::Null)
    }

    #[inline]
    pub fn condition_value(&self) -> &Value {
        Self::coalesce(&[&self.condition, &self.conditions])
    }

    #[inline]
    pub fn melds_value(&self) -> &Value {
        Self::coalesce(&[&self.melds, &self.furo, &self.meld])
    }
}

impl From<&ProblemRecord> for RawProblem {
    fn from(r: &ProblemRecord) -> Self {
        let id = if r.id.is_empty() {
            Value::Null
        } else {
            Value::from(r.id.as_str())
        };
        Self {
            id,
            title: Value::from(r.title.as_str()),
            round: Value::from(r.round.as_str()),
            turn: Value::from(r.turn),
            seat_wind: Value::from(r.seat_wind.as_str()),
            condition: Value::from(r.condition.as_str()),
            melds: Value::from(r.melds.as_str()),
            dora_indicator: Value::from(r.dora_indicator.as_str()),
            hand: Value::from(r.hand.as_str()),
            answer: Value::from(r.answer.as_str()),
            explanation_link: Value::from(r.explanation_link.as_str()),
            explanation: Value::from(r.explanation.as_str()),
            is_favorite: Value::from(r.is_favorite),
            ..Self::default()
        }
    }
}
