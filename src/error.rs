use thiserror::Error;

// 牌表記・副露表記の書式エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid char '{ch}' in '{token}'")]
    BadChar { token: String, ch: char },
    #[error("tile numbers must be followed by m/p/s/z: '{token}'")]
    MissingSuit { token: String },
    #[error("tile type without tile numbers: '{token}'")]
    MissingDigits { token: String },
    #[error("meld must have 3 or 4 tiles (got {count}): '{token}'")]
    DigitCount { token: String, count: usize },
    #[error("tile number '{digit}' out of range for '{suit}': '{token}'")]
    OutOfRange {
        token: String,
        digit: char,
        suit: char,
    },
    #[error("meld is neither run, triplet nor quad: '{token}'")]
    InvalidShape { token: String },
}

impl NotationError {
    pub fn token(&self) -> &str {
        match self {
            Self::BadChar { token, .. }
            | Self::MissingSuit { token }
            | Self::MissingDigits { token }
            | Self::DigitCount { token, .. }
            | Self::OutOfRange { token, .. }
            | Self::InvalidShape { token } => token,
        }
    }
}

// 問題単位の制約違反
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: {source}")]
    Notation {
        field: &'static str,
        #[source]
        source: NotationError,
    },
    #[error("hand: hand + melds must be 14 tiles (hand {hand} + melds {melds} = {})", .hand + .melds)]
    TileCount { hand: usize, melds: usize },
    #[error("answer: no tile found in '{0}'")]
    EmptyAnswer(String),
    #[error("doraIndicator: 1~5 tiles required (got {0})")]
    DoraCount(usize),
    #[error("seatWind: unknown wind '{0}'")]
    SeatWind(String),
    #[error("round: unknown round index {0}")]
    Round(usize),
    #[error("record: not a problem object: {0}")]
    Record(String),
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Notation { field, .. } => field,
            Self::TileCount { .. } => "hand",
            Self::EmptyAnswer(_) => "answer",
            Self::DoraCount(_) => "doraIndicator",
            Self::SeatWind(_) => "seatWind",
            Self::Round(_) => "round",
            Self::Record(_) => "record",
        }
    }
}

// 未検証(不正)な問題に対して変換を適用しようとした. 呼び出し側のバグ.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("isomorphism applied to invalid problem '{id}': {source}")]
pub struct IsomorphismPreconditionError {
    pub id: String,
    #[source]
    pub source: ValidationError,
}

// 一括インポートのJSONレベルのエラー (個々の問題のエラーはImportReportに集計)
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to parse json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("json is not an array of problems")]
    NotArray,
}

#[test]
fn test_error_message() {
    let e = ValidationError::TileCount { hand: 12, melds: 3 };
    assert_eq!(
        e.to_string(),
        "hand: hand + melds must be 14 tiles (hand 12 + melds 3 = 15)"
    );
    assert_eq!(e.field(), "hand");

    let e = ValidationError::Notation {
        field: "melds",
        source: NotationError::InvalidShape {
            token: "112m".to_string(),
        },
    };
    assert_eq!(e.field(), "melds");
    assert!(e.to_string().contains("112m"));
}
