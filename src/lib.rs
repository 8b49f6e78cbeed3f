#![warn(rust_2018_idioms)]
// 構造的な意味合いや一貫性を保つために以下のclippy警告は無効化
#![allow(clippy::new_without_default)]
#![allow(clippy::collapsible_else_if)]

pub mod control;
pub mod error;
pub mod model;
pub mod util;
