// 何切る問題のデータモデル
mod define;
mod meld;
mod problem;
mod tile;
mod variant;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use define::*;
pub use meld::*;
pub use problem::*;
pub use tile::*;
pub use variant::*;
