use super::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeldType {
    Run,     // 順子 (チー)
    Triplet, // 刻子 (ポン)
    Quad,    // 槓子 (カン)
}

// 副露. tilesは入力順のまま保持し, rawは入力された表記 ("23'4s" など)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Meld {
    pub type_: MeldType,
    pub tiles: Vec<Tile>,
    pub raw: String,
}

impl Meld {
    #[inline]
    pub fn size(&self) -> usize {
        self.tiles.len()
    }
}

impl fmt::Display for Meld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

pub fn count_meld_tiles(melds: &[Meld]) -> usize {
    melds.iter().map(|m| m.size()).sum()
}
