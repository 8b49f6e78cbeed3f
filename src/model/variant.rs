use super::*;

// 牌の種類の付け替え
// suits[i]: 数牌の種別iの行き先, dragons[i]: 三元牌(DW+i)の行き先
// winds: 入れ替える2つの風 (Noneなら風はそのまま)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relabel {
    pub suits: [Type; 3],
    pub dragons: [Tnum; 3],
    pub winds: Option<(Tnum, Tnum)>,
}

impl Relabel {
    pub const IDENTITY: Self = Self {
        suits: [TM, TP, TS],
        dragons: [DW, DG, DR],
        winds: None,
    };

    pub fn is_identity(&self) -> bool {
        self.suits == Self::IDENTITY.suits
            && self.dragons == Self::IDENTITY.dragons
            && self.winds.map_or(true, |(a, b)| a == b)
    }

    // 赤5は付け替え先の種別でも赤5のまま
    pub fn apply(&self, t: Tile) -> Tile {
        match t {
            Tile(ti, ni) if ti != TZ => Tile(self.suits[ti], ni),
            Tile(_, ni) if (DW..=DR).contains(&ni) => Tile(TZ, self.dragons[ni - DW]),
            Tile(_, ni) => match self.winds {
                Some((a, b)) if ni == a => Tile(TZ, b),
                Some((a, b)) if ni == b => Tile(TZ, a),
                _ => t,
            },
        }
    }

    pub fn apply_all(&self, tiles: &[Tile]) -> Vec<Tile> {
        tiles.iter().map(|&t| self.apply(t)).collect()
    }
}

impl Default for Relabel {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Relabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suits: String = self.suits.iter().map(|&ti| ['m', 'p', 's'][ti]).collect();
        let dragons: String = self.dragons.iter().map(|ni| ni.to_string()).collect();
        write!(f, "mps>{} 567z>{}z", suits, dragons)?;
        if let Some((a, b)) = self.winds {
            write!(f, " {}z<>{}z", a, b)?;
        }
        Ok(())
    }
}

// 基準問題に付け替えを適用して得られる出題単位
// problem.idは基準問題のidと同じ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub base_id: String,
    pub relabel: Relabel,
    pub problem: Problem,
}

impl Variant {
    // 恒等変換の場合は基準問題そのもの
    #[inline]
    pub fn is_variant(&self) -> bool {
        !self.relabel.is_identity()
    }

    #[inline]
    pub fn judge(&self, tile: Tile) -> bool {
        self.problem.is_answer(tile)
    }
}

#[test]
fn test_relabel_apply() {
    let r = Relabel {
        suits: [TP, TS, TM],
        dragons: [DR, DW, DG],
        winds: Some((WW, WN)),
    };
    assert_eq!(r.apply(Tile(TM, 3)), Tile(TP, 3));
    assert_eq!(r.apply(Tile(TS, 0)), Tile(TM, 0));
    assert_eq!(r.apply(Tile(TZ, DW)), Tile(TZ, DR));
    assert_eq!(r.apply(Tile(TZ, DR)), Tile(TZ, DG));
    assert_eq!(r.apply(Tile(TZ, WW)), Tile(TZ, WN));
    assert_eq!(r.apply(Tile(TZ, WN)), Tile(TZ, WW));
    assert_eq!(r.apply(Tile(TZ, WE)), Tile(TZ, WE));
    assert!(!r.is_identity());
    assert_eq!(r.to_string(), "mps>psm 567z>756z 3z<>4z");
}

#[test]
fn test_relabel_identity() {
    let r = Relabel::default();
    assert!(r.is_identity());
    for ti in 0..TYPE {
        for ni in 0..TNUM {
            let t = Tile(ti, ni);
            if t.is_valid() {
                assert_eq!(r.apply(t), t);
            }
        }
    }
}
