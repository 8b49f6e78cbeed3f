use rand::SeedableRng;

use nanikiru::control::drill::{DrillOptions, DrillSession};
use nanikiru::control::repository::ProblemRepository;
use nanikiru::control::string::{tiles_for_display, tiles_to_list_string, tiles_to_string};
use nanikiru::model::*;
use nanikiru::util::misc::*;
use nanikiru::{debug, error};

use super::import::load_store;

// 対話形式の何切る出題モード
pub struct DrillApp {
    store_path: String,
    options: DrillOptions,
    seed: u64,
    repo: ProblemRepository,
}

impl DrillApp {
    pub fn new(args: Vec<String>) -> Self {
        use std::process::exit;

        let mut app = Self {
            store_path: String::new(),
            options: DrillOptions::default(),
            seed: rand::random(),
            repo: ProblemRepository::new(),
        };

        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-f" => app.store_path = next_value(&mut it, s),
                "-r" => app.options.randomize = true,
                "-s" => app.options.shuffle = true,
                "-F" => app.options.favorites_only = true,
                "-S" => app.seed = next_value(&mut it, s),
                opt => {
                    error!("unknown option: {}", opt);
                    exit(0);
                }
            }
        }

        if app.store_path.is_empty() {
            error!("store file(-f) not specified");
            exit(0);
        }

        app
    }

    pub fn run(&mut self) {
        self.repo = load_store(&self.store_path).unwrap_or_else(error_exit);
        let rng = rand::rngs::StdRng::seed_from_u64(self.seed);
        let mut session = DrillSession::new(self.options, rng);
        session.rebuild(self.repo.problems());
        debug!("pool size: {}", session.pool().len());

        print_help();
        let mut revealed = false;
        loop {
            let v = match session.current() {
                Some(v) => v.clone(),
                None => {
                    println!("no problem available");
                    return;
                }
            };
            if !revealed {
                print_question(&v);
            }

            let input = prompt();
            match input.trim() {
                "q" => return,
                "" | "n" => {
                    session.next(self.repo.problems());
                    revealed = false;
                }
                "p" => {
                    if session.prev().is_none() {
                        println!("no previous problem");
                    }
                    revealed = false;
                }
                "f" => {
                    if let Err(e) = self.toggle_favorite(&v.base_id) {
                        error!("{}", e);
                    }
                    session.rebuild(self.repo.problems());
                    revealed = false;
                }
                "h" => print_help(),
                exp => match select_tile(&v, exp) {
                    Some(t) => {
                        print_result(&v, t);
                        revealed = true;
                    }
                    None => println!("invalid input: {}", exp),
                },
            }
        }
    }

    fn toggle_favorite(&mut self, id: &str) -> Res {
        let on = self.repo.toggle_favorite(id).ok_or("problem not found")?;
        write_to_file(&self.store_path, &self.repo.to_json()?)?;
        println!("favorite: {}", if on { "on" } else { "off" });
        Ok(())
    }
}

// 表示順の番号(1~)または "5p" のような牌の表記
fn select_tile(v: &Variant, exp: &str) -> Option<Tile> {
    let tiles = tiles_for_display(&v.problem.hand);
    if let Ok(i) = exp.parse::<usize>() {
        return tiles.get(i.checked_sub(1)?).copied();
    }
    // 赤5と通常5は同一視
    let t = Tile::from_symbol(exp).ok()?;
    tiles
        .iter()
        .find(|h| **h == t)
        .or_else(|| tiles.iter().find(|h| h.is_same(&t)))
        .copied()
}

fn print_question(v: &Variant) {
    let p = &v.problem;
    println!();
    println!("{} ({} {}巡 自風:{})", p.title, p.round_token(), p.turn, p.seat_wind_token());
    if !p.condition.is_empty() {
        println!("condition: {}", p.condition.join(", "));
    }
    if !p.melds.is_empty() {
        let ms: Vec<String> = p.melds.iter().map(|m| m.to_string()).collect();
        println!("melds: {}", ms.join(", "));
    }
    println!("dora indicator: {}", tiles_to_list_string(&p.dora_indicators));

    let tiles = tiles_for_display(&p.hand);
    let (drawn, rest) = match tiles.split_last() {
        Some(x) => x,
        None => return,
    };
    println!("hand: {} {}", tiles_to_string(rest), drawn);
    let nums: Vec<String> = (1..=tiles.len()).map(|i| format!("{:<3}", i)).collect();
    let syms: Vec<String> = tiles.iter().map(|t| format!("{:<3}", t.to_string())).collect();
    println!("  {}", syms.join(""));
    println!("  {}", nums.join(""));
}

fn print_result(v: &Variant, selected: Tile) {
    let p = &v.problem;
    if v.judge(selected) {
        println!("correct! ({})", selected);
    } else {
        match p.correct_tile() {
            Some(t) => println!("wrong: {} (answer: {})", selected, t),
            None => println!("wrong: {}", selected),
        }
    }
    println!("answer: {}", tiles_to_list_string(&p.answer));
    if v.is_variant() {
        println!("variant: {}", v.relabel);
    }
    if !p.explanation.is_empty() {
        println!("{}", p.explanation);
    }
    if !p.explanation_link.is_empty() {
        println!("{}", p.explanation_link);
    }
}

fn print_help() {
    println!(
        r"commands
    1~14 | 5p: discard tile (display position or tile symbol)
    n | empty: next problem
    p: previous problem
    f: toggle favorite
    h: help
    q: quit"
    );
}

#[test]
fn test_select_tile() {
    use nanikiru::control::drill::build_pool;

    let contents = std::fs::read_to_string("tests/problems.json").unwrap();
    let (repo, _) = ProblemRepository::from_json(&contents).unwrap();
    let pool = build_pool(repo.problems(), false);
    let v = &pool[0]; // 234m0678p345s1155z

    assert_eq!(select_tile(v, "1"), Some(Tile(TM, 2)));
    assert_eq!(select_tile(v, "14"), Some(Tile(TZ, DW)));
    assert_eq!(select_tile(v, "0p"), Some(Tile(TP, 0)));
    assert_eq!(select_tile(v, "5p"), Some(Tile(TP, 0)));
    assert_eq!(select_tile(v, "5z"), Some(Tile(TZ, DW)));
    assert_eq!(select_tile(v, "9m"), None);
    assert_eq!(select_tile(v, "0"), None);
    assert_eq!(select_tile(v, "15"), None);
    assert_eq!(select_tile(v, "x"), None);
}
