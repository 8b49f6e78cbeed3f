use nanikiru::control::isomorphism::orbit;
use nanikiru::control::string::{tiles_for_display, tiles_to_list_string, tiles_to_string};
use nanikiru::error;
use nanikiru::model::*;
use nanikiru::util::misc::*;

use super::import::load_store;

// 1つの基準問題から生成される問題を一覧表示するモード
#[derive(Debug)]
pub struct VariantsApp {
    file_path: String,
    id: String,
    index: usize,
    display: bool,
}

impl VariantsApp {
    pub fn new(args: Vec<String>) -> Self {
        use std::process::exit;

        let mut app = Self {
            file_path: String::new(),
            id: String::new(),
            index: 0,
            display: false,
        };

        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-f" => app.file_path = next_value(&mut it, s),
                "-i" => app.id = next_value(&mut it, s),
                "-n" => app.index = next_value(&mut it, s),
                "-s" => app.display = true,
                opt => {
                    error!("unknown option: {}", opt);
                    exit(0);
                }
            }
        }

        if app.file_path.is_empty() {
            error!("file(-f) not specified");
            exit(0);
        }

        app
    }

    pub fn run(&mut self) {
        let repo = load_store(&self.file_path).unwrap_or_else(error_exit);

        let base = if self.id.is_empty() {
            repo.problems().get(self.index)
        } else {
            repo.get(&self.id)
        };
        let base = match base {
            Some(p) => p,
            None => error_exit("problem not found"),
        };

        println!("base: {}", base);
        for (i, v) in orbit(base).iter().enumerate() {
            println!("{:>2}: {}", i, format_variant(v, self.display));
        }
    }
}

fn format_variant(v: &Variant, display: bool) -> String {
    let p = &v.problem;
    let hand = if display {
        tiles_for_display(&p.hand)
    } else {
        p.hand.clone()
    };
    format!(
        "{}[{}] hand:{} dora:{} answer:{}",
        if v.is_variant() { "" } else { "(base) " },
        v.relabel,
        tiles_to_string(&hand),
        tiles_to_list_string(&p.dora_indicators),
        tiles_to_list_string(&p.answer),
    )
}
