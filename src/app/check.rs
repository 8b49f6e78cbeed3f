use nanikiru::control::isomorphism::relabels_for;
use nanikiru::control::repository::parse_raw_problems;
use nanikiru::control::string::{tenhou_url, tiles_for_display, tiles_to_string};
use nanikiru::control::validate::validate_problem;
use nanikiru::error;
use nanikiru::util::misc::*;

// 問題ファイルの検証モード
#[derive(Debug)]
pub struct CheckApp {
    args: Vec<String>,
    detail: bool,
}

#[derive(Debug, Default, PartialEq)]
struct CheckResult {
    ok: usize,
    ng: usize,
    variants: usize,
}

impl CheckApp {
    pub fn new(args: Vec<String>) -> Self {
        Self {
            args,
            detail: false,
        }
    }

    pub fn run(&mut self) {
        let mut file_path = "".to_string();
        let mut it = self.args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-d" => self.detail = true,
                "-f" => file_path = next_value(&mut it, s),
                opt => {
                    error!("unknown option: {}", opt);
                    return;
                }
            }
        }

        if file_path.is_empty() {
            print_usage();
            return;
        }

        match check_file(&file_path, self.detail) {
            Ok(res) => println!(
                "ok: {}, ng: {}, variants: {}",
                res.ok, res.ng, res.variants
            ),
            Err(e) => error!("{}", e),
        }
    }
}

fn check_file(file_path: &str, detail: bool) -> Res<CheckResult> {
    let contents = std::fs::read_to_string(file_path)?;
    let raws = parse_raw_problems(&contents)?;

    let mut res = CheckResult::default();
    for (i, raw) in raws.into_iter().enumerate() {
        match raw.and_then(|raw| validate_problem(&raw)) {
            Ok(p) => {
                let n = relabels_for(&p).len();
                println!("[{}] ok: {}", i, p);
                if detail {
                    println!("    display: {}", tiles_to_string(&tiles_for_display(&p.hand)));
                    println!("    variants: {}", n);
                    println!("    {}", tenhou_url(&p.hand));
                }
                res.ok += 1;
                res.variants += n;
            }
            Err(e) => {
                println!("[{}] ng: {} ({})", i, e, e.field());
                res.ng += 1;
            }
        }
    }
    Ok(res)
}

fn print_usage() {
    error!(
        r"invalid input
Usage
    $ cargo run C -f FILE [-d]
Options
    -d: print display order, variant count and tenhou url
    -f: json file of problems
"
    );
}

#[test]
fn test_check_file() {
    let res = check_file("tests/problems.json", true).unwrap();
    assert_eq!(
        res,
        CheckResult {
            ok: 3,
            ng: 2,
            variants: 72 + 36 + 72,
        }
    );
}
