#![warn(rust_2018_idioms)]

mod app;

use nanikiru::error;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        error!("mode not specified");
        return;
    }

    let args2 = args[2..].to_vec();
    match args[1].as_str() {
        "C" => {
            // Check (問題ファイルの検証モード)
            app::CheckApp::new(args2).run();
        }
        "V" => {
            // Variants (牌の種類を付け替えた問題の一覧)
            app::VariantsApp::new(args2).run();
        }
        "D" => {
            // Drill (何切る出題モード)
            app::DrillApp::new(args2).run();
        }
        "I" => {
            // Import (問題の取り込み・書き出し)
            app::ImportApp::new(args2).run();
        }
        m => {
            error!("unknown mode: {}", m)
        }
    }
}
