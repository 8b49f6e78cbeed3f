use std::path::Path;

use nanikiru::control::repository::ProblemRepository;
use nanikiru::util::misc::*;
use nanikiru::{error, info};

// 問題ファイルの取り込み・書き出しモード
#[derive(Debug)]
pub struct ImportApp {
    store_path: String,
    import_path: String,
    export_path: String,
}

impl ImportApp {
    pub fn new(args: Vec<String>) -> Self {
        use std::process::exit;

        let mut app = Self {
            store_path: String::new(),
            import_path: String::new(),
            export_path: String::new(),
        };

        let mut it = args.iter();
        while let Some(s) = it.next() {
            match s.as_str() {
                "-f" => app.store_path = next_value(&mut it, s),
                "-i" => app.import_path = next_value(&mut it, s),
                "-e" => app.export_path = next_value(&mut it, s),
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
        if let Err(e) = self.run_inner() {
            error!("{}", e);
        }
    }

    fn run_inner(&self) -> Res {
        let mut repo = load_store(&self.store_path)?;

        if !self.import_path.is_empty() {
            let contents = std::fs::read_to_string(&self.import_path)?;
            let report = repo.import_json(&contents)?;
            for (i, e) in &report.errors {
                println!("[{}] skipped: {}", i, e);
            }
            if report.imported == 0 {
                Err("no valid problem imported")?;
            }
            write_to_file(&self.store_path, &repo.to_json()?)?;
            println!("{} problems imported", report.imported);
        }

        if !self.export_path.is_empty() {
            write_to_file(&self.export_path, &repo.export_json()?)?;
            info!("{} problems exported to {}", repo.len(), self.export_path);
        }
        Ok(())
    }
}

// 保存ファイルが存在しない場合は空のリスト
pub fn load_store(file_path: &str) -> Res<ProblemRepository> {
    if !Path::new(file_path).exists() {
        return Ok(ProblemRepository::new());
    }
    let contents = std::fs::read_to_string(file_path)?;
    let (repo, report) = ProblemRepository::from_json(&contents)?;
    if report.skipped > 0 {
        Err(format!(
            "{}: {} invalid problems in store file",
            file_path, report.skipped
        ))?;
    }
    Ok(repo)
}
