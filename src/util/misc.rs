use std::fmt;

use serde_json::Value;

use crate::error;

pub type Res<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn next_value<T>(it: &mut std::slice::Iter<'_, std::string::String>, opt: &str) -> T
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let n = it
        .next()
        .unwrap_or_else(|| error_exit(format!("{}: value missing", opt)));
    n.parse()
        .unwrap_or_else(|e| error_exit(format!("{}: {} '{}'", opt, e, n)))
}

pub fn prompt() -> String {
    use std::io::{stdin, stdout, Write};
    print!("> ");
    stdout().flush().ok();
    let mut buf = String::new();
    stdin().read_line(&mut buf).ok();
    buf
}

pub fn error_exit<T: fmt::Display, U>(t: T) -> U {
    error!("{}", t);
    std::process::exit(1);
}

pub fn write_to_file(file_path: &str, data: &str) -> Res {
    use std::io::Write;
    let path = std::path::Path::new(file_path);
    if let Some(prefix) = path.parent() {
        std::fs::create_dir_all(prefix)?;
    }
    let mut f = std::fs::File::create(path)?;
    write!(f, "{}", data)?;
    Ok(())
}

// 3要素の全順列 (先頭は恒等置換)
pub fn permutations3<T: Copy>(v: [T; 3]) -> [[T; 3]; 6] {
    let [a, b, c] = v;
    [
        [a, b, c],
        [a, c, b],
        [b, a, c],
        [b, c, a],
        [c, a, b],
        [c, b, a],
    ]
}

// JSONの値を文字列として解釈 (nullは空文字列, 配列はカンマ区切り)
pub fn value_to_string(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(a) => a.iter().map(value_to_string).collect::<Vec<String>>().join(","),
        Value::Object(_) => v.to_string(),
    }
}

pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// UUID(v4)形式のランダムなid
pub fn new_problem_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[test]
fn test_permutations3() {
    let ps = permutations3(['m', 'p', 's']);
    assert_eq!(ps[0], ['m', 'p', 's']);
    for (i, p) in ps.iter().enumerate() {
        for q in &ps[i + 1..] {
            assert_ne!(p, q);
        }
    }
}

#[test]
fn test_value_to_string() {
    use serde_json::json;
    assert_eq!(value_to_string(&json!(null)), "");
    assert_eq!(value_to_string(&json!(3)), "3");
    assert_eq!(value_to_string(&json!("동")), "동");
    assert_eq!(value_to_string(&json!(["1m", "2p"])), "1m,2p");
    assert!(is_truthy(&json!(1)));
    assert!(is_truthy(&json!("x")));
    assert!(!is_truthy(&json!(0)));
    assert!(!is_truthy(&json!("")));
    assert!(!is_truthy(&json!(null)));
}

#[test]
fn test_new_problem_id() {
    let a = new_problem_id();
    let b = new_problem_id();
    assert_eq!(a.len(), 36);
    assert_eq!(&a[14..15], "4");
    assert_ne!(a, b);
}
