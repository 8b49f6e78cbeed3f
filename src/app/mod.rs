// mainから直接呼び出すアプリケーションの動作モード(C, V, D, I)のモジュール

mod check;
mod drill;
mod import;
mod variants;

pub use check::CheckApp;
pub use drill::DrillApp;
pub use import::ImportApp;
pub use variants::VariantsApp;
