// [LEVEL](file:line) message 形式で標準エラー出力に書き出す
#[doc(hidden)]
#[macro_export]
macro_rules! __log {
    ($level:literal, $($arg:tt)*) => {
        eprintln!(
            "[{}]({}:{}) {}",
            $level,
            file!(),
            line!(),
            format_args!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__log!("ERROR", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__log!("WARN", $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__log!("INFO", $($arg)*)
    };
}

// リリースビルドでは出力しない
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if cfg!(debug_assertions) {
            $crate::__log!("DEBUG", $($arg)*)
        }
    };
}

#[macro_export]
macro_rules! error_exit {
    ($($arg:tt)*) => {{
        $crate::__log!("ERROR", $($arg)*);
        std::process::exit(1);
    }};
}
