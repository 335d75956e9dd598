//! Shared output helpers for CLI commands.
//!
//! Global flags are propagated from main via `DKTOOL_*` environment
//! variables so any module can check them without threading state through.

use serde_json::Value;

/// True when `--quiet` was passed.
pub fn is_quiet() -> bool {
    std::env::var("DKTOOL_QUIET").is_ok()
}

/// True when `--json` was passed.
pub fn is_json() -> bool {
    std::env::var("DKTOOL_JSON").is_ok()
}

/// True when `--verbose` was passed.
pub fn is_verbose() -> bool {
    std::env::var("DKTOOL_VERBOSE").is_ok()
}

/// Print a JSON value to stdout, pretty-printed.
pub fn print_json(value: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    );
}

/// Status symbols for human-readable output.
///
/// Falls back to plain ASCII under `--no-color` or when `NO_COLOR` is set.
pub struct Styled {
    plain: bool,
}

impl Styled {
    pub fn new() -> Self {
        let plain =
            std::env::var("DKTOOL_NO_COLOR").is_ok() || std::env::var("NO_COLOR").is_ok();
        Self { plain }
    }

    pub fn ok_sym(&self) -> &'static str {
        if self.plain {
            "+"
        } else {
            "\u{2713}"
        }
    }

    pub fn warn_sym(&self) -> &'static str {
        if self.plain {
            "!"
        } else {
            "\u{26a0}"
        }
    }

    pub fn skip_sym(&self) -> &'static str {
        if self.plain {
            "o"
        } else {
            "\u{25cb}"
        }
    }

    pub fn err_sym(&self) -> &'static str {
        if self.plain {
            "x"
        } else {
            "\u{2717}"
        }
    }
}
