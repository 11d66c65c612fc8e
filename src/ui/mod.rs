//! Terminal output for the CLI
//!
//! Uses `cliclack` for prompts and step markers in a terminal, with plain
//! `[OK]`/`[WARN]` lines when output is piped or running under CI.

mod context;
mod output;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, remark, step_error_detail, step_info, step_ok, step_ok_detail,
    step_warn_hint,
};
pub use prompts::confirm;
pub use theme::{init_theme, LayeredTheme};
