//! Step lines, banners and key/value rows

use super::context::UiContext;
use console::{style, StyledObject};
use std::fmt::Display;

/// Marker shown in front of a step line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Ok,
    Info,
    Warn,
    Fail,
}

impl Step {
    fn tag(self) -> StyledObject<&'static str> {
        match self {
            Self::Ok => style("[OK]").green(),
            Self::Info => style("[INFO]").cyan(),
            Self::Warn => style("[WARN]").yellow(),
            Self::Fail => style("[FAIL]").red(),
        }
    }

    fn emit(self, ctx: &UiContext, line: impl Display) {
        if !ctx.use_fancy_output() {
            println!("  {} {}", self.tag(), line);
            return;
        }

        let line = line.to_string();
        let _ = match self {
            Self::Ok => cliclack::log::success(line),
            Self::Info => cliclack::log::info(line),
            Self::Warn => cliclack::log::warning(line),
            Self::Fail => cliclack::log::error(line),
        };
    }
}

/// Section banner
pub fn intro(ctx: &UiContext, title: &str) {
    let title = style(title).magenta().bold();
    if ctx.use_fancy_output() {
        let _ = cliclack::intro(title);
    } else {
        println!("{}\n", title);
    }
}

pub fn step_ok(ctx: &UiContext, message: &str) {
    Step::Ok.emit(ctx, message);
}

/// Success line with a dimmed detail, e.g. a path or "cached"
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    Step::Ok.emit(ctx, format!("{} ({})", message, style(detail).dim()));
}

pub fn step_info(ctx: &UiContext, message: &str) {
    Step::Info.emit(ctx, message);
}

/// Warning with the reason or next step after a dash
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    Step::Warn.emit(ctx, format!("{} - {}", message, style(hint).dim()));
}

pub fn step_error_detail(ctx: &UiContext, message: &str, detail: &str) {
    Step::Fail.emit(ctx, format!("{}: {}", message, style(detail).red()));
}

/// Dimmed follow-up line, usually a command to run next
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        let _ = cliclack::log::remark(message);
    } else {
        println!("  {}", style(message).dim());
    }
}

/// `Layer: plugin-styles` style row
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    let key = if ctx.use_fancy_output() {
        style(key).dim()
    } else {
        style(key)
    };
    println!("  {}: {}", key, value);
}
