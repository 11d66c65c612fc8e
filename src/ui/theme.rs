//! Custom theme for cliclack prompts

use cliclack::ThemeState;
use console::Style;

/// Magenta-accented theme for interactive prompts
#[derive(Debug, Clone, Default)]
pub struct LayeredTheme;

impl cliclack::Theme for LayeredTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().magenta(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => Style::new().magenta().dim(),
        }
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().magenta(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Cancel => Style::new().dim(),
            ThemeState::Submit => Style::new().green(),
        }
    }
}

/// Install the theme for all later prompts
pub fn init_theme() {
    cliclack::set_theme(LayeredTheme);
}
