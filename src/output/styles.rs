//! Terminal stylesheet for verification output.

use owo_colors::Style;

/// Colors applied when stdout is a color-capable TTY. All plain by default.
#[derive(Default, Clone)]
pub struct Styles {
    /// `✓` marker and reachable hosts
    pub success: Style,
    /// `⚠` marker
    pub warning: Style,
    /// `✗` marker
    pub error: Style,
    /// Host names and socket addresses
    pub target: Style,
    /// Hints under a failure
    pub dim: Style,
    /// Section labels in `config show`
    pub bold: Style,
    /// `config show` title
    pub header: Style,
}

impl Styles {
    /// Switch every slot to its colored variant.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.target = Style::new().bold().cyan();
        self.dim = Style::new().dimmed();
        self.bold = Style::new().bold();
        self.header = Style::new().bold().cyan();
    }
}
