use crossterm::{
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    QueueableCommand,
};
use std::io::{self, Write};

use crate::defaults::Defaults;

/// How the highlighted menu line is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightStyle {
    pub color: Color,
    pub bold: bool,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self { color: Defaults::HIGHLIGHT_COLOR, bold: Defaults::HIGHLIGHT_BOLD }
    }
}

/// Paint `text` in the highlight style, then reset. The reset is separate
/// from the text so labels never carry escape codes around.
pub fn highlighted(out: &mut dyn Write, text: &str, style: HighlightStyle) -> io::Result<()> {
    out.queue(SetForegroundColor(style.color))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    out.queue(Print(text))?.queue(SetAttribute(Attribute::Reset))?.queue(ResetColor)?;
    Ok(())
}
