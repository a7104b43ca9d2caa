use crossterm::{
    cursor::MoveTo,
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use std::io::{self, Write};

use super::session::MenuState;
use crate::ui::help::help_menu;
use crate::ui::style::{highlighted, HighlightStyle};

/// Home the cursor and wipe the screen.
pub fn clear(out: &mut dyn Write) -> io::Result<()> {
    out.queue(MoveTo(0, 0))?.queue(Clear(ClearType::All))?;
    out.flush()
}

/// Full repaint: title, numbered options, footer.
pub fn render<T>(out: &mut dyn Write, state: &MenuState<'_, T>, style: HighlightStyle) -> io::Result<()> {
    let args = state.args();
    out.queue(MoveTo(0, 0))?.queue(Clear(ClearType::All))?;
    writeln!(out, "{}", args.title)?;
    for (idx, option) in args.options.iter().enumerate() {
        let item = format!("{}. {}", idx + 1, option.label);
        if idx == state.highlighted() {
            highlighted(out, &item, style)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{item}")?;
        }
    }
    match &args.footer {
        Some(footer) => writeln!(out, "{footer}")?,
        None => writeln!(out, "\n{}", help_menu())?,
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::{MenuArgs, MenuOption};

    fn paint(args: &MenuArgs<()>) -> String {
        let state = MenuState::new(args);
        let mut out = Vec::new();
        render(&mut out, &state, HighlightStyle::default()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn numbers_options_and_highlights_one() {
        let args = MenuArgs::new("Pick", vec![MenuOption::plain("a"), MenuOption::plain("b")]).initial(1);
        let text = paint(&args);
        assert!(text.contains("Pick\n"));
        assert!(text.contains("1. a\n"));
        // highlighted line is wrapped in escape codes, not printed bare
        assert!(!text.contains("\n2. b\n"));
        assert!(text.contains("2. b\x1b["));
        assert!(text.ends_with(&format!("\n{}\n", help_menu())));
    }

    #[test]
    fn empty_menu_prints_title_and_footer() {
        let args: MenuArgs<()> = MenuArgs::new("Nothing here", Vec::new()).footer("bye");
        let text = paint(&args);
        assert!(text.contains("Nothing here\n"));
        assert!(text.ends_with("bye\n"));
        assert!(!text.contains("1."));
    }
}
