use std::io::{self, Write};
use std::rc::Rc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

use super::input::{Keypress, Terminal};
use super::keys::{KeyBindings, KeyEvent};
use super::render::{self, render};
use super::Cancel;
use crate::defaults::Defaults;
use crate::error::MenuError;
use crate::ui::style::HighlightStyle;

/// Called with the picked index and label, the console it was picked on and
/// the arguments the menu was started with.
pub type Handler<T> = Rc<dyn Fn(&mut Console, usize, &str, &MenuArgs<T>) -> Result<Transition<T>, MenuError>>;

/// What a handler wants the console to do next.
pub enum Transition<T> {
    /// Finish the whole run and hand `T` back to the caller.
    Return(T),
    /// Show the same menu again, with the picked option highlighted.
    Stay,
    /// Show a different menu in place of this one (submenu, back).
    Replace(MenuArgs<T>),
}

pub struct MenuOption<T> {
    pub label: String,
    pub handler: Option<Handler<T>>,
}

impl<T> MenuOption<T> {
    /// An option that resolves to its own index and label.
    pub fn plain(label: impl Into<String>) -> Self {
        Self { label: label.into(), handler: None }
    }

    pub fn new<F>(label: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Console, usize, &str, &MenuArgs<T>) -> Result<Transition<T>, MenuError> + 'static,
    {
        Self { label: label.into(), handler: Some(Rc::new(handler)) }
    }

    pub fn with_handler(label: impl Into<String>, handler: Handler<T>) -> Self {
        Self { label: label.into(), handler: Some(handler) }
    }
}

impl<T> Clone for MenuOption<T> {
    fn clone(&self) -> Self {
        Self { label: self.label.clone(), handler: self.handler.clone() }
    }
}

/// Everything one menu invocation is started with. Handlers get a reference
/// to it so they can re-enter the same menu or derive a submenu from it.
pub struct MenuArgs<T> {
    pub title: String,
    pub options: Vec<MenuOption<T>>,
    pub footer: Option<String>,
    pub initial_index: usize,
    /// Option resolved on exit keys and cancellation. `None` is "no selection".
    pub default: Option<usize>,
    /// Platform bindings when unset.
    pub bindings: Option<KeyBindings>,
    pub allow_digit_keys: bool,
}

impl<T> MenuArgs<T> {
    pub fn new(title: impl Into<String>, options: Vec<MenuOption<T>>) -> Self {
        Self {
            title: title.into(),
            options,
            footer: None,
            initial_index: 0,
            default: Some(0),
            bindings: None,
            allow_digit_keys: true,
        }
    }

    pub fn footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn initial(mut self, index: usize) -> Self {
        self.initial_index = index;
        self
    }

    pub fn default_choice(mut self, default: Option<usize>) -> Self {
        self.default = default;
        self
    }

    pub fn bindings(mut self, bindings: KeyBindings) -> Self {
        self.bindings = Some(bindings);
        self
    }

    pub fn digit_keys(mut self, allow: bool) -> Self {
        self.allow_digit_keys = allow;
        self
    }

    /// The default option, if it names one that exists.
    pub fn default_index(&self) -> Option<usize> {
        self.default.filter(|&i| i < self.options.len())
    }
}

impl<T> Clone for MenuArgs<T> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            options: self.options.clone(),
            footer: self.footer.clone(),
            initial_index: self.initial_index,
            default: self.default,
            bindings: self.bindings.clone(),
            allow_digit_keys: self.allow_digit_keys,
        }
    }
}

/// Outcome of a run that ended on an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected<T> {
    pub index: usize,
    pub label: String,
    /// What the option's handler returned; `None` for plain options.
    pub value: Option<T>,
}

/// `None` when the run ended without a selection.
pub type SessionResult<T> = Option<Selected<T>>;

/// What a single key did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Leave the loop and resolve this choice.
    Resolve(Option<usize>),
    /// Highlight changed; repaint.
    Moved,
    /// Nothing changed; no repaint.
    Ignored,
}

/// The highlighted index of one menu invocation.
pub struct MenuState<'a, T> {
    args: &'a MenuArgs<T>,
    highlighted: usize,
}

impl<'a, T> MenuState<'a, T> {
    pub fn new(args: &'a MenuArgs<T>) -> Self {
        let highlighted = args.initial_index.min(args.options.len().saturating_sub(1));
        Self { args, highlighted }
    }

    pub fn args(&self) -> &'a MenuArgs<T> {
        self.args
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    pub fn apply(&mut self, key: KeyEvent) -> Step {
        let len = self.args.options.len();
        if len == 0 {
            return match key {
                KeyEvent::Select | KeyEvent::Exit => Step::Resolve(self.args.default_index()),
                _ => Step::Ignored,
            };
        }
        match key {
            KeyEvent::Select => Step::Resolve(Some(self.highlighted)),
            KeyEvent::Exit => Step::Resolve(self.args.default_index()),
            KeyEvent::Down => {
                self.highlighted = (self.highlighted + 1) % len;
                Step::Moved
            }
            KeyEvent::Up => {
                self.highlighted = (self.highlighted + len - 1) % len;
                Step::Moved
            }
            KeyEvent::Digit(n) if self.args.allow_digit_keys && (1..=len).contains(&(n as usize)) => {
                self.highlighted = n as usize - 1;
                Step::Moved
            }
            _ => Step::Ignored,
        }
    }
}

// Where a resolved option sends the trampoline next.
enum Dispatched<T> {
    Done(Selected<T>),
    Next(MenuArgs<T>),
}

/// Terminal plus output: the thing menus run on and handlers re-enter.
pub struct Console {
    terminal: Terminal,
    out: Box<dyn Write>,
    highlight: HighlightStyle,
    pause: Duration,
}

impl Console {
    pub fn new(terminal: Terminal, out: Box<dyn Write>) -> Self {
        Self {
            terminal,
            out,
            highlight: HighlightStyle::default(),
            pause: Duration::from_millis(Defaults::REGISTER_PAUSE_MS),
        }
    }

    pub fn stdio() -> Self {
        Self::new(Terminal::stdin(), Box::new(io::stdout()))
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    pub fn clear(&mut self) -> io::Result<()> {
        render::clear(&mut *self.out)
    }

    /// Hold the current screen for the configured display delay.
    pub fn pause(&mut self) -> io::Result<()> {
        self.out.flush()?;
        thread::sleep(self.pause);
        Ok(())
    }

    /// Print `question` and read one line of text.
    pub fn prompt(&mut self, question: &str) -> Result<String, MenuError> {
        write!(self.out, "{question}")?;
        self.out.flush()?;
        self.terminal.read_line(&mut *self.out)
    }

    /// Print `hint` and block for any key.
    pub fn wait_for_key(&mut self, hint: &str) -> Result<(), MenuError> {
        writeln!(self.out, "{hint}")?;
        self.out.flush()?;
        match self.terminal.read_key()? {
            Keypress::Key(_) => Ok(()),
            Keypress::Cancelled(c) => Err(c.into()),
        }
    }

    fn report_cancel(&mut self, cancel: Cancel) -> io::Result<()> {
        info!(condition = %cancel, "menu cancelled");
        writeln!(self.out, "{cancel}")?;
        self.out.flush()
    }

    /// Show a menu until an option is resolved.
    ///
    /// `Stay` and `Replace` from a handler loop back here instead of nesting
    /// another call, so back-and-forth navigation never grows the stack.
    pub fn run<T>(&mut self, args: MenuArgs<T>) -> Result<SessionResult<T>, MenuError> {
        let mut args = args;
        loop {
            let Some(index) = self.session(&args)? else {
                return Ok(None);
            };
            let dispatched = match self.dispatch(&args, index) {
                Err(MenuError::Cancelled(c)) => {
                    // A cancelled handler resolves through the default like an
                    // exit key; a second cancellation from there propagates.
                    self.report_cancel(c)?;
                    match args.default_index() {
                        Some(d) => self.dispatch(&args, d)?,
                        None => return Ok(None),
                    }
                }
                other => other?,
            };
            match dispatched {
                Dispatched::Done(selected) => return Ok(Some(selected)),
                Dispatched::Next(next) => args = next,
            }
        }
    }

    fn dispatch<T>(&mut self, args: &MenuArgs<T>, index: usize) -> Result<Dispatched<T>, MenuError> {
        let option = &args.options[index];
        let label = option.label.clone();
        let Some(handler) = option.handler.clone() else {
            return Ok(Dispatched::Done(Selected { index, label, value: None }));
        };
        debug!(index, label = %label, "dispatching option");
        Ok(match handler(self, index, &label, args)? {
            Transition::Return(value) => Dispatched::Done(Selected { index, label, value: Some(value) }),
            Transition::Stay => Dispatched::Next(args.clone().initial(index)),
            Transition::Replace(next) => Dispatched::Next(next),
        })
    }

    // Render/read loop for one menu. Returns the option to resolve.
    fn session<T>(&mut self, args: &MenuArgs<T>) -> Result<Option<usize>, MenuError> {
        let mut state = MenuState::new(args);
        if args.options.is_empty() {
            render(&mut *self.out, &state, self.highlight)?;
            return Ok(args.default_index());
        }
        let bindings = args
            .bindings
            .clone()
            .unwrap_or_else(|| KeyBindings::for_model(self.terminal.model()));

        let mut repaint = true;
        loop {
            if repaint {
                render(&mut *self.out, &state, self.highlight)?;
                repaint = false;
            }
            let key = match self.terminal.read_key()? {
                Keypress::Key(raw) => bindings.classify(&raw),
                Keypress::Cancelled(c) => {
                    self.report_cancel(c)?;
                    return Ok(args.default_index());
                }
            };
            match state.apply(key) {
                Step::Resolve(choice) => return Ok(choice),
                Step::Moved => repaint = true,
                Step::Ignored => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::testing::console;
    use std::cell::Cell;

    fn plain(labels: &[&str]) -> Vec<MenuOption<i32>> {
        labels.iter().map(|l| MenuOption::plain(*l)).collect()
    }

    #[test]
    fn down_down_select_picks_third() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let options = vec![
            MenuOption::plain("List"),
            MenuOption::plain("Register"),
            MenuOption::new("Exit", move |_, i, label, _| {
                seen.set(seen.get() + 1);
                assert_eq!((i, label), (2, "Exit"));
                Ok(Transition::Return(7))
            }),
        ];
        let (mut c, _) = console(b"jj\n");
        let res = c.run(MenuArgs::new("Main", options)).unwrap();
        assert_eq!(res, Some(Selected { index: 2, label: "Exit".into(), value: Some(7) }));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn unrecognized_keys_do_not_repaint() {
        let (mut c, out) = console(b"xyz\n");
        let res = c.run(MenuArgs::new("Title", plain(&["a", "b"]))).unwrap();
        assert_eq!(res.map(|s| s.index), Some(0));
        assert_eq!(out.text().matches("Title").count(), 1);
    }

    #[test]
    fn digits_outside_range_are_ignored() {
        let (mut c, out) = console(b"09\n");
        let res = c.run(MenuArgs::new("T", plain(&["a", "b", "c"]))).unwrap();
        assert_eq!(res.map(|s| s.index), Some(0));
        assert_eq!(out.text().matches("T\n").count(), 1);

        let (mut c, _) = console(b"3\n");
        assert_eq!(c.run(MenuArgs::new("T", plain(&["a", "b", "c"]))).unwrap().map(|s| s.index), Some(2));
    }

    #[test]
    fn digit_keys_can_be_disabled() {
        let (mut c, _) = console(b"3\n");
        let args = MenuArgs::new("T", plain(&["a", "b", "c"])).digit_keys(false);
        assert_eq!(c.run(args).unwrap().map(|s| s.index), Some(0));
    }

    #[test]
    fn exit_keys_use_default() {
        let (mut c, _) = console(b"jq");
        let args = MenuArgs::new("T", plain(&["a", "b", "c"])).default_choice(Some(2));
        assert_eq!(c.run(args).unwrap().map(|s| s.label), Some("c".to_string()));

        let (mut c, _) = console(b"\x1b");
        let args = MenuArgs::new("T", plain(&["a", "b"])).default_choice(None);
        assert_eq!(c.run(args).unwrap(), None);
    }

    #[test]
    fn interrupt_resolves_like_exit_and_names_itself() {
        let (mut c, out) = console(b"jj\x03");
        let args = MenuArgs::new("T", plain(&["a", "b", "c"])).default_choice(Some(1));
        assert_eq!(c.run(args).unwrap().map(|s| s.index), Some(1));
        assert!(out.text().ends_with("Interrupt\n"));
    }

    #[test]
    fn end_of_input_resolves_like_exit() {
        let (mut c, out) = console(b"j");
        let args = MenuArgs::new("T", plain(&["a", "b"])).default_choice(None);
        assert_eq!(c.run(args).unwrap(), None);
        assert!(out.text().ends_with("EndOfInput\n"));
    }

    #[test]
    fn empty_menu_never_reads() {
        // The script would select if it were ever read.
        let (mut c, out) = console(b"\n");
        let args: MenuArgs<i32> = MenuArgs::new("Empty", Vec::new());
        assert_eq!(c.run(args).unwrap(), None);
        assert!(out.text().contains("Empty"));
        assert_eq!(c.terminal.read_key().unwrap(), Keypress::Key(b"\n".to_vec()));
    }

    #[test]
    fn stay_redisplays_with_pick_highlighted() {
        let shown = Rc::new(Cell::new(0));
        let counter = shown.clone();
        let options = vec![
            MenuOption::new("Report", move |_, _, _, _: &MenuArgs<i32>| {
                counter.set(counter.get() + 1);
                Ok(Transition::Stay)
            }),
            MenuOption::plain("Done"),
        ];
        // pick Report twice, then move down and pick Done
        let (mut c, _) = console(b"\n\nj\n");
        let res = c.run(MenuArgs::new("T", options)).unwrap();
        assert_eq!(res.map(|s| s.label), Some("Done".to_string()));
        assert_eq!(shown.get(), 2);
    }

    #[test]
    fn submenu_back_returns_to_parent() {
        let options = vec![
            MenuOption::plain("Other"),
            MenuOption::new("Sub", |_, index, _, parent: &MenuArgs<i32>| {
                let back = parent.clone().initial(index);
                let sub = MenuArgs::new(
                    "Sub",
                    vec![
                        MenuOption::plain("Leaf"),
                        MenuOption::new("Back", move |_, _, _, _| Ok(Transition::Replace(back.clone()))),
                    ],
                )
                .default_choice(Some(1));
                Ok(Transition::Replace(sub))
            }),
        ];
        // Enter Sub, q goes Back; Enter on the parent picks Sub again because
        // it is still highlighted, then Enter picks Leaf.
        let (mut c, out) = console(b"j\nq\n\n");
        let res = c.run(MenuArgs::new("Main", options)).unwrap();
        assert_eq!(res.map(|s| s.label), Some("Leaf".to_string()));
        assert_eq!(out.text().matches("Main\n").count(), 2);
    }

    #[test]
    fn cancelled_handler_falls_back_to_default() {
        let options = vec![
            MenuOption::new("Prompt", |_, _, _, _| Err(MenuError::Cancelled(Cancel::Interrupt))),
            MenuOption::new("Quit", |_, _, _, _| Ok(Transition::Return(0))),
        ];
        let (mut c, out) = console(b"\n");
        let res = c.run(MenuArgs::new("T", options).default_choice(Some(1))).unwrap();
        assert_eq!(res.and_then(|s| s.value), Some(0));
        assert!(out.text().contains("Interrupt"));
    }

    #[test]
    fn handler_failures_propagate() {
        let options = vec![MenuOption::new("Boom", |_, _, _, _| -> Result<Transition<i32>, MenuError> {
            Err(anyhow::anyhow!("store unavailable").into())
        })];
        let (mut c, _) = console(b"\n");
        let err = c.run(MenuArgs::new("T", options)).unwrap_err();
        assert!(matches!(err, MenuError::Handler(_)));
        assert_eq!(err.to_string(), "store unavailable");
    }
}
