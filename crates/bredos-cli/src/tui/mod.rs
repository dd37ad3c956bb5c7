//! Full-screen menu front end.
//!
//! Menus are a stack: opening a submenu pushes it, `Back`/`q`/Esc pops it,
//! and popping the main menu exits.

pub mod canvas;
pub mod pane;

use crate::ui::Theme;
use anyhow::{Context, Result};
use bredos_core::{ActionId, CancellationToken, Cursor, Entry, Menu, MenuId, Outcome, Session};
use canvas::{Canvas, TextStyle};
use crossterm::{
    cursor,
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use pane::PaneReporter;
use std::time::Duration;

/// Input must stay quiet this long before a screen accepts keys.
const SETTLE: Duration = Duration::from_millis(200);
/// Debounce between menu movements; holding a key moves once.
const KEY_SETTLE: Duration = Duration::from_millis(65);
/// Duration of each phase of the selection blink.
const BLINK_STEP: Duration = Duration::from_millis(80);

/// Run the interactive menu until the user exits.
pub async fn run(session: &Session) -> Result<()> {
    let _guard = TerminalGuard::enter().context("Failed to initialise terminal")?;
    let mut app = App::new(session);
    app.main_loop().await
}

/// Raw mode and the alternate screen for as long as it lives.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = Self;
        execute!(std::io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(std::io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// What the user did on a menu screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuInput {
    Up,
    Down,
    Select,
    Back,
    Interrupt,
    Ignore,
}

/// Map a key press to a menu input.
pub fn menu_input(key: KeyEvent) -> MenuInput {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            MenuInput::Interrupt
        }
        KeyCode::Up => MenuInput::Up,
        KeyCode::Down => MenuInput::Down,
        KeyCode::Enter => MenuInput::Select,
        KeyCode::Char('q') | KeyCode::Esc => MenuInput::Back,
        _ => MenuInput::Ignore,
    }
}

/// True for keys that abort a running command.
pub fn is_abort_key(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Text and style of a menu item.
///
/// The selection is shown reversed as `[> label <]`; while blinking after
/// Enter it alternates with a plain `[< label >]`.
pub fn menu_line(label: &str, selected: bool, blink: bool) -> (String, TextStyle) {
    match (selected, blink) {
        (false, _) => (label.to_string(), TextStyle::Plain),
        (true, false) => (format!("[> {label} <]"), TextStyle::Reversed),
        (true, true) => (format!("[< {label} >]"), TextStyle::Plain),
    }
}

/// Heading of a menu screen.
pub fn menu_title(title: &str, dry_run: bool) -> String {
    if dry_run {
        format!("{title} (DRYRUN)")
    } else {
        title.to_string()
    }
}

enum Input {
    Key(KeyEvent),
    Resize,
    Closed,
}

struct Frame {
    menu: Menu,
    cursor: Cursor,
}

impl Frame {
    fn new(id: MenuId) -> Self {
        let menu = id.menu();
        let cursor = Cursor::new(menu.items.len());
        Self { menu, cursor }
    }
}

struct App<'a> {
    session: &'a Session,
    theme: Theme,
    canvas: Canvas,
    events: EventStream,
}

impl<'a> App<'a> {
    fn new(session: &'a Session) -> Self {
        let theme = Theme::default();
        Self {
            session,
            canvas: Canvas::new(&theme),
            theme,
            events: EventStream::new(),
        }
    }

    async fn main_loop(&mut self) -> Result<()> {
        let mut stack = vec![Frame::new(MenuId::Main)];

        while let Some(frame) = stack.last_mut() {
            let Some(index) = self.choose(&frame.menu, &mut frame.cursor).await? else {
                stack.pop();
                continue;
            };
            match frame.menu.entry(index) {
                Entry::Back => {
                    stack.pop();
                }
                Entry::Open(id) => stack.push(Frame::new(id)),
                Entry::Run(action) => self.perform(action).await?,
            }
        }
        Ok(())
    }

    /// Show `menu` and wait for a selection; `None` means go back.
    async fn choose(&mut self, menu: &Menu, cursor: &mut Cursor) -> Result<Option<usize>> {
        let title = menu_title(menu.title, self.session.runner().settings().dry_run);
        let labels = menu.labels();

        self.settle(SETTLE).await;
        self.canvas.clear()?;

        loop {
            self.draw_menu(&title, &labels, cursor.selected(), false)?;

            let key = match self.next_input().await {
                Input::Key(key) => key,
                Input::Resize => {
                    self.canvas.clear()?;
                    continue;
                }
                Input::Closed => return Ok(None),
            };

            match menu_input(key) {
                MenuInput::Up => cursor.up(),
                MenuInput::Down => cursor.down(),
                MenuInput::Select => {
                    for blink in [false, true, false, true, false] {
                        self.draw_menu(&title, &labels, cursor.selected(), blink)?;
                        tokio::time::sleep(BLINK_STEP).await;
                    }
                    return Ok(Some(cursor.selected()));
                }
                MenuInput::Back => return Ok(None),
                MenuInput::Interrupt => {
                    self.settle(SETTLE).await;
                    self.canvas.clear()?;
                }
                MenuInput::Ignore => {}
            }
            self.settle(KEY_SETTLE).await;
        }
    }

    fn draw_menu(
        &mut self,
        title: &str,
        labels: &[&str],
        selected: usize,
        blink: bool,
    ) -> Result<()> {
        let layout = self.theme.layout.clone();
        self.canvas
            .write_at(layout.title_row, layout.text_col, title, TextStyle::Title)?;
        for (idx, label) in labels.iter().enumerate() {
            let row = layout.body_row + idx as u16;
            let (text, style) = menu_line(label, idx == selected, blink);
            self.canvas.clear_row(row)?;
            self.canvas.write_at(row, layout.item_col, &text, style)?;
        }
        self.canvas.border()?;
        self.canvas.flush()?;
        Ok(())
    }

    /// Perform an action on its own screen, then wait for Enter.
    async fn perform(&mut self, id: ActionId) -> Result<()> {
        let session = self.session;
        let reporter = PaneReporter::new(&self.theme);
        let cancel = CancellationToken::new();

        let result = {
            let work = session.perform(id, &reporter, &cancel);
            tokio::pin!(work);
            loop {
                tokio::select! {
                    result = &mut work => break result,
                    input = self.events.next() => match input {
                        Some(Ok(Event::Key(key)))
                            if key.kind == KeyEventKind::Press && is_abort_key(key) =>
                        {
                            tracing::debug!(action = ?id, "Abort requested");
                            cancel.cancel();
                        }
                        Some(_) => {}
                        // Input is gone; let the command finish on its own.
                        None => break (&mut work).await,
                    },
                }
            }
        };

        let prompt = match result {
            Ok(Outcome::Ran(run)) => format!("{} - Press Enter to return", run.status_label()),
            Ok(Outcome::Message(lines)) => {
                self.message_body(id.title(), &lines)?;
                "Press Enter to return".to_string()
            }
            Err(e) => {
                tracing::warn!(action = ?id, error = %e, "Action failed");
                self.message_body(id.title(), &[format!("Error: {e}")])?;
                "Press Enter to return".to_string()
            }
        };

        self.prompt(&prompt).await?;
        self.settle(SETTLE).await;
        Ok(())
    }

    fn message_body(&mut self, title: &str, lines: &[String]) -> Result<()> {
        let layout = self.theme.layout.clone();
        self.canvas.clear()?;
        self.canvas.border()?;
        self.canvas
            .write_at(layout.title_row, layout.text_col, title, TextStyle::Title)?;
        for (idx, line) in lines.iter().enumerate() {
            let row = layout.body_row + idx as u16;
            self.canvas
                .write_at(row, layout.text_col, line, TextStyle::Plain)?;
        }
        self.canvas.flush()?;
        Ok(())
    }

    /// Show a reversed prompt on the second-to-last row and wait for Enter.
    async fn prompt(&mut self, text: &str) -> Result<()> {
        let (_, rows) = self.canvas.size();
        let row = rows.saturating_sub(2);
        self.canvas
            .write_at(row, self.theme.layout.text_col, text, TextStyle::Reversed)?;
        self.canvas.flush()?;

        loop {
            match self.next_input().await {
                Input::Key(key) if key.code == KeyCode::Enter => return Ok(()),
                Input::Closed => return Ok(()),
                Input::Key(_) | Input::Resize => {}
            }
        }
    }

    async fn next_input(&mut self) -> Input {
        loop {
            match self.events.next().await {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    return Input::Key(key);
                }
                Some(Ok(Event::Resize(..))) => return Input::Resize,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "Failed to read terminal input");
                    return Input::Closed;
                }
                None => return Input::Closed,
            }
        }
    }

    /// Discard input until none has arrived for `quiet`, so keys held from
    /// the previous screen do not leak into the next one.
    async fn settle(&mut self, quiet: Duration) {
        while let Ok(Some(_)) = tokio::time::timeout(quiet, self.events.next()).await {}
    }
}
