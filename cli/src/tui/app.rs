use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use task_console_core::api::{Action, ConsoleState, Outcome, Theme, TuiConfig};

use super::palette::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    Result,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    None,
    Quit,
    Dispatch(Action),
}

pub struct TuiApp {
    pub state: ConsoleState,
    pub theme: Theme,
    pub palette: Palette,
    pub searching: bool,
    pub result_scroll: u16,
    // Set by the renderer from the wrapped height of the result body.
    result_scroll_limit: Cell<u16>,
}

const RESULT_PAGE: u16 = 10;

impl TuiApp {
    pub fn new(config: &TuiConfig, theme: Theme) -> Self {
        Self {
            state: ConsoleState::new(config),
            palette: Palette::from_theme(&theme),
            theme,
            searching: false,
            result_scroll: 0,
            result_scroll_limit: Cell::new(u16::MAX),
        }
    }

    /// Applies a finished operation. A new result always opens scrolled to
    /// the top, even when it replaces one that is still on screen.
    pub fn apply_outcome(&mut self, outcome: Outcome) {
        let fresh_result = outcome.result.is_some();
        self.state.apply(outcome);
        if fresh_result {
            self.result_scroll = 0;
        }
    }

    pub fn set_result_scroll_limit(&self, limit: u16) {
        self.result_scroll_limit.set(limit);
    }

    fn scroll_result_to(&mut self, offset: u16) {
        self.result_scroll = offset.min(self.result_scroll_limit.get());
    }

    /// Modals take the keyboard before the search box, which takes it
    /// before the table.
    pub fn input_mode(&self) -> InputMode {
        if self.state.result.is_some() {
            InputMode::Result
        } else if self.state.form_open {
            InputMode::Form
        } else if self.searching {
            InputMode::Search
        } else {
            InputMode::Normal
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if is_interrupt(&key) {
            return KeyOutcome::Quit;
        }
        match self.input_mode() {
            InputMode::Result => self.handle_result_key(key),
            InputMode::Form => self.handle_form_key(key),
            InputMode::Search => self.handle_search_key(key),
            InputMode::Normal => self.handle_table_key(key),
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('n') => self.state.open_form(),
            KeyCode::Char('g') => return KeyOutcome::Dispatch(self.state.search_action()),
            KeyCode::Char('r') => return dispatch_opt(self.state.run_selected()),
            KeyCode::Char('d') | KeyCode::Delete => {
                return dispatch_opt(self.state.remove_selected())
            }
            KeyCode::Down | KeyCode::Char('j') => self.state.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.state.select_prev(),
            KeyCode::Right | KeyCode::Char(']') | KeyCode::PageDown => self.state.next_page(),
            KeyCode::Left | KeyCode::Char('[') | KeyCode::PageUp => self.state.prev_page(),
            _ => {}
        }
        KeyOutcome::None
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Enter => {
                self.searching = false;
                return KeyOutcome::Dispatch(self.state.search_action());
            }
            KeyCode::Esc => self.searching = false,
            KeyCode::Backspace => {
                self.state.query.pop();
            }
            KeyCode::Char(ch) => self.state.query.push(ch),
            _ => {}
        }
        KeyOutcome::None
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> KeyOutcome {
        match key.code {
            KeyCode::Esc => self.state.cancel_form(),
            KeyCode::Enter => return dispatch_opt(self.state.submit_form()),
            KeyCode::Tab | KeyCode::Down => self.state.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.state.form.focus_prev(),
            KeyCode::Backspace => self.state.form.backspace(),
            KeyCode::Char(ch) => self.state.form.insert_char(ch),
            _ => {}
        }
        KeyOutcome::None
    }

    fn handle_result_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let at = self.result_scroll;
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.state.close_result();
                self.result_scroll = 0;
                self.result_scroll_limit.set(u16::MAX);
            }
            KeyCode::Down | KeyCode::Char('j') => self.scroll_result_to(at.saturating_add(1)),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_result_to(at.saturating_sub(1)),
            KeyCode::PageDown | KeyCode::Char(' ') => {
                self.scroll_result_to(at.saturating_add(RESULT_PAGE))
            }
            KeyCode::PageUp => self.scroll_result_to(at.saturating_sub(RESULT_PAGE)),
            KeyCode::Home | KeyCode::Char('g') => self.result_scroll = 0,
            KeyCode::End | KeyCode::Char('G') => self.scroll_result_to(u16::MAX),
            _ => {}
        }
        KeyOutcome::None
    }
}

pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn dispatch_opt(action: Option<Action>) -> KeyOutcome {
    action.map(KeyOutcome::Dispatch).unwrap_or(KeyOutcome::None)
}
