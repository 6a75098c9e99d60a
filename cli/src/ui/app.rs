//! Application State and Logic
//!
//! This module defines the application state and input handling for the
//! friendsplit TUI. It manages:
//!
//! - The ledger of friends and the current selection
//! - The add-friend and split-bill forms
//! - Focus and view management
//! - A session history of added friends and applied splits
//!
//! The `App` struct is the central state container, and `run_app` is the
//! main event loop that processes user input and updates the UI.

use crate::config::Config;
use crate::ledger::split::{clamp_paid_by_user, BillSplit, Payer};
use crate::ledger::{format_amount, FriendId, Ledger};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{backend::Backend, widgets::ListState, Terminal};
use std::time::Duration;
use tracing::{debug, warn};

pub type AppResult<T> = Result<T>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Friends,
    History,
}

impl View {
    pub fn all() -> Vec<View> {
        vec![View::Friends, View::History]
    }

    pub fn title(&self) -> &'static str {
        match self {
            View::Friends => "Friends",
            View::History => "History",
        }
    }
}

/// Which part of the Friends view receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    AddFriend,
    SplitBill,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddFriendForm {
    pub name: String,
    pub image: String,
    pub selected_field: usize,
    default_image: String,
}

impl AddFriendForm {
    pub const FIELDS: usize = 2;

    pub fn new(avatar_base: &str) -> Self {
        Self {
            name: String::new(),
            image: avatar_base.to_string(),
            selected_field: 0,
            default_image: avatar_base.to_string(),
        }
    }

    pub fn reset(&mut self) {
        self.name.clear();
        self.image = self.default_image.clone();
        self.selected_field = 0;
    }

    fn field_mut(&mut self) -> &mut String {
        match self.selected_field {
            0 => &mut self.name,
            _ => &mut self.image,
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.field_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % Self::FIELDS;
    }

    pub fn prev_field(&mut self) {
        self.selected_field = (self.selected_field + Self::FIELDS - 1) % Self::FIELDS;
    }
}

/// Field 0 is the bill value, 1 the user's expense, 2 who is paying. The
/// friend's expense is derived and never edited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitBillForm {
    pub bill_value: String,
    pub paid_by_user: String,
    pub payer: Payer,
    pub selected_field: usize,
}

impl SplitBillForm {
    pub const FIELDS: usize = 3;
    pub const PAYER_FIELD: usize = 2;

    pub fn bill(&self) -> Option<f64> {
        parse_amount(&self.bill_value)
    }

    pub fn paid(&self) -> Option<f64> {
        parse_amount(&self.paid_by_user)
    }

    /// `bill - yours` once a bill value has been entered.
    pub fn friend_expense(&self) -> Option<f64> {
        self.bill().map(|bill| bill - self.paid().unwrap_or(0.0))
    }

    pub fn push_char(&mut self, c: char) {
        match self.selected_field {
            0 => {
                if accepts_numeric_char(&self.bill_value, c) {
                    self.bill_value.push(c);
                }
            }
            1 => {
                if !accepts_numeric_char(&self.paid_by_user, c) {
                    return;
                }
                let candidate = format!("{}{}", self.paid_by_user, c);
                match parse_amount(&candidate) {
                    Some(value) => {
                        let previous = self.paid().unwrap_or(0.0);
                        let kept = clamp_paid_by_user(value, previous, self.bill());
                        if kept == value {
                            self.paid_by_user = candidate;
                        } else {
                            debug!(value, "expense above bill value rejected");
                        }
                    }
                    // partial input such as "-" or "."
                    None => self.paid_by_user = candidate,
                }
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.selected_field {
            0 => {
                self.bill_value.pop();
            }
            1 => {
                self.paid_by_user.pop();
            }
            _ => {}
        }
    }

    pub fn toggle_payer(&mut self) {
        self.payer = self.payer.toggle();
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % Self::FIELDS;
    }

    pub fn prev_field(&mut self) {
        self.selected_field = (self.selected_field + Self::FIELDS - 1) % Self::FIELDS;
    }

    /// The split to apply, or `None` while the bill value or the user's
    /// expense is still missing. Zero counts as missing.
    pub fn to_split(&self) -> Option<BillSplit> {
        let bill_value = self.bill().filter(|v| *v != 0.0)?;
        let paid_by_user = self.paid().filter(|v| *v != 0.0)?;
        Some(BillSplit {
            bill_value,
            paid_by_user,
            payer: self.payer,
        })
    }
}

fn parse_amount(input: &str) -> Option<f64> {
    input.parse::<f64>().ok()
}

/// Digits, a single `.`, and `-` only as the first character.
fn accepts_numeric_char(current: &str, c: char) -> bool {
    match c {
        '0'..='9' => true,
        '.' => !current.contains('.'),
        '-' => current.is_empty(),
        _ => false,
    }
}

fn signed_amount(value: f64) -> String {
    if value < 0.0 {
        format!("-{}", format_amount(value.abs()))
    } else {
        format!("+{}", format_amount(value))
    }
}

pub struct App {
    pub ledger: Ledger,
    pub currency: String,
    pub current_view: View,
    pub focus: Focus,
    pub running: bool,

    // Friends view
    pub friend_state: ListState,
    pub show_add_friend: bool,
    pub add_form: AddFriendForm,
    pub split_form: SplitBillForm,

    // History
    pub history: Vec<String>,

    pub status_message: Option<String>,
}

impl App {
    pub fn new(ledger: Ledger, config: &Config) -> Self {
        let mut friend_state = ListState::default();
        if !ledger.is_empty() {
            friend_state.select(Some(0));
        }

        Self {
            ledger,
            currency: config.currency.clone(),
            current_view: View::Friends,
            focus: Focus::List,
            running: true,
            friend_state,
            show_add_friend: false,
            add_form: AddFriendForm::new(&config.avatar_base),
            split_form: SplitBillForm::default(),
            history: Vec::new(),
            status_message: None,
        }
    }

    fn record(&mut self, entry: String) {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        self.history.push(format!("[{}] {}", stamp, entry));
        self.status_message = Some(entry);
    }

    /// Friend under the list cursor.
    pub fn highlighted_friend_id(&self) -> Option<FriendId> {
        self.friend_state
            .selected()
            .and_then(|i| self.ledger.friends().get(i))
            .map(|f| f.id.clone())
    }

    /// Submit the add-friend form. Incomplete input leaves everything as is.
    pub fn handle_add_friend(&mut self) {
        let name = self.add_form.name.clone();
        let image = self.add_form.image.clone();
        let Some(friend) = self.ledger.add_friend(&name, &image) else {
            return;
        };
        let entry = format!("Added {}", friend.name);

        self.show_add_friend = false;
        self.focus = Focus::List;
        self.add_form.reset();
        self.friend_state.select(Some(self.ledger.len() - 1));
        self.record(entry);
    }

    /// Open or close the add-friend form.
    pub fn handle_show_add_friend(&mut self) {
        self.show_add_friend = !self.show_add_friend;
        self.focus = if self.show_add_friend {
            Focus::AddFriend
        } else if self.ledger.selected().is_some() {
            Focus::SplitBill
        } else {
            Focus::List
        };
    }

    /// Toggle selection of `id` and close the add-friend form.
    pub fn handle_selection(&mut self, id: &FriendId) {
        let before = self.ledger.selected_id().cloned();
        self.ledger.toggle_selection(id);
        self.show_add_friend = false;

        if self.ledger.selected_id() != before.as_ref() {
            self.split_form = SplitBillForm::default();
        }
        self.focus = if self.ledger.selected().is_some() {
            Focus::SplitBill
        } else {
            Focus::List
        };
    }

    /// Submit the split-bill form against the selected friend.
    pub fn handle_split_bill(&mut self) {
        let Some(split) = self.split_form.to_split() else {
            debug!("split bill ignored: bill value or expense missing");
            return;
        };
        let delta = split.delta();

        let entry = match self.ledger.split_bill(delta) {
            Ok(friend) => format!(
                "Split a bill with {}: {} (balance {}{})",
                friend.name,
                signed_amount(delta),
                if friend.balance < 0.0 { "-" } else { "" },
                format_amount(friend.balance.abs()),
            ),
            Err(e) => {
                warn!(error = %e, "split bill failed");
                return;
            }
        };

        self.split_form = SplitBillForm::default();
        self.focus = Focus::List;
        self.record(entry);
    }

    /// Navigate to next view.
    pub fn next_view(&mut self) {
        let views = View::all();
        let idx = views
            .iter()
            .position(|v| *v == self.current_view)
            .unwrap_or(0);
        self.current_view = views[(idx + 1) % views.len()];
    }

    /// Navigate to previous view.
    pub fn prev_view(&mut self) {
        let views = View::all();
        let idx = views
            .iter()
            .position(|v| *v == self.current_view)
            .unwrap_or(0);
        self.current_view = views[(idx + views.len() - 1) % views.len()];
    }

    /// Jump directly to a view by index.
    pub fn goto_view(&mut self, index: usize) {
        let views = View::all();
        if index < views.len() {
            self.current_view = views[index];
        }
    }

    pub fn select_next(&mut self) {
        let i = self.friend_state.selected().unwrap_or(0);
        if i < self.ledger.len().saturating_sub(1) {
            self.friend_state.select(Some(i + 1));
        }
    }

    pub fn select_prev(&mut self) {
        let i = self.friend_state.selected().unwrap_or(0);
        if i > 0 {
            self.friend_state.select(Some(i - 1));
        }
    }

    pub fn select_first(&mut self) {
        if !self.ledger.is_empty() {
            self.friend_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.ledger.len();
        if len > 0 {
            self.friend_state.select(Some(len - 1));
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }

        match self.focus {
            Focus::List => self.handle_list_key(key),
            Focus::AddFriend => self.handle_add_friend_key(key),
            Focus::SplitBill => self.handle_split_bill_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Tab | KeyCode::Right => self.next_view(),
            KeyCode::BackTab | KeyCode::Left => self.prev_view(),
            KeyCode::Char('1') => self.goto_view(0),
            KeyCode::Char('2') => self.goto_view(1),
            _ if self.current_view != View::Friends => {}
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.highlighted_friend_id() {
                    self.handle_selection(&id);
                }
            }
            KeyCode::Char('a') => self.handle_show_add_friend(),
            // back into the form of an already selected friend
            KeyCode::Char('s') if self.ledger.selected().is_some() => {
                self.focus = Focus::SplitBill;
            }
            _ => {}
        }
    }

    fn handle_add_friend_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.handle_show_add_friend(),
            KeyCode::Enter => self.handle_add_friend(),
            KeyCode::Tab | KeyCode::Down => self.add_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.add_form.prev_field(),
            KeyCode::Backspace => self.add_form.backspace(),
            KeyCode::Char(c) => self.add_form.push_char(c),
            _ => {}
        }
    }

    fn handle_split_bill_key(&mut self, key: KeyEvent) {
        let on_payer = self.split_form.selected_field == SplitBillForm::PAYER_FIELD;
        match key.code {
            KeyCode::Esc => {
                // same as pressing "close" on the selected friend
                if let Some(id) = self.ledger.selected_id().cloned() {
                    self.handle_selection(&id);
                } else {
                    self.focus = Focus::List;
                }
            }
            KeyCode::Enter => self.handle_split_bill(),
            KeyCode::Tab | KeyCode::Down => self.split_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.split_form.prev_field(),
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if on_payer => {
                self.split_form.toggle_payer();
            }
            KeyCode::Backspace => self.split_form.backspace(),
            KeyCode::Char(c) => self.split_form.push_char(c),
            _ => {}
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> AppResult<()> {
    loop {
        terminal.draw(|f| super::views::draw(f, &mut app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if !app.running {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::seed::initial_friends;
    use pretty_assertions::assert_eq;

    fn new_app() -> App {
        let config = Config::default();
        App::new(Ledger::new(initial_friends(&config.avatar_base)), &config)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn balance_of(app: &App, name: &str) -> f64 {
        app.ledger
            .friends()
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.balance)
            .unwrap()
    }

    #[test]
    fn user_pays_bill_for_clark() {
        let mut app = new_app();
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.focus, Focus::SplitBill);
        assert_eq!(app.ledger.selected().map(|f| f.name.as_str()), Some("Clark"));

        type_text(&mut app, "20");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "5");
        assert_eq!(app.split_form.friend_expense(), Some(15.0));
        press(&mut app, KeyCode::Enter);

        assert_eq!(balance_of(&app, "Clark"), 8.0);
        assert_eq!(balance_of(&app, "Sarah"), 20.0);
        assert_eq!(balance_of(&app, "Anthony"), 0.0);
        assert_eq!(app.ledger.selected_id(), None);
        assert_eq!(app.focus, Focus::List);
        assert_eq!(app.history.len(), 1);
        assert!(app.history[0].ends_with("Split a bill with Clark: +15 (balance 8)"));
    }

    #[test]
    fn friend_pays_bill_for_clark() {
        let mut app = new_app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "20");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "5");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.split_form.payer, Payer::Friend);
        press(&mut app, KeyCode::Enter);

        assert_eq!(balance_of(&app, "Clark"), -12.0);
        assert_eq!(app.ledger.selected_id(), None);
    }

    #[test]
    fn incomplete_split_is_ignored() {
        let mut app = new_app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "20");
        press(&mut app, KeyCode::Enter);

        assert_eq!(balance_of(&app, "Clark"), -7.0);
        assert!(app.ledger.selected().is_some());
        assert_eq!(app.focus, Focus::SplitBill);
        assert!(app.history.is_empty());
    }

    #[test]
    fn expense_above_bill_is_rejected() {
        let mut form = SplitBillForm::default();
        form.push_char('1');
        form.push_char('0');
        form.next_field();
        form.push_char('9');
        form.push_char('9');
        assert_eq!(form.paid_by_user, "9");

        let mut form = SplitBillForm {
            selected_field: 1,
            ..Default::default()
        };
        form.push_char('5');
        assert_eq!(form.paid_by_user, "");
    }

    #[test]
    fn numeric_fields_filter_input() {
        let mut form = SplitBillForm::default();
        for c in "-1a2.5.0".chars() {
            form.push_char(c);
        }
        assert_eq!(form.bill_value, "-12.50");
        assert_eq!(form.bill(), Some(-12.5));
        assert_eq!(form.friend_expense(), Some(-12.5));
    }

    #[test]
    fn add_friend_closes_form_and_resets_it() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('a'));
        assert!(app.show_add_friend);
        assert_eq!(app.focus, Focus::AddFriend);

        type_text(&mut app, "Mia");
        press(&mut app, KeyCode::Tab);
        app.add_form.image = "https://example.com/48".to_string();
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.ledger.len(), 4);
        let mia = &app.ledger.friends()[3];
        assert_eq!(mia.name, "Mia");
        assert_eq!(mia.balance, 0.0);
        assert_eq!(mia.image, format!("https://example.com/48?={}", mia.id));
        assert!(!app.show_add_friend);
        assert_eq!(app.focus, Focus::List);
        assert_eq!(app.friend_state.selected(), Some(3));
        assert_eq!(app.add_form, AddFriendForm::new(&Config::default().avatar_base));
    }

    #[test]
    fn add_friend_with_empty_name_keeps_form_open() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.ledger.len(), 3);
        assert!(app.show_add_friend);
        assert_eq!(app.focus, Focus::AddFriend);
    }

    #[test]
    fn typing_q_in_a_form_does_not_quit() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('a'));
        type_text(&mut app, "Quinn");
        assert!(app.running);
        assert_eq!(app.add_form.name, "Quinn");
    }

    #[test]
    fn selecting_closes_add_friend_form() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('a'));
        let sarah = app.ledger.friends()[1].id.clone();
        app.handle_selection(&sarah);

        assert!(!app.show_add_friend);
        assert_eq!(app.ledger.selected_id(), Some(&sarah));
        assert_eq!(app.focus, Focus::SplitBill);
    }

    #[test]
    fn toggle_twice_returns_to_list() {
        let mut app = new_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.ledger.selected_id(), None);
        assert_eq!(app.focus, Focus::List);
        assert!(app.running);
    }

    #[test]
    fn switching_selection_resets_split_form() {
        let mut app = new_app();
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "20");

        let sarah = app.ledger.friends()[1].id.clone();
        app.handle_selection(&sarah);
        assert_eq!(app.split_form, SplitBillForm::default());
        assert_eq!(app.ledger.selected().map(|f| f.name.as_str()), Some("Sarah"));
    }

    #[test]
    fn list_navigation_and_views() {
        let mut app = new_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.friend_state.selected(), Some(2));
        press(&mut app, KeyCode::Home);
        assert_eq!(app.friend_state.selected(), Some(0));
        press(&mut app, KeyCode::End);
        assert_eq!(app.friend_state.selected(), Some(2));

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.current_view, View::History);
        // list keys are inert outside the Friends view
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.ledger.selected_id(), None);
        press(&mut app, KeyCode::Left);
        assert_eq!(app.current_view, View::Friends);
    }

    #[test]
    fn quit_keys() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);

        let mut app = new_app();
        press(&mut app, KeyCode::Enter);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }
}
