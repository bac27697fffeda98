use std::time::{Duration, Instant};

use crate::core::{ConnectionStatus, Session};
use crate::domain::{Field, FieldKind, FormValues, OPERATIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Operations,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the selected text field
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

/// Work the TUI hands to the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Connect,
    SelectOperation(String),
    Submit { name: String, values: FormValues },
    CycleAccount,
    Disconnect,
}

pub struct App {
    /// Last session snapshot from the worker
    pub session: Session,
    pub endpoint: String,
    pub focus: Focus,
    pub input_mode: InputMode,
    /// Cursor in the operation list
    pub operation_cursor: usize,
    /// Editable copy of the rendered form
    pub fields: Vec<Field>,
    /// Cursor in the form; `fields.len()` is the submit row
    pub field_cursor: usize,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub should_quit: bool,
    form_revision: u64,
    connect_pending: bool,
    pending: Vec<Request>,
}

impl App {
    pub fn new(endpoint: impl Into<String>) -> Self {
        let session = Session::new();
        Self {
            form_revision: session.form_revision,
            session,
            endpoint: endpoint.into(),
            focus: Focus::Operations,
            input_mode: InputMode::Normal,
            operation_cursor: 0,
            fields: Vec::new(),
            field_cursor: 0,
            status: None,
            help_open: false,
            should_quit: false,
            connect_pending: false,
            pending: Vec::new(),
        }
    }

    /// Adopt a new snapshot; local edits survive unless the form was rebuilt
    pub fn apply_session(&mut self, session: Session) {
        if session.form_revision != self.form_revision {
            self.form_revision = session.form_revision;
            self.fields = session.fields.clone();
            self.field_cursor = 0;
            self.input_mode = InputMode::Normal;
        }
        if !session.connect_enabled {
            // The worker has taken the request
            self.connect_pending = false;
        }
        if !session.is_connected() && self.focus == Focus::Form {
            self.focus = Focus::Operations;
        }
        self.session = session;
    }

    pub fn drain_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.pending)
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > Duration::from_secs(3) {
                self.status = None;
            }
        }
    }

    pub fn can_connect(&self) -> bool {
        self.session.connect_enabled && !self.connect_pending
    }

    pub fn request_connect(&mut self) {
        if !self.can_connect() {
            return;
        }
        if self.session.status == ConnectionStatus::Connected {
            self.set_status("Already connected", StatusLevel::Info);
            return;
        }
        self.connect_pending = true;
        self.pending.push(Request::Connect);
    }

    pub fn cycle_account(&mut self) {
        self.pending.push(Request::CycleAccount);
    }

    pub fn disconnect(&mut self) {
        self.pending.push(Request::Disconnect);
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Operations if self.session.is_connected() && self.session.submit_visible => {
                Focus::Form
            }
            _ => Focus::Operations,
        };
        self.input_mode = InputMode::Normal;
    }

    pub fn move_up(&mut self) {
        match self.focus {
            Focus::Operations => {
                self.operation_cursor = self.operation_cursor.saturating_sub(1);
            }
            Focus::Form => self.field_cursor = self.field_cursor.saturating_sub(1),
        }
    }

    pub fn move_down(&mut self) {
        match self.focus {
            Focus::Operations => {
                if self.operation_cursor + 1 < OPERATIONS.len() {
                    self.operation_cursor += 1;
                }
            }
            Focus::Form => {
                if self.field_cursor < self.fields.len() {
                    self.field_cursor += 1;
                }
            }
        }
    }

    /// Enter on the operation list selects, on the form edits or submits
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Operations => self.select_operation(),
            Focus::Form => {
                let Some(field) = self.fields.get_mut(self.field_cursor) else {
                    self.submit();
                    return;
                };
                if field.accepts_text() {
                    self.input_mode = InputMode::Editing;
                } else if field.kind == FieldKind::Checkbox {
                    field.toggle();
                } else {
                    field.cycle_option(true);
                }
            }
        }
    }

    fn select_operation(&mut self) {
        if !self.session.is_connected() {
            self.set_status("Connect a wallet first (c)", StatusLevel::Warn);
            return;
        }
        let Some(op) = OPERATIONS.get(self.operation_cursor) else {
            return;
        };
        self.pending.push(Request::SelectOperation(op.name.to_string()));
        self.focus = Focus::Form;
    }

    pub fn clear_selection(&mut self) {
        self.pending.push(Request::SelectOperation(String::new()));
        self.focus = Focus::Operations;
    }

    pub fn submit(&mut self) {
        if !self.session.submit_visible {
            return;
        }
        let Some(name) = self.session.selected_operation.clone() else {
            return;
        };
        let values = FormValues::from_fields(&self.fields);
        self.pending.push(Request::Submit { name, values });
        self.set_status("Submitted…", StatusLevel::Info);
    }

    /// Left/right on a select, space on a checkbox
    pub fn adjust_field(&mut self, forward: bool) {
        if let Some(field) = self.fields.get_mut(self.field_cursor) {
            match field.kind {
                FieldKind::Checkbox => field.toggle(),
                FieldKind::Select(_) => field.cycle_option(forward),
                _ => {}
            }
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.field_cursor) {
            if field.accepts_text() {
                field.value.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.field_cursor) {
            if field.accepts_text() {
                field.value.pop();
            }
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn on_submit_row(&self) -> bool {
        self.focus == Focus::Form && self.field_cursor == self.fields.len()
    }
}
