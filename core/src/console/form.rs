use crate::model::TaskDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Owner,
    Command,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Name, Field::Owner, Field::Command];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Owner => "Owner",
            Field::Command => "Command",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Name => "Print Hello",
            Field::Owner => "John Smith",
            Field::Command => "echo Hello World!",
        }
    }

    fn index(self) -> usize {
        match self {
            Field::Name => 0,
            Field::Owner => 1,
            Field::Command => 2,
        }
    }

    fn next(self) -> Field {
        Field::ALL[(self.index() + 1) % Field::ALL.len()]
    }

    fn prev(self) -> Field {
        Field::ALL[(self.index() + Field::ALL.len() - 1) % Field::ALL.len()]
    }
}

/// New-task form: three required text inputs and their validation state.
#[derive(Debug, Clone)]
pub struct TaskForm {
    values: [String; 3],
    errors: [Option<String>; 3],
    pub focus: Field,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            values: Default::default(),
            errors: Default::default(),
            focus: Field::Name,
        }
    }
}

impl TaskForm {
    pub fn value(&self, field: Field) -> &str {
        &self.values[field.index()]
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        self.errors[field.index()].as_deref()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.values[field.index()] = value.into();
        self.errors[field.index()] = None;
    }

    pub fn insert_char(&mut self, ch: char) {
        let idx = self.focus.index();
        self.values[idx].push(ch);
        self.errors[idx] = None;
    }

    pub fn backspace(&mut self) {
        let idx = self.focus.index();
        self.values[idx].pop();
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Required-field check. Whitespace-only counts as empty. On success the
    /// values are returned as typed.
    pub fn validate(&mut self) -> Option<TaskDraft> {
        let mut ok = true;
        for field in Field::ALL {
            let idx = field.index();
            if self.values[idx].trim().is_empty() {
                self.errors[idx] = Some(format!("'{}' is required", field.label()));
                ok = false;
            } else {
                self.errors[idx] = None;
            }
        }
        if !ok {
            if let Some(first) = Field::ALL
                .into_iter()
                .find(|f| self.errors[f.index()].is_some())
            {
                self.focus = first;
            }
            return None;
        }
        Some(TaskDraft {
            name: self.values[0].clone(),
            owner: self.values[1].clone(),
            command: self.values[2].clone(),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(String::is_empty)
    }
}
