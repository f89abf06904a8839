use crate::models::{Priority, Task, UnknownVariant};
use crate::storage::KeyValueStorage;
use crate::store::TaskStore;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Note,
    Priority,
}

impl FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "title" => Ok(Self::Title),
            "note" => Ok(Self::Note),
            "priority" => Ok(Self::Priority),
            other => Err(FormError::UnknownField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("unknown form field '{0}'")]
    UnknownField(String),
    #[error(transparent)]
    InvalidValue(#[from] UnknownVariant),
}

/// Draft of the next task, held until the form is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftForm {
    pub title: String,
    pub note: String,
    pub priority: Priority,
}

impl DraftForm {
    /// Stores the raw value; nothing is validated until `submit`.
    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), FormError> {
        match field {
            FormField::Title => self.title = value.to_string(),
            FormField::Note => self.note = value.to_string(),
            FormField::Priority => self.priority = value.parse()?,
        }
        Ok(())
    }

    /// Replaces the whole draft from one form post. Nothing changes unless
    /// every value is accepted.
    pub fn fill(&mut self, title: &str, note: &str, priority: Option<&str>) -> Result<(), FormError> {
        let mut next = self.clone();
        next.set_field(FormField::Title, title)?;
        next.set_field(FormField::Note, note)?;
        if let Some(priority) = priority.filter(|p| !p.trim().is_empty()) {
            next.set_field(FormField::Priority, priority)?;
        }
        *self = next;
        Ok(())
    }

    /// Creates a task from the draft and clears it. A blank title leaves the
    /// draft untouched and creates nothing.
    pub fn submit<S: KeyValueStorage>(&mut self, store: &mut TaskStore<S>) -> Option<Task> {
        match store.create(&self.title, &self.note, self.priority) {
            Ok(task) => {
                *self = Self::default();
                Some(task)
            }
            Err(err) => {
                debug!("form submit ignored: {err}");
                None
            }
        }
    }
}
