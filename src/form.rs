//! Form state for the create/update flow.
//!
//! A hidden record id plus three text fields. The id decides the submit
//! path: present means update, absent means create. Fields are kept as
//! typed text; trimming and age parsing happen at submit time.

use crate::model::{User, UserDraft};
use anyhow::{anyhow, Result};

pub const CREATE_LABEL: &str = "Create";
pub const UPDATE_LABEL: &str = "Update";

#[derive(Debug, Clone, Default)]
pub struct FormState {
    record_id: Option<u64>,
    pub name: String,
    pub email: String,
    pub age: String,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The hidden id field; set only while editing an existing record.
    pub fn record_id(&self) -> Option<u64> {
        self.record_id
    }

    /// Label for the submit control, derived from id presence.
    pub fn submit_label(&self) -> &'static str {
        if self.record_id.is_some() {
            UPDATE_LABEL
        } else {
            CREATE_LABEL
        }
    }

    /// Fill all four fields from an existing record (update mode).
    pub fn populate(&mut self, user: &User) {
        self.record_id = Some(user.id);
        self.name = user.name.clone();
        self.email = user.email.clone();
        self.age = user.age.to_string();
    }

    /// Clear the hidden id and all visible fields (create mode).
    pub fn reset(&mut self) {
        self.record_id = None;
        self.name.clear();
        self.email.clear();
        self.age.clear();
    }

    /// Build the write body: trim text fields, parse age.
    pub fn draft(&self) -> Result<UserDraft> {
        let age: u32 = self
            .age
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid age {:?}: {}", self.age, e))?;

        Ok(UserDraft {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            age,
        })
    }
}
