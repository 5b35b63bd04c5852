//! Text table rendering of the user collection.
//!
//! The view owns no data of its own: every render is a full replace of the
//! rows from the latest fetch. A failed refresh never reaches `render`, so
//! the previous contents stay on screen.

use crate::model::User;
use std::fmt;

#[derive(Debug, Clone)]
struct Row {
    id: u64,
    name: String,
    email: String,
    age: u32,
}

#[derive(Debug, Default)]
pub struct TableView {
    rows: Vec<Row>,
}

const HEADERS: [&str; 5] = ["id", "name", "email", "age", "actions"];

impl TableView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the table body with one row per record.
    pub fn render(&mut self, users: &[User]) {
        self.rows = users
            .iter()
            .map(|u| Row {
                id: u.id,
                name: u.name.clone(),
                email: u.email.clone(),
                age: u.age,
            })
            .collect();
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Column widths track the widest cell, headers included.
        let mut id_w = HEADERS[0].len();
        let mut name_w = HEADERS[1].len();
        let mut email_w = HEADERS[2].len();
        let mut age_w = HEADERS[3].len();

        for row in &self.rows {
            id_w = id_w.max(row.id.to_string().len());
            name_w = name_w.max(row.name.len());
            email_w = email_w.max(row.email.len());
            age_w = age_w.max(row.age.to_string().len());
        }

        writeln!(
            f,
            "{:<id_w$}  {:<name_w$}  {:<email_w$}  {:<age_w$}  {}",
            HEADERS[0], HEADERS[1], HEADERS[2], HEADERS[3], HEADERS[4],
        )?;

        for row in &self.rows {
            writeln!(
                f,
                "{:<id_w$}  {:<name_w$}  {:<email_w$}  {:<age_w$}  edit {id} | delete {id}",
                row.id,
                row.name,
                row.email,
                row.age,
                id = row.id,
            )?;
        }

        if self.rows.is_empty() {
            writeln!(f, "(no users)")?;
        }

        Ok(())
    }
}
