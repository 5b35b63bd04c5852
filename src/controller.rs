//! View-sync controller: keeps the table in step with server state.
//!
//! Every operation is fail-silent: failures go to the transcript and the
//! previous view and form contents stay in place. No retries.

use crate::api::UserApi;
use crate::form::FormState;
use crate::transcript::Transcript;
use crate::view::TableView;

pub struct Controller<A: UserApi> {
    api: A,
    view: TableView,
    form: FormState,
}

impl<A: UserApi> Controller<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            view: TableView::new(),
            form: FormState::new(),
        }
    }

    pub fn view(&self) -> &TableView {
        &self.view
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    /// Fetch the full collection and replace the table body.
    ///
    /// On failure the previous table contents stay in place.
    pub fn load_users(&mut self, tx: &mut Transcript) {
        match self.api.list() {
            Ok(users) => {
                self.view.render(&users);
                tx.view_rendered(self.view.row_count()).ok();
            }
            Err(err) => {
                tx.op_error("list", &err.to_string()).ok();
            }
        }
    }

    /// Send the form: update when the hidden id is set, create otherwise.
    ///
    /// The response body is ignored; on success the form is reset and the
    /// list reloaded. On failure the form keeps its contents.
    pub fn submit_form(&mut self, tx: &mut Transcript) {
        let draft = match self.form.draft() {
            Ok(draft) => draft,
            Err(err) => {
                tx.op_error("submit", &err.to_string()).ok();
                return;
            }
        };

        let result = match self.form.record_id() {
            Some(id) => self.api.update(id, &draft),
            None => self.api.create(&draft),
        };

        match result {
            Ok(()) => {
                self.form.reset();
                self.load_users(tx);
            }
            Err(err) => {
                tx.op_error("submit", &err.to_string()).ok();
            }
        }
    }

    /// Fetch one record and populate the form for editing.
    pub fn edit_user(&mut self, id: u64, tx: &mut Transcript) {
        match self.api.fetch(id) {
            Ok(user) => {
                self.form.populate(&user);
                tx.record_loaded(id).ok();
            }
            Err(err) => {
                tx.op_error("fetch", &err.to_string()).ok();
            }
        }
    }

    /// Delete a record after confirmation, then reload the list.
    ///
    /// A declined confirmation issues no network call.
    pub fn delete_user<F>(&mut self, id: u64, confirm: F, tx: &mut Transcript)
    where
        F: FnOnce() -> bool,
    {
        if !confirm() {
            tx.delete_declined(id).ok();
            return;
        }

        match self.api.delete(id) {
            Ok(()) => self.load_users(tx),
            Err(err) => {
                tx.op_error("delete", &err.to_string()).ok();
            }
        }
    }

    /// Clear the form and restore create mode.
    pub fn reset_form(&mut self) {
        self.form.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{CREATE_LABEL, UPDATE_LABEL};
    use crate::model::{User, UserDraft};
    use anyhow::{anyhow, Result};
    use std::cell::{Cell, RefCell};

    /// Recording mock: tracks every call as "METHOD url" and serves a
    /// mutable in-memory collection.
    #[derive(Default)]
    struct MockApi {
        users: RefCell<Vec<User>>,
        calls: RefCell<Vec<String>>,
        fail_list: Cell<bool>,
    }

    impl MockApi {
        fn with_users(users: Vec<User>) -> Self {
            Self {
                users: RefCell::new(users),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl UserApi for MockApi {
        fn list(&self) -> Result<Vec<User>> {
            self.calls.borrow_mut().push("GET /api/users".to_string());
            if self.fail_list.get() {
                return Err(anyhow!("connection refused"));
            }
            Ok(self.users.borrow().clone())
        }

        fn fetch(&self, id: u64) -> Result<User> {
            self.calls
                .borrow_mut()
                .push(format!("GET /api/users/{}", id));
            self.users
                .borrow()
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .ok_or_else(|| anyhow!("API error 404: not found"))
        }

        fn create(&self, draft: &UserDraft) -> Result<()> {
            self.calls.borrow_mut().push("POST /api/users".to_string());
            let mut users = self.users.borrow_mut();
            let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
            users.push(User {
                id,
                name: draft.name.clone(),
                email: draft.email.clone(),
                age: draft.age,
            });
            Ok(())
        }

        fn update(&self, id: u64, draft: &UserDraft) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("PUT /api/users/{}", id));
            let mut users = self.users.borrow_mut();
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| anyhow!("API error 404: not found"))?;
            user.name = draft.name.clone();
            user.email = draft.email.clone();
            user.age = draft.age;
            Ok(())
        }

        fn delete(&self, id: u64) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("DELETE /api/users/{}", id));
            self.users.borrow_mut().retain(|u| u.id != id);
            Ok(())
        }
    }

    fn transcript(dir: &tempfile::TempDir) -> Transcript {
        Transcript::new(&dir.path().join("session.jsonl"), "test-session").unwrap()
    }

    fn sample_users() -> Vec<User> {
        vec![
            User {
                id: 1,
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                age: 30,
            },
            User {
                id: 2,
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                age: 41,
            },
        ]
    }

    #[test]
    fn test_load_renders_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = transcript(&dir);
        let mut ctl = Controller::new(MockApi::with_users(sample_users()));

        ctl.load_users(&mut tx);
        assert_eq!(ctl.view().row_count(), 2);
    }

    #[test]
    fn test_failed_load_keeps_previous_rows() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = transcript(&dir);
        let mut ctl = Controller::new(MockApi::with_users(sample_users()));

        ctl.load_users(&mut tx);
        assert_eq!(ctl.view().row_count(), 2);

        ctl.api.fail_list.set(true);
        ctl.load_users(&mut tx);
        assert_eq!(ctl.view().row_count(), 2);
    }

    #[test]
    fn test_submit_without_id_creates_then_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = transcript(&dir);
        let mut ctl = Controller::new(MockApi::with_users(sample_users()));

        ctl.form_mut().name = "Carol".to_string();
        ctl.form_mut().email = "carol@example.com".to_string();
        ctl.form_mut().age = "25".to_string();
        ctl.submit_form(&mut tx);

        assert_eq!(
            ctl.api.calls(),
            vec!["POST /api/users".to_string(), "GET /api/users".to_string()]
        );
        assert_eq!(ctl.view().row_count(), 3);
        assert!(ctl.view().to_string().contains("Carol"));
        assert_eq!(ctl.form().submit_label(), CREATE_LABEL);
    }

    #[test]
    fn test_submit_with_id_puts_to_record_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = transcript(&dir);
        let mut ctl = Controller::new(MockApi::with_users(sample_users()));

        ctl.edit_user(2, &mut tx);
        assert_eq!(ctl.form().submit_label(), UPDATE_LABEL);

        ctl.form_mut().age = "42".to_string();
        ctl.submit_form(&mut tx);

        let calls = ctl.api.calls();
        assert_eq!(calls[0], "GET /api/users/2");
        assert_eq!(calls[1], "PUT /api/users/2");
        assert_eq!(calls[2], "GET /api/users");
        // Submit resets the form back to create mode
        assert_eq!(ctl.form().submit_label(), CREATE_LABEL);
    }

    #[test]
    fn test_submit_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = transcript(&dir);
        let mut ctl = Controller::new(MockApi::default());

        ctl.form_mut().name = "  Dave ".to_string();
        ctl.form_mut().email = " dave@example.com  ".to_string();
        ctl.form_mut().age = " 33 ".to_string();
        ctl.submit_form(&mut tx);

        let users = ctl.api.users.borrow();
        assert_eq!(users[0].name, "Dave");
        assert_eq!(users[0].email, "dave@example.com");
        assert_eq!(users[0].age, 33);
    }

    #[test]
    fn test_submit_with_invalid_age_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = transcript(&dir);
        let mut ctl = Controller::new(MockApi::default());

        ctl.form_mut().name = "Eve".to_string();
        ctl.form_mut().email = "eve@example.com".to_string();
        ctl.form_mut().age = "unknown".to_string();
        ctl.submit_form(&mut tx);

        assert!(ctl.api.calls().is_empty());
        // Form keeps its contents for correction
        assert_eq!(ctl.form().name, "Eve");
    }

    #[test]
    fn test_declined_delete_issues_no_network_call() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = transcript(&dir);
        let mut ctl = Controller::new(MockApi::with_users(sample_users()));

        ctl.delete_user(1, || false, &mut tx);
        assert!(ctl.api.calls().is_empty());
    }

    #[test]
    fn test_confirmed_delete_deletes_then_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = transcript(&dir);
        let mut ctl = Controller::new(MockApi::with_users(sample_users()));

        ctl.delete_user(1, || true, &mut tx);
        assert_eq!(
            ctl.api.calls(),
            vec![
                "DELETE /api/users/1".to_string(),
                "GET /api/users".to_string()
            ]
        );
        assert_eq!(ctl.view().row_count(), 1);
    }

    #[test]
    fn test_failed_edit_leaves_form_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = transcript(&dir);
        let mut ctl = Controller::new(MockApi::with_users(sample_users()));

        ctl.edit_user(99, &mut tx);
        assert!(ctl.form().record_id().is_none());
        assert_eq!(ctl.form().submit_label(), CREATE_LABEL);
    }

    #[test]
    fn test_reset_form_restores_create_label() {
        let dir = tempfile::tempdir().unwrap();
        let mut tx = transcript(&dir);
        let mut ctl = Controller::new(MockApi::with_users(sample_users()));

        ctl.edit_user(1, &mut tx);
        assert_eq!(ctl.form().submit_label(), UPDATE_LABEL);
        ctl.reset_form();
        assert_eq!(ctl.form().submit_label(), CREATE_LABEL);
    }

    #[test]
    fn test_failures_are_logged_to_transcript() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let mut tx = Transcript::new(&path, "test-session").unwrap();

        let api = MockApi::default();
        api.fail_list.set(true);
        let mut ctl = Controller::new(api);
        ctl.load_users(&mut tx);

        let log = std::fs::read_to_string(&path).unwrap();
        assert!(log.contains("op_error"));
        assert!(log.contains("connection refused"));
    }
}
