use crate::model::{User, UserDraft};
use anyhow::{anyhow, Result};

/// Trait for the REST collaborator to allow mocking and abstraction
pub trait UserApi {
    fn list(&self) -> Result<Vec<User>>;
    fn fetch(&self, id: u64) -> Result<User>;
    fn create(&self, draft: &UserDraft) -> Result<()>;
    fn update(&self, id: u64, draft: &UserDraft) -> Result<()>;
    fn delete(&self, id: u64) -> Result<()>;
}

pub struct HttpClient {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::Agent::new(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/users", self.base_url)
    }

    fn record_url(&self, id: u64) -> String {
        format!("{}/api/users/{}", self.base_url, id)
    }

    /// Send a write and discard the response body.
    fn send_write(&self, method: &str, url: &str, draft: &UserDraft) -> Result<()> {
        let resp = self
            .agent
            .request(method, url)
            .set("Content-Type", "application/json")
            .send_json(serde_json::to_value(draft)?);

        match resp {
            Ok(r) => {
                r.into_string().ok();
                Ok(())
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(anyhow!("API error {}: {}", code, body))
            }
            Err(e) => Err(anyhow!("Request failed: {}", e)),
        }
    }
}

impl UserApi for HttpClient {
    fn list(&self) -> Result<Vec<User>> {
        let resp = self.agent.get(&self.collection_url()).call();

        match resp {
            Ok(r) => {
                let users: Vec<User> = r.into_json()?;
                Ok(users)
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(anyhow!("API error {}: {}", code, body))
            }
            Err(e) => Err(anyhow!("Request failed: {}", e)),
        }
    }

    fn fetch(&self, id: u64) -> Result<User> {
        let resp = self.agent.get(&self.record_url(id)).call();

        match resp {
            Ok(r) => {
                let user: User = r.into_json()?;
                Ok(user)
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(anyhow!("API error {}: {}", code, body))
            }
            Err(e) => Err(anyhow!("Request failed: {}", e)),
        }
    }

    fn create(&self, draft: &UserDraft) -> Result<()> {
        self.send_write("POST", &self.collection_url(), draft)
    }

    fn update(&self, id: u64, draft: &UserDraft) -> Result<()> {
        self.send_write("PUT", &self.record_url(id), draft)
    }

    fn delete(&self, id: u64) -> Result<()> {
        let resp = self.agent.delete(&self.record_url(id)).call();

        match resp {
            Ok(r) => {
                r.into_string().ok();
                Ok(())
            }
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                Err(anyhow!("API error {}: {}", code, body))
            }
            Err(e) => Err(anyhow!("Request failed: {}", e)),
        }
    }
}
