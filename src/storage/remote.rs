use super::*;
use crate::errors::StorageError;
use reqwest::blocking::{self, RequestBuilder, Response};
use reqwest::StatusCode;
use url::Url;

const API_KEY_HEADER: &str = "x-api-key";

/// Networked document store reached over a small REST surface:
///
/// ```text
/// GET    {base}/users/{owner}/contacts
/// POST   {base}/users/{owner}/contacts
/// PUT    {base}/users/{owner}/contacts/{id}
/// DELETE {base}/users/{owner}/contacts/{id}
/// ```
pub struct RemoteStorage {
    pub base_url: Url,
    api_key: Option<String>,
    client: blocking::Client,
}

impl RemoteStorage {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            AppError::Validation(format!("Invalid remote storage URL '{}': {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "Remote storage URL '{}' cannot hold a path",
                base_url
            )));
        }

        Ok(Self {
            base_url,
            api_key,
            client: blocking::Client::new(),
        })
    }

    /// `{base}/users/{owner}/contacts[/{id}]`, with each segment percent-encoded.
    pub fn contacts_url(&self, owner: &str, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .push("users")
                .push(owner)
                .push("contacts");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    fn send_json(&self, request: RequestBuilder, contact: &Contact) -> Result<Response, AppError> {
        let response = self.authorized(request).json(contact).send()?;
        Ok(response)
    }
}

fn ensure_success(response: Response) -> Result<Response, AppError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(AppError::Storage(StorageError::Status(
            response.status().as_u16(),
        )))
    }
}

/// Maps 404 to `false`; any other failure is a storage error.
fn found(response: Response) -> Result<bool, AppError> {
    if response.status() == StatusCode::NOT_FOUND {
        return Ok(false);
    }
    ensure_success(response).map(|_| true)
}

impl ContactStorage for RemoteStorage {
    fn medium(&self) -> &str {
        "remote"
    }

    fn scan(&self, owner: &str) -> Result<Vec<Contact>, AppError> {
        let url = self.contacts_url(owner, None);
        let response = self.authorized(self.client.get(url)).send()?;

        // an owner the store has never seen
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let body = ensure_success(response)?.text()?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&body)?)
    }

    fn insert(&self, owner: &str, contact: &Contact) -> Result<(), AppError> {
        let url = self.contacts_url(owner, None);
        let response = self.send_json(self.client.post(url), contact)?;
        ensure_success(response)?;
        Ok(())
    }

    fn update(&self, owner: &str, contact: &Contact) -> Result<bool, AppError> {
        let url = self.contacts_url(owner, Some(&contact.id));
        let response = self.send_json(self.client.put(url), contact)?;
        found(response)
    }

    fn remove(&self, owner: &str, id: &str) -> Result<bool, AppError> {
        let url = self.contacts_url(owner, Some(id));
        let response = self.authorized(self.client.delete(url)).send()?;
        found(response)
    }
}
