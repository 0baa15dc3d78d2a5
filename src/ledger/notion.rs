//! Notion-compatible ledger client
//!
//! Records are pages in a per-document-type database:
//! - create: `POST {base}/pages`
//! - delete: `PATCH {base}/pages/{id}` with `{"archived": true}`
//! - schema: `GET {base}/databases/{id}` (used by `folio doctor`)
//!
//! A TLS certificate verification failure is retried once with verification disabled.

use super::{Ledger, LedgerEntry, RecordId};
use crate::core::config::{LedgerConfig, ReleaseConfig};
use crate::core::error::{FolioError, FolioResult, LedgerError};
use crate::release::DocType;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde_json::{Value, json};
use std::collections::HashMap;

/// Database properties every record writes, with their Notion types
pub const REQUIRED_PROPERTIES: [(&str, &str); 4] = [
  ("Name", "title"),
  ("Created Time", "date"),
  ("Device", "select"),
  ("Commit message", "rich_text"),
];

/// Properties written when present in the database
pub const OPTIONAL_PROPERTIES: [(&str, &str); 2] = [("Git Branch", "rich_text"), ("Commit ID", "rich_text")];

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// HTTP ledger client
pub struct NotionLedger {
  settings: Option<LedgerConfig>,
  databases: HashMap<DocType, String>,
  device: String,
  client: Client,
}

impl NotionLedger {
  /// Build a client from folio.toml; an absent `[ledger]` table yields a client that
  /// skips every record
  pub fn from_config(config: &ReleaseConfig) -> FolioResult<Self> {
    let databases = DocType::ALL
      .into_iter()
      .filter_map(|doc_type| config.ledger_database(doc_type).map(|id| (doc_type, id.to_string())))
      .collect();

    Ok(Self {
      settings: config.ledger.clone().filter(|l| !l.token.trim().is_empty()),
      databases,
      device: config.device_label().to_string(),
      client: build_client(false)
        .map_err(|e| FolioError::message(format!("Failed to create HTTP client: {}", describe(&e))))?,
    })
  }

  /// Database id configured for a document type
  pub fn database_for(&self, doc_type: DocType) -> Option<&str> {
    self.databases.get(&doc_type).map(String::as_str)
  }

  /// Fetch a database description (its `properties` map drives schema checks)
  pub fn fetch_database(&self, database_id: &str) -> Result<Value, LedgerError> {
    let settings = self.settings()?;
    let url = format!("{}/databases/{}", base(settings), database_id);
    let response = self.send(|client| authorized(client.get(&url), settings))?;
    let response = check_status(response)?;
    response
      .json::<Value>()
      .map_err(|e| LedgerError::MalformedResponse(describe(&e)))
  }

  fn settings(&self) -> Result<&LedgerConfig, LedgerError> {
    self
      .settings
      .as_ref()
      .ok_or_else(|| LedgerError::Transport("ledger is not configured".to_string()))
  }

  /// Send, retrying once without certificate verification on a TLS failure
  fn send<F>(&self, request: F) -> Result<Response, LedgerError>
  where
    F: Fn(&Client) -> RequestBuilder,
  {
    with_tls_fallback(|verification| match verification {
      Verification::Verified => request(&self.client).send(),
      Verification::Unverified => request(&build_client(true)?).send(),
    })
  }
}

impl Ledger for NotionLedger {
  fn is_configured(&self, doc_type: DocType) -> bool {
    self.settings.is_some() && self.databases.contains_key(&doc_type)
  }

  fn create_record(&self, doc_type: DocType, entry: &LedgerEntry) -> FolioResult<Option<RecordId>> {
    let (Some(settings), Some(database_id)) = (self.settings.as_ref(), self.database_for(doc_type)) else {
      println!("ℹ️  Ledger not configured for {}. Skipping ledger record.", doc_type);
      return Ok(None);
    };

    let url = format!("{}/pages", base(settings));
    let body = record_body(database_id, &self.device, entry);
    let response = self.send(|client| authorized(client.post(&url), settings).json(&body))?;
    let response = check_status(response)?;

    let payload: Value = response
      .json()
      .map_err(|e| LedgerError::MalformedResponse(describe(&e)))?;
    let id = payload
      .get("id")
      .and_then(Value::as_str)
      .ok_or_else(|| LedgerError::MalformedResponse("missing \"id\" in created record".to_string()))?;

    tracing::info!(record = id, version = %entry.version, "created ledger record");
    Ok(Some(RecordId::new(id)))
  }

  fn delete_record(&self, id: &RecordId) -> FolioResult<()> {
    let settings = self.settings().map_err(FolioError::Ledger)?;
    let url = format!("{}/pages/{}", base(settings), id);
    let body = json!({ "archived": true });
    let response = self.send(|client| authorized(client.patch(&url), settings).json(&body))?;

    if response.status() == StatusCode::NOT_FOUND {
      tracing::info!(record = %id, "ledger record already gone");
      return Ok(());
    }

    check_status(response)?;
    tracing::info!(record = %id, "archived ledger record");
    Ok(())
  }
}

fn build_client(accept_invalid_certs: bool) -> reqwest::Result<Client> {
  Client::builder()
    .user_agent(USER_AGENT)
    .danger_accept_invalid_certs(accept_invalid_certs)
    .build()
}

/// Certificate checking for one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verification {
  Verified,
  Unverified,
}

/// Run `attempt` verified; on a certificate failure, run it once more unverified
fn with_tls_fallback<T, E>(mut attempt: impl FnMut(Verification) -> Result<T, E>) -> Result<T, LedgerError>
where
  E: std::error::Error + 'static,
{
  match attempt(Verification::Verified) {
    Ok(value) => Ok(value),
    Err(err) if is_certificate_error(&err) => {
      tracing::warn!(error = %describe(&err), "TLS verification failed; retrying with an unverified connection");
      println!("⚠️  TLS verification failed, retrying without certificate verification");
      attempt(Verification::Unverified)
        .map_err(|e| LedgerError::Transport(format!("unverified retry failed: {}", describe(&e))))
    }
    Err(err) => Err(LedgerError::Transport(describe(&err))),
  }
}

fn base(settings: &LedgerConfig) -> &str {
  settings.base_url.trim_end_matches('/')
}

fn authorized(builder: RequestBuilder, settings: &LedgerConfig) -> RequestBuilder {
  builder
    .bearer_auth(&settings.token)
    .header("Notion-Version", &settings.api_version)
}

fn check_status(response: Response) -> Result<Response, LedgerError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  if status == StatusCode::UNAUTHORIZED {
    return Err(LedgerError::Unauthorized);
  }

  let body = response.text().unwrap_or_default();
  Err(LedgerError::Status {
    code: status.as_u16(),
    body,
  })
}

/// JSON body of a new ledger page
pub fn record_body(database_id: &str, device: &str, entry: &LedgerEntry) -> Value {
  json!({
    "parent": { "database_id": database_id },
    "properties": {
      "Name": { "title": [ { "text": { "content": entry.version } } ] },
      "Created Time": { "date": { "start": entry.created_at.format("%Y-%m-%dT%H:%M:%S").to_string() } },
      "Device": { "select": { "name": device } },
      "Commit message": { "rich_text": [ { "text": { "content": entry.message } } ] },
      "Git Branch": { "rich_text": [ { "text": { "content": entry.branch } } ] },
      "Commit ID": { "rich_text": [ { "text": { "content": entry.commit } } ] },
    }
  })
}

/// Walk the source chain looking for a certificate verification failure
fn is_certificate_error(err: &(dyn std::error::Error + 'static)) -> bool {
  let mut source = Some(err);
  while let Some(e) = source {
    let text = e.to_string().to_ascii_lowercase();
    if text.contains("certificate") || text.contains("unknownissuer") || text.contains("self signed") {
      return true;
    }
    source = e.source();
  }
  false
}

/// reqwest's Display hides the interesting part in the source chain
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
  let mut parts = vec![err.to_string()];
  let mut source = err.source();
  while let Some(e) = source {
    parts.push(e.to_string());
    source = e.source();
  }
  parts.join(": ")
}

#[cfg(test)]
#[path = "../../tests/support/mock_ledger.rs"]
pub(crate) mod testing;
