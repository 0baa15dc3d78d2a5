//! Scripted Notion-style ledger for tests
//!
//! An axum app on its own tokio runtime thread, so the blocking ledger client (and the
//! folio binary) can talk to it from synchronous tests. Every request is recorded, then
//! answered with the next scripted `(status, body)`.

#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::thread;
use tokio::sync::oneshot;

/// One request as the ledger saw it
#[derive(Debug, Clone)]
pub struct SeenRequest {
  pub method: String,
  pub path: String,
  pub headers: Vec<(String, String)>,
  pub body: String,
}

impl SeenRequest {
  /// Header value by case-insensitive name
  pub fn header(&self, name: &str) -> Option<&str> {
    self
      .headers
      .iter()
      .find(|(k, _)| k.eq_ignore_ascii_case(name))
      .map(|(_, v)| v.as_str())
  }
}

#[derive(Clone)]
struct MockState {
  responses: Arc<Mutex<VecDeque<(u16, &'static str)>>>,
  requests: Arc<Mutex<Vec<SeenRequest>>>,
}

pub struct MockLedger {
  /// Base URL to put in `[ledger] base_url`
  pub url: String,
  requests: Arc<Mutex<Vec<SeenRequest>>>,
  shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockLedger {
  /// Serve `responses` in order; requests past the script get a 500
  pub fn start(responses: Vec<(u16, &'static str)>) -> std::io::Result<Self> {
    let state = MockState {
      responses: Arc::new(Mutex::new(responses.into())),
      requests: Arc::new(Mutex::new(Vec::new())),
    };
    let requests = Arc::clone(&state.requests);
    let app = Router::new().fallback(respond).with_state(state);

    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    listener.set_nonblocking(true)?;
    let url = format!("http://{}", listener.local_addr()?);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    thread::spawn(move || {
      runtime.block_on(async move {
        let Ok(listener) = tokio::net::TcpListener::from_std(listener) else {
          return;
        };
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
          let _ = shutdown_rx.await;
        });
        let _ = server.await;
      });
    });

    Ok(Self {
      url,
      requests,
      shutdown_tx: Some(shutdown_tx),
    })
  }

  /// Requests received so far, oldest first
  pub fn requests(&self) -> Vec<SeenRequest> {
    self.requests.lock().map(|r| r.clone()).unwrap_or_default()
  }
}

impl Drop for MockLedger {
  fn drop(&mut self) {
    if let Some(tx) = self.shutdown_tx.take() {
      let _ = tx.send(());
    }
  }
}

async fn respond(
  State(state): State<MockState>,
  method: Method,
  uri: Uri,
  headers: HeaderMap,
  body: String,
) -> Response {
  let seen = SeenRequest {
    method: method.to_string(),
    path: uri.path().to_string(),
    headers: headers
      .iter()
      .map(|(name, value)| (name.to_string(), value.to_str().unwrap_or_default().to_string()))
      .collect(),
    body,
  };
  if let Ok(mut requests) = state.requests.lock() {
    requests.push(seen);
  }

  let next = state.responses.lock().ok().and_then(|mut r| r.pop_front());
  let (status, body) = next.unwrap_or((500, r#"{"code":"no_scripted_response"}"#));
  let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

  (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
