//! Scripted transport shared by the service and query unit tests.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::api::{ApiClient, AuthMode, HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::session::SessionStore;

#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    hold: Mutex<Option<mpsc::Receiver<()>>>,
}

impl ScriptedTransport {
    pub(crate) fn reply(&self, status: u32, body: Value) -> &Self {
        let body = if body.is_null() {
            Vec::new()
        } else {
            body.to_string().into_bytes()
        };
        self.replies
            .lock()
            .unwrap()
            .push_back(HttpResponse { status, body });
        self
    }

    /// Block the next request until the returned sender fires (or is dropped).
    pub(crate) fn hold_next(&self) -> mpsc::Sender<()> {
        let (release, held) = mpsc::channel();
        *self.hold.lock().unwrap() = Some(held);
        release
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn last(&self) -> HttpRequest {
        self.requests().pop().expect("no request sent")
    }
}

impl HttpTransport for ScriptedTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        let held = self.hold.lock().unwrap().take();
        if let Some(held) = held {
            let _ = held.recv();
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Other(format!("unscripted request to {}", request.url)))
    }
}

pub(crate) fn client() -> (ApiClient, Arc<ScriptedTransport>) {
    let transport = Arc::new(ScriptedTransport::default());
    let session = SessionStore::in_memory();
    session.set_tokens("token-1", Some("refresh-1")).unwrap();
    let client = ApiClient::new(
        "http://ims.test/api",
        transport.clone(),
        session,
        AuthMode::Refreshing,
    );
    (client, transport)
}
