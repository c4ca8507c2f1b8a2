use crate::{Error, Request, Result, Transport};
use http::{Method, StatusCode};
use serde_json::{Map, Value, json};
use std::{collections::VecDeque, ops::Range, sync::Mutex};

/// A transport that replays canned responses and records every request.
pub(crate) struct MockTransport {
    responses: Mutex<VecDeque<Result<Map<String, Value>>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub(crate) fn new(
        responses: impl IntoIterator<Item = Result<Map<String, Value>>>,
    ) -> MockTransport {
        MockTransport {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn urls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| request.url_with_query().unwrap().to_string())
            .collect()
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: &Request) -> Result<Map<String, Value>> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no more canned responses")
    }
}

/// A page with items `item-{start}` to `item-{end - 1}`.
pub(crate) fn page(ids: Range<usize>, next: Option<&str>) -> Map<String, Value> {
    let features: Vec<Value> = ids.map(|i| json!({"id": format!("item-{i}")})).collect();
    let mut links = vec![json!({"href": "http://stac.test/search", "rel": "self"})];
    if let Some(next) = next {
        links.push(json!({"href": next, "rel": "next"}));
    }
    let value = json!({
        "type": "FeatureCollection",
        "features": features,
        "links": links,
    });
    value.as_object().cloned().unwrap()
}

pub(crate) fn method_not_allowed() -> Error {
    Error::Status {
        method: Method::POST,
        url: "http://stac.test/search".parse().unwrap(),
        status: StatusCode::METHOD_NOT_ALLOWED,
        body: String::new(),
    }
}
