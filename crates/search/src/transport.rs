use crate::{Error, Payload, Request, Result};
use serde_json::{Map, Value};
use std::{future::Future, sync::Arc};

/// Sends search requests.
///
/// Implementations send exactly one request per call and return the decoded
/// JSON object. A non-success response should be returned as
/// [Error::Status] so that `405 Method Not Allowed` can be recognized.
pub trait Transport: Send + Sync {
    /// Sends a request and returns the response body.
    fn send(&self, request: &Request)
    -> impl Future<Output = Result<Map<String, Value>>> + Send;
}

/// A [Transport] backed by a [reqwest::Client].
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a new transport with a default client.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::HttpTransport;
    ///
    /// let transport = HttpTransport::new();
    /// ```
    pub fn new() -> HttpTransport {
        HttpTransport::default()
    }
}

impl From<reqwest::Client> for HttpTransport {
    fn from(client: reqwest::Client) -> HttpTransport {
        HttpTransport { client }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<Map<String, Value>> {
        let url = request.url_with_query()?;
        tracing::debug!("{} {}", request.method, url);
        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .headers(request.headers.clone());
        if let Payload::Json(body) = &request.payload {
            builder = builder.json(body);
        }
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                method: request.method.clone(),
                url,
                status,
                body,
            });
        }
        match response.json().await? {
            Value::Object(object) => Ok(object),
            value => Err(Error::NotAnObject(value)),
        }
    }
}

impl<T: Transport> Transport for Arc<T> {
    async fn send(&self, request: &Request) -> Result<Map<String, Value>> {
        T::send(self, request).await
    }
}
