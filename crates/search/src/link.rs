use crate::{Error, GetParameters, Page, Payload, Request, Result};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const NEXT_REL: &str = "next";

/// A link from a search result page.
///
/// Paging links may carry a method, headers, and a body, as described by the
/// [STAC API item search pagination rules](https://github.com/radiantearth/stac-api-spec/tree/main/item-search#pagination).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// The link target.
    pub href: String,

    /// The relationship between this link's target and the page.
    pub rel: String,

    /// Media type of the target.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,

    /// The HTTP method to use to follow this link, `GET` if not set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Headers to send when following this link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,

    /// The body to send when following this link with `POST`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,

    /// If true, [Link::body] is merged over the previous request's body.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub merge: bool,

    /// Additional fields.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

/// Builds the request for the next page of results.
///
/// Closures with the signature `Fn(&Request, &Page) -> Result<Option<Request>>`
/// implement this trait.
pub trait Resolve: Send + Sync {
    /// Returns the request for the page after `page`, or `None` if `page` was the last one.
    fn resolve(&self, request: &Request, page: &Page) -> Result<Option<Request>>;
}

/// Follows a page's `next` link.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultResolver;

impl Link {
    /// Creates a new link.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::Link;
    ///
    /// let link = Link::new("http://stac.test/search?page=2", "next");
    /// assert!(link.is_next());
    /// ```
    pub fn new(href: impl ToString, rel: impl ToString) -> Link {
        Link {
            href: href.to_string(),
            rel: rel.to_string(),
            r#type: None,
            method: None,
            headers: None,
            body: None,
            merge: false,
            additional_fields: Map::new(),
        }
    }

    /// Sets the method of this link.
    pub fn method(mut self, method: impl ToString) -> Link {
        self.method = Some(method.to_string());
        self
    }

    /// Sets the body of this link.
    pub fn body(mut self, body: Map<String, Value>) -> Link {
        self.body = Some(body);
        self
    }

    /// Returns true if this is a `next` link.
    pub fn is_next(&self) -> bool {
        self.rel == NEXT_REL
    }

    fn http_method(&self) -> Result<Method> {
        match self.method.as_deref().map(str::to_ascii_uppercase).as_deref() {
            None | Some("GET") => Ok(Method::GET),
            Some("POST") => Ok(Method::POST),
            Some(method) => Err(Error::UnsupportedMethod(method.to_string())),
        }
    }
}

impl<F> Resolve for F
where
    F: Fn(&Request, &Page) -> Result<Option<Request>> + Send + Sync,
{
    fn resolve(&self, request: &Request, page: &Page) -> Result<Option<Request>> {
        self(request, page)
    }
}

impl Resolve for DefaultResolver {
    fn resolve(&self, request: &Request, page: &Page) -> Result<Option<Request>> {
        let Some(link) = page.next_link() else {
            return Ok(None);
        };
        let method = link.http_method()?;
        let url = request.url.join(&link.href)?;
        let mut headers = request.headers.clone();
        if let Some(link_headers) = &link.headers {
            crate::request::merge_headers(
                &mut headers,
                link_headers.iter().map(|(name, value)| {
                    let value = match value {
                        Value::String(s) => s.clone(),
                        value => value.to_string(),
                    };
                    (name, value)
                }),
            )?;
        }
        let payload = if method == Method::POST {
            let mut body = if link.merge {
                request.json().cloned().unwrap_or_default()
            } else {
                Map::new()
            };
            if let Some(link_body) = &link.body {
                body.extend(link_body.clone());
            }
            Payload::Json(body)
        } else {
            Payload::Query(GetParameters::default())
        };
        tracing::debug!("following next link: {method} {url}");
        Ok(Some(Request {
            method,
            url,
            headers,
            payload,
        }))
    }
}
