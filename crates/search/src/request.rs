use crate::{Error, GetParameters, Parameters, Result};
use http::{
    HeaderMap, HeaderName, HeaderValue, Method,
    header::{ACCEPT, USER_AGENT},
};
use serde_json::{Map, Value};
use url::{Url, form_urlencoded};

/// How to pick the method of a search when none is given explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MethodSelection {
    /// Use `POST` if the search has an `intersects` filter, `GET` otherwise.
    #[default]
    PostIfIntersects,

    /// Always use `POST`.
    Post,
}

/// The parameters of a search request, in the form its method requires.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Query string parameters, for `GET` requests.
    Query(GetParameters),

    /// JSON body, for `POST` requests.
    Json(Map<String, Value>),
}

/// A single search request.
#[derive(Clone, Debug)]
pub struct Request {
    /// The request method, either `GET` or `POST`.
    pub method: Method,

    /// The url, without the parameters in [Request::payload].
    pub url: Url,

    /// The request headers.
    pub headers: HeaderMap,

    /// The search parameters.
    pub payload: Payload,
}

/// Builds search [Request]s against a single endpoint.
#[derive(Clone, Debug)]
pub struct RequestBuilder {
    url: Url,
    headers: HeaderMap,
}

/// Returns the headers sent with every search.
///
/// # Examples
///
/// ```
/// let headers = stac_search::default_headers();
/// assert!(headers.contains_key("user-agent"));
/// ```
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let _ = headers.insert(USER_AGENT, HeaderValue::from_static(crate::user_agent()));
    let _ = headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/geo+json, application/json"),
    );
    headers
}

/// Inserts headers into a header map, replacing any existing values for the same name.
pub(crate) fn merge_headers<I, K, V>(headers: &mut HeaderMap, other: I) -> Result<()>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (name, value) in other {
        let name = HeaderName::from_bytes(name.as_ref().as_bytes())?;
        let value = HeaderValue::from_str(value.as_ref())?;
        let _ = headers.insert(name, value);
    }
    Ok(())
}

/// Checks that a method can be used for a search.
pub(crate) fn search_method(method: Method) -> Result<Method> {
    if method == Method::GET || method == Method::POST {
        Ok(method)
    } else {
        Err(Error::UnsupportedMethod(method.to_string()))
    }
}

impl MethodSelection {
    /// Picks a method for these parameters.
    ///
    /// # Examples
    ///
    /// ```
    /// use http::Method;
    /// use stac_search::{MethodSelection, Parameters};
    ///
    /// let parameters = Parameters::default();
    /// assert_eq!(MethodSelection::PostIfIntersects.select(&parameters), Method::GET);
    /// assert_eq!(MethodSelection::Post.select(&parameters), Method::POST);
    /// ```
    pub fn select(&self, parameters: &Parameters) -> Method {
        match self {
            MethodSelection::Post => Method::POST,
            MethodSelection::PostIfIntersects => {
                if parameters.intersects.is_some() {
                    Method::POST
                } else {
                    Method::GET
                }
            }
        }
    }
}

impl Request {
    /// Returns the JSON body, if this is a `POST` request.
    pub fn json(&self) -> Option<&Map<String, Value>> {
        match &self.payload {
            Payload::Json(body) => Some(body),
            Payload::Query(_) => None,
        }
    }

    /// Returns the query parameters, if this is a `GET` request.
    pub fn query(&self) -> Option<&GetParameters> {
        match &self.payload {
            Payload::Query(parameters) => Some(parameters),
            Payload::Json(_) => None,
        }
    }

    /// Returns the url to send this request to.
    ///
    /// For `GET` requests, the query parameters replace any parameters of the
    /// same name that are already on the url.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::{Parameters, RequestBuilder};
    /// use http::Method;
    ///
    /// let builder = RequestBuilder::new("http://stac.test/search?limit=1&token=abc".parse().unwrap());
    /// let parameters = Parameters::new().limit(10).unwrap();
    /// let request = builder.build(&parameters, Method::GET).unwrap();
    /// assert_eq!(
    ///     request.url_with_query().unwrap().as_str(),
    ///     "http://stac.test/search?token=abc&limit=10"
    /// );
    /// ```
    pub fn url_with_query(&self) -> Result<Url> {
        let parameters = match &self.payload {
            Payload::Query(parameters) if !parameters.is_empty() => parameters,
            _ => return Ok(self.url.clone()),
        };
        let query = serde_urlencoded::to_string(parameters)?;
        let new: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        let existing: Vec<(String, String)> = self
            .url
            .query_pairs()
            .into_owned()
            .filter(|(key, _)| !new.iter().any(|(name, _)| name == key))
            .collect();
        let mut url = self.url.clone();
        let _ = url
            .query_pairs_mut()
            .clear()
            .extend_pairs(existing)
            .extend_pairs(new);
        Ok(url)
    }
}

impl RequestBuilder {
    /// Creates a new request builder for a search endpoint, with the [default_headers].
    pub fn new(url: Url) -> RequestBuilder {
        RequestBuilder {
            url,
            headers: default_headers(),
        }
    }

    /// Adds headers to every request, replacing existing headers with the same name.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::RequestBuilder;
    ///
    /// let builder = RequestBuilder::new("http://stac.test/search".parse().unwrap())
    ///     .headers([("x-api-key", "an-api-key"), ("user-agent", "my-agent")])
    ///     .unwrap();
    /// assert_eq!(builder.header_map()["user-agent"], "my-agent");
    /// ```
    pub fn headers<I, K, V>(mut self, headers: I) -> Result<RequestBuilder>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        merge_headers(&mut self.headers, headers)?;
        Ok(self)
    }

    /// Returns the search endpoint url.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the headers sent with each request.
    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// Builds a request.
    ///
    /// `POST` requests carry the parameters as a JSON body, `GET` requests as
    /// query parameters.
    pub fn build(&self, parameters: &Parameters, method: Method) -> Result<Request> {
        let method = search_method(method)?;
        let payload = if method == Method::POST {
            Payload::Json(parameters.to_json()?)
        } else {
            Payload::Query(parameters.try_into()?)
        };
        Ok(Request {
            method,
            url: self.url.clone(),
            headers: self.headers.clone(),
            payload,
        })
    }
}
