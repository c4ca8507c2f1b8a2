use http::{Method, StatusCode};
use thiserror::Error;
use url::Url;

/// Error enum for crate-specific errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The search endpoint did not include `numberMatched` in its response, so
    /// it can't count matching items.
    #[error("the server does not report numberMatched")]
    CountNotSupported,

    /// This value can't be converted to a bounding box.
    #[error("invalid bbox: {0}")]
    InvalidBbox(String),

    /// This value can't be converted to a datetime or datetime interval.
    #[error("invalid datetime: {0}")]
    InvalidDatetime(String),

    /// [http::header::InvalidHeaderName]
    #[error(transparent)]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    /// [http::header::InvalidHeaderValue]
    #[error(transparent)]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    /// This value is not a GeoJSON-like object.
    #[error("invalid intersects: {0}")]
    InvalidIntersects(String),

    /// The per-page limit must be a positive integer.
    #[error("invalid limit: {0}")]
    InvalidLimit(u64),

    /// This is not a JSON object.
    #[error("json value is not an object")]
    NotAnObject(serde_json::Value),

    /// [reqwest::Error]
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// [serde_urlencoded::ser::Error]
    #[error(transparent)]
    SerdeUrlencoded(#[from] serde_urlencoded::ser::Error),

    /// The server responded with a non-success status code.
    #[error("{method} {url} returned {status}")]
    Status {
        /// The request method.
        method: Method,

        /// The request url, including any query string.
        url: Url,

        /// The response status.
        status: StatusCode,

        /// The response body, if it could be read.
        body: String,
    },

    /// Searches can only be sent with `GET` or `POST`.
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// [url::ParseError]
    #[error(transparent)]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Returns true if the server rejected the request method with `405 Method Not Allowed`.
    ///
    /// # Examples
    ///
    /// ```
    /// use http::{Method, StatusCode};
    /// use stac_search::Error;
    ///
    /// let error = Error::Status {
    ///     method: Method::POST,
    ///     url: "http://stac.test/search".parse().unwrap(),
    ///     status: StatusCode::METHOD_NOT_ALLOWED,
    ///     body: String::new(),
    /// };
    /// assert!(error.is_method_not_allowed());
    /// assert!(!Error::CountNotSupported.is_method_not_allowed());
    /// ```
    pub fn is_method_not_allowed(&self) -> bool {
        matches!(self, Error::Status { status, .. } if *status == StatusCode::METHOD_NOT_ALLOWED)
    }

    /// Returns true if this error came from a search parameter that couldn't
    /// be put into its canonical form.
    pub fn is_malformed_parameter(&self) -> bool {
        matches!(
            self,
            Error::InvalidBbox(_)
                | Error::InvalidDatetime(_)
                | Error::InvalidHeaderName(_)
                | Error::InvalidHeaderValue(_)
                | Error::InvalidIntersects(_)
                | Error::InvalidLimit(_)
                | Error::SerdeJson(_)
                | Error::UnsupportedMethod(_)
                | Error::UrlParse(_)
        )
    }
}
