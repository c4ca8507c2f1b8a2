use crate::{
    Bbox, DefaultResolver, Error, GetParameters, HttpTransport, Intersects, IntoBbox,
    IntoCollections, IntoDatetime, IntoIds, IntoIntersects, Item, MethodSelection, Page,
    Parameters, Request, RequestBuilder, Resolve, Result, Transport, stream_pages,
};
use async_stream::try_stream;
use futures::{Stream, StreamExt, pin_mut};
use http::{HeaderMap, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt::{Debug, Formatter};
use url::Url;

/// A deferred item search.
///
/// Nothing is sent to the server until one of the streams returned by
/// [ItemSearch::pages], [ItemSearch::records], or [ItemSearch::items] is
/// polled, or [ItemSearch::matched] is awaited.
///
/// If a `POST` search is rejected with `405 Method Not Allowed`,
/// [ItemSearch::records] switches the search to `GET` and starts over. The
/// switch happens at most once and sticks for the life of the search.
///
/// An `ItemSearch` is meant to be used by one consumer at a time.
/// [ItemSearch::records] borrows it mutably for as long as the stream lives.
///
/// # Examples
///
/// ```no_run
/// use futures::TryStreamExt;
/// use stac_search::ItemSearch;
///
/// let mut search = ItemSearch::builder("https://planetarycomputer.microsoft.com/api/stac/v1/search")
///     .collections("sentinel-2-l2a")
///     .bbox("-105.1,41.1,-105.0,41.2")
///     .datetime("2023-06-01T00:00:00Z/..")
///     .max_items(10)
///     .build()
///     .unwrap();
/// # tokio_test::block_on(async {
/// let items: Vec<_> = search.items().try_collect().await.unwrap();
/// assert!(items.len() <= 10);
/// # })
/// ```
pub struct ItemSearch<T = HttpTransport> {
    template: RequestBuilder,
    parameters: Parameters,
    method: Method,
    max_items: Option<usize>,
    conformance: Vec<String>,
    transport: T,
    resolver: Box<dyn Resolve>,
}

/// Configures an [ItemSearch].
///
/// Parameter values are normalized as they are set. Any value that can't be
/// normalized is reported by [Builder::build].
pub struct Builder<T = HttpTransport> {
    url: String,
    method: Option<Method>,
    method_selection: MethodSelection,
    max_items: Option<usize>,
    limit: Option<u64>,
    bbox: Option<Result<Bbox>>,
    datetime: Option<Result<String>>,
    ids: Option<Vec<String>>,
    collections: Option<Vec<String>>,
    intersects: Option<Result<Intersects>>,
    headers: Vec<(String, String)>,
    conformance: Vec<String>,
    transport: T,
    resolver: Box<dyn Resolve>,
}

impl ItemSearch<HttpTransport> {
    /// Starts configuring a search against an item search endpoint.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::ItemSearch;
    ///
    /// let search = ItemSearch::builder("http://stac.test/search").build().unwrap();
    /// assert_eq!(search.method(), http::Method::GET);
    /// ```
    pub fn builder(url: impl ToString) -> Builder<HttpTransport> {
        Builder {
            url: url.to_string(),
            method: None,
            method_selection: MethodSelection::default(),
            max_items: None,
            limit: None,
            bbox: None,
            datetime: None,
            ids: None,
            collections: None,
            intersects: None,
            headers: Vec::new(),
            conformance: Vec::new(),
            transport: HttpTransport::new(),
            resolver: Box::new(DefaultResolver),
        }
    }
}

impl<T: Transport> Builder<T> {
    /// Sets the method, overriding [Builder::method_selection].
    ///
    /// Only `GET` and `POST` are supported.
    pub fn method(mut self, method: Method) -> Builder<T> {
        self.method = Some(method);
        self
    }

    /// Sets how the method is picked when none is set explicitly.
    pub fn method_selection(mut self, method_selection: MethodSelection) -> Builder<T> {
        self.method_selection = method_selection;
        self
    }

    /// Sets the maximum number of items returned by [ItemSearch::records].
    ///
    /// This limit is enforced by the client and is not sent to the server.
    pub fn max_items(mut self, max_items: usize) -> Builder<T> {
        self.max_items = Some(max_items);
        self
    }

    /// Sets the maximum number of items per page.
    pub fn limit(mut self, limit: u64) -> Builder<T> {
        self.limit = Some(limit);
        self
    }

    /// Sets the bounding box filter.
    pub fn bbox(mut self, bbox: impl IntoBbox) -> Builder<T> {
        self.bbox = Some(bbox.into_bbox());
        self
    }

    /// Sets the datetime filter.
    pub fn datetime(mut self, datetime: impl IntoDatetime) -> Builder<T> {
        self.datetime = Some(datetime.into_datetime());
        self
    }

    /// Sets the item ids to return.
    pub fn ids(mut self, ids: impl IntoIds) -> Builder<T> {
        self.ids = Some(ids.into_ids());
        self
    }

    /// Sets the collections to search.
    pub fn collections(mut self, collections: impl IntoCollections) -> Builder<T> {
        self.collections = Some(collections.into_collections());
        self
    }

    /// Sets the intersects filter.
    pub fn intersects(mut self, intersects: impl IntoIntersects) -> Builder<T> {
        self.intersects = Some(intersects.into_intersects());
        self
    }

    /// Adds a header to every request.
    ///
    /// Later headers replace earlier ones with the same name, including the
    /// default headers.
    pub fn header(mut self, name: impl ToString, value: impl ToString) -> Builder<T> {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Adds headers to every request.
    pub fn headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Builder<T>
    where
        K: ToString,
        V: ToString,
    {
        self.headers.extend(
            headers
                .into_iter()
                .map(|(name, value)| (name.to_string(), value.to_string())),
        );
        self
    }

    /// Sets the conformance classes of the API.
    ///
    /// These aren't published by the search endpoint, so they have to come
    /// from the landing page.
    pub fn conformance(mut self, conformance: Vec<String>) -> Builder<T> {
        self.conformance = conformance;
        self
    }

    /// Sets the resolver used to build the request for each following page.
    pub fn resolver(mut self, resolver: impl Resolve + 'static) -> Builder<T> {
        self.resolver = Box::new(resolver);
        self
    }

    /// Sets the transport used to send requests.
    pub fn transport<U: Transport>(self, transport: U) -> Builder<U> {
        Builder {
            url: self.url,
            method: self.method,
            method_selection: self.method_selection,
            max_items: self.max_items,
            limit: self.limit,
            bbox: self.bbox,
            datetime: self.datetime,
            ids: self.ids,
            collections: self.collections,
            intersects: self.intersects,
            headers: self.headers,
            conformance: self.conformance,
            transport,
            resolver: self.resolver,
        }
    }

    /// Normalizes every parameter and builds the search.
    ///
    /// No requests are sent.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::ItemSearch;
    ///
    /// let error = ItemSearch::builder("http://stac.test/search")
    ///     .bbox("1,2,three,4")
    ///     .build()
    ///     .unwrap_err();
    /// assert!(error.is_malformed_parameter());
    /// ```
    pub fn build(self) -> Result<ItemSearch<T>> {
        let url = Url::parse(&self.url)?;
        let mut parameters = Parameters {
            limit: None,
            bbox: self.bbox.transpose()?,
            datetime: self.datetime.transpose()?,
            ids: self.ids,
            collections: self.collections,
            intersects: self.intersects.transpose()?,
        };
        if let Some(limit) = self.limit {
            parameters = parameters.limit(limit)?;
        }
        let method = match self.method {
            Some(method) => crate::request::search_method(method)?,
            None => self.method_selection.select(&parameters),
        };
        let template = RequestBuilder::new(url).headers(self.headers)?;
        // Both shapes are checked since a POST search may later fall back to GET.
        let _ = parameters.to_json()?;
        let _ = GetParameters::try_from(&parameters)?;
        Ok(ItemSearch {
            template,
            parameters,
            method,
            max_items: self.max_items,
            conformance: self.conformance,
            transport: self.transport,
            resolver: self.resolver,
        })
    }
}

impl<T: Transport> ItemSearch<T> {
    /// Returns the search endpoint url.
    pub fn url(&self) -> &Url {
        self.template.url()
    }

    /// Returns the method that the next search will use.
    pub fn method(&self) -> Method {
        self.method.clone()
    }

    /// Returns the normalized search parameters.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Returns the headers sent with every request.
    pub fn headers(&self) -> &HeaderMap {
        self.template.header_map()
    }

    /// Returns the maximum number of items that [ItemSearch::records] will return.
    pub fn max_items(&self) -> Option<usize> {
        self.max_items
    }

    /// Returns the conformance classes of the API, if they were provided.
    ///
    /// These are attached to every page from [ItemSearch::pages].
    pub fn conformance(&self) -> &[String] {
        &self.conformance
    }

    /// Builds the request for the first page of results.
    pub fn request(&self) -> Result<Request> {
        self.template.build(&self.parameters, self.method.clone())
    }

    /// Returns the number of items that match this search.
    ///
    /// Sends one request with `limit=0`. Errors with
    /// [Error::CountNotSupported] if the server doesn't report `numberMatched`.
    pub async fn matched(&self) -> Result<u64> {
        let request = self
            .template
            .build(&self.parameters.count_only(), self.method.clone())?;
        let response = self.transport.send(&request).await?;
        match response.get("numberMatched").and_then(Value::as_u64) {
            Some(count) => Ok(count),
            None => {
                tracing::warn!("{} did not report numberMatched", self.url());
                Err(Error::CountNotSupported)
            }
        }
    }

    /// Streams every page of results, following `next` links.
    ///
    /// Each call starts again from the first page. Every page carries this
    /// search's [ItemSearch::conformance].
    pub fn pages(&self) -> impl Stream<Item = Result<Page>> + '_ {
        try_stream! {
            let pages = stream_pages(&self.transport, self.request()?, self.resolver.as_ref());
            pin_mut!(pages);
            while let Some(page) = pages.next().await {
                let mut page = page?;
                page.conformance = self.conformance.clone();
                yield page;
            }
        }
    }

    /// Streams matching records, decoded from each page's features.
    ///
    /// At most [ItemSearch::max_items] records are returned; no page is
    /// fetched after the last record is yielded. If the server answers a
    /// `POST` with `405 Method Not Allowed`, this search switches to `GET` and
    /// the stream starts over from the first page.
    pub fn records<'a, D>(&'a mut self) -> impl Stream<Item = Result<D>> + 'a
    where
        D: DeserializeOwned + 'a,
    {
        try_stream! {
            'traversal: while self.max_items != Some(0) {
                let request = self.template.build(&self.parameters, self.method.clone())?;
                let mut count = 0;
                let pages = stream_pages(&self.transport, request, self.resolver.as_ref());
                pin_mut!(pages);
                while let Some(result) = pages.next().await {
                    let page = match result {
                        Ok(page) => page,
                        Err(err) => {
                            if err.is_method_not_allowed() && downgrade(&mut self.method) {
                                tracing::info!("{} does not allow POST, searching with GET", self.template.url());
                                continue 'traversal;
                            }
                            Err(err)?
                        }
                    };
                    for feature in page.features {
                        let record: D = serde_json::from_value(Value::Object(feature))?;
                        yield record;
                        count += 1;
                        if self.max_items.is_some_and(|max_items| count >= max_items) {
                            break 'traversal;
                        }
                    }
                }
                break;
            }
        }
    }

    /// Streams matching items.
    pub fn items(&mut self) -> impl Stream<Item = Result<Item>> + '_ {
        self.records()
    }
}

/// Switches a `POST` search to `GET`.
///
/// Returns false, and leaves the method alone, if it wasn't `POST`.
fn downgrade(method: &mut Method) -> bool {
    if *method == Method::POST {
        *method = Method::GET;
        true
    } else {
        false
    }
}

impl<T: Debug> Debug for ItemSearch<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemSearch")
            .field("url", self.template.url())
            .field("method", &self.method)
            .field("parameters", &self.parameters)
            .field("max_items", &self.max_items)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl<T: Debug> Debug for Builder<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("method_selection", &self.method_selection)
            .field("max_items", &self.max_items)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
