use crate::{Page, Request, Resolve, Result, Transport};
use futures::{Stream, stream::try_unfold};
use serde_json::Value;

/// Where the page stream is.
enum Cursor {
    /// There's another page to fetch with this request.
    Next(Request),

    /// The last page has been fetched.
    Done,
}

/// Streams pages of search results, starting with `request`.
///
/// Pages are fetched one at a time, only when the stream is polled. After each
/// page, `resolver` decides what the next request is; the stream ends when it
/// returns `None`, or after the first error.
///
/// # Examples
///
/// ```no_run
/// use futures::TryStreamExt;
/// use http::Method;
/// use stac_search::{DefaultResolver, HttpTransport, Parameters, RequestBuilder};
///
/// let request = RequestBuilder::new("https://planetarycomputer.microsoft.com/api/stac/v1/search".parse().unwrap())
///     .build(&Parameters::new().limit(10).unwrap(), Method::GET)
///     .unwrap();
/// let transport = HttpTransport::new();
/// # tokio_test::block_on(async {
/// let pages: Vec<_> = stac_search::stream_pages(&transport, request, &DefaultResolver)
///     .try_collect()
///     .await
///     .unwrap();
/// # })
/// ```
pub fn stream_pages<'a, T, R>(
    transport: &'a T,
    request: Request,
    resolver: &'a R,
) -> impl Stream<Item = Result<Page>> + 'a
where
    T: Transport,
    R: Resolve + ?Sized,
{
    try_unfold(Cursor::Next(request), move |cursor| {
        step(transport, resolver, cursor)
    })
}

async fn step<T, R>(transport: &T, resolver: &R, cursor: Cursor) -> Result<Option<(Page, Cursor)>>
where
    T: Transport,
    R: Resolve + ?Sized,
{
    let request = match cursor {
        Cursor::Next(request) => request,
        Cursor::Done => return Ok(None),
    };
    let object = transport.send(&request).await?;
    let page: Page = serde_json::from_value(Value::Object(object))?;
    let cursor = match resolver.resolve(&request, &page)? {
        Some(next) => Cursor::Next(next),
        None => Cursor::Done,
    };
    Ok(Some((page, cursor)))
}
