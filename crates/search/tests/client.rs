use futures::TryStreamExt;
use http::{Method, StatusCode};
use mockito::{Matcher, Server};
use serde_json::{Value, json};
use stac_search::{Error, Item, ItemSearch};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn page(ids: &[&str], next: Option<String>) -> String {
    let mut links = Vec::new();
    if let Some(next) = next {
        links.push(json!({"href": next, "rel": "next", "type": "application/geo+json"}));
    }
    json!({
        "type": "FeatureCollection",
        "features": ids.iter().map(|id| json!({"type": "Feature", "id": id})).collect::<Vec<_>>(),
        "links": links,
    })
    .to_string()
}

fn ids(items: &[Item]) -> Vec<&str> {
    items
        .iter()
        .map(|item| item["id"].as_str().unwrap())
        .collect()
}

fn intersects() -> Value {
    json!({"type": "Point", "coordinates": [-105.1, 41.1]})
}

#[tokio::test]
async fn get_search() {
    init_tracing();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "2".into()),
            Matcher::UrlEncoded("bbox".into(), "1,2,3,4".into()),
            Matcher::UrlEncoded("collections".into(), "a,b".into()),
            Matcher::UrlEncoded("datetime".into(), "2020-01-01T00:00:00Z/..".into()),
        ]))
        .match_header("user-agent", Matcher::Regex("^stac-search/".into()))
        .with_header("content-type", "application/geo+json")
        .with_body(page(&["a-1", "a-2"], None))
        .create_async()
        .await;

    let mut search = ItemSearch::builder(format!("{}/search", server.url()))
        .limit(2)
        .bbox("1,2,3,4")
        .collections(["a", "b"])
        .datetime("2020-01-01T00:00:00Z/..")
        .build()
        .unwrap();
    let items: Vec<Item> = search.items().try_collect().await.unwrap();
    assert_eq!(ids(&items), vec!["a-1", "a-2"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn post_search() {
    init_tracing();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/search")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "ids": ["a-1"],
            "intersects": intersects(),
        })))
        .with_header("content-type", "application/geo+json")
        .with_body(page(&["a-1"], None))
        .create_async()
        .await;

    let mut search = ItemSearch::builder(format!("{}/search", server.url()))
        .ids("a-1")
        .intersects(intersects())
        .build()
        .unwrap();
    assert_eq!(search.method(), Method::POST);
    let items: Vec<Item> = search.items().try_collect().await.unwrap();
    assert_eq!(ids(&items), vec!["a-1"]);
    mock.assert_async().await;
}

#[tokio::test]
async fn post_falls_back_to_get() {
    init_tracing();
    let mut server = Server::new_async().await;
    let post = server
        .mock("POST", "/search")
        .with_status(405)
        .expect(1)
        .create_async()
        .await;
    let get = server
        .mock("GET", "/search")
        .match_query(Matcher::UrlEncoded(
            "intersects".into(),
            r#"{"type":"Point","coordinates":[-105.1,41.1]}"#.into(),
        ))
        .with_header("content-type", "application/geo+json")
        .with_body(page(&["a-1", "a-2"], None))
        .expect(2)
        .create_async()
        .await;

    let mut search = ItemSearch::builder(format!("{}/search", server.url()))
        .intersects(intersects())
        .build()
        .unwrap();
    let items: Vec<Item> = search.items().try_collect().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(search.method(), Method::GET);

    let items: Vec<Item> = search.items().try_collect().await.unwrap();
    assert_eq!(items.len(), 2);
    post.assert_async().await;
    get.assert_async().await;
}

#[tokio::test]
async fn follows_next_links() {
    init_tracing();
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/search")
        .match_query(Matcher::Exact("limit=2".into()))
        .with_body(page(
            &["a-1", "a-2"],
            Some(format!("{}/search?limit=2&token=page-2", server.url())),
        ))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/search")
        .match_query(Matcher::Exact("limit=2&token=page-2".into()))
        .with_body(page(
            &["a-3", "a-4"],
            Some(format!("{}/search?limit=2&token=page-3", server.url())),
        ))
        .create_async()
        .await;
    let third = server
        .mock("GET", "/search")
        .match_query(Matcher::Exact("limit=2&token=page-3".into()))
        .with_body(page(&["a-5"], None))
        .expect(0)
        .create_async()
        .await;

    let mut search = ItemSearch::builder(format!("{}/search", server.url()))
        .limit(2)
        .max_items(3)
        .build()
        .unwrap();
    let items: Vec<Item> = search.items().try_collect().await.unwrap();
    assert_eq!(ids(&items), vec!["a-1", "a-2", "a-3"]);
    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn matched() {
    init_tracing();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Exact("limit=0&collections=a".into()))
        .with_body(json!({"type": "FeatureCollection", "features": [], "numberMatched": 12}).to_string())
        .create_async()
        .await;

    let search = ItemSearch::builder(format!("{}/search", server.url()))
        .collections("a")
        .build()
        .unwrap();
    assert_eq!(search.matched().await.unwrap(), 12);
    mock.assert_async().await;
}

#[tokio::test]
async fn matched_not_supported() {
    init_tracing();
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_body(page(&["a-1"], None))
        .create_async()
        .await;

    let search = ItemSearch::builder(format!("{}/search", server.url()))
        .build()
        .unwrap();
    assert!(matches!(
        search.matched().await.unwrap_err(),
        Error::CountNotSupported
    ));
}

#[tokio::test]
async fn custom_headers() {
    init_tracing();
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .match_header("x-api-key", "an-api-key")
        .match_header("accept", "application/geo+json, application/json")
        .with_body(page(&[], None))
        .create_async()
        .await;

    let mut search = ItemSearch::builder(format!("{}/search", server.url()))
        .header("x-api-key", "an-api-key")
        .build()
        .unwrap();
    let items: Vec<Item> = search.items().try_collect().await.unwrap();
    assert!(items.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn server_error() {
    init_tracing();
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("oops")
        .create_async()
        .await;

    let mut search = ItemSearch::builder(format!("{}/search", server.url()))
        .build()
        .unwrap();
    let error = search
        .items()
        .try_collect::<Vec<_>>()
        .await
        .unwrap_err();
    match error {
        Error::Status { status, body, .. } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "oops");
        }
        error => panic!("unexpected error: {error}"),
    }
}
