use crate::{Item, Link};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of item search results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// The items on this page.
    pub features: Vec<Item>,

    /// The total number of items that match the search, if the server counts them.
    #[serde(rename = "numberMatched", skip_serializing_if = "Option::is_none")]
    pub number_matched: Option<u64>,

    /// The number of items on this page.
    #[serde(rename = "numberReturned", skip_serializing_if = "Option::is_none")]
    pub number_returned: Option<u64>,

    /// Links, including the `next` link if there are more pages.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    /// Conformance classes of the API that produced this page.
    ///
    /// Never read from or written to JSON. [ItemSearch::pages](crate::ItemSearch::pages)
    /// fills it from [Builder::conformance](crate::Builder::conformance).
    #[serde(skip)]
    pub conformance: Vec<String>,

    /// Additional fields.
    #[serde(flatten)]
    pub additional_fields: Map<String, Value>,
}

impl Page {
    /// Returns the first `next` link, if there is one.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::{Link, Page};
    ///
    /// let mut page = Page::default();
    /// assert!(page.next_link().is_none());
    /// page.links.push(Link::new("http://stac.test/search?page=2", "next"));
    /// assert!(page.next_link().is_some());
    /// ```
    pub fn next_link(&self) -> Option<&Link> {
        self.links.iter().find(|link| link.is_next())
    }
}

#[cfg(test)]
mod tests {
    use super::Page;
    use serde_json::json;

    #[test]
    fn deserialize() {
        let page: Page = serde_json::from_value(json!({
            "type": "FeatureCollection",
            "features": [{"id": "a"}, {"id": "b"}],
            "numberMatched": 10,
            "links": [
                {"href": "http://stac.test/search", "rel": "self"},
                {"href": "http://stac.test/search?token=next:b", "rel": "next"}
            ]
        }))
        .unwrap();
        assert_eq!(page.features.len(), 2);
        assert_eq!(page.number_matched, Some(10));
        assert_eq!(page.additional_fields["type"], "FeatureCollection");
        assert_eq!(
            page.next_link().unwrap().href,
            "http://stac.test/search?token=next:b"
        );
    }

    #[test]
    fn features_are_required() {
        let _ = serde_json::from_value::<Page>(json!({"links": []})).unwrap_err();
    }
}
