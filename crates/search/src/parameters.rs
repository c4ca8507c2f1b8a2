use crate::{Bbox, Error, Intersects, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical item search parameters.
///
/// Every value is already in the shape the search endpoint expects. This is
/// also the `POST` body of a search.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// The maximum number of items to return per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    /// Requested bounding box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Bbox>,

    /// Single datetime or `start/end` interval, with `..` for an open side.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    /// Item ids to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,

    /// Collection ids that matching items must be in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,

    /// GeoJSON object that matching items must intersect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intersects: Option<Intersects>,
}

/// `GET` query parameters for the item search endpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GetParameters {
    /// The maximum number of items to return per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,

    /// Comma-delimited bounding box.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<String>,

    /// Single datetime or datetime interval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    /// Comma-delimited list of item ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<String>,

    /// Comma-delimited list of collection ids.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<String>,

    /// GeoJSON object, as JSON text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intersects: Option<String>,
}

impl Parameters {
    /// Creates a new, empty set of parameters.
    pub fn new() -> Parameters {
        Parameters::default()
    }

    /// Sets the per-page limit.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::Parameters;
    ///
    /// assert!(Parameters::new().limit(10).is_ok());
    /// assert!(Parameters::new().limit(0).is_err());
    /// ```
    pub fn limit(mut self, limit: u64) -> Result<Parameters> {
        if limit == 0 {
            Err(Error::InvalidLimit(limit))
        } else {
            self.limit = Some(limit);
            Ok(self)
        }
    }

    /// Returns a copy of these parameters that only asks for the match count.
    pub(crate) fn count_only(&self) -> Parameters {
        Parameters {
            limit: Some(0),
            ..self.clone()
        }
    }

    /// Returns these parameters as a JSON object, for use as a `POST` body.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::Parameters;
    ///
    /// let parameters = Parameters {
    ///     ids: Some(vec!["an-id".to_string()]),
    ///     ..Default::default()
    /// };
    /// let body = parameters.to_json().unwrap();
    /// assert_eq!(body["ids"][0], "an-id");
    /// assert!(!body.contains_key("bbox"));
    /// ```
    pub fn to_json(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(object) => Ok(object),
            value => Err(Error::NotAnObject(value)),
        }
    }
}

impl TryFrom<&Parameters> for GetParameters {
    type Error = Error;

    fn try_from(parameters: &Parameters) -> Result<GetParameters> {
        let intersects = parameters
            .intersects
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        Ok(GetParameters {
            limit: parameters.limit.map(|limit| limit.to_string()),
            bbox: parameters.bbox.as_ref().map(crate::bbox::to_query),
            datetime: parameters.datetime.clone(),
            ids: parameters.ids.as_ref().map(|ids| ids.join(",")),
            collections: parameters
                .collections
                .as_ref()
                .map(|collections| collections.join(",")),
            intersects,
        })
    }
}

impl GetParameters {
    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        *self == GetParameters::default()
    }
}

#[cfg(test)]
mod tests {
    use super::{GetParameters, Parameters};
    use crate::IntoBbox;
    use serde_json::json;

    #[test]
    fn json_omits_missing_values() {
        let parameters = Parameters {
            datetime: Some("2020-01-01T00:00:00Z/..".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(parameters).unwrap(),
            json!({"datetime": "2020-01-01T00:00:00Z/.."})
        );
    }

    #[test]
    fn json_shapes() {
        let parameters = Parameters {
            limit: Some(10),
            bbox: Some("1,2,3,4".into_bbox().unwrap()),
            ids: Some(vec!["a".to_string(), "b".to_string()]),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(parameters).unwrap(),
            json!({"limit": 10, "bbox": [1.0, 2.0, 3.0, 4.0], "ids": ["a", "b"]})
        );
    }

    #[test]
    fn get_shapes() {
        let parameters = Parameters {
            limit: Some(10),
            bbox: Some(vec![1.0, 2.5, 3.0, 4.0].into_bbox().unwrap()),
            datetime: Some("2020-01-01T00:00:00Z".to_string()),
            ids: Some(vec!["a".to_string(), "b".to_string()]),
            collections: Some(vec!["c".to_string()]),
            intersects: json!({"type": "Point", "coordinates": [0, 0]})
                .as_object()
                .cloned(),
        };
        let get_parameters = GetParameters::try_from(&parameters).unwrap();
        assert_eq!(get_parameters.limit.unwrap(), "10");
        assert_eq!(get_parameters.bbox.unwrap(), "1,2.5,3,4");
        assert_eq!(get_parameters.datetime.unwrap(), "2020-01-01T00:00:00Z");
        assert_eq!(get_parameters.ids.unwrap(), "a,b");
        assert_eq!(get_parameters.collections.unwrap(), "c");
        assert_eq!(
            get_parameters.intersects.unwrap(),
            r#"{"type":"Point","coordinates":[0,0]}"#
        );
    }

    #[test]
    fn count_only() {
        let parameters = Parameters::new().limit(5).unwrap();
        assert_eq!(parameters.count_only().limit, Some(0));
        assert_eq!(parameters.limit, Some(5));
    }

    #[test]
    fn empty() {
        assert!(
            GetParameters::try_from(&Parameters::default())
                .unwrap()
                .is_empty()
        );
    }
}
