use crate::{Error, Result};
use serde_json::Value;
use stac::Bbox;

/// Converts a value into a [stac::Bbox].
///
/// Implemented for comma-delimited strings, sequences of numbers, and JSON
/// values holding either one. Values are kept in the order they were given.
pub trait IntoBbox {
    /// Converts this value into a bounding box.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::IntoBbox;
    ///
    /// let bbox = "1,2,3,4".into_bbox().unwrap();
    /// assert_eq!(bbox, vec![1, 2, 3, 4].into_bbox().unwrap());
    /// ```
    fn into_bbox(self) -> Result<Bbox>;
}

/// Normalizes an optional bounding box.
///
/// # Examples
///
/// ```
/// use stac::Bbox;
/// use stac_search::normalize_bbox;
///
/// let bbox = normalize_bbox(Some("-105.1,41.1,-105.0,41.2")).unwrap().unwrap();
/// assert_eq!(bbox, Bbox::new(-105.1, 41.1, -105.0, 41.2));
/// assert!(normalize_bbox(None::<&str>).unwrap().is_none());
/// ```
pub fn normalize_bbox<B: IntoBbox>(value: Option<B>) -> Result<Option<Bbox>> {
    value.map(IntoBbox::into_bbox).transpose()
}

/// Formats a bbox as comma-delimited values for a query string.
pub(crate) fn to_query(bbox: &Bbox) -> String {
    let values: Vec<String> = Vec::<f64>::from(*bbox)
        .iter()
        .map(|n| n.to_string())
        .collect();
    values.join(",")
}

fn from_values(values: Vec<f64>) -> Result<Bbox> {
    if let Some(value) = values.iter().find(|value| !value.is_finite()) {
        return Err(Error::InvalidBbox(format!("{value} is not a finite number")));
    }
    let len = values.len();
    Bbox::try_from(values)
        .map_err(|_| Error::InvalidBbox(format!("expected 4 or 6 values, got {len}")))
}

impl IntoBbox for Bbox {
    fn into_bbox(self) -> Result<Bbox> {
        from_values(self.into())
    }
}

impl IntoBbox for &str {
    fn into_bbox(self) -> Result<Bbox> {
        let values = self
            .split(',')
            .map(|token| {
                token
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| Error::InvalidBbox(format!("{token:?} is not a number")))
            })
            .collect::<Result<Vec<_>>>()?;
        from_values(values)
    }
}

impl IntoBbox for String {
    fn into_bbox(self) -> Result<Bbox> {
        self.as_str().into_bbox()
    }
}

impl<T: Into<f64>> IntoBbox for Vec<T> {
    fn into_bbox(self) -> Result<Bbox> {
        from_values(self.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<f64>, const N: usize> IntoBbox for [T; N] {
    fn into_bbox(self) -> Result<Bbox> {
        Vec::from(self).into_bbox()
    }
}

impl<T: Into<f64> + Copy> IntoBbox for &[T] {
    fn into_bbox(self) -> Result<Bbox> {
        from_values(self.iter().copied().map(Into::into).collect())
    }
}

impl IntoBbox for Value {
    fn into_bbox(self) -> Result<Bbox> {
        match self {
            Value::String(s) => s.into_bbox(),
            Value::Array(values) => {
                let values = values
                    .into_iter()
                    .map(|value| {
                        value
                            .as_f64()
                            .ok_or_else(|| Error::InvalidBbox(format!("{value} is not a number")))
                    })
                    .collect::<Result<Vec<_>>>()?;
                from_values(values)
            }
            value => Err(Error::InvalidBbox(value.to_string())),
        }
    }
}
