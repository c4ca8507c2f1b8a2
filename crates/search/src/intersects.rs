use crate::{Error, Result};
use geojson::{Feature, Geometry};
use serde::Serialize;
use serde_json::{Map, Value};

/// A GeoJSON-like object used to filter searches by intersection.
pub type Intersects = Map<String, Value>;

/// Implemented by types that can describe themselves as a GeoJSON object.
pub trait GeoInterface {
    /// Returns this value as a GeoJSON object.
    fn geo_interface(&self) -> Result<Intersects>;
}

/// Converts a value into an owned [Intersects] object.
///
/// The result never shares state with the input, so changing the input
/// afterwards can't change a search that was built from it.
pub trait IntoIntersects {
    /// Converts this value into an intersects object.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::IntoIntersects;
    ///
    /// let intersects = r#"{"type":"Point","coordinates":[0,0]}"#.into_intersects().unwrap();
    /// assert_eq!(intersects["type"], "Point");
    /// ```
    fn into_intersects(self) -> Result<Intersects>;
}

/// Normalizes an optional intersects value.
pub fn normalize_intersects<I: IntoIntersects>(value: Option<I>) -> Result<Option<Intersects>> {
    value.map(IntoIntersects::into_intersects).transpose()
}

fn to_object<T: Serialize>(value: &T) -> Result<Intersects> {
    match serde_json::to_value(value)? {
        Value::Object(object) => Ok(object),
        value => Err(Error::NotAnObject(value)),
    }
}

impl GeoInterface for Geometry {
    fn geo_interface(&self) -> Result<Intersects> {
        to_object(self)
    }
}

impl GeoInterface for geojson::Value {
    fn geo_interface(&self) -> Result<Intersects> {
        to_object(&Geometry::new(self.clone()))
    }
}

impl GeoInterface for Feature {
    fn geo_interface(&self) -> Result<Intersects> {
        to_object(self)
    }
}

impl IntoIntersects for &str {
    fn into_intersects(self) -> Result<Intersects> {
        match serde_json::from_str(self)? {
            Value::Object(object) => Ok(object),
            _ => Err(Error::InvalidIntersects(self.to_string())),
        }
    }
}

impl IntoIntersects for String {
    fn into_intersects(self) -> Result<Intersects> {
        self.as_str().into_intersects()
    }
}

impl IntoIntersects for Intersects {
    fn into_intersects(self) -> Result<Intersects> {
        Ok(self)
    }
}

impl IntoIntersects for &Intersects {
    fn into_intersects(self) -> Result<Intersects> {
        Ok(self.clone())
    }
}

impl IntoIntersects for Value {
    fn into_intersects(self) -> Result<Intersects> {
        match self {
            Value::Object(object) => Ok(object),
            value => Err(Error::InvalidIntersects(value.to_string())),
        }
    }
}

impl IntoIntersects for Geometry {
    fn into_intersects(self) -> Result<Intersects> {
        self.geo_interface()
    }
}

impl<G: GeoInterface> IntoIntersects for &G {
    fn into_intersects(self) -> Result<Intersects> {
        self.geo_interface()
    }
}
