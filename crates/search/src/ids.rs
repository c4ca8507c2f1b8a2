/// Converts a value into a list of item ids.
///
/// Order is preserved and duplicates are kept.
pub trait IntoIds {
    /// Converts this value into ids.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac_search::IntoIds;
    ///
    /// assert_eq!("x,y,z".into_ids(), vec!["x", "y", "z"]);
    /// ```
    fn into_ids(self) -> Vec<String>;
}

/// Normalizes an optional list of ids.
pub fn normalize_ids<I: IntoIds>(value: Option<I>) -> Option<Vec<String>> {
    value.map(IntoIds::into_ids)
}

impl IntoIds for &str {
    fn into_ids(self) -> Vec<String> {
        self.split(',').map(String::from).collect()
    }
}

impl IntoIds for String {
    fn into_ids(self) -> Vec<String> {
        self.as_str().into_ids()
    }
}

impl<T: Into<String>> IntoIds for Vec<T> {
    fn into_ids(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<String>, const N: usize> IntoIds for [T; N] {
    fn into_ids(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: AsRef<str>> IntoIds for &[T] {
    fn into_ids(self) -> Vec<String> {
        self.iter().map(|id| id.as_ref().to_string()).collect()
    }
}
