/// Anything that has a collection id, e.g. a [stac::Collection].
pub trait CollectionId {
    /// Returns this collection's id.
    fn collection_id(&self) -> &str;
}

/// One entry in a list of collections.
///
/// Lists may mix plain ids with collection objects, and may nest; nested
/// lists are flattened in order.
#[derive(Clone, Debug, PartialEq)]
pub enum CollectionRef {
    /// A collection id.
    Id(String),

    /// A nested list of collections.
    Nested(Vec<CollectionRef>),
}

/// Converts a value into a flat list of collection ids.
pub trait IntoCollections {
    /// Converts this value into collection ids.
    ///
    /// # Examples
    ///
    /// ```
    /// use stac::Collection;
    /// use stac_search::{CollectionRef, IntoCollections};
    ///
    /// let collection = Collection::new("b", "a description");
    /// let collections = vec![CollectionRef::from("a"), CollectionRef::from(&collection)];
    /// assert_eq!(collections.into_collections(), vec!["a", "b"]);
    /// ```
    fn into_collections(self) -> Vec<String>;
}

/// Normalizes an optional list of collections.
pub fn normalize_collections<C: IntoCollections>(value: Option<C>) -> Option<Vec<String>> {
    value.map(IntoCollections::into_collections)
}

impl CollectionId for stac::Collection {
    fn collection_id(&self) -> &str {
        &self.id
    }
}

impl CollectionRef {
    fn flatten_into(self, ids: &mut Vec<String>) {
        match self {
            CollectionRef::Id(id) => ids.push(id),
            CollectionRef::Nested(refs) => {
                for collection in refs {
                    collection.flatten_into(ids);
                }
            }
        }
    }
}

impl From<&str> for CollectionRef {
    fn from(id: &str) -> CollectionRef {
        CollectionRef::Id(id.to_string())
    }
}

impl From<String> for CollectionRef {
    fn from(id: String) -> CollectionRef {
        CollectionRef::Id(id)
    }
}

impl<C: CollectionId> From<&C> for CollectionRef {
    fn from(collection: &C) -> CollectionRef {
        CollectionRef::Id(collection.collection_id().to_string())
    }
}

impl<T: Into<CollectionRef>> From<Vec<T>> for CollectionRef {
    fn from(collections: Vec<T>) -> CollectionRef {
        CollectionRef::Nested(collections.into_iter().map(Into::into).collect())
    }
}

impl IntoCollections for &str {
    fn into_collections(self) -> Vec<String> {
        self.split(',').map(String::from).collect()
    }
}

impl IntoCollections for String {
    fn into_collections(self) -> Vec<String> {
        self.as_str().into_collections()
    }
}

impl<C: CollectionId> IntoCollections for &C {
    fn into_collections(self) -> Vec<String> {
        vec![self.collection_id().to_string()]
    }
}

impl IntoCollections for CollectionRef {
    fn into_collections(self) -> Vec<String> {
        let mut ids = Vec::new();
        self.flatten_into(&mut ids);
        ids
    }
}

impl<T: Into<CollectionRef>> IntoCollections for Vec<T> {
    fn into_collections(self) -> Vec<String> {
        CollectionRef::from(self).into_collections()
    }
}

impl<T: Into<CollectionRef>, const N: usize> IntoCollections for [T; N] {
    fn into_collections(self) -> Vec<String> {
        CollectionRef::from(Vec::from(self)).into_collections()
    }
}
