use std::fmt::{Debug, Display};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A record that can live in an [`EntityStore`](super::EntityStore) and be
/// mirrored to a remote resource collection.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync {
    /// Identifier type; compared by value when updating and deleting
    type Id: Clone + Debug + Display + PartialEq + Send + Sync;

    /// Remote collection name, e.g. `tasks` for `/tasks/{id}`
    const COLLECTION: &'static str;

    fn id(&self) -> &Self::Id;
}
