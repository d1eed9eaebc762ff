use mapbridge_core::Coordinate;
use serde_json::Value;

use crate::entity::MapEntity;
use crate::handle::Handle;
use crate::marker::Marker;

/// A marker handed to the clustering layer.
///
/// Holds the cached marker itself rather than a copy, so re-sending the same
/// marker id yields an item that groups with the earlier one.
#[derive(Debug, Clone)]
pub struct ClusterItem {
    marker: Handle<Marker>,
}

impl ClusterItem {
    pub fn new(marker: Handle<Marker>) -> Self {
        ClusterItem { marker }
    }

    pub fn marker(&self) -> &Handle<Marker> {
        &self.marker
    }

    pub fn position(&self) -> Coordinate {
        self.marker.read().position
    }

    pub fn title(&self) -> String {
        self.marker.read().title.clone()
    }

    pub fn snippet(&self) -> String {
        self.marker.read().snippet.clone()
    }

    /// Grouping key: the wrapped marker's identifier.
    pub fn key(&self) -> String {
        self.marker.read().id().to_string()
    }

    /// True if both items wrap the same live marker.
    pub fn same_item(&self, other: &ClusterItem) -> bool {
        self.marker.ptr_eq(&other.marker)
    }

    pub fn to_value(&self) -> Value {
        self.marker.read().to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntityDefaults;

    #[test]
    fn reads_through_to_marker() {
        let handle = Handle::new(Marker::create("m1", &EntityDefaults::default()));
        let item = ClusterItem::new(handle.clone());
        handle.write().title = "Cafe".into();
        handle.write().position = Coordinate::new(1.0, 2.0);
        assert_eq!(item.title(), "Cafe");
        assert_eq!(item.position(), Coordinate::new(1.0, 2.0));
        assert_eq!(item.key(), "m1");
        assert!(item.same_item(&ClusterItem::new(handle)));
    }
}
