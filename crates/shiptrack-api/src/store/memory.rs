//! # In-Memory Store
//!
//! Thread-safe, cloneable in-memory implementation of [`ShipmentStore`].
//! All operations are synchronous under the hood (the RwLock is
//! `parking_lot`, not `tokio::sync`) because the lock is never held across
//! an `.await` point. Used in tests and when `DATABASE_URL` is unset.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use shiptrack_core::{ListQuery, Shipment, ShipmentFilters, ShipmentId, SortField, SortOrder};

use super::{NewShipment, ShipmentPatch, ShipmentStore, StoreError};

/// Process-local shipment store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<ShipmentId, Shipment>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored shipments.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn sort_key_cmp(a: &Shipment, b: &Shipment, field: SortField) -> std::cmp::Ordering {
    match field {
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::SenderName => a.sender_name.cmp(&b.sender_name),
        SortField::ReceiverName => a.receiver_name.cmp(&b.receiver_name),
        SortField::Origin => a.origin.cmp(&b.origin),
        SortField::Destination => a.destination.cmp(&b.destination),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::TrackingNumber => a.tracking_number.as_str().cmp(b.tracking_number.as_str()),
    }
}

#[axum::async_trait]
impl ShipmentStore for MemoryStore {
    async fn create(&self, new: NewShipment) -> Result<Shipment, StoreError> {
        let mut guard = self.data.write();
        if guard
            .values()
            .any(|s| s.tracking_number == new.tracking_number)
        {
            return Err(StoreError::Duplicate {
                field: "trackingNumber",
            });
        }
        let mut id = ShipmentId::generate();
        while guard.contains_key(&id) {
            id = ShipmentId::generate();
        }
        let now = Utc::now();
        let shipment = Shipment {
            id: id.clone(),
            tracking_number: new.tracking_number,
            sender_name: new.sender_name,
            receiver_name: new.receiver_name,
            origin: new.origin,
            destination: new.destination,
            status: new.status,
            created_at: now,
            updated_at: now,
        };
        guard.insert(id, shipment.clone());
        Ok(shipment)
    }

    async fn find_by_id(&self, id: &ShipmentId) -> Result<Option<Shipment>, StoreError> {
        Ok(self.data.read().get(id).cloned())
    }

    async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<Shipment>, StoreError> {
        Ok(self
            .data
            .read()
            .values()
            .find(|s| s.tracking_number.as_str() == tracking_number)
            .cloned())
    }

    async fn update(
        &self,
        id: &ShipmentId,
        patch: &ShipmentPatch,
    ) -> Result<Option<Shipment>, StoreError> {
        let mut guard = self.data.write();
        let Some(shipment) = guard.get_mut(id) else {
            return Ok(None);
        };
        if let Some(sender_name) = &patch.sender_name {
            shipment.sender_name = sender_name.clone();
        }
        if let Some(receiver_name) = &patch.receiver_name {
            shipment.receiver_name = receiver_name.clone();
        }
        if let Some(origin) = &patch.origin {
            shipment.origin = origin.clone();
        }
        if let Some(destination) = &patch.destination {
            shipment.destination = destination.clone();
        }
        if let Some(status) = patch.status {
            shipment.status = status;
        }
        shipment.updated_at = Utc::now();
        Ok(Some(shipment.clone()))
    }

    async fn delete(&self, id: &ShipmentId) -> Result<Option<Shipment>, StoreError> {
        Ok(self.data.write().remove(id))
    }

    async fn count(&self, filters: &ShipmentFilters) -> Result<u64, StoreError> {
        let count = self
            .data
            .read()
            .values()
            .filter(|s| filters.matches(s))
            .count();
        Ok(count as u64)
    }

    async fn list(&self, query: &ListQuery) -> Result<Vec<Shipment>, StoreError> {
        let mut items: Vec<Shipment> = self
            .data
            .read()
            .values()
            .filter(|s| query.filters.matches(s))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            let ord = sort_key_cmp(a, b, query.sort_by);
            match query.order {
                SortOrder::Asc => ord,
                SortOrder::Desc => ord.reverse(),
            }
        });
        Ok(items
            .into_iter()
            .skip(query.skip() as usize)
            .take(query.limit as usize)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiptrack_core::{RawListParams, ShipmentStatus, TrackingNumber};

    fn new_shipment(sender: &str, origin: &str, status: ShipmentStatus) -> NewShipment {
        NewShipment {
            tracking_number: TrackingNumber::generate(),
            sender_name: sender.to_string(),
            receiver_name: "Jane Smith".to_string(),
            origin: origin.to_string(),
            destination: "Abuja".to_string(),
            status,
        }
    }

    fn query(pairs: &[(&str, &str)]) -> ListQuery {
        let mut raw = RawListParams::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "page" => raw.page = value,
                "limit" => raw.limit = value,
                "sortBy" => raw.sort_by = value,
                "order" => raw.order = value,
                "status" => raw.status = value,
                "origin" => raw.origin = value,
                "search" => raw.search = value,
                other => panic!("unknown param {other}"),
            }
        }
        ListQuery::from_raw(raw).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let created = store
            .create(new_shipment("John", "Lagos", ShipmentStatus::Pending))
            .await
            .unwrap();
        assert_eq!(created.id.as_str().len(), 24);
        assert_eq!(created.created_at, created.updated_at);
        let fetched = store.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn duplicate_tracking_number_is_rejected() {
        let store = MemoryStore::new();
        let mut new = new_shipment("John", "Lagos", ShipmentStatus::Pending);
        new.tracking_number = TrackingNumber::parse("SHP-20240101-ABCD1234").unwrap();
        store.create(new.clone()).await.unwrap();
        let err = store.create(new).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Duplicate {
                field: "trackingNumber"
            }
        ));
    }

    #[tokio::test]
    async fn patch_merges_and_refreshes_updated_at() {
        let store = MemoryStore::new();
        let created = store
            .create(new_shipment("John", "Lagos", ShipmentStatus::Pending))
            .await
            .unwrap();
        let patch = ShipmentPatch {
            origin: Some("Kano".to_string()),
            status: Some(ShipmentStatus::InTransit),
            ..Default::default()
        };
        let updated = store.update(&created.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.origin, "Kano");
        assert_eq!(updated.status, ShipmentStatus::InTransit);
        // Untouched fields survive.
        assert_eq!(updated.sender_name, "John");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
    }

    #[tokio::test]
    async fn update_and_delete_missing_return_none() {
        let store = MemoryStore::new();
        let id = ShipmentId::generate();
        assert!(store
            .update(&id, &ShipmentPatch::default())
            .await
            .unwrap()
            .is_none());
        assert!(store.delete(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn filters_combine_with_and_semantics() {
        let store = MemoryStore::new();
        store
            .create(new_shipment("John", "Lagos", ShipmentStatus::Pending))
            .await
            .unwrap();
        store
            .create(new_shipment("Mary", "Lagos", ShipmentStatus::InTransit))
            .await
            .unwrap();
        store
            .create(new_shipment("John", "Accra", ShipmentStatus::Pending))
            .await
            .unwrap();

        let q = query(&[("status", "pending"), ("origin", "lagos")]);
        let page = store.list(&q).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].origin, "Lagos");
        assert_eq!(store.count(&q.filters).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn search_matches_sender_or_receiver() {
        let store = MemoryStore::new();
        store
            .create(new_shipment("John Doe", "Lagos", ShipmentStatus::Pending))
            .await
            .unwrap();
        // Receiver is "Jane Smith" on every fixture.
        let q = query(&[("search", "JANE")]);
        assert_eq!(store.list(&q).await.unwrap().len(), 1);
        let q = query(&[("search", "nobody")]);
        assert!(store.list(&q).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sorts_and_paginates() {
        let store = MemoryStore::new();
        for name in ["Carol", "Alice", "Bob", "Dave", "Eve"] {
            store
                .create(new_shipment(name, "Lagos", ShipmentStatus::Pending))
                .await
                .unwrap();
        }

        let q = query(&[("sortBy", "senderName"), ("order", "asc"), ("limit", "2")]);
        let first = store.list(&q).await.unwrap();
        assert_eq!(
            first.iter().map(|s| s.sender_name.as_str()).collect::<Vec<_>>(),
            ["Alice", "Bob"]
        );

        let q = query(&[
            ("sortBy", "senderName"),
            ("order", "asc"),
            ("limit", "2"),
            ("page", "3"),
        ]);
        let last = store.list(&q).await.unwrap();
        assert_eq!(
            last.iter().map(|s| s.sender_name.as_str()).collect::<Vec<_>>(),
            ["Eve"]
        );

        // A page past the end is empty, not an error.
        let q = query(&[("limit", "2"), ("page", "9")]);
        assert!(store.list(&q).await.unwrap().is_empty());
    }
}
