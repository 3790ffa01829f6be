//! Order storage.
//!
//! # Responsibilities
//! - Define the storage seam the order service depends on
//! - Provide the in-process store used by the service
//!
//! # Design Decisions
//! - Listing preserves insertion order (a per-order sequence number)
//! - Updates apply only the fields present in the request

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::orders::types::{Order, OrderFilter, UpdateOrder};

/// Storage operations for orders.
pub trait OrderRepository: Send + Sync {
    /// Store a new order and return it.
    fn insert(&self, order: Order) -> Order;

    /// All orders matching `filter`, oldest first.
    fn find_all(&self, filter: &OrderFilter) -> Vec<Order>;

    fn find_by_id(&self, id: &Uuid) -> Option<Order>;

    /// Apply `changes` and return the updated order, `None` if unknown.
    fn update(&self, id: &Uuid, changes: &UpdateOrder) -> Option<Order>;

    /// Remove an order. Returns `true` if it existed.
    fn delete(&self, id: &Uuid) -> bool;

    fn count(&self) -> usize;
}

struct StoredOrder {
    seq: u64,
    order: Order,
}

/// Thread-safe in-memory order store.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: DashMap<Uuid, StoredOrder>,
    next_seq: AtomicU64,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn insert(&self, order: Order) -> Order {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.orders.insert(
            order.id,
            StoredOrder {
                seq,
                order: order.clone(),
            },
        );
        order
    }

    fn find_all(&self, filter: &OrderFilter) -> Vec<Order> {
        let mut matching: Vec<(u64, Order)> = self
            .orders
            .iter()
            .filter(|r| filter.matches(&r.value().order))
            .map(|r| (r.value().seq, r.value().order.clone()))
            .collect();
        matching.sort_by_key(|(seq, _)| *seq);
        matching.into_iter().map(|(_, order)| order).collect()
    }

    fn find_by_id(&self, id: &Uuid) -> Option<Order> {
        self.orders.get(id).map(|r| r.value().order.clone())
    }

    fn update(&self, id: &Uuid, changes: &UpdateOrder) -> Option<Order> {
        self.orders.get_mut(id).map(|mut r| {
            r.order.apply(changes);
            r.order.clone()
        })
    }

    fn delete(&self, id: &Uuid) -> bool {
        self.orders.remove(id).is_some()
    }

    fn count(&self) -> usize {
        self.orders.len()
    }
}
