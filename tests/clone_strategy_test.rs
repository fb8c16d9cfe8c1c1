//! Tests for pluggable clone strategies.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use swstate::domain::{
    CloneStrategy, Node, Port, PortFields, PortQueue, PortQueueFields, RecyclingPool, StreamType,
};

fn port_with_queues(id: u16, n: u8) -> Arc<Port> {
    let mut fields = PortFields::new(id, format!("eth1/{id}/1"));
    for q in 0..n {
        let mut queue = PortQueueFields::new(q, StreamType::Unicast);
        queue.set_weight(i32::from(q) + 1).unwrap();
        fields.add_queue(Arc::new(PortQueue::new(queue))).unwrap();
    }
    Port::new(fields).into_published()
}

/// Counts copies and otherwise behaves like the default strategy.
#[derive(Default)]
struct Counting {
    copies: AtomicUsize,
}

impl CloneStrategy<PortFields> for Counting {
    fn copy_fields(&self, source: &PortFields) -> PortFields {
        self.copies.fetch_add(1, Ordering::Relaxed);
        source.clone()
    }
}

#[test]
fn given_custom_strategy_when_modifying_published_node_then_strategy_used_once() {
    let strategy = Counting::default();
    let original = port_with_queues(1, 2);
    let mut slot = Arc::clone(&original);

    Node::modify_with(&mut slot, &strategy).set_speed_mbps(10_000).unwrap();
    // Second edit hits the now-unpublished copy in place.
    Node::modify_with(&mut slot, &strategy).set_name("uplink").unwrap();

    assert_eq!(strategy.copies.load(Ordering::Relaxed), 1);
    assert_eq!(original.fields().speed_mbps(), None);
    assert_eq!(slot.name(), "uplink");
}

#[test]
fn given_published_parent_when_cloned_then_children_shared_by_pointer() {
    let original = port_with_queues(1, 3);

    let copy = original.clone_node();

    for (a, b) in original.queues().iter().zip(copy.queues()) {
        assert!(Arc::ptr_eq(a, b));
    }
    assert_eq!(copy, *original);
}

#[test]
fn given_empty_pool_when_copying_then_allocates() {
    let pool = RecyclingPool::<PortFields>::new(2);
    let original = port_with_queues(1, 2);

    let copy = original.clone_with(&pool);

    assert_eq!(copy, *original);
    let stats = pool.stats();
    assert_eq!(stats.allocated, 1);
    assert_eq!(stats.reused, 0);
}

#[test]
fn given_recycled_container_when_copying_then_reused_and_equal() {
    // Arrange: retire one container with a different value
    let pool = RecyclingPool::<PortFields>::new(2);
    pool.recycle(port_with_queues(7, 5).clone_node());
    assert_eq!(pool.stats().idle, 1);

    // Act
    let original = port_with_queues(1, 2);
    let copy = original.clone_with(&pool);

    // Assert: value is the source's, not the retired one's
    assert_eq!(copy, *original);
    assert_eq!(copy.id(), 1);
    assert_eq!(copy.queues().len(), 2);
    let stats = pool.stats();
    assert_eq!(stats.reused, 1);
    assert_eq!(stats.idle, 0);
}

#[test]
fn given_full_pool_when_recycling_then_extra_dropped() {
    let pool = RecyclingPool::<PortQueueFields>::new(1);

    pool.recycle(PortQueue::new(PortQueueFields::new(0, StreamType::Unicast)));
    pool.recycle(PortQueue::new(PortQueueFields::new(1, StreamType::Unicast)));

    assert_eq!(pool.stats().idle, 1);
    assert_eq!(pool.capacity(), 1);
}

#[test]
fn given_shared_node_when_recycle_shared_then_only_last_reference_reclaimed() {
    let pool = RecyclingPool::<PortQueueFields>::new(4);
    let node = PortQueue::new(PortQueueFields::new(0, StreamType::Unicast)).into_published();
    let other = Arc::clone(&node);

    pool.recycle_shared(node);
    assert_eq!(pool.stats().idle, 0);

    pool.recycle_shared(other);
    assert_eq!(pool.stats().idle, 1);
}
