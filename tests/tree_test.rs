//! Tests for parent nodes (Port, SwitchState): children, traversal, serialization.

use std::sync::Arc;

use rstest::rstest;

use swstate::domain::{
    traversal, AdminState, AnyNode, DomainError, Node, NodeFields, Port, PortFields, PortQueue,
    PortQueueFields, StreamType, StructuredValue, SwitchState, SwitchStateFields,
};

fn queue(id: u8, stream_type: StreamType, weight: i32) -> Arc<PortQueue> {
    let mut fields = PortQueueFields::new(id, stream_type);
    fields.set_weight(weight).unwrap();
    Arc::new(PortQueue::new(fields))
}

fn port(id: u16, queue_ids: &[u8]) -> Arc<Port> {
    let mut fields = PortFields::new(id, format!("eth1/{id}/1"));
    fields.set_admin_state(AdminState::Enabled);
    for &q in queue_ids {
        fields.add_queue(queue(q, StreamType::Unicast, 10)).unwrap();
    }
    Arc::new(Port::new(fields))
}

fn switch_state() -> Arc<SwitchState> {
    let mut fields = SwitchStateFields::new();
    fields.add_port(port(1, &[0, 1, 2])).unwrap();
    fields.add_port(port(2, &[0])).unwrap();
    SwitchState::new(fields).into_published()
}

// ============================================================
// Children
// ============================================================

#[test]
fn given_port_when_visiting_children_then_queues_in_declaration_order() {
    let mut fields = PortFields::new(1, "eth1/1/1");
    for id in [5, 2, 7] {
        fields.add_queue(queue(id, StreamType::Unicast, 1)).unwrap();
    }
    let port = Port::new(fields);

    let labels = traversal::child_labels(&port);

    assert_eq!(labels.len(), 3);
    assert!(labels[0].starts_with("queue 5"));
    assert!(labels[1].starts_with("queue 2"));
    assert!(labels[2].starts_with("queue 7"));
}

#[test]
fn given_duplicate_queue_id_when_added_then_rejected() {
    let mut fields = PortFields::new(1, "eth1/1/1");
    fields.add_queue(queue(0, StreamType::Unicast, 1)).unwrap();

    let err = fields.add_queue(queue(0, StreamType::Multicast, 1)).unwrap_err();

    assert!(matches!(err, DomainError::InvalidFieldValue { field: "queues", .. }));
    assert_eq!(fields.queues().len(), 1);
}

#[test]
fn given_port_when_replacing_queue_then_position_kept_and_old_returned() {
    let mut fields = PortFields::new(1, "eth1/1/1");
    for id in [0, 1, 2] {
        fields.add_queue(queue(id, StreamType::Unicast, 1)).unwrap();
    }

    let old = fields.replace_queue(queue(1, StreamType::All, 9)).unwrap();

    assert_eq!(old.weight(), Some(1));
    assert_eq!(fields.queues()[1].weight(), Some(9));
    assert!(fields.replace_queue(queue(9, StreamType::All, 9)).is_err());
}

#[test]
fn given_port_setters_when_invalid_then_rejected() {
    let mut fields = PortFields::new(1, "eth1/1/1");

    assert!(fields.set_name("  ").is_err());
    assert!(fields.set_speed_mbps(0).is_err());
    fields.set_speed_mbps(100_000).unwrap();

    assert_eq!(fields.name(), "eth1/1/1");
    assert_eq!(fields.speed_mbps(), Some(100_000));
}

#[test]
fn given_parent_when_published_then_children_published_too() {
    let state = switch_state();

    assert!(traversal::all_published(state.as_ref()));
}

// ============================================================
// Traversal
// ============================================================

#[test]
fn given_switch_state_when_walked_then_preorder_with_depths() {
    let state = switch_state();
    let mut seen = Vec::new();

    traversal::walk(state.as_ref(), &mut |node, depth| {
        seen.push((node.node_name(), depth));
    });

    assert_eq!(
        seen,
        vec![
            ("SwitchState", 0),
            ("Port", 1),
            ("PortQueue", 2),
            ("PortQueue", 2),
            ("PortQueue", 2),
            ("Port", 1),
            ("PortQueue", 2),
        ]
    );
    assert_eq!(traversal::count_nodes(state.as_ref()), 7);
    assert_eq!(traversal::depth(state.as_ref()), 3);
}

#[test]
fn given_switch_state_when_rendered_then_tree_lists_labels() {
    let state = switch_state();

    let rendered = traversal::to_tree(state.as_ref()).to_string();

    assert!(rendered.starts_with("switch (2 ports)"));
    assert!(rendered.contains("port 1 (eth1/1/1) ENABLED"));
    assert!(rendered.contains("queue 2 UNICAST weight=10 priority=-"));
    assert!(!rendered.contains('*'));
}

#[test]
fn given_unpublished_copy_when_rendered_then_marked() {
    let state = switch_state();
    let mut slot = Arc::clone(&state);
    Node::modify(&mut slot);

    let rendered = traversal::to_tree(slot.as_ref()).to_string();

    assert!(rendered.starts_with("switch (2 ports) *"));
}

// ============================================================
// Serialization
// ============================================================

#[test]
fn given_switch_state_when_json_round_tripped_then_equal() {
    let state = switch_state();

    let json = state.to_json(true).unwrap();
    let back = SwitchState::from_json(&json).unwrap();

    assert_eq!(back, *state);
}

#[test]
fn given_port_with_optional_speed_when_round_tripped_then_equal() {
    let mut fields = PortFields::new(9, "eth1/9/1");
    fields.set_speed_mbps(25_000).unwrap();
    fields.add_queue(queue(3, StreamType::Multicast, 4)).unwrap();

    let back = PortFields::from_structured(&fields.to_structured()).unwrap();

    assert_eq!(back, fields);
}

#[test]
fn given_duplicate_port_ids_when_deserialized_then_malformed_state() {
    let value = StructuredValue::from_json(r#"{"ports": [{"id": 1, "name": "a"}, {"id": 1, "name": "b"}]}"#).unwrap();

    let err = SwitchState::from_structured(&value).unwrap_err();

    assert!(matches!(err, DomainError::MalformedState { node: "SwitchState", .. }));
}

#[test]
fn given_nested_malformed_queue_when_deserialized_then_error_names_queue() {
    let value =
        StructuredValue::from_json(
            r#"{"ports": [{"id": 1, "name": "eth1/1/1", "queues": [{"streamType": "ALL"}]}]}"#,
        )
        .unwrap();

    let err = SwitchState::from_structured(&value).unwrap_err();

    assert!(matches!(err, DomainError::MalformedState { node: "PortQueue", .. }));
}

#[test]
fn given_minimal_port_when_deserialized_then_defaults_applied() {
    let value = StructuredValue::from_json(r#"{"id": 4, "name": "eth1/4/1"}"#).unwrap();

    let port = Port::from_structured(&value).unwrap();

    assert_eq!(port.id(), 4);
    assert_eq!(port.name(), "eth1/4/1");
    assert_eq!(port.admin_state(), AdminState::Disabled);
    assert_eq!(port.fields().speed_mbps(), None);
    assert!(port.queues().is_empty());
}

#[rstest]
#[case(r#"{"id": 1}"#)]
#[case(r#"{"id": 1, "name": ""}"#)]
#[case(r#"{"id": 1, "name": "   "}"#)]
#[case(r#"{"id": 1, "name": "eth1/1/1", "speedMbps": 0}"#)]
#[case(r#"{"id": 1, "name": "eth1/1/1", "speedMbps": -100}"#)]
#[case(r#"{"id": 1, "name": "eth1/1/1", "adminState": "UP"}"#)]
fn given_port_value_rejected_by_setters_when_deserialized_then_malformed_state(
    #[case] json: &str,
) {
    let value = StructuredValue::from_json(json).unwrap();

    let err = PortFields::from_structured(&value).unwrap_err();

    assert!(matches!(err, DomainError::MalformedState { node: "Port", .. }), "{err}");
}
