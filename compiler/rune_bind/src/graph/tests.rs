use super::*;
use pretty_assertions::assert_eq;

fn statement_binding(graph: &mut BindingGraph, statement: u32, signature: u32) -> BindingId {
    graph.create(
        BindingKind::Statement(StatementId::new(statement)),
        Some(SignatureId::new(signature)),
        true,
    )
}

#[test]
fn ready_queue_is_fifo() {
    let mut graph = BindingGraph::new();
    let a = statement_binding(&mut graph, 0, 0);
    let b = statement_binding(&mut graph, 1, 0);
    assert_eq!(graph.pop_ready(), Some(a));
    assert_eq!(graph.pop_ready(), Some(b));
    assert_eq!(graph.pop_ready(), None);
    assert_eq!(graph.binding(a).state, BindingState::Running);
}

#[test]
fn waking_preserves_suspension_order() {
    let mut graph = BindingGraph::new();
    let event = Event::VariableTypeKnown(VariableId::new(7));
    let a = statement_binding(&mut graph, 0, 0);
    let b = statement_binding(&mut graph, 1, 0);
    let c = statement_binding(&mut graph, 2, 0);
    for id in [a, b, c] {
        assert_eq!(graph.pop_ready(), Some(id));
    }
    graph.suspend(b, event);
    graph.suspend(a, event);
    graph.suspend(c, Event::ReturnTypeKnown(SignatureId::new(3)));

    assert_eq!(graph.wake(event), 2);
    assert_eq!(graph.wake(event), 0);
    assert_eq!(graph.pop_ready(), Some(b));
    assert_eq!(graph.pop_ready(), Some(a));
    assert_eq!(graph.binding(c).state, BindingState::Suspended(Event::ReturnTypeKnown(SignatureId::new(3))));
}

#[test]
fn last_completion_reports_signature() {
    let mut graph = BindingGraph::new();
    let a = statement_binding(&mut graph, 0, 4);
    let b = statement_binding(&mut graph, 1, 4);
    assert_eq!(graph.pending_bindings(SignatureId::new(4)), 2);
    graph.pop_ready();
    assert_eq!(graph.complete(a), None);
    graph.pop_ready();
    assert_eq!(graph.complete(b), Some(SignatureId::new(4)));
    assert_eq!(graph.pending_bindings(SignatureId::new(4)), 0);
}

#[test]
fn removal_detaches_from_event() {
    let mut graph = BindingGraph::new();
    let event = Event::IdentifierDefined(IdentId::new(1));
    let a = statement_binding(&mut graph, 5, 0);
    graph.pop_ready();
    graph.suspend(a, event);
    assert_eq!(graph.waiting_events(), vec![(event, a)]);
    assert_eq!(graph.statement_binding(StatementId::new(5)), Some(a));

    graph.remove(a);
    assert!(graph.waiting_events().is_empty());
    assert_eq!(graph.statement_binding(StatementId::new(5)), None);
    assert_eq!(graph.pending_bindings(SignatureId::new(0)), 0);
}

#[test]
fn retain_drops_rejected_bindings() {
    let mut graph = BindingGraph::new();
    let keep = statement_binding(&mut graph, 0, 0);
    let _drop = statement_binding(&mut graph, 1, 0);
    let removed = graph.retain(|binding| binding.kind == BindingKind::Statement(StatementId::new(0)));
    assert_eq!(removed, 1);
    assert_eq!(graph.pop_ready(), Some(keep));
    assert_eq!(graph.pop_ready(), None);
}

#[test]
fn every_binding_gets_its_own_handle() {
    let mut graph = BindingGraph::new();
    let ids: Vec<BindingId> = (0..64).map(|n| statement_binding(&mut graph, n, 0)).collect();
    let mut distinct = ids.clone();
    distinct.sort();
    distinct.dedup();
    assert_eq!(distinct.len(), ids.len());
    assert_eq!(graph.binding(ids[63]).kind, BindingKind::Statement(StatementId::new(63)));
}
