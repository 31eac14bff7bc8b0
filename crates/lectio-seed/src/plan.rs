use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::error::ValidationError;
use crate::graph::{Edge, Node, NodeIndex};
use crate::registry::RelationKind;

/// Topological order over belongs-to / has-many edges. Among nodes that are
/// ready at the same time the lowest document index goes first, so siblings
/// keep their document order.
pub(crate) fn insertion_order(
    nodes: &[Node<'_>],
    edges: &[Edge<'_>],
) -> Result<Vec<NodeIndex>, ValidationError> {
    let mut dependents: Vec<Vec<NodeIndex>> = vec![Vec::new(); nodes.len()];
    let mut blockers = vec![0usize; nodes.len()];

    for edge in edges {
        let (before, after) = match edge.relation.kind {
            RelationKind::BelongsToOne { .. } => (edge.related, edge.owner),
            RelationKind::HasMany { .. } => (edge.owner, edge.related),
            RelationKind::ManyToMany { .. } => continue,
        };
        dependents[before].push(after);
        blockers[after] += 1;
    }

    let mut ready: BinaryHeap<Reverse<NodeIndex>> = blockers
        .iter()
        .enumerate()
        .filter(|(_, n)| **n == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(Reverse(index)) = ready.pop() {
        order.push(index);
        for &next in &dependents[index] {
            blockers[next] -= 1;
            if blockers[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() < nodes.len() {
        let stuck = blockers
            .iter()
            .position(|n| *n > 0)
            .unwrap_or_default();
        return Err(ValidationError::DependencyCycle {
            path: nodes[stuck].path.clone(),
        });
    }
    Ok(order)
}
