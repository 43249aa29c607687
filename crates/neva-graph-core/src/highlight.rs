//! Hover highlighting state machine.
//!
//! Each transition is a pure function from the current snapshot and a hover
//! event to the next snapshot. Flags are recomputed from the full edge list
//! on every event, so repeated enter/leave cycles can never leave stale
//! emphasis behind.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::entity::EntityKind;
use crate::graph::{Graph, NodeDisplay, NodeId};

/// Pointer event delivered by the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverEvent {
    Enter(NodeId),
    Leave,
}

/// Which node kinds react to hovering with neighborhood emphasis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPolicy {
    eligible: HashSet<EntityKind>,
}

impl Default for HighlightPolicy {
    /// Only components are eligible.
    fn default() -> Self {
        Self::only([EntityKind::Component])
    }
}

impl HighlightPolicy {
    pub fn only(kinds: impl IntoIterator<Item = EntityKind>) -> Self {
        Self {
            eligible: kinds.into_iter().collect(),
        }
    }

    pub fn is_eligible(&self, kind: EntityKind) -> bool {
        self.eligible.contains(&kind)
    }

    /// Eligible kinds in declaration order.
    pub fn eligible_kinds(&self) -> Vec<EntityKind> {
        EntityKind::ALL
            .into_iter()
            .filter(|kind| self.eligible.contains(kind))
            .collect()
    }
}

/// Derives emphasis flags for hover events.
#[derive(Debug, Clone, Default)]
pub struct HighlightEngine {
    policy: HighlightPolicy,
}

impl HighlightEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: HighlightPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &HighlightPolicy {
        &self.policy
    }

    /// Dispatch a hover event to the matching transition.
    pub fn apply(&self, event: &HoverEvent, current: &Arc<Graph>) -> Arc<Graph> {
        match event {
            HoverEvent::Enter(node) => self.on_enter(node, current),
            HoverEvent::Leave => self.on_leave(current),
        }
    }

    /// Emphasize the neighborhood of `hovered`.
    ///
    /// Edges touching the hovered node become highlighted, the nodes at
    /// their other end become highlighted, and every other node (the hovered
    /// node included) becomes dimmed. Hovering an unknown or ineligible node
    /// returns `current` itself.
    pub fn on_enter(&self, hovered: &NodeId, current: &Arc<Graph>) -> Arc<Graph> {
        let eligible = current
            .node(hovered)
            .is_some_and(|node| self.policy.is_eligible(node.kind));
        if !eligible {
            debug!(node = %hovered, "Hover target not eligible for highlighting");
            return Arc::clone(current);
        }

        let mut next = Graph::clone(current);
        let mut neighbors: HashSet<NodeId> = HashSet::new();

        for edge in &mut next.edges {
            let related = edge.touches(hovered);
            edge.highlighted = related;
            if related {
                let neighbor = if &edge.source == hovered {
                    &edge.target
                } else {
                    &edge.source
                };
                neighbors.insert(neighbor.clone());
            }
        }

        for node in &mut next.nodes {
            node.display = if neighbors.contains(&node.id) {
                NodeDisplay::Highlighted
            } else {
                NodeDisplay::Dimmed
            };
        }

        debug!(node = %hovered, neighbors = neighbors.len(), "Highlighted neighborhood");
        Arc::new(next)
    }

    /// Clear all emphasis. A snapshot that is already neutral is returned
    /// as is.
    pub fn on_leave(&self, current: &Arc<Graph>) -> Arc<Graph> {
        if current.is_neutral() {
            return Arc::clone(current);
        }

        let mut next = Graph::clone(current);

        for edge in next.edges.iter_mut().filter(|edge| edge.highlighted) {
            edge.highlighted = false;
        }
        for node in &mut next.nodes {
            node.display = NodeDisplay::Neutral;
        }

        Arc::new(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::TestGraphBuilder;

    fn display_of(graph: &Graph, id: &str) -> NodeDisplay {
        graph.node(&NodeId::from(id)).unwrap().display
    }

    fn chain() -> Arc<Graph> {
        Arc::new(TestGraphBuilder::chain(&["a", "b", "c"]))
    }

    #[test]
    fn enter_highlights_neighbors_and_dims_hovered() {
        let engine = HighlightEngine::new();
        let next = engine.on_enter(&NodeId::from("b"), &chain());

        assert_eq!(display_of(&next, "a"), NodeDisplay::Highlighted);
        assert_eq!(display_of(&next, "c"), NodeDisplay::Highlighted);
        assert_eq!(display_of(&next, "b"), NodeDisplay::Dimmed);
        assert!(next.edges.iter().all(|edge| edge.highlighted));
    }

    #[test]
    fn enter_on_endpoint_dims_unrelated_nodes() {
        let engine = HighlightEngine::new();
        let next = engine.on_enter(&NodeId::from("a"), &chain());

        assert_eq!(display_of(&next, "a"), NodeDisplay::Dimmed);
        assert_eq!(display_of(&next, "b"), NodeDisplay::Highlighted);
        assert_eq!(display_of(&next, "c"), NodeDisplay::Dimmed);
        assert!(next.edges[0].highlighted);
        assert!(!next.edges[1].highlighted);
    }

    #[test]
    fn enter_does_not_mutate_input() {
        let engine = HighlightEngine::new();
        let current = chain();
        let next = engine.on_enter(&NodeId::from("b"), &current);

        assert!(!Arc::ptr_eq(&current, &next));
        assert!(current.is_neutral());
    }

    #[test]
    fn moving_hover_recomputes_from_scratch() {
        let engine = HighlightEngine::new();
        let mut builder = TestGraphBuilder::new();
        builder
            .add_component("a")
            .add_component("b")
            .add_component("c")
            .add_component("d");
        builder.add_edge("a", "b").add_edge("c", "d");
        let graph = Arc::new(builder.build());

        let first = engine.on_enter(&NodeId::from("a"), &graph);
        assert_eq!(display_of(&first, "b"), NodeDisplay::Highlighted);

        let second = engine.on_enter(&NodeId::from("c"), &first);
        assert_eq!(display_of(&second, "b"), NodeDisplay::Dimmed);
        assert_eq!(display_of(&second, "d"), NodeDisplay::Highlighted);
        assert!(!second.edges[0].highlighted);
        assert!(second.edges[1].highlighted);
    }

    #[test]
    fn self_loop_keeps_hovered_node_highlighted() {
        let engine = HighlightEngine::new();
        let mut builder = TestGraphBuilder::new();
        builder.add_component("a").add_edge("a", "a");
        let next = engine.on_enter(&NodeId::from("a"), &Arc::new(builder.build()));

        assert_eq!(display_of(&next, "a"), NodeDisplay::Highlighted);
    }

    #[test]
    fn ineligible_or_unknown_target_is_a_no_op() {
        let engine = HighlightEngine::new();
        let mut builder = TestGraphBuilder::new();
        builder
            .add_component("a")
            .add_node("t", EntityKind::Type)
            .add_edge("a", "t");
        let graph = Arc::new(builder.build());

        let next = engine.on_enter(&NodeId::from("t"), &graph);
        assert!(Arc::ptr_eq(&graph, &next));

        let next = engine.on_enter(&NodeId::from("missing"), &graph);
        assert!(Arc::ptr_eq(&graph, &next));
    }

    #[test]
    fn policy_can_widen_eligibility() {
        let engine = HighlightEngine::with_policy(HighlightPolicy::only([
            EntityKind::Component,
            EntityKind::Interface,
        ]));
        let mut builder = TestGraphBuilder::new();
        builder
            .add_component("a")
            .add_node("i", EntityKind::Interface)
            .add_edge("a", "i");
        let graph = Arc::new(builder.build());

        let next = engine.on_enter(&NodeId::from("i"), &graph);
        assert_eq!(display_of(&next, "a"), NodeDisplay::Highlighted);
        assert_eq!(
            engine.policy().eligible_kinds(),
            vec![EntityKind::Component, EntityKind::Interface]
        );
    }

    #[test]
    fn leave_resets_everything_and_is_idempotent() {
        let engine = HighlightEngine::new();
        let hovered = engine.on_enter(&NodeId::from("b"), &chain());
        assert!(!hovered.is_neutral());

        let once = engine.on_leave(&hovered);
        assert!(once.is_neutral());

        let twice = engine.on_leave(&once);
        assert!(Arc::ptr_eq(&once, &twice));
    }

    #[test]
    fn apply_dispatches_events() {
        let engine = HighlightEngine::new();
        let graph = chain();

        let entered = engine.apply(&HoverEvent::Enter(NodeId::from("a")), &graph);
        assert_eq!(display_of(&entered, "b"), NodeDisplay::Highlighted);

        let left = engine.apply(&HoverEvent::Leave, &entered);
        assert_eq!(*left, *graph);
    }
}
