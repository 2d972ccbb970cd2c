//! Ecological-relationship graph and the extinction-cascade walker.
//!
//! Relationships are directed edges `source -> target` meaning the source
//! depends on, or acts upon, the target. When a species goes extinct the
//! cascade walks outward by generation: dependents take a hit, prey and
//! competitors are released, and keystone losses splash onto everything
//! else.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipKind {
    Predation,
    Mutualism,
    Commensalism,
    Parasitism,
    Competition,
    Habitat,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum EcologicalRole {
    ApexPredator,
    Keystone,
    Pollinator,
    EcosystemEngineer,
    FoundationSpecies,
    Decomposer,
    Scavenger,
}

/// Directed ecological dependency with a strength in [0, 1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcologicalRelationship {
    pub source: Uuid,
    pub target: Uuid,
    pub kind: RelationshipKind,
    pub strength: f64,
    pub obligate: bool,
}

/// One step of a cascade, in event-stream form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeEventRecord {
    pub year: u64,
    pub trigger: Uuid,
    pub affected: Uuid,
    pub cascade_type: String,
    pub impact: f64,
    pub description: String,
}

/// Everything one cascade did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CascadeResult {
    pub events: Vec<CascadeEventRecord>,
    pub secondary_extinctions: Vec<Uuid>,
    pub multipliers: BTreeMap<Uuid, f64>,
    pub affected_count: usize,
    pub depth: usize,
}

/// The relationship graph over species, with role tags and keystone scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CascadeSimulator {
    graph: DiGraph<Uuid, EcologicalRelationship>,
    id_map: BTreeMap<Uuid, NodeIndex>,
    roles: BTreeMap<Uuid, BTreeSet<EcologicalRole>>,
    keystone_importance: BTreeMap<Uuid, f64>,
}

impl CascadeSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_node(&mut self, id: Uuid) -> NodeIndex {
        if let Some(&idx) = self.id_map.get(&id) {
            return idx;
        }
        let idx = self.graph.add_node(id);
        self.id_map.insert(id, idx);
        idx
    }

    pub fn add_relationship(&mut self, relationship: EcologicalRelationship) {
        let source = self.ensure_node(relationship.source);
        let target = self.ensure_node(relationship.target);
        self.graph.add_edge(source, target, relationship);
    }

    pub fn add_role(&mut self, id: Uuid, role: EcologicalRole) {
        self.ensure_node(id);
        self.roles.entry(id).or_default().insert(role);
    }

    pub fn roles_of(&self, id: Uuid) -> Option<&BTreeSet<EcologicalRole>> {
        self.roles.get(&id)
    }

    pub fn set_keystone_importance(&mut self, id: Uuid, importance: f64) {
        self.ensure_node(id);
        self.keystone_importance
            .insert(id, importance.clamp(0.0, 1.0));
    }

    pub fn keystone_importance(&self, id: Uuid) -> f64 {
        self.keystone_importance.get(&id).copied().unwrap_or(0.0)
    }

    pub fn species_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn relationship_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Score every species by who depends on it: 0.1 per incoming
    /// dependency, 0.2 extra per obligate one, 0.3 for engineer/foundation
    /// roles. Scores of 0.3 and up are tagged keystone.
    pub fn identify_keystones(&mut self) -> Vec<Uuid> {
        let mut keystones = Vec::new();
        let ids: Vec<(Uuid, NodeIndex)> =
            self.id_map.iter().map(|(id, idx)| (*id, *idx)).collect();
        for (id, idx) in ids {
            let mut importance: f64 = 0.0;
            for edge in self
                .graph
                .edges_directed(idx, petgraph::Direction::Incoming)
            {
                importance += 0.1;
                if edge.weight().obligate {
                    importance += 0.2;
                }
            }
            if let Some(roles) = self.roles.get(&id) {
                if roles.contains(&EcologicalRole::EcosystemEngineer)
                    || roles.contains(&EcologicalRole::FoundationSpecies)
                {
                    importance += 0.3;
                }
            }
            if importance >= 0.3 {
                self.keystone_importance.insert(id, importance.min(1.0));
                self.roles.entry(id).or_default().insert(EcologicalRole::Keystone);
                keystones.push(id);
            }
        }
        keystones
    }

    /// Ids connected to `id` by any edge, in either direction.
    fn neighbors_of(&self, id: Uuid) -> BTreeSet<Uuid> {
        let mut neighbors = BTreeSet::new();
        for edge in self.graph.edge_references() {
            let rel = edge.weight();
            if rel.source == id {
                neighbors.insert(rel.target);
            }
            if rel.target == id {
                neighbors.insert(rel.source);
            }
        }
        neighbors
    }

    /// Walk the shock outward from an extinction, breadth-first by
    /// generation. Each species is visited at most once and the walk never
    /// exceeds `max_generations`, so termination is guaranteed.
    pub fn calculate_cascade(
        &self,
        extinct: Uuid,
        year: u64,
        max_generations: usize,
    ) -> CascadeResult {
        let mut result = CascadeResult::default();
        let mut processed: BTreeSet<Uuid> = BTreeSet::new();
        let mut queued: BTreeSet<Uuid> = BTreeSet::new();
        let mut queue: VecDeque<(Uuid, usize)> = VecDeque::new();
        queue.push_back((extinct, 0));
        queued.insert(extinct);

        while let Some((current, generation)) = queue.pop_front() {
            if generation >= max_generations {
                continue;
            }
            if !processed.insert(current) {
                continue;
            }
            result.depth = result.depth.max(generation);

            let mut impacts: Vec<(Uuid, f64, String)> = Vec::new();
            for edge in self.graph.edge_references() {
                let rel = edge.weight();
                if rel.target == current && rel.source != current {
                    let factor = if rel.obligate {
                        1.0
                    } else {
                        match rel.kind {
                            RelationshipKind::Predation => 0.7,
                            RelationshipKind::Habitat => 0.8,
                            RelationshipKind::Mutualism => 0.5,
                            RelationshipKind::Commensalism => 0.3,
                            _ => 0.2,
                        }
                    };
                    let impact = -(rel.strength * factor);
                    let kind = if rel.obligate && impact <= -0.9 {
                        "co_extinction"
                    } else {
                        "dependency_loss"
                    };
                    impacts.push((rel.source, impact, kind.to_string()));
                }
                if rel.source == current && rel.target != current {
                    let (release, kind) = match rel.kind {
                        RelationshipKind::Predation => (0.5, "predator_release"),
                        RelationshipKind::Competition => (0.4, "competitive_release"),
                        RelationshipKind::Parasitism => (0.2, "parasite_removal"),
                        _ => (0.0, ""),
                    };
                    if release > 0.0 {
                        impacts.push((rel.target, rel.strength * release, kind.to_string()));
                    }
                }
            }

            let importance = self.keystone_importance(current);
            if importance > 0.0 {
                let neighbors = self.neighbors_of(current);
                for &other in self.id_map.keys() {
                    if other != current && !neighbors.contains(&other) {
                        impacts.push((
                            other,
                            -(importance * 0.3),
                            "keystone_loss".to_string(),
                        ));
                    }
                }
            }

            for (affected, impact, kind) in impacts {
                let multiplier = result.multipliers.entry(affected).or_insert(1.0);
                *multiplier = (*multiplier * (1.0 + impact)).max(0.0);
                result.events.push(CascadeEventRecord {
                    year,
                    trigger: current,
                    affected,
                    cascade_type: kind.clone(),
                    impact,
                    description: format!("{} via {}", kind, current),
                });
                if *multiplier <= 0.1 && !queued.contains(&affected) {
                    result.secondary_extinctions.push(affected);
                    queued.insert(affected);
                    queue.push_back((affected, generation + 1));
                }
            }
        }

        result.affected_count = result.multipliers.len();
        result
    }
}
