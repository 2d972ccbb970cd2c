//! Append-only lineage forest across geological time.
//!
//! Nodes reference each other by id only; every lookup goes through the
//! owning tree, so there are no ownership cycles and snapshotting is a
//! plain serde pass.

use crate::speciation::SpeciationType;
use ecogenesis_data::{Diet, SpeciesPopulation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use uuid::Uuid;

/// One species in the tree of life. `extinction_year` of zero means extant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhyloNode {
    pub species_id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub children: Vec<Uuid>,
    pub origin_year: u64,
    pub extinction_year: u64,
    pub speciation_type: SpeciationType,
    pub diet: Diet,
    pub genome_hex: Option<String>,
    pub depth: u32,
}

impl PhyloNode {
    pub fn is_extant(&self) -> bool {
        self.extinction_year == 0
    }

    /// Whether the species' lifespan brackets `year`.
    pub fn alive_at(&self, year: u64) -> bool {
        self.origin_year <= year && (self.is_extant() || self.extinction_year >= year)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhylogeneticTree {
    pub world_id: Uuid,
    pub nodes: BTreeMap<Uuid, PhyloNode>,
    pub roots: Vec<Uuid>,
    pub extant_count: usize,
    pub extinct_count: usize,
    pub max_depth: u32,
}

impl PhylogeneticTree {
    pub fn new(world_id: Uuid) -> Self {
        Self {
            world_id,
            nodes: BTreeMap::new(),
            roots: Vec::new(),
            extant_count: 0,
            extinct_count: 0,
            max_depth: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: Uuid) -> Option<&PhyloNode> {
        self.nodes.get(&id)
    }

    /// Register a founding species at depth zero. No-op if already known.
    pub fn add_root(&mut self, species: &SpeciesPopulation) {
        if self.nodes.contains_key(&species.id) {
            return;
        }
        let node = PhyloNode {
            species_id: species.id,
            name: species.name.clone(),
            parent_id: None,
            children: Vec::new(),
            origin_year: species.origin_year,
            extinction_year: 0,
            speciation_type: SpeciationType::Root,
            diet: species.diet,
            genome_hex: species.genome.as_ref().map(|g| g.to_hex()),
            depth: 0,
        };
        self.nodes.insert(species.id, node);
        self.roots.push(species.id);
        self.extant_count += 1;
    }

    /// Link a daughter species under its parent, auto-creating an unknown
    /// parent as a root.
    pub fn add_speciation(
        &mut self,
        parent_id: Uuid,
        child: &SpeciesPopulation,
        speciation_type: SpeciationType,
    ) {
        if self.nodes.contains_key(&child.id) {
            return;
        }
        if !self.nodes.contains_key(&parent_id) {
            let placeholder = PhyloNode {
                species_id: parent_id,
                name: format!("Lineage-{}", &parent_id.to_string()[..4]),
                parent_id: None,
                children: Vec::new(),
                origin_year: child.origin_year,
                extinction_year: 0,
                speciation_type: SpeciationType::Root,
                diet: child.diet,
                genome_hex: None,
                depth: 0,
            };
            self.nodes.insert(parent_id, placeholder);
            self.roots.push(parent_id);
            self.extant_count += 1;
        }

        let parent_depth = self.nodes[&parent_id].depth;
        let node = PhyloNode {
            species_id: child.id,
            name: child.name.clone(),
            parent_id: Some(parent_id),
            children: Vec::new(),
            origin_year: child.origin_year,
            extinction_year: 0,
            speciation_type,
            diet: child.diet,
            genome_hex: child.genome.as_ref().map(|g| g.to_hex()),
            depth: parent_depth + 1,
        };
        self.max_depth = self.max_depth.max(node.depth);
        self.nodes.insert(child.id, node);
        if let Some(parent) = self.nodes.get_mut(&parent_id) {
            parent.children.push(child.id);
        }
        self.extant_count += 1;
    }

    /// Close a lineage. Idempotent; unknown ids are a no-op by design.
    pub fn mark_extinct(&mut self, id: Uuid, year: u64) {
        if let Some(node) = self.nodes.get_mut(&id) {
            if node.extinction_year == 0 {
                node.extinction_year = year.max(1);
                self.extant_count -= 1;
                self.extinct_count += 1;
            }
        }
    }

    /// Walk parent links up to the root. Does not include `id` itself.
    pub fn ancestors_of(&self, id: Uuid) -> Vec<Uuid> {
        let mut ancestors = Vec::new();
        let mut current = self.nodes.get(&id).and_then(|n| n.parent_id);
        while let Some(ancestor) = current {
            ancestors.push(ancestor);
            current = self.nodes.get(&ancestor).and_then(|n| n.parent_id);
        }
        ancestors
    }

    /// All descendants, breadth-first. Does not include `id` itself.
    pub fn descendants_of(&self, id: Uuid) -> Vec<Uuid> {
        let mut descendants = Vec::new();
        let mut queue: VecDeque<Uuid> = VecDeque::new();
        queue.push_back(id);
        while let Some(current) = queue.pop_front() {
            if let Some(node) = self.nodes.get(&current) {
                for &child in &node.children {
                    descendants.push(child);
                    queue.push_back(child);
                }
            }
        }
        descendants
    }

    /// Most recent common ancestor, counting a node as its own ancestor.
    pub fn common_ancestor(&self, a: Uuid, b: Uuid) -> Option<Uuid> {
        if !self.nodes.contains_key(&a) || !self.nodes.contains_key(&b) {
            return None;
        }
        let mut line_of_a: BTreeSet<Uuid> = BTreeSet::new();
        line_of_a.insert(a);
        for ancestor in self.ancestors_of(a) {
            line_of_a.insert(ancestor);
        }
        if line_of_a.contains(&b) {
            return Some(b);
        }
        for candidate in self.ancestors_of(b) {
            if line_of_a.contains(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Steps from `a` up to the common ancestor plus steps from `b` up to
    /// it; -1 when the two sit in different roots.
    pub fn phylogenetic_distance(&self, a: Uuid, b: Uuid) -> i64 {
        if a == b {
            return if self.nodes.contains_key(&a) { 0 } else { -1 };
        }
        let Some(ancestor) = self.common_ancestor(a, b) else {
            return -1;
        };
        (self.steps_up(a, ancestor) + self.steps_up(b, ancestor)) as i64
    }

    fn steps_up(&self, from: Uuid, to: Uuid) -> u64 {
        let mut steps = 0;
        let mut current = from;
        while current != to {
            match self.nodes.get(&current).and_then(|n| n.parent_id) {
                Some(parent) => {
                    steps += 1;
                    current = parent;
                }
                None => break,
            }
        }
        steps
    }

    /// Every species whose lifespan brackets `year`.
    pub fn species_at_year(&self, year: u64) -> Vec<Uuid> {
        self.nodes
            .values()
            .filter(|n| n.alive_at(year))
            .map(|n| n.species_id)
            .collect()
    }

    /// Diversity sampled on a year grid over `[from, to]`.
    pub fn diversity_over_time(&self, from: u64, to: u64, step: u64) -> Vec<(u64, usize)> {
        let step = step.max(1);
        let mut samples = Vec::new();
        let mut year = from;
        while year <= to {
            samples.push((year, self.species_at_year(year).len()));
            year += step;
        }
        samples
    }

    /// Extant descendants of a given ancestor.
    pub fn lineage_survivors(&self, ancestor: Uuid) -> Vec<Uuid> {
        self.descendants_of(ancestor)
            .into_iter()
            .filter(|id| self.nodes.get(id).map(|n| n.is_extant()).unwrap_or(false))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecogenesis_data::OrganismTraits;

    fn species(name: &str, year: u64) -> SpeciesPopulation {
        SpeciesPopulation::new(name, OrganismTraits::default(), 100, year)
    }

    fn sample_tree() -> (PhylogeneticTree, Uuid, Uuid, Uuid, Uuid) {
        let mut tree = PhylogeneticTree::new(Uuid::new_v4());
        let root = species("Root", 0);
        let c1 = species("Child1", 100);
        let c2 = species("Child2", 150);
        let grandchild = species("Grandchild", 300);
        tree.add_root(&root);
        tree.add_speciation(root.id, &c1, SpeciationType::Allopatric);
        tree.add_speciation(root.id, &c2, SpeciationType::Sympatric);
        tree.add_speciation(c1.id, &grandchild, SpeciationType::Peripatric);
        (tree, root.id, c1.id, c2.id, grandchild.id)
    }

    #[test]
    fn test_depth_follows_parent() {
        let (tree, root, c1, _c2, grandchild) = sample_tree();
        assert_eq!(tree.node(root).unwrap().depth, 0);
        assert_eq!(tree.node(c1).unwrap().depth, 1);
        assert_eq!(tree.node(grandchild).unwrap().depth, 2);
        assert_eq!(tree.max_depth, 2);
    }

    #[test]
    fn test_counters_balance() {
        let (mut tree, _root, c1, _c2, _g) = sample_tree();
        assert_eq!(tree.extant_count + tree.extinct_count, tree.len());
        tree.mark_extinct(c1, 500);
        tree.mark_extinct(c1, 600); // second call is a no-op
        assert_eq!(tree.extinct_count, 1);
        assert_eq!(tree.extant_count + tree.extinct_count, tree.len());
        assert_eq!(tree.node(c1).unwrap().extinction_year, 500);
    }

    #[test]
    fn test_phylogenetic_distances() {
        let (tree, root, c1, c2, grandchild) = sample_tree();
        assert_eq!(tree.phylogenetic_distance(root, root), 0);
        assert_eq!(tree.phylogenetic_distance(root, c1), 1);
        assert_eq!(tree.phylogenetic_distance(c1, c2), 2);
        assert_eq!(tree.phylogenetic_distance(grandchild, c2), 3);
    }

    #[test]
    fn test_distance_across_roots_is_negative() {
        let mut tree = PhylogeneticTree::new(Uuid::new_v4());
        let a = species("IslandA", 0);
        let b = species("IslandB", 0);
        tree.add_root(&a);
        tree.add_root(&b);
        assert_eq!(tree.phylogenetic_distance(a.id, b.id), -1);
    }

    #[test]
    fn test_auto_created_parent_becomes_root() {
        let mut tree = PhylogeneticTree::new(Uuid::new_v4());
        let orphan_parent = Uuid::new_v4();
        let child = species("Foundling", 50);
        tree.add_speciation(orphan_parent, &child, SpeciationType::Allopatric);
        assert_eq!(tree.roots, vec![orphan_parent]);
        assert_eq!(tree.node(child.id).unwrap().depth, 1);
        assert_eq!(tree.extant_count, 2);
    }

    #[test]
    fn test_species_at_year_and_survivors() {
        let (mut tree, root, c1, c2, grandchild) = sample_tree();
        tree.mark_extinct(c2, 400);
        assert!(tree.species_at_year(200).contains(&c2));
        assert!(!tree.species_at_year(500).contains(&c2));

        let survivors = tree.lineage_survivors(root);
        assert!(survivors.contains(&c1));
        assert!(survivors.contains(&grandchild));
        assert!(!survivors.contains(&c2));

        let grid = tree.diversity_over_time(0, 400, 200);
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], (0, 1));
    }
}
