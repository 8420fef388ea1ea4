//! Lineage graph derived from the cultivar database
//!
//! Hybrids carry mother/father references to other cultivars. This module
//! turns the flat cultivar list into a node/edge graph: one node per
//! cultivar with a computed generation (pure variety = 0, hybrid =
//! max(parent generations) + 1), and a mother and father edge for each
//! hybrid whose parents resolve. Dangling parent references are dropped
//! with a warning, never an error. The graph is a pure derivation: it is
//! rebuilt from the cultivar list on demand and only serialized as the
//! remote `genealogy` blob.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::model::Cultivar;

/// A cultivar as a graph node, with its computed generation
///
/// Carries the full cultivar record so the serialized graph is
/// self-contained (the per-file remote provider round-trips cultivars
/// through this shape).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineageNode {
    pub id: u64,
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub is_hybrid: bool,
    #[serde(default)]
    pub mother_plant: Option<u64>,
    #[serde(default)]
    pub father_plant: Option<u64>,
    #[serde(default)]
    pub mother_plant_name: Option<String>,
    #[serde(default)]
    pub father_plant_name: Option<String>,
    pub date_added: chrono::NaiveDate,
    /// 0 for pure varieties, parents' max + 1 for hybrids
    pub generation: u32,
}

/// Which parent an edge comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParentRole {
    Mother,
    Father,
}

/// A parent-to-child lineage edge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineageEdge {
    /// Parent cultivar id
    pub source: u64,
    /// Child cultivar id
    pub target: u64,
    /// Mother or father side
    #[serde(rename = "type")]
    pub role: ParentRole,
}

/// Generation buckets used by the genealogy page filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationBucket {
    /// Pure varieties (generation 0)
    Pure,
    /// First-generation hybrids
    F1,
    /// Second-generation hybrids
    F2,
    /// Third generation and beyond
    F3Plus,
}

impl GenerationBucket {
    fn matches(&self, generation: u32) -> bool {
        match self {
            GenerationBucket::Pure => generation == 0,
            GenerationBucket::F1 => generation == 1,
            GenerationBucket::F2 => generation == 2,
            GenerationBucket::F3Plus => generation >= 3,
        }
    }
}

/// Filter applied when building a view of the graph
#[derive(Debug, Clone, Default)]
pub struct LineageFilter {
    /// Keep only this species, if set
    pub species: Option<String>,
    /// Keep only this generation bucket, if set
    pub generation: Option<GenerationBucket>,
}

/// The derived lineage graph
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LineageGraph {
    pub nodes: Vec<LineageNode>,
    pub links: Vec<LineageEdge>,
}

impl LineageGraph {
    /// Build the full graph from the cultivar list
    pub fn build(cultivars: &[Cultivar]) -> Self {
        Self::build_filtered(cultivars, &LineageFilter::default())
    }

    /// Build a filtered view, always starting from the unfiltered data
    pub fn build_filtered(cultivars: &[Cultivar], filter: &LineageFilter) -> Self {
        let by_id: HashMap<u64, &Cultivar> = cultivars.iter().map(|c| (c.id, c)).collect();

        let mut nodes: Vec<LineageNode> = cultivars
            .iter()
            .map(|c| LineageNode {
                id: c.id,
                name: c.name.clone(),
                species: c.species.clone(),
                is_hybrid: c.is_hybrid,
                mother_plant: c.mother_plant,
                father_plant: c.father_plant,
                mother_plant_name: c.mother_plant_name.clone(),
                father_plant_name: c.father_plant_name.clone(),
                date_added: c.date_added,
                generation: generation_of(&by_id, c.id, &mut HashSet::new()),
            })
            .collect();

        if let Some(species) = &filter.species {
            nodes.retain(|n| &n.species == species);
        }
        if let Some(bucket) = filter.generation {
            nodes.retain(|n| bucket.matches(n.generation));
        }

        let visible: HashSet<u64> = nodes.iter().map(|n| n.id).collect();
        let mut links = Vec::new();

        for cultivar in cultivars {
            let Some((mother, father)) = cultivar.parents() else {
                continue;
            };
            if !visible.contains(&cultivar.id) {
                continue;
            }

            for (parent, role) in [(mother, ParentRole::Mother), (father, ParentRole::Father)] {
                if visible.contains(&parent) {
                    links.push(LineageEdge {
                        source: parent,
                        target: cultivar.id,
                        role,
                    });
                } else if !by_id.contains_key(&parent) {
                    tracing::warn!(
                        child = cultivar.id,
                        parent,
                        ?role,
                        "dropping lineage edge with dangling parent reference"
                    );
                }
            }
        }

        LineageGraph { nodes, links }
    }

    /// Reconstruct the cultivar records embedded in the nodes
    pub fn cultivars(&self) -> Vec<Cultivar> {
        self.nodes
            .iter()
            .map(|n| Cultivar {
                id: n.id,
                name: n.name.clone(),
                species: n.species.clone(),
                is_hybrid: n.is_hybrid,
                mother_plant: n.mother_plant,
                father_plant: n.father_plant,
                mother_plant_name: n.mother_plant_name.clone(),
                father_plant_name: n.father_plant_name.clone(),
                date_added: n.date_added,
            })
            .collect()
    }

    /// Node lookup by cultivar id
    pub fn node(&self, id: u64) -> Option<&LineageNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Generation of one cultivar: 0 for pure varieties, hybrids are one past
/// their deepest parent. The `visiting` set guards against reference
/// cycles, which would otherwise recurse forever; a cultivar seen twice
/// on the same path counts as generation 0.
fn generation_of(
    by_id: &HashMap<u64, &Cultivar>,
    id: u64,
    visiting: &mut HashSet<u64>,
) -> u32 {
    let Some(cultivar) = by_id.get(&id) else {
        return 0;
    };
    if !cultivar.is_hybrid {
        return 0;
    }
    if !visiting.insert(id) {
        tracing::warn!(cultivar = id, "lineage cycle detected, treating as pure");
        return 0;
    }

    let mother = cultivar
        .mother_plant
        .map(|m| generation_of(by_id, m, visiting))
        .unwrap_or(0);
    let father = cultivar
        .father_plant
        .map(|f| generation_of(by_id, f, visiting))
        .unwrap_or(0);

    visiting.remove(&id);
    mother.max(father) + 1
}
