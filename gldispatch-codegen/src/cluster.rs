//! Alias clustering.
//!
//! Partitions the registry's commands into dispatch sets: groups of entry
//! points that are synonyms of one logical operation and therefore share a
//! single dispatch pointer. Commands cluster when they share a basename
//! (vendor suffix stripped) or when one explicitly declares the other as its
//! alias. Merging goes through a disjoint-set structure, so the grouping is
//! independent of declaration order and terminates on any alias shape,
//! including chains.

use crate::error::CodegenError;
use gldispatch_registry::{Api, Command, Registry};
use log::debug;
use std::collections::HashMap;

/// Commands that share a basename with another entry point without being a
/// synonym of it. These always form single-member clusters.
///
/// The ARB debug-message functions accept fewer enums than their 4.3 core
/// namesakes; the ARB assembly-program queries operate on program objects
/// unrelated to the GLSL ones.
pub(crate) const UNALIASABLE_COMMANDS: &[&str] = &[
    "glDebugMessageControlARB",
    "glDebugMessageInsertARB",
    "glGetProgramivARB",
    "glIsProgramARB",
];

/// A feature or extension viewed as an availability condition for a command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Category<'a> {
    /// A core API release.
    Version { api: Api, version: u32 },
    /// An extension, identified by name.
    Extension { name: &'a str },
}

impl Category<'_> {
    /// Sort key implementing the resolver fallback priority: GL versions
    /// first in ascending order, then GLES versions, then extensions
    /// alphabetically.
    fn sort_key(&self) -> (u8, u32, &str) {
        match *self {
            Category::Version { api: Api::Gl | Api::GlCore, version } => (0, version, ""),
            Category::Version { version, .. } => (1, version, ""),
            Category::Extension { name } => (2, 0, name),
        }
    }
}

impl std::fmt::Display for Category<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Category::Version { api: Api::Gl | Api::GlCore, version } => {
                write!(f, "GL {}.{}", version / 10, version % 10)
            }
            Category::Version { version, .. } => {
                write!(f, "GLES {}.{}", version / 10, version % 10)
            }
            Category::Extension { name } => f.write_str(name),
        }
    }
}

/// One alias cluster: the synonyms of a logical operation together with the
/// ordered availability conditions the resolver will check.
#[derive(Debug)]
pub struct DispatchSet<'a> {
    /// Cluster members in registry order.
    pub members: Vec<&'a Command>,
    /// The lexicographically first member. Names the generated dispatch
    /// pointer, stub and resolver.
    pub primary: &'a Command,
    /// `(availability, command)` pairs ordered by [`Category`] priority.
    pub pairs: Vec<(Category<'a>, &'a Command)>,
}

impl<'a> DispatchSet<'a> {
    pub fn dispatch_name(&self) -> String {
        format!("gld_dispatch_{}", self.primary.name)
    }

    pub fn stub_name(&self) -> String {
        format!("stub_{}", self.primary.name)
    }

    pub fn resolve_name(&self) -> String {
        format!("resolve_{}", self.primary.name)
    }
}

/// Compute every dispatch set in the registry, ordered by primary command
/// name.
pub fn compute_dispatch_sets(registry: &Registry) -> Result<Vec<DispatchSet<'_>>, CodegenError> {
    let commands: Vec<&Command> = registry.commands.iter().collect();
    let index_of: HashMap<&str, usize> = commands
        .iter()
        .enumerate()
        .map(|(slot, cmd)| (cmd.name.as_str(), slot))
        .collect();

    let mut sets = DisjointSets::new(commands.len());

    // Merge by shared basename, except for the known false synonyms.
    let mut basename_first: HashMap<&str, usize> = HashMap::new();
    for (slot, command) in commands.iter().enumerate() {
        if UNALIASABLE_COMMANDS.contains(&command.name.as_str()) {
            debug!("{} is unaliasable, keeping it in its own cluster", command.name);
            continue;
        }
        match basename_first.get(command.basename.as_str()) {
            Some(&first) => sets.union(first, slot),
            None => {
                basename_first.insert(command.basename.as_str(), slot);
            }
        }
    }

    // Merge explicitly declared aliases.
    for (slot, command) in commands.iter().enumerate() {
        let Some(target) = command.alias.as_deref() else {
            continue;
        };
        let Some(&target_slot) = index_of.get(target) else {
            return Err(CodegenError::UnresolvedAlias {
                command: command.name.clone(),
                target: target.to_string(),
            });
        };
        sets.union(slot, target_slot);
    }

    // Collect clusters, preserving registry order of members.
    let mut clusters: Vec<Vec<&Command>> = Vec::new();
    let mut cluster_of_root: HashMap<usize, usize> = HashMap::new();
    for (slot, command) in commands.iter().enumerate() {
        let root = sets.find(slot);
        match cluster_of_root.get(&root) {
            Some(&cluster) => clusters[cluster].push(command),
            None => {
                cluster_of_root.insert(root, clusters.len());
                clusters.push(vec![command]);
            }
        }
    }

    let mut dispatch_sets: Vec<DispatchSet> = clusters
        .into_iter()
        .map(|members| build_dispatch_set(registry, members))
        .collect();
    dispatch_sets.sort_by(|a, b| a.primary.name.cmp(&b.primary.name));
    Ok(dispatch_sets)
}

fn build_dispatch_set<'a>(registry: &'a Registry, members: Vec<&'a Command>) -> DispatchSet<'a> {
    let mut pairs: Vec<(Category, &Command)> = Vec::new();
    for command in &members {
        for feature in lookup(&registry.features, &command.features) {
            let category = Category::Version {
                api: feature.api,
                version: feature.version,
            };
            pairs.push((category, command));
        }
        for extension in lookup(&registry.extensions, &command.extensions) {
            pairs.push((Category::Extension { name: &extension.name }, command));
        }
    }
    // Stable: pairs with equal categories keep member order.
    pairs.sort_by(|a, b| a.0.sort_key().cmp(&b.0.sort_key()));

    let primary = members
        .iter()
        .min_by(|a, b| a.name.cmp(&b.name))
        .copied()
        .expect("clusters are never empty");

    DispatchSet { members, primary, pairs }
}

fn lookup<'a, T: gldispatch_registry::Keyed<Key = String>>(
    owned: &'a gldispatch_registry::OrderedKeyedSet<T>,
    names: &'a gldispatch_registry::OrderedKeyedSet<String>,
) -> impl Iterator<Item = &'a T> {
    names.iter().filter_map(|name| owned.get(name))
}

/// Plain disjoint-set forest with path halving. Union keeps the smaller
/// root so cluster representatives stay deterministic.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        DisjointSets {
            parent: (0..len).collect(),
        }
    }

    fn find(&mut self, mut slot: usize) -> usize {
        while self.parent[slot] != slot {
            self.parent[slot] = self.parent[self.parent[slot]];
            slot = self.parent[slot];
        }
        slot
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let (keep, absorb) = if ra < rb { (ra, rb) } else { (rb, ra) };
        self.parent[absorb] = keep;
    }
}
