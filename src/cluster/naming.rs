// cluster/naming.rs
use ahash::AHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use log::debug;
use crate::types::{Category, Unit, UnitTable};
use crate::utils::string::sanitize_symbol;
use super::diagnostics::{DiagnosticKind, Diagnostics};
use super::engine::Cluster;

/// Two-way link between original row indices and merged unit names.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    /// Merged name per original index.
    new_index: Vec<String>,
    /// Original indices per merged name, in cluster creation order.
    former_indexes: Vec<(String, Vec<usize>)>,
    by_name: AHashMap<String, usize>,
}

impl Mapping {
    pub fn new_index(&self, original: usize) -> Option<&str> {
        self.new_index.get(original).map(String::as_str)
    }

    pub fn former_indexes(&self, name: &str) -> Option<&[usize]> {
        self.by_name
            .get(name)
            .map(|&pos| self.former_indexes[pos].1.as_slice())
    }

    /// Merged names with their members, in output row order.
    pub fn clusters(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.former_indexes
            .iter()
            .map(|(name, members)| (name.as_str(), members.as_slice()))
    }

    pub fn original_len(&self) -> usize {
        self.new_index.len()
    }

    pub fn merged_len(&self) -> usize {
        self.former_indexes.len()
    }
}

struct NewIndexView<'a>(&'a [String]);

impl Serialize for NewIndexView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, name) in self.0.iter().enumerate() {
            map.serialize_entry(&index, name)?;
        }
        map.end()
    }
}

struct FormerIndexesView<'a>(&'a [(String, Vec<usize>)]);

impl Serialize for FormerIndexesView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, members) in self.0 {
            map.serialize_entry(name, members)?;
        }
        map.end()
    }
}

impl Serialize for Mapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("NewIndex", &NewIndexView(&self.new_index))?;
        map.serialize_entry("FormerIndexes", &FormerIndexesView(&self.former_indexes))?;
        map.end()
    }
}

/// Symbol for a cluster: the original index list followed by the unit name for a lone
/// unit, or by its zone, technology, fuel and CHP type for a real merge.
pub fn cluster_name(members: &[usize], representative: &Unit) -> String {
    let indices = members
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let mut name = format!("[{}]", indices);
    if members.len() == 1 {
        name.push_str(" - ");
        name.push_str(&representative.name);
    } else {
        for cat in Category::ALL {
            name.push_str(" - ");
            name.push_str(representative.category(cat));
        }
    }
    sanitize_symbol(&name)
}

pub struct NameResolver;

impl NameResolver {
    /// Turns finished clusters into output rows named after their members, plus the mapping.
    pub fn resolve(
        columns: Vec<String>,
        clusters: Vec<Cluster>,
        original_len: usize,
        diagnostics: &mut Diagnostics,
    ) -> (UnitTable, Mapping) {
        let mut table = UnitTable::new(columns);
        let mut mapping = Mapping {
            new_index: vec![String::new(); original_len],
            former_indexes: Vec::with_capacity(clusters.len()),
            by_name: AHashMap::with_capacity(clusters.len()),
        };

        for cluster in clusters {
            let Cluster { mut representative, members, .. } = cluster;
            let name = cluster_name(&members, &representative);
            debug!("Cluster {} absorbs {} unit(s)", name, members.len());

            for &original in &members {
                if let Some(slot) = mapping.new_index.get_mut(original) {
                    slot.clone_from(&name);
                }
            }
            mapping.by_name.insert(name.clone(), mapping.former_indexes.len());
            mapping.former_indexes.push((name.clone(), members));

            representative.name = name;
            table.push(representative);
        }

        if original_len != table.len() {
            diagnostics.info(DiagnosticKind::Reduced { original: original_len, merged: table.len() });
        } else {
            diagnostics.info(DiagnosticKind::NoReduction { units: original_len });
        }

        (table, mapping)
    }
}
