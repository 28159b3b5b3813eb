use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::schema::TableSetSchema;

/// Summary of FK graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FkGraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Report for FK dependency ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FkGraphReport {
    pub summary: FkGraphSummary,
    pub topo_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
}

/// Build a deterministic FK dependency report for a table set.
///
/// Self-referencing foreign keys do not create edges: a table may always be
/// generated before rows referencing itself exist.
pub fn build_fk_graph_report(set: &TableSetSchema) -> FkGraphReport {
    let graph = build_adjacency(set);
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = FkGraphSummary { nodes, edges };

    match toposort(&graph) {
        Ok(order) => FkGraphReport {
            summary,
            topo_order: Some(order),
            cycle: None,
        },
        Err(cycle) => FkGraphReport {
            summary,
            topo_order: None,
            cycle: Some(cycle),
        },
    }
}

fn build_adjacency(set: &TableSetSchema) -> BTreeMap<String, BTreeSet<String>> {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for table in &set.tables {
        graph.entry(table.name.clone()).or_default();

        for fk in &table.foreign_keys {
            if fk.referenced_table == table.name {
                continue;
            }
            graph
                .entry(fk.referenced_table.clone())
                .or_default()
                .insert(table.name.clone());
        }
    }

    graph
}

fn toposort(graph: &BTreeMap<String, BTreeSet<String>>) -> Result<Vec<String>, Vec<String>> {
    let mut indegree: BTreeMap<String, usize> = BTreeMap::new();

    for (node, targets) in graph {
        indegree.entry(node.clone()).or_insert(0);
        for target in targets {
            *indegree.entry(target.clone()).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<String> = indegree
        .iter()
        .filter_map(|(node, count)| if *count == 0 { Some(node.clone()) } else { None })
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = ready.pop_first() {
        order.push(node.clone());

        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(target.clone());
                    }
                }
            }
        }
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        let stuck: BTreeSet<&String> = indegree
            .iter()
            .filter_map(|(node, count)| if *count > 0 { Some(node) } else { None })
            .collect();
        Err(find_cycle(graph, &stuck))
    }
}

/// Follow "references" edges among the tables left unsorted until one
/// repeats. Tables that only depend on the loop are not part of it.
fn find_cycle(
    graph: &BTreeMap<String, BTreeSet<String>>,
    stuck: &BTreeSet<&String>,
) -> Vec<String> {
    let mut references: BTreeMap<&String, &String> = BTreeMap::new();
    for (referenced, referencing) in graph {
        if !stuck.contains(referenced) {
            continue;
        }
        for table in referencing {
            if stuck.contains(table) {
                references.entry(table).or_insert(referenced);
            }
        }
    }

    let mut path: Vec<&String> = Vec::new();
    let mut seen: BTreeMap<&String, usize> = BTreeMap::new();
    let mut current = stuck.first().copied();
    while let Some(node) = current {
        if let Some(&start) = seen.get(node) {
            return path[start..].iter().map(|name| name.to_string()).collect();
        }
        seen.insert(node, path.len());
        path.push(node);
        current = references.get(node).copied();
    }
    path.into_iter().cloned().collect()
}
