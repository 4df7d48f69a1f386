//! Hand-rolled directed multigraph over page transitions and jumpers, plus
//! DOT-language export (spec §4.E).
//!
//! No external graph crate is used here: nodes are indexed with
//! `indexmap::IndexSet` the same way the rest of this codebase reaches for
//! `indexmap` wherever it needs an ordered, deduplicated association, and
//! edges are a plain adjacency list keyed by node index.

use indexmap::IndexSet;
use std::collections::HashSet;
use std::fmt::Write as _;

use crate::model::Questionnaire;
use crate::scanner;

/// One edge before label aggregation: a transition or a jumper, carrying
/// enough to reconstruct both rendering modes.
#[derive(Debug, Clone)]
struct RawEdge {
    from: usize,
    to: usize,
    index: usize,
    condition: Option<String>,
    is_jumper: bool,
}

/// A directed multigraph of page uids, built once from a [`Questionnaire`]'s
/// active page view.
pub struct FlowGraph {
    nodes: IndexSet<String>,
    edges: Vec<RawEdge>,
}

/// Rendering options for [`FlowGraph::to_dot`] (spec §4.E / §6 presets).
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub show_cond: bool,
    pub show_var: bool,
    pub remove_cond_false: bool,
    pub rewrite: bool,
    pub include_jumpers: bool,
    pub color_nodes: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_cond: true,
            show_var: false,
            remove_cond_false: false,
            rewrite: false,
            include_jumpers: false,
            color_nodes: false,
        }
    }
}

impl RenderOptions {
    pub fn preset(name: &str) -> Self {
        match name {
            "cond" => RenderOptions {
                show_cond: true,
                ..Default::default()
            },
            "vars" => RenderOptions {
                show_cond: false,
                show_var: true,
                remove_cond_false: true,
                ..Default::default()
            },
            "bare" => RenderOptions {
                show_cond: false,
                show_var: false,
                remove_cond_false: true,
                color_nodes: true,
                ..Default::default()
            },
            "bare-rewrite" => RenderOptions {
                show_cond: false,
                show_var: false,
                remove_cond_false: true,
                rewrite: true,
                color_nodes: true,
                ..Default::default()
            },
            _ => RenderOptions::default(),
        }
    }
}

const PALETTE: &[&str] = &[
    "lightblue", "lightpink", "lightyellow", "lightgreen", "lightgrey", "khaki", "plum", "wheat",
];

impl FlowGraph {
    /// Build the graph from a questionnaire's current active page view, so
    /// that a prior `filter`/`collapse_pages` mask is reflected in what gets
    /// drawn.
    pub fn build(questionnaire: &Questionnaire) -> Self {
        let mut nodes: IndexSet<String> = IndexSet::new();
        for page in questionnaire.active_pages() {
            nodes.insert(page.uid.clone());
        }

        let mut edges = Vec::new();
        for page in questionnaire.active_pages() {
            let Some(from) = nodes.get_index_of(&page.uid) else {
                continue;
            };
            for (index, transition) in page.transitions.iter().enumerate() {
                if let Some(to) = nodes.get_index_of(&transition.target_uid) {
                    edges.push(RawEdge {
                        from,
                        to,
                        index,
                        condition: Some(transition.condition.clone()),
                        is_jumper: false,
                    });
                }
            }
            for (index, jumper) in page.jumpers.iter().enumerate() {
                if let Some(to) = nodes.get_index_of(&jumper.target) {
                    edges.push(RawEdge {
                        from,
                        to,
                        index,
                        condition: None,
                        is_jumper: true,
                    });
                }
            }
        }

        Self { nodes, edges }
    }

    fn non_self_loop_edges(&self) -> impl Iterator<Item = &RawEdge> {
        self.edges.iter().filter(|e| e.from != e.to)
    }

    /// Kahn's algorithm over the self-loop-free transition-only edge set,
    /// breaking ties by lexicographic node uid order. `Err` carries one
    /// elementary cycle when the graph is not a DAG.
    pub fn topological_order(&self) -> Result<Vec<String>, Vec<String>> {
        let n = self.nodes.len();
        let mut indegree = vec![0usize; n];
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for edge in self.non_self_loop_edges().filter(|e| !e.is_jumper) {
            adjacency[edge.from].push(edge.to);
            indegree[edge.to] += 1;
        }

        let mut ready: std::collections::BTreeSet<(String, usize)> = indegree
            .iter()
            .enumerate()
            .filter(|(_, &d)| d == 0)
            .map(|(i, _)| (self.nodes[i].clone(), i))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some((uid, idx)) = ready.iter().next().cloned() {
            ready.remove(&(uid.clone(), idx));
            order.push(uid);
            for &next in &adjacency[idx] {
                indegree[next] -= 1;
                if indegree[next] == 0 {
                    ready.insert((self.nodes[next].clone(), next));
                }
            }
        }

        if order.len() == n {
            Ok(order)
        } else {
            Err(self.find_one_cycle())
        }
    }

    /// Enumerate one elementary cycle via DFS, used as the topological
    /// sort's failure report. Returns the cycle's node uids in visitation
    /// order, repeating the start node at the end.
    fn find_one_cycle(&self) -> Vec<String> {
        let n = self.nodes.len();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
        for edge in self.non_self_loop_edges().filter(|e| !e.is_jumper) {
            adjacency[edge.from].push(edge.to);
        }
        for v in &mut adjacency {
            v.sort();
        }

        let mut visiting = vec![false; n];
        let mut visited = vec![false; n];
        let mut stack = Vec::new();

        for start in 0..n {
            if visited[start] {
                continue;
            }
            if let Some(cycle) = dfs_find_cycle(start, &adjacency, &mut visiting, &mut visited, &mut stack) {
                return cycle.into_iter().map(|i| self.nodes[i].clone()).collect();
            }
        }
        Vec::new()
    }

    /// Node labels, aggregated edge labels, and prefix colors, rendered as
    /// a DOT-language digraph.
    pub fn to_dot(&self, questionnaire: &Questionnaire, options: RenderOptions, graph_label: Option<&str>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "digraph flow {{");
        let _ = writeln!(out, "  node [shape=box];");
        if let Some(label) = graph_label {
            let _ = writeln!(out, "  graph [label=\"{}\"];", escape_dot(label));
        }

        let colors = self.color_assignment(options.color_nodes);

        for (idx, uid) in self.nodes.iter().enumerate() {
            let label = if options.show_var {
                self.node_label_with_vars(questionnaire, uid)
            } else {
                uid.clone()
            };
            let fill = colors.get(idx);
            match fill {
                Some(color) => {
                    let _ = writeln!(
                        out,
                        "  \"{}\" [label=\"{}\", style=filled, fillcolor={}];",
                        escape_dot(uid),
                        escape_dot(&label),
                        color
                    );
                }
                None => {
                    let _ = writeln!(out, "  \"{}\" [label=\"{}\"];", escape_dot(uid), escape_dot(&label));
                }
            }
        }

        for (from, to, label, is_jumper) in self.aggregated_edges(options) {
            let color = if is_jumper { " color=blue" } else { "" };
            let _ = writeln!(
                out,
                "  \"{}\" -> \"{}\" [label=\"{}\"{}];",
                escape_dot(&self.nodes[from]),
                escape_dot(&self.nodes[to]),
                escape_dot(&label),
                color
            );
        }

        let _ = writeln!(out, "}}");
        out
    }

    fn node_label_with_vars(&self, questionnaire: &Questionnaire, uid: &str) -> String {
        let Some(page) = questionnaire.pages.iter().find(|p| p.uid == uid) else {
            return uid.to_string();
        };
        let vars = page.node_variable_names();
        if vars.is_empty() {
            return uid.to_string();
        }
        let rows: Vec<String> = vars
            .chunks(3)
            .map(|chunk| format!("[{}]", chunk.join(",")))
            .collect();
        format!("{}\\n{}", uid, rows.join(",\\n"))
    }

    /// Group (from, to) transitions into one label per spec §4.E, optionally
    /// dropping literal-false transitions, optionally appending jumper edges
    /// unlabeled/colored separately.
    fn aggregated_edges(&self, options: RenderOptions) -> Vec<(usize, usize, String, bool)> {
        use indexmap::IndexMap;

        let mut grouped: IndexMap<(usize, usize), Vec<(usize, Option<String>)>> = IndexMap::new();
        for edge in self.non_self_loop_edges().filter(|e| !e.is_jumper) {
            if !options.show_cond && options.remove_cond_false {
                if let Some(cond) = &edge.condition {
                    if cond.trim() == "false" {
                        continue;
                    }
                }
            }
            grouped
                .entry((edge.from, edge.to))
                .or_default()
                .push((edge.index, edge.condition.clone()));
        }

        let mut out = Vec::new();
        for ((from, to), mut parts) in grouped {
            parts.sort_by_key(|(i, _)| *i);
            let label = if options.show_cond {
                parts
                    .iter()
                    .map(|(i, cond)| match cond {
                        Some(c) if !c.trim().is_empty() => {
                            let text = if options.rewrite {
                                scanner::rewrite_for_display(c)
                            } else {
                                c.clone()
                            };
                            format!("[{i}] {}", collapse_whitespace(&text))
                        }
                        _ => format!("[{i}]"),
                    })
                    .collect::<Vec<_>>()
                    .join(" | ")
            } else {
                String::new()
            };
            out.push((from, to, label, false));
        }

        if options.include_jumpers {
            for edge in self.non_self_loop_edges().filter(|e| e.is_jumper) {
                out.push((edge.from, edge.to, edge.index.to_string(), true));
            }
        }

        out
    }

    /// Group surviving node uids by longest-contiguous-leading-alpha prefix,
    /// dropping any prefix that is itself a prefix of another observed
    /// prefix, then zip survivors with a fixed palette.
    fn color_assignment(&self, enabled: bool) -> Vec<Option<&'static str>> {
        if !enabled {
            return vec![None; self.nodes.len()];
        }

        let prefixes: Vec<String> = self.nodes.iter().map(|uid| leading_alpha_prefix(uid)).collect();
        let mut distinct: Vec<String> = prefixes.clone();
        distinct.sort();
        distinct.dedup();

        let survivors: Vec<String> = distinct
            .iter()
            .filter(|p| {
                !distinct
                    .iter()
                    .any(|other| other != *p && other.starts_with(p.as_str()))
            })
            .cloned()
            .collect();

        let palette: std::collections::HashMap<&str, &'static str> = survivors
            .iter()
            .zip(PALETTE.iter().cycle())
            .map(|(prefix, color)| (prefix.as_str(), *color))
            .collect();

        prefixes
            .iter()
            .map(|p| palette.get(p.as_str()).copied())
            .collect()
    }
}

fn leading_alpha_prefix(uid: &str) -> String {
    uid.chars().take_while(|c| c.is_ascii_alphabetic()).collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn escape_dot(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn dfs_find_cycle(
    node: usize,
    adjacency: &[Vec<usize>],
    visiting: &mut [bool],
    visited: &mut [bool],
    stack: &mut Vec<usize>,
) -> Option<Vec<usize>> {
    visiting[node] = true;
    stack.push(node);

    for &next in &adjacency[node] {
        if visiting[next] {
            let start = stack.iter().position(|&n| n == next).unwrap_or(0);
            let mut cycle = stack[start..].to_vec();
            cycle.push(next);
            return Some(cycle);
        }
        if !visited[next] {
            if let Some(cycle) = dfs_find_cycle(next, adjacency, visiting, visited, stack) {
                return Some(cycle);
            }
        }
    }

    stack.pop();
    visiting[node] = false;
    visited[node] = true;
    None
}

/// Enumerate one elementary cycle, reusing the analyzer-facing label seen in
/// `graph_cycles` output. Exposed separately from `topological_order` so a
/// caller can request cycle detection without needing a failed sort first.
pub fn cycles(graph: &FlowGraph) -> HashSet<Vec<String>> {
    let mut found = HashSet::new();
    if let Err(cycle) = graph.topological_order() {
        if !cycle.is_empty() {
            found.insert(cycle);
        }
    }
    found
}
