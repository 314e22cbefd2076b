// src/graph.rs
//! Граф проходов лабиринта и проверка свойства «идеальности»
//!
//! Узлы — клетки-проходы, рёбра — соседство по стороне между двумя проходами.
//! Идеальный лабиринт — это дерево: одна компонента связности и `узлы - 1` рёбер.

use petgraph::algo::{connected_components, has_path_connecting, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use std::collections::HashMap;

use crate::maze::Maze;

/// Строит неориентированный граф проходов. Вес узла — координаты `(row, col)`.
#[must_use]
pub fn build_passage_graph(maze: &Maze) -> UnGraph<(usize, usize), ()> {
    let mut graph = UnGraph::new_undirected();
    let mut node_of = HashMap::new();

    for pos in maze.passage_cells() {
        node_of.insert(pos, graph.add_node(pos));
    }

    // Достаточно смотреть вправо и вниз: каждое ребро добавляется один раз
    for (&(row, col), &node) in &node_of {
        for (nrow, ncol) in [(row, col + 1), (row + 1, col)] {
            if let Some(&neighbor) = node_of.get(&(nrow, ncol)) {
                graph.add_edge(node, neighbor, ());
            }
        }
    }
    graph
}

/// Структурный отчёт о лабиринте
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MazeReport {
    pub passages: usize,
    pub edges: usize,
    pub components: usize,
    pub has_cycle: bool,
    /// Достижим ли выход от входа
    pub entrance_reachable_exit: bool,
}

impl MazeReport {
    /// Связный ациклический граф проходов
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.components == 1 && !self.has_cycle && self.edges + 1 == self.passages
    }
}

#[must_use]
pub fn analyze(maze: &Maze) -> MazeReport {
    let graph = build_passage_graph(maze);
    let index_of: HashMap<(usize, usize), NodeIndex> = graph
        .node_indices()
        .map(|idx| (graph[idx], idx))
        .collect();

    let entrance = index_of.get(&maze.entrance());
    let exit = index_of.get(&maze.exit());
    let entrance_reachable_exit = match (entrance, exit) {
        (Some(&from), Some(&to)) => has_path_connecting(&graph, from, to, None),
        _ => false,
    };

    MazeReport {
        passages: graph.node_count(),
        edges: graph.edge_count(),
        components: connected_components(&graph),
        has_cycle: is_cyclic_undirected(&graph),
        entrance_reachable_exit,
    }
}
