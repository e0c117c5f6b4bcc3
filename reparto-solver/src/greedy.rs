//! Cheapest-arc-first tour construction over a distance matrix.
//!
//! The tour is stored as a successor array indexed by node: `successors[i]`
//! is the node visited after `i`, and `None` marks the last node before the
//! vehicle returns to the depot. Node 0 is the depot.

use log::warn;
use reparto_core::UNREACHABLE;

/// Successor of each node; `None` for the terminal node.
pub(crate) type Successors = Vec<Option<usize>>;

/// Cost of the arc `from -> to`, or `None` when the pair is unreachable or
/// outside the matrix.
fn arc(matrix: &[Vec<i64>], from: usize, to: usize) -> Option<i64> {
    matrix
        .get(from)
        .and_then(|row| row.get(to))
        .copied()
        .filter(|&cost| cost != UNREACHABLE)
}

/// Build a tour by repeatedly extending the tail with its cheapest unvisited
/// neighbour. Ties go to the lowest node index.
///
/// Returns `None` when some step has no reachable unvisited node or the last
/// node cannot reach the depot.
pub(crate) fn cheapest_arc_tour(matrix: &[Vec<i64>]) -> Option<Successors> {
    let node_count = matrix.len();
    if node_count == 0 {
        return None;
    }

    let mut visited = vec![false; node_count];
    let mut successors: Successors = vec![None; node_count];
    if let Some(depot) = visited.first_mut() {
        *depot = true;
    }

    let mut tail = 0_usize;
    for _ in 1..node_count {
        let next = visited
            .iter()
            .enumerate()
            .filter(|&(_, &seen)| !seen)
            .filter_map(|(node, _)| arc(matrix, tail, node).map(|cost| (cost, node)))
            .min();
        let Some((_, node)) = next else {
            warn!("no reachable unvisited node after node {tail}");
            return None;
        };
        if let Some(slot) = successors.get_mut(tail) {
            *slot = Some(node);
        }
        if let Some(seen) = visited.get_mut(node) {
            *seen = true;
        }
        tail = node;
    }

    if arc(matrix, tail, 0).is_none() {
        warn!("node {tail} cannot return to the depot");
        return None;
    }
    Some(successors)
}

/// Walk the successor array from the depot, returning the visited nodes
/// without the depot.
///
/// Stops after `successors.len()` steps so a malformed array cannot loop.
pub(crate) fn visiting_order(successors: &[Option<usize>]) -> Vec<usize> {
    let mut order = Vec::with_capacity(successors.len().saturating_sub(1));
    let mut current = successors.first().copied().flatten();
    while let Some(node) = current {
        if order.len() >= successors.len() {
            break;
        }
        order.push(node);
        current = successors.get(node).copied().flatten();
    }
    order
}

/// Length of the closed tour `0 -> order... -> 0`, saturating on overflow.
pub(crate) fn tour_length(matrix: &[Vec<i64>], order: &[usize]) -> i64 {
    let mut total = 0_i64;
    let mut previous = 0_usize;
    for &node in order.iter().chain(std::iter::once(&0)) {
        total = total.saturating_add(arc(matrix, previous, node).unwrap_or(UNREACHABLE));
        previous = node;
    }
    total
}
