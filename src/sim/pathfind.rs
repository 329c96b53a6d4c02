//! Breadth-first pathfinding over the tile grid

use std::collections::{HashMap, HashSet, VecDeque};

use glam::IVec2;

const NEIGHBORS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

/// Shortest 4-connected path from `start` to `goal`.
///
/// The returned cells exclude `start` and end with `goal`. An empty path
/// means either `start == goal` or the goal cannot be reached.
pub fn find_path(dims: IVec2, blocked: &HashSet<IVec2>, start: IVec2, goal: IVec2) -> Vec<IVec2> {
    if start == goal {
        return Vec::new();
    }

    let in_bounds = |c: IVec2| c.x >= 0 && c.y >= 0 && c.x < dims.x && c.y < dims.y;

    let mut queue = VecDeque::from([start]);
    let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
    let mut reached = false;

    'search: while let Some(cell) = queue.pop_front() {
        for step in NEIGHBORS {
            let next = cell + step;
            if !in_bounds(next) || blocked.contains(&next) {
                continue;
            }
            if next == start || came_from.contains_key(&next) {
                continue;
            }
            came_from.insert(next, cell);
            if next == goal {
                reached = true;
                break 'search;
            }
            queue.push_back(next);
        }
    }

    if !reached {
        return Vec::new();
    }

    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(&prev) = came_from.get(&cursor) {
        if prev == start {
            break;
        }
        path.push(prev);
        cursor = prev;
    }
    path.reverse();
    path
}
