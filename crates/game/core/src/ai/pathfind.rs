//! A* search on the 4-connected grid.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::ecs::{MapDimensions, Position};

/// Shortest 4-directional path from `start` to `goal`, both inclusive.
///
/// Uniform step cost with a Manhattan heuristic. The open set is ordered by
/// f-cost, then by insertion order. `passable` is consulted for every cell
/// except `start` and `goal`, which are always allowed so a path can end on an
/// occupied target.
pub fn find_path<F>(
    dimensions: MapDimensions,
    start: Position,
    goal: Position,
    passable: F,
) -> Option<Vec<Position>>
where
    F: Fn(Position) -> bool,
{
    let start_index = dimensions.index_of(start)?;
    let goal_index = dimensions.index_of(goal)?;
    if start_index == goal_index {
        return Some(vec![start]);
    }

    let area = dimensions.area();
    let mut g_score = vec![u32::MAX; area];
    let mut came_from: Vec<Option<usize>> = vec![None; area];
    let mut closed = vec![false; area];
    let mut open = BinaryHeap::new();
    let mut inserted: u64 = 0;

    g_score[start_index] = 0;
    open.push(Reverse((start.manhattan(goal), inserted, start_index)));

    while let Some(Reverse((_, _, current_index))) = open.pop() {
        if current_index == goal_index {
            return Some(reconstruct(dimensions, &came_from, goal_index));
        }
        if closed[current_index] {
            continue;
        }
        closed[current_index] = true;

        let current = dimensions.position_of(current_index);
        let next_g = g_score[current_index] + 1;
        for neighbor in current.neighbors() {
            let Some(index) = dimensions.index_of(neighbor) else {
                continue;
            };
            if closed[index] || (index != goal_index && !passable(neighbor)) {
                continue;
            }
            if next_g < g_score[index] {
                g_score[index] = next_g;
                came_from[index] = Some(current_index);
                inserted += 1;
                open.push(Reverse((next_g + neighbor.manhattan(goal), inserted, index)));
            }
        }
    }
    None
}

fn reconstruct(dimensions: MapDimensions, came_from: &[Option<usize>], goal: usize) -> Vec<Position> {
    let mut path = vec![dimensions.position_of(goal)];
    let mut cursor = goal;
    while let Some(previous) = came_from[cursor] {
        path.push(dimensions.position_of(previous));
        cursor = previous;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIMS: MapDimensions = MapDimensions::new(7, 5);

    #[test]
    fn straight_line_in_open_space() {
        let path = find_path(DIMS, Position::new(0, 2), Position::new(4, 2), |_| true).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&Position::new(0, 2)));
        assert_eq!(path.last(), Some(&Position::new(4, 2)));
    }

    #[test]
    fn routes_around_a_wall() {
        let wall = |p: Position| !(p.x == 3 && p.y <= 3);
        let path = find_path(DIMS, Position::new(1, 1), Position::new(5, 1), wall).unwrap();
        assert!(path.iter().all(|p| wall(*p)));
        assert!(path.contains(&Position::new(3, 4)));
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
    }

    #[test]
    fn occupied_goal_is_still_reachable() {
        let goal = Position::new(3, 0);
        let path = find_path(DIMS, Position::new(0, 0), goal, |p| p != goal).unwrap();
        assert_eq!(path.last(), Some(&goal));
    }

    #[test]
    fn sealed_goal_has_no_path() {
        let sealed = |p: Position| p.x != 3;
        assert!(find_path(DIMS, Position::new(0, 0), Position::new(6, 0), sealed).is_none());
    }
}
