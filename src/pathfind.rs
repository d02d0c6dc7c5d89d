use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use crate::maze::Maze;
use crate::types::{Vec2, CARDINALS};

fn manhattan(a: Vec2, b: Vec2) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

struct Node {
    pos: Vec2,
    cost: i32,
    parent: Option<usize>,
}

/// Best-first search used for chase/scatter targeting. Priority is
/// cost-so-far plus plain Manhattan distance; the estimate deliberately
/// ignores wrap shortcuts, so paths may prefer the long way around over a
/// tunnel. Returns the full cell sequence from `from` to `to` inclusive, or
/// an empty vector when the target is unreachable. Ties break on insertion
/// order.
pub fn target_path(maze: &Maze, from: Vec2, to: Vec2) -> Vec<Vec2> {
    let width = maze.width() as usize;
    let height = maze.height() as usize;
    let mut closed = vec![vec![false; width]; height];
    let mut nodes = vec![Node {
        pos: from,
        cost: 0,
        parent: None,
    }];
    let mut open: BinaryHeap<Reverse<(i32, usize)>> = BinaryHeap::new();
    open.push(Reverse((manhattan(from, to), 0)));

    while let Some(Reverse((_, idx))) = open.pop() {
        let pos = nodes[idx].pos;
        if pos == to {
            let mut path = Vec::new();
            let mut cursor = Some(idx);
            while let Some(i) = cursor {
                path.push(nodes[i].pos);
                cursor = nodes[i].parent;
            }
            path.reverse();
            return path;
        }
        if closed[pos.y as usize][pos.x as usize] {
            continue;
        }
        closed[pos.y as usize][pos.x as usize] = true;

        for dir in CARDINALS {
            let (dx, dy) = dir.delta();
            let next = maze.wrap(pos.x + dx, pos.y + dy);
            if closed[next.y as usize][next.x as usize] || maze.is_wall(next.x, next.y) {
                continue;
            }
            let cost = nodes[idx].cost + 1;
            nodes.push(Node {
                pos: next,
                cost,
                parent: Some(idx),
            });
            open.push(Reverse((cost + manhattan(next, to), nodes.len() - 1)));
        }
    }
    Vec::new()
}

/// Breadth-first search used for box-exit routing. Guarantees a shortest
/// unweighted path; returns the step sequence excluding `from`, or an empty
/// queue when `to` is unreachable.
pub fn exit_path(maze: &Maze, from: Vec2, to: Vec2) -> VecDeque<Vec2> {
    let width = maze.width() as usize;
    let height = maze.height() as usize;
    let mut parent: Vec<Vec<Option<Vec2>>> = vec![vec![None; width]; height];
    let mut seen = vec![vec![false; width]; height];
    let mut queue = VecDeque::new();
    seen[from.y as usize][from.x as usize] = true;
    queue.push_back(from);

    while let Some(pos) = queue.pop_front() {
        if pos == to {
            break;
        }
        for dir in CARDINALS {
            let (dx, dy) = dir.delta();
            let next = maze.wrap(pos.x + dx, pos.y + dy);
            if seen[next.y as usize][next.x as usize] || maze.is_wall(next.x, next.y) {
                continue;
            }
            seen[next.y as usize][next.x as usize] = true;
            parent[next.y as usize][next.x as usize] = Some(pos);
            queue.push_back(next);
        }
    }

    let mut path = VecDeque::new();
    let mut cursor = to;
    while cursor != from {
        match parent[cursor.y as usize][cursor.x as usize] {
            Some(prev) => {
                path.push_front(cursor);
                cursor = prev;
            }
            // Unreachable target degrades to "no move".
            None => return VecDeque::new(),
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GHOST_DOOR, GHOST_SPAWNS, MAZE_TEMPLATE};

    fn open_ring() -> Maze {
        Maze::from_template(&["#####", "#...#", "#.#.#", "#...#", "#####"])
            .expect("test template is valid")
    }

    #[test]
    fn target_path_starts_and_ends_at_endpoints() {
        let maze = open_ring();
        let from = Vec2 { x: 1, y: 1 };
        let to = Vec2 { x: 3, y: 3 };
        let path = target_path(&maze, from, to);
        assert_eq!(path.first(), Some(&from));
        assert_eq!(path.last(), Some(&to));
        // around the central pillar: four steps either way
        assert_eq!(path.len(), 5);
        for pair in path.windows(2) {
            let dist = (pair[0].x - pair[1].x).abs() + (pair[0].y - pair[1].y).abs();
            assert_eq!(dist, 1);
            assert!(!maze.is_wall(pair[1].x, pair[1].y));
        }
    }

    #[test]
    fn target_path_to_wall_is_empty() {
        let maze = open_ring();
        let path = target_path(&maze, Vec2 { x: 1, y: 1 }, Vec2 { x: 2, y: 2 });
        assert!(path.is_empty());
    }

    #[test]
    fn target_path_to_self_is_single_cell() {
        let maze = open_ring();
        let from = Vec2 { x: 1, y: 1 };
        assert_eq!(target_path(&maze, from, from), vec![from]);
    }

    #[test]
    fn target_path_uses_wrap_tunnel_when_cheaper() {
        let maze = Maze::from_template(&["#####", ".....", "#####"])
            .expect("test template is valid");
        let path = target_path(&maze, Vec2 { x: 0, y: 1 }, Vec2 { x: 4, y: 1 });
        // one wrapped step left beats four steps right
        assert_eq!(path.len(), 2);
        assert_eq!(path[1], Vec2 { x: 4, y: 1 });
    }

    #[test]
    fn exit_path_is_shortest_and_excludes_source() {
        let maze = open_ring();
        let from = Vec2 { x: 1, y: 1 };
        let to = Vec2 { x: 1, y: 3 };
        let path = exit_path(&maze, from, to);
        assert_eq!(path.len(), 2);
        assert_eq!(path.front(), Some(&Vec2 { x: 1, y: 2 }));
        assert_eq!(path.back(), Some(&to));
    }

    #[test]
    fn exit_path_to_unreachable_cell_is_empty() {
        let maze = Maze::from_template(&["#####", "#.#.#", "#####"])
            .expect("test template is valid");
        let path = exit_path(&maze, Vec2 { x: 1, y: 1 }, Vec2 { x: 3, y: 1 });
        assert!(path.is_empty());
    }

    #[test]
    fn exit_path_wraps_across_edges() {
        let maze = Maze::from_template(&["#####", ".....", "#####"])
            .expect("test template is valid");
        let path = exit_path(&maze, Vec2 { x: 0, y: 1 }, Vec2 { x: 4, y: 1 });
        assert_eq!(path.len(), 1);
        assert_eq!(path.front(), Some(&Vec2 { x: 4, y: 1 }));
    }

    #[test]
    fn every_ghost_spawn_reaches_the_door() {
        let maze = Maze::from_template(&MAZE_TEMPLATE).expect("static template is valid");
        for spawn in GHOST_SPAWNS {
            let path = exit_path(&maze, spawn, GHOST_DOOR);
            assert!(!path.is_empty());
            assert_eq!(path.back(), Some(&GHOST_DOOR));
            for cell in &path {
                assert!(!maze.is_wall(cell.x, cell.y));
            }
        }
    }
}
