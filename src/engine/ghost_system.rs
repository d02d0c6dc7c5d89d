use super::*;
use crate::constants::{GHOST_DOOR, PATH_FOLLOW_CHANCE, PHASE_PERIOD_TICKS};
use crate::pathfind;
use crate::types::CARDINALS;

impl GameEngine {
    /// Advances the tick counter and moves every ghost once. The global phase
    /// alternates every `PHASE_PERIOD_TICKS`: chase targets the player,
    /// scatter targets each ghost's fixed corner. Scatter corners sit on the
    /// outer wall, so that phase degrades to the random-walk branch.
    pub fn move_ghosts(&mut self) {
        self.tick += 1;
        let chase_phase = (self.tick / PHASE_PERIOD_TICKS) % 2 == 0;

        for idx in 0..self.ghosts.len() {
            let pos = self.ghosts[idx].pos;
            if self.maze.cell(pos.x, pos.y) == Cell::GhostBox {
                self.step_out_of_box(idx);
                continue;
            }

            let moves = self.legal_moves(idx);
            let target = if chase_phase {
                self.player.pos
            } else {
                self.scatter_targets[self.ghosts[idx].personality]
            };

            let chosen = if moves.is_empty() {
                // dead-end pocket: drop the reversal constraint and trust the
                // path step; the wall check below discards it if still illegal
                self.path_step(pos, target).unwrap_or(self.ghosts[idx].dir)
            } else if self.rng.chance(PATH_FOLLOW_CHANCE) {
                self.path_step(pos, target)
                    .unwrap_or_else(|| moves[self.rng.index(moves.len())])
            } else {
                moves[self.rng.index(moves.len())]
            };

            // The chosen direction sticks even when the move is blocked;
            // only the position waits for an open cell.
            self.ghosts[idx].dir = chosen;
            let (dx, dy) = chosen.delta();
            let dest = self.maze.wrap(pos.x + dx, pos.y + dy);
            if !self.maze.is_wall(dest.x, dest.y) {
                self.ghosts[idx].pos = dest;
            }
        }
    }

    /// Cardinal moves minus the direct reversal of the current direction and
    /// minus walls.
    fn legal_moves(&self, idx: usize) -> Vec<Direction> {
        let ghost = &self.ghosts[idx];
        let banned = ghost.dir.opposite();
        let mut moves = Vec::with_capacity(4);
        for dir in CARDINALS {
            if dir == banned {
                continue;
            }
            let (dx, dy) = dir.delta();
            let dest = self.maze.wrap(ghost.pos.x + dx, ghost.pos.y + dy);
            if !self.maze.is_wall(dest.x, dest.y) {
                moves.push(dir);
            }
        }
        moves
    }

    /// First step of the best-first path toward `target`, as a direction. The
    /// delta is taken on raw coordinates, so a wrapped first step reads as the
    /// long way across the grid and the caller's wall check discards it.
    fn path_step(&self, from: Vec2, target: Vec2) -> Option<Direction> {
        let path = pathfind::target_path(&self.maze, from, target);
        if path.len() < 2 {
            return None;
        }
        let dir = Direction::from_delta(path[1].x - from.x, path[1].y - from.y);
        (dir != Direction::None).then_some(dir)
    }

    /// Ghosts inside the box follow a precomputed shortest path to the door
    /// cell, one step per tick, ignoring the reversal rule. The queued steps
    /// are trusted without a wall recheck. An unreachable door leaves the
    /// ghost where it is.
    fn step_out_of_box(&mut self, idx: usize) {
        if self.ghosts[idx].exit_queue.is_empty() {
            let path = pathfind::exit_path(&self.maze, self.ghosts[idx].pos, GHOST_DOOR);
            self.ghosts[idx].exit_queue = path;
        }
        if let Some(next) = self.ghosts[idx].exit_queue.pop_front() {
            self.ghosts[idx].pos = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GHOST_SPAWNS;

    fn engine(seed: u32) -> GameEngine {
        GameEngine::new(seed).expect("static template is valid")
    }

    /// Marches every ghost out of the box so the normal state machine runs.
    fn clear_the_box(engine: &mut GameEngine) {
        for _ in 0..8 {
            for idx in 0..engine.ghosts.len() {
                let pos = engine.ghosts[idx].pos;
                if engine.maze.cell(pos.x, pos.y) == Cell::GhostBox {
                    engine.step_out_of_box(idx);
                }
            }
        }
    }

    #[test]
    fn box_exit_reaches_the_door_in_path_order() {
        let mut engine = engine(1);
        let steps = pathfind::exit_path(&engine.maze, GHOST_SPAWNS[0], GHOST_DOOR).len();
        for _ in 0..steps {
            engine.step_out_of_box(0);
        }
        assert_eq!(engine.ghosts[0].pos, GHOST_DOOR);
        assert!(engine.ghosts[0].exit_queue.is_empty());
    }

    #[test]
    fn legal_moves_exclude_reversal_and_walls() {
        let mut engine = engine(1);
        // open corridor cell with floor left/right, walls above/below
        engine.ghosts[0].pos = Vec2 { x: 2, y: 3 };
        engine.ghosts[0].dir = Direction::Right;
        let moves = engine.legal_moves(0);
        assert!(moves.contains(&Direction::Right));
        assert!(!moves.contains(&Direction::Left));
        assert!(!moves.contains(&Direction::Up));
        assert!(!moves.contains(&Direction::Down));

        engine.ghosts[0].dir = Direction::None;
        let moves = engine.legal_moves(0);
        assert!(moves.contains(&Direction::Left));
        assert!(moves.contains(&Direction::Right));
    }

    #[test]
    fn ghosts_never_step_into_walls() {
        let mut engine = engine(23);
        clear_the_box(&mut engine);
        for _ in 0..500 {
            engine.move_ghosts();
            for ghost in &engine.ghosts {
                assert!(!engine.maze.is_wall(ghost.pos.x, ghost.pos.y));
            }
        }
    }

    #[test]
    fn tick_advances_once_per_ghost_pass() {
        let mut engine = engine(1);
        assert_eq!(engine.tick(), 0);
        engine.move_ghosts();
        engine.move_ghosts();
        assert_eq!(engine.tick(), 2);
    }

    #[test]
    fn path_step_points_along_the_corridor() {
        let engine = engine(1);
        let from = Vec2 { x: 1, y: 3 };
        let target = Vec2 { x: 5, y: 3 };
        let step = engine.path_step(from, target);
        assert_eq!(step, Some(Direction::Right));
    }

    #[test]
    fn path_step_to_wall_target_is_none() {
        let engine = engine(1);
        let from = Vec2 { x: 1, y: 3 };
        assert_eq!(engine.path_step(from, Vec2 { x: 0, y: 0 }), None);
        assert_eq!(engine.path_step(from, from), None);
    }

    #[test]
    fn chase_moves_toward_an_adjacent_player() {
        // with the player one open cell away, both the path branch and the
        // random branch can only move along the corridor
        let mut engine = engine(9);
        clear_the_box(&mut engine);
        engine.ghosts[0].pos = Vec2 { x: 2, y: 1 };
        engine.ghosts[0].dir = Direction::Right;
        engine.player.pos = Vec2 { x: 5, y: 1 };
        let mut advanced = false;
        for _ in 0..50 {
            let before = engine.ghosts[0].pos;
            engine.move_ghosts();
            if engine.ghosts[0].pos != before {
                advanced = true;
                break;
            }
        }
        assert!(advanced, "ghost pinned in an open corridor");
    }
}
