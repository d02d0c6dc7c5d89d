use std::collections::VecDeque;

use crate::constants::{
    GHOST_EATEN_SCORE, GHOST_RESPAWN, GHOST_SPAWNS, MAZE_TEMPLATE, PELLET_SCORE, PLAYER_SPAWN,
    POWER_MODE_TICKS, POWER_PELLET_SCORE, STARTING_LIVES,
};
use crate::maze::{Maze, MazeError};
use crate::rng::Rng;
use crate::types::{Cell, Direction, GhostView, PlayerView, Snapshot, Vec2};

mod ghost_system;

#[derive(Clone, Debug)]
struct Player {
    pos: Vec2,
    dir: (i32, i32),
    desired: (i32, i32),
    facing: Direction,
}

#[derive(Clone, Debug)]
struct Ghost {
    pos: Vec2,
    spawn: Vec2,
    personality: usize,
    dir: Direction,
    exit_queue: VecDeque<Vec2>,
}

/// Whole game state for one session. All mutation goes through the tick
/// operations; `snapshot()` is the read surface for presentation layers.
#[derive(Clone, Debug)]
pub struct GameEngine {
    maze: Maze,
    rng: Rng,
    player: Player,
    ghosts: Vec<Ghost>,
    scatter_targets: [Vec2; 4],
    score: i32,
    lives: i32,
    power_mode: bool,
    power_timer: u32,
    game_over: bool,
    game_won: bool,
    tick: u64,
}

impl GameEngine {
    /// A fixed seed replays an identical game against identical intents.
    pub fn new(seed: u32) -> Result<Self, MazeError> {
        let maze = Maze::from_template(&MAZE_TEMPLATE)?;
        let w = maze.width();
        let h = maze.height();
        let scatter_targets = [
            Vec2 { x: 0, y: 0 },
            Vec2 { x: w - 1, y: 0 },
            Vec2 { x: w - 1, y: h - 1 },
            Vec2 { x: 0, y: h - 1 },
        ];
        let ghosts = GHOST_SPAWNS
            .iter()
            .enumerate()
            .map(|(personality, &spawn)| Ghost {
                pos: spawn,
                spawn,
                personality,
                dir: Direction::None,
                exit_queue: VecDeque::new(),
            })
            .collect();
        Ok(Self {
            maze,
            rng: Rng::new(seed),
            player: Player {
                pos: PLAYER_SPAWN,
                dir: (0, 0),
                desired: (0, 0),
                facing: Direction::Left,
            },
            ghosts,
            scatter_targets,
            score: 0,
            lives: STARTING_LIVES,
            power_mode: false,
            power_timer: 0,
            game_over: false,
            game_won: false,
            tick: 0,
        })
    }

    /// Latches the desired movement vector. Anything outside the five unit
    /// vectors is ignored; the latch persists until replaced.
    pub fn apply_player_intent(&mut self, dx: i32, dy: i32) {
        if matches!((dx, dy), (0, 0) | (1, 0) | (-1, 0) | (0, 1) | (0, -1)) {
            self.player.desired = (dx, dy);
        }
    }

    /// Buffered-turn movement: the desired vector takes over as soon as it is
    /// not blocked, then the active vector is applied if its destination is
    /// open. Entering a cell consumes its pellet.
    pub fn move_player(&mut self) {
        let (ddx, ddy) = self.player.desired;
        let turn = self.maze.wrap(self.player.pos.x + ddx, self.player.pos.y + ddy);
        if !self.maze.is_wall(turn.x, turn.y) {
            self.player.dir = (ddx, ddy);
        }

        let (dx, dy) = self.player.dir;
        let dest = self.maze.wrap(self.player.pos.x + dx, self.player.pos.y + dy);
        if !self.maze.is_wall(dest.x, dest.y) {
            self.player.pos = dest;
            let facing = Direction::from_delta(dx, dy);
            if facing != Direction::None {
                self.player.facing = facing;
            }
            self.consume_cell();
        }
    }

    fn consume_cell(&mut self) {
        let pos = self.player.pos;
        match self.maze.cell(pos.x, pos.y) {
            Cell::Pellet => {
                self.score += PELLET_SCORE;
                self.maze.set_cell(pos.x, pos.y, Cell::Empty);
            }
            Cell::PowerPellet => {
                self.score += POWER_PELLET_SCORE;
                self.maze.set_cell(pos.x, pos.y, Cell::Empty);
                self.power_mode = true;
                self.power_timer = POWER_MODE_TICKS;
            }
            _ => {}
        }
        if self.maze.pellets_remaining() == 0 {
            self.game_won = true;
            self.game_over = true;
        }
    }

    /// Same-cell contact only. In power mode an overlapping ghost is sent back
    /// to the respawn cell for points; otherwise the player loses a life and
    /// everyone returns to their spawn with pellets untouched. The scan keeps
    /// going after a reset so a ghost already sitting on the spawn cell still
    /// counts.
    pub fn resolve_collisions(&mut self) {
        for idx in 0..self.ghosts.len() {
            if self.ghosts[idx].pos != self.player.pos {
                continue;
            }
            if self.power_mode {
                self.ghosts[idx].pos = GHOST_RESPAWN;
                self.ghosts[idx].exit_queue.clear();
                self.score += GHOST_EATEN_SCORE;
            } else {
                self.lives -= 1;
                if self.lives <= 0 {
                    self.game_over = true;
                }
                self.reset_positions(false);
            }
        }
    }

    pub fn advance_timers(&mut self) {
        if self.power_mode {
            self.power_timer = self.power_timer.saturating_sub(1);
            if self.power_timer == 0 {
                self.power_mode = false;
            }
        }
    }

    /// Repositions every entity at its spawn and clears active vectors and
    /// exit queues. The latched desired vector survives, so held input keeps
    /// steering after a death. `full_reset` also restores eaten pellets.
    pub fn reset_positions(&mut self, full_reset: bool) {
        if full_reset {
            self.maze.restore();
        }
        self.player.pos = PLAYER_SPAWN;
        self.player.dir = (0, 0);
        for ghost in &mut self.ghosts {
            ghost.pos = ghost.spawn;
            ghost.exit_queue.clear();
        }
    }

    /// One full simulation tick. No-op once the game has ended.
    pub fn step(&mut self) {
        if self.game_over {
            return;
        }
        self.move_player();
        self.move_ghosts();
        self.resolve_collisions();
        self.advance_timers();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            tick: self.tick,
            score: self.score,
            lives: self.lives,
            pellets_left: self.maze.pellets_remaining(),
            game_over: self.game_over,
            game_won: self.game_won,
            player: PlayerView {
                x: self.player.pos.x,
                y: self.player.pos.y,
                dir_x: self.player.dir.0,
                dir_y: self.player.dir.1,
                facing: self.player.facing,
                power_mode: self.power_mode,
                power_timer_ticks: self.power_timer,
            },
            ghosts: self
                .ghosts
                .iter()
                .map(|g| GhostView {
                    x: g.pos.x,
                    y: g.pos.y,
                    personality: g.personality,
                    dir: g.dir,
                })
                .collect(),
        }
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn lives(&self) -> i32 {
        self.lives
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn is_power_mode(&self) -> bool {
        self.power_mode
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_game_won(&self) -> bool {
        self.game_won
    }
}
