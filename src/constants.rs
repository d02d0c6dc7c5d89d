use crate::types::Vec2;

pub const PELLET_SCORE: i32 = 10;
pub const POWER_PELLET_SCORE: i32 = 50;
pub const GHOST_EATEN_SCORE: i32 = 200;

pub const STARTING_LIVES: i32 = 3;
pub const POWER_MODE_TICKS: u32 = 300;

/// Chase and scatter alternate every this many ticks.
pub const PHASE_PERIOD_TICKS: u64 = 100;
/// Probability that a ghost follows the computed path instead of wandering.
pub const PATH_FOLLOW_CHANCE: f32 = 0.7;

pub const GHOST_COUNT: usize = 4;

pub const PLAYER_SPAWN: Vec2 = Vec2 { x: 10, y: 13 };
pub const GHOST_SPAWNS: [Vec2; GHOST_COUNT] = [
    Vec2 { x: 9, y: 9 },
    Vec2 { x: 11, y: 9 },
    Vec2 { x: 9, y: 10 },
    Vec2 { x: 11, y: 10 },
];
/// Cell just outside the ghost box; box-exit paths aim here.
pub const GHOST_DOOR: Vec2 = Vec2 { x: 10, y: 8 };
/// Eaten ghosts are returned to this cell inside the box.
pub const GHOST_RESPAWN: Vec2 = Vec2 { x: 10, y: 10 };

/// Static maze template. `#` wall, `.` pellet, `o` power pellet, `=` ghost box
/// interior, space = open floor without a pellet. Row y=10 is the wrap tunnel.
pub const MAZE_TEMPLATE: [&str; 17] = [
    "#####################",
    "#o.................o#",
    "#.##.#####.#####.##.#",
    "#...................#",
    "#.##.##.#####.##.##.#",
    "#....#....#....#....#",
    "####.#.##.#.##.#.####",
    "#...................#",
    "#.......## ##.......#",
    "#..##...#===#...##..#",
    " .......#===#....... ",
    "#..##...#####...##..#",
    "#....#.........#....#",
    "#.##.#.##. .##.#.##.#",
    "#...................#",
    "#o.................o#",
    "#####################",
];
