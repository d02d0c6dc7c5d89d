use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::None => (0, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    /// Direction a raw step delta points in. Horizontal movement wins ties,
    /// matching how facing is derived everywhere else in the engine.
    pub fn from_delta(dx: i32, dy: i32) -> Direction {
        if dx > 0 {
            Direction::Right
        } else if dx < 0 {
            Direction::Left
        } else if dy < 0 {
            Direction::Up
        } else if dy > 0 {
            Direction::Down
        } else {
            Direction::None
        }
    }
}

pub const CARDINALS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Vec2 {
    pub x: i32,
    pub y: i32,
}

/// Grid cell contents. `Empty` is open floor whose pellet (if any) has been
/// consumed; the ghost box interior is walkable but never holds pellets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Wall,
    Pellet,
    PowerPellet,
    GhostBox,
    Empty,
}

impl Cell {
    pub fn from_template_char(ch: char) -> Option<Cell> {
        match ch {
            '#' => Some(Cell::Wall),
            '.' => Some(Cell::Pellet),
            'o' => Some(Cell::PowerPellet),
            '=' => Some(Cell::GhostBox),
            ' ' => Some(Cell::Empty),
            _ => None,
        }
    }

    pub fn is_pellet(self) -> bool {
        matches!(self, Cell::Pellet | Cell::PowerPellet)
    }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    #[serde(rename = "dirX")]
    pub dir_x: i32,
    #[serde(rename = "dirY")]
    pub dir_y: i32,
    pub facing: Direction,
    #[serde(rename = "powerMode")]
    pub power_mode: bool,
    #[serde(rename = "powerTimerTicks")]
    pub power_timer_ticks: u32,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct GhostView {
    pub x: i32,
    pub y: i32,
    pub personality: usize,
    pub dir: Direction,
}

#[derive(Clone, Debug, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub score: i32,
    pub lives: i32,
    #[serde(rename = "pelletsLeft")]
    pub pellets_left: usize,
    #[serde(rename = "gameOver")]
    pub game_over: bool,
    #[serde(rename = "gameWon")]
    pub game_won: bool,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
}
