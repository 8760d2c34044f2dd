use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::constants::HUNTER_COUNT;
use crate::error::LayoutError;
use crate::types::{round_half_up, Cell, Direction, HunterMode, Vec2};

const CLASSIC_ROWS: [&str; 21] = [
    "###################",
    "#.................#",
    "#o##.###.#.###.##o#",
    "#.................#",
    "#.##.#.#####.#.##.#",
    "#....#...#...#....#",
    "####.### # ###.####",
    "####.#       #.####",
    "####.# ##-## #.####",
    "    .  #   #  .    ",
    "####.# ##### #.####",
    "####.#       #.####",
    "####.# ##### #.####",
    "#........#........#",
    "#.##.###.#.###.##.#",
    "#o.#..... .....#.o#",
    "##.#.#.#####.#.#.##",
    "#....#...#...#....#",
    "#.######.#.######.#",
    "#.................#",
    "###################",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mover {
    Seeker,
    Hunter(HunterMode),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MazeLayout {
    pub rows: Vec<String>,
    pub seeker_start: Vec2,
    pub hunter_homes: [Vec2; HUNTER_COUNT],
    pub scatter_corners: [Vec2; HUNTER_COUNT],
    pub patrol_waypoints: Vec<Vec2>,
    /// Cell directly above the gate; releasing hunters become free here.
    pub house_exit: Vec2,
}

impl MazeLayout {
    pub fn classic() -> Self {
        Self {
            rows: CLASSIC_ROWS.iter().map(|row| row.to_string()).collect(),
            seeker_start: Vec2::new(9, 15),
            hunter_homes: [
                Vec2::new(9, 8),
                Vec2::new(9, 9),
                Vec2::new(8, 9),
                Vec2::new(10, 9),
            ],
            scatter_corners: [
                Vec2::new(17, 1),
                Vec2::new(1, 1),
                Vec2::new(17, 19),
                Vec2::new(1, 19),
            ],
            patrol_waypoints: vec![
                Vec2::new(1, 1),
                Vec2::new(17, 1),
                Vec2::new(1, 19),
                Vec2::new(17, 19),
                Vec2::new(9, 1),
                Vec2::new(9, 19),
                Vec2::new(1, 5),
                Vec2::new(17, 5),
                Vec2::new(1, 14),
                Vec2::new(17, 14),
                Vec2::new(5, 9),
                Vec2::new(13, 9),
            ],
            house_exit: Vec2::new(9, 7),
        }
    }

    pub fn build(&self) -> Result<Grid, LayoutError> {
        let grid = Grid::from_rows(&self.rows)?;

        check_anchor(&grid, "seeker start", self.seeker_start, |cell| {
            !matches!(cell, Cell::Barrier | Cell::Gate)
        })?;
        for home in &self.hunter_homes {
            check_anchor(&grid, "hunter home", *home, |cell| cell != Cell::Barrier)?;
        }
        for corner in &self.scatter_corners {
            check_anchor(&grid, "scatter corner", *corner, |cell| cell != Cell::Barrier)?;
        }
        if self.patrol_waypoints.len() < 2 {
            return Err(LayoutError::TooFewWaypoints {
                count: self.patrol_waypoints.len(),
            });
        }
        for waypoint in &self.patrol_waypoints {
            check_anchor(&grid, "patrol waypoint", *waypoint, |cell| {
                cell != Cell::Barrier
            })?;
        }
        check_anchor(&grid, "house exit", self.house_exit, |cell| {
            !matches!(cell, Cell::Barrier | Cell::Gate)
        })?;

        let reachable = grid.reachable_from(self.seeker_start, Mover::Seeker);
        for y in 0..grid.height {
            for x in 0..grid.width {
                let at = Vec2::new(x, y);
                if grid.cell(x, y).is_collectible() && !reachable[grid.index(at)] {
                    return Err(LayoutError::UnreachableCollectible { at });
                }
            }
        }
        Ok(grid)
    }
}

impl Default for MazeLayout {
    fn default() -> Self {
        Self::classic()
    }
}

fn check_anchor(
    grid: &Grid,
    name: &'static str,
    at: Vec2,
    allowed: impl Fn(Cell) -> bool,
) -> Result<(), LayoutError> {
    if at.x < 0 || at.y < 0 || at.x >= grid.width || at.y >= grid.height {
        return Err(LayoutError::AnchorOutOfBounds { name, at });
    }
    if !allowed(grid.cell(at.x, at.y)) {
        return Err(LayoutError::AnchorBlocked { name, at });
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, LayoutError> {
        let width = rows.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(LayoutError::Empty);
        }
        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let actual = row.chars().count();
            if actual != width {
                return Err(LayoutError::RaggedRow {
                    row: y,
                    expected: width,
                    actual,
                });
            }
            for (x, tile) in row.chars().enumerate() {
                let cell = Cell::from_char(tile).ok_or(LayoutError::UnknownTile { x, y, tile })?;
                cells.push(cell);
            }
        }
        Ok(Self {
            width: width as i32,
            height: rows.len() as i32,
            cells,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn wrap(&self, x: i32, y: i32) -> Vec2 {
        Vec2::new(x.rem_euclid(self.width), y.rem_euclid(self.height))
    }

    pub fn index(&self, at: Vec2) -> usize {
        (at.y * self.width + at.x) as usize
    }

    pub fn cell(&self, x: i32, y: i32) -> Cell {
        let at = self.wrap(x, y);
        self.cells[self.index(at)]
    }

    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        let at = self.wrap(x, y);
        let idx = self.index(at);
        self.cells[idx] = cell;
    }

    pub fn neighbor(&self, at: Vec2, dir: Direction) -> Vec2 {
        let (dx, dy) = dir.delta();
        self.wrap(at.x + dx, at.y + dy)
    }

    /// Rounds to the nearest cell, wraps, then applies the passability rules.
    pub fn is_blocked(&self, x: f32, y: f32, mover: Mover) -> bool {
        self.is_blocked_cell(Vec2::new(round_half_up(x), round_half_up(y)), mover)
    }

    pub fn is_blocked_cell(&self, at: Vec2, mover: Mover) -> bool {
        match self.cell(at.x, at.y) {
            Cell::Barrier => true,
            Cell::Gate => !matches!(mover, Mover::Hunter(mode) if mode.is_in_house()),
            _ => false,
        }
    }

    pub fn count_collectibles(&self) -> u32 {
        self.cells.iter().filter(|cell| cell.is_collectible()).count() as u32
    }

    pub fn tiles(&self) -> Vec<String> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|cell| cell.to_char()).collect())
            .collect()
    }

    pub fn reachable_from(&self, start: Vec2, mover: Mover) -> Vec<bool> {
        let mut out = vec![false; self.cells.len()];
        let start = self.wrap(start.x, start.y);
        if self.is_blocked_cell(start, mover) {
            return out;
        }
        let mut queue = VecDeque::new();
        out[self.index(start)] = true;
        queue.push_back(start);

        while let Some(at) = queue.pop_front() {
            for dir in Direction::CARDINALS {
                let next = self.neighbor(at, dir);
                if self.is_blocked_cell(next, mover) {
                    continue;
                }
                let idx = self.index(next);
                if !out[idx] {
                    out[idx] = true;
                    queue.push_back(next);
                }
            }
        }
        out
    }
}
