use std::collections::{HashSet, VecDeque};

use crate::maze::{Grid, Mover};
use crate::types::{Direction, Position, Vec2};

/// First move of a shortest path from `from` to `target`.
///
/// Both points are rounded and wrapped. Returns `Direction::None` when they
/// share a cell or when no path exists. Unless `allow_reverse`, the reverse
/// of `current` is never a candidate first move.
pub fn direction_toward(
    grid: &Grid,
    from: Position,
    target: Position,
    current: Direction,
    allow_reverse: bool,
    mover: Mover,
) -> Direction {
    let start = wrapped_cell(grid, from);
    let goal = wrapped_cell(grid, target);
    if start == goal {
        return Direction::None;
    }
    let excluded = if allow_reverse {
        None
    } else {
        Some(current.opposite())
    };
    first_move(grid, start, excluded, mover, |at| at == goal)
}

pub fn direction_to_nearest_collectible(grid: &Grid, from: Position) -> Direction {
    let start = wrapped_cell(grid, from);
    first_move(grid, start, None, Mover::Seeker, |at| {
        grid.cell(at.x, at.y).is_collectible()
    })
}

fn wrapped_cell(grid: &Grid, pos: Position) -> Vec2 {
    let cell = pos.nearest_cell();
    grid.wrap(cell.x, cell.y)
}

/// Breadth-first search seeded with the legal first moves in cardinal order.
/// Cells are marked when enqueued; the goal test runs on dequeue.
fn first_move(
    grid: &Grid,
    start: Vec2,
    excluded: Option<Direction>,
    mover: Mover,
    is_goal: impl Fn(Vec2) -> bool,
) -> Direction {
    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();

    for dir in Direction::CARDINALS {
        if excluded == Some(dir) {
            continue;
        }
        let next = grid.neighbor(start, dir);
        if grid.is_blocked_cell(next, mover) || !visited.insert(next) {
            continue;
        }
        queue.push_back((next, dir));
    }

    while let Some((at, first)) = queue.pop_front() {
        if is_goal(at) {
            return first;
        }
        for dir in Direction::CARDINALS {
            let next = grid.neighbor(at, dir);
            if grid.is_blocked_cell(next, mover) || !visited.insert(next) {
                continue;
            }
            queue.push_back((next, first));
        }
    }
    Direction::None
}
