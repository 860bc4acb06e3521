//! Maze generation — randomized carving with guaranteed connectivity.
//!
//! Starts from a solid wall grid and carves passages outward from (1,1),
//! stepping two cells at a time so walls stay one cell thick. The classic
//! recursive backtracker is run on an explicit stack: a 16×16 grid would
//! never overflow the call stack, but nothing here caps the grid size.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::state::{CellKind, Maze};

/// Two-cell carving offsets: north, east, south, west.
const CARVE_DIRS: [(i32, i32); 4] = [(0, -2), (2, 0), (0, 2), (-2, 0)];

struct Frame {
    x: usize,
    y: usize,
    dirs: [(i32, i32); 4],
    next: usize,
}

impl Frame {
    fn at(x: usize, y: usize, rng: &mut impl Rng) -> Self {
        let mut dirs = CARVE_DIRS;
        dirs.shuffle(rng);
        Self { x, y, dirs, next: 0 }
    }
}

/// Generate a maze of the given dimensions.
///
/// Post-conditions: every carved cell is reachable from (1,1); the stairs
/// cells are walkable from the carved region; the outer border is wall.
/// Output is fully determined by the RNG's seed.
pub fn generate(width: usize, height: usize, rng: &mut impl Rng) -> Maze {
    assert!(width >= 5 && height >= 5, "maze too small to carve");

    let mut maze = Maze::filled(width, height, CellKind::Wall);
    maze.set(1, 1, CellKind::Floor);

    let mut stack = vec![Frame::at(1, 1, rng)];
    while let Some(top) = stack.last_mut() {
        if top.next == CARVE_DIRS.len() {
            stack.pop();
            continue;
        }
        let (dx, dy) = top.dirs[top.next];
        top.next += 1;

        let nx = top.x as i32 + dx;
        let ny = top.y as i32 + dy;
        if !strictly_interior(nx, width) || !strictly_interior(ny, height) {
            continue;
        }
        let (nx, ny) = (nx as usize, ny as usize);
        if !maze.is_wall(nx, ny) {
            continue;
        }

        // Carve the wall between the two cells, then the target itself.
        let mx = (top.x as i32 + dx / 2) as usize;
        let my = (top.y as i32 + dy / 2) as usize;
        maze.set(mx, my, CellKind::Floor);
        maze.set(nx, ny, CellKind::Floor);
        stack.push(Frame::at(nx, ny, rng));
    }

    place_stairs(&mut maze);
    maze
}

fn strictly_interior(coord: i32, dim: usize) -> bool {
    coord > 0 && coord < dim as i32 - 1
}

/// StairsDown in the far corner, StairsUp near the top-right. On even grid
/// dimensions these land on cells the backtracker can never carve next to,
/// so each stairs cell is linked westward into the nearest corridor.
fn place_stairs(maze: &mut Maze) {
    let (w, h) = (maze.width, maze.height);
    maze.set(w - 2, h - 2, CellKind::StairsDown);
    link_if_isolated(maze, w - 2, h - 2);
    maze.set(w - 2, 1, CellKind::StairsUp);
    link_if_isolated(maze, w - 2, 1);
}

fn link_if_isolated(maze: &mut Maze, x: usize, y: usize) {
    let open = [(0i32, -1i32), (1, 0), (0, 1), (-1, 0)].iter().any(|&(dx, dy)| {
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        maze.in_bounds(nx, ny) && !maze.is_wall(nx as usize, ny as usize)
    });
    if !open {
        maze.set(x - 1, y, CellKind::Floor);
    }
}

// ── Tests ─────────────────────────────────────────────────────
