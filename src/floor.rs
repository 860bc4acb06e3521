//! Floor lifecycle — generation-on-first-visit, cached by depth.
//!
//! The cache is unbounded on purpose: a session only ever touches as many
//! depths as the player walks to, and keeping every visited floor alive is
//! what makes "the dungeon remembers" work (slain enemies stay slain,
//! looted chests stay empty).

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::maze;
use crate::state::{
    Chest, Enemy, EnemyKind, FloorState, Pos, TrapKind, BASIC_ENEMIES, FLOOR_HEIGHT, FLOOR_WIDTH,
};

/// Chests placed on a freshly generated floor.
const CHESTS_PER_FLOOR: usize = 2;
/// Basic enemies placed on a freshly generated (non-boss) floor.
const ENEMIES_PER_FLOOR: usize = 3;
/// Where a boss waits on its floor.
const BOSS_POS: Pos = Pos { x: 8, y: 8 };

/// Which boss guards a given depth, if any.
///
/// The stat tables reserve boss floors for positive multiples of five;
/// depths beyond the third tier all get the final boss.
pub fn boss_for_depth(depth: i32) -> Option<EnemyKind> {
    if depth > 0 && depth % 5 == 0 {
        Some(match depth {
            5 => EnemyKind::Minotaur,
            10 => EnemyKind::Dragon,
            _ => EnemyKind::DemonLord,
        })
    } else {
        None
    }
}

/// Session-lifetime cache of generated floors, keyed by depth.
pub struct FloorRegistry {
    floors: BTreeMap<i32, FloorState>,
}

impl FloorRegistry {
    pub fn new() -> Self {
        Self { floors: BTreeMap::new() }
    }

    pub fn get(&self, depth: i32) -> Option<&FloorState> {
        self.floors.get(&depth)
    }

    pub fn get_mut(&mut self, depth: i32) -> Option<&mut FloorState> {
        self.floors.get_mut(&depth)
    }

    pub fn contains(&self, depth: i32) -> bool {
        self.floors.contains_key(&depth)
    }

    /// Fetch the floor at `depth`, generating and populating it on first
    /// visit. Revisits return the cached floor untouched — enemies and
    /// chests are not regenerated.
    pub fn load(&mut self, depth: i32, rng: &mut impl Rng) -> &mut FloorState {
        self.floors
            .entry(depth)
            .or_insert_with(|| populate(depth, rng))
    }
}

impl Default for FloorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn populate(depth: i32, rng: &mut impl Rng) -> FloorState {
    let maze = maze::generate(FLOOR_WIDTH, FLOOR_HEIGHT, rng);

    // Cells eligible for dynamic content: plain floor, excluding the start
    // cell so nothing sits on the player the moment the floor loads.
    let mut open: Vec<Pos> = Vec::new();
    for y in 0..maze.height {
        for x in 0..maze.width {
            if maze.cell(x, y) == crate::state::CellKind::Floor && !(x == 1 && y == 1) {
                open.push(Pos::new(x, y));
            }
        }
    }
    open.shuffle(rng);

    let chests = open
        .iter()
        .take(CHESTS_PER_FLOOR)
        .map(|&pos| Chest { pos, trap: random_trap(rng) })
        .collect();

    let enemies = match boss_for_depth(depth) {
        Some(boss) => vec![Enemy::spawn(boss, BOSS_POS)],
        None => (0..ENEMIES_PER_FLOOR)
            .map(|_| {
                let kind = *BASIC_ENEMIES.choose(rng).expect("roster is non-empty");
                let pos = *open.choose(rng).expect("carved maze has open cells");
                Enemy::spawn(kind, pos)
            })
            .collect(),
    };

    FloorState { maze, enemies, chests }
}

fn random_trap(rng: &mut impl Rng) -> TrapKind {
    match rng.gen_range(0..3) {
        0 => TrapKind::None,
        1 => TrapKind::Alarm,
        _ => TrapKind::Bomb,
    }
}

// ── Tests ─────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn load_generates_once_and_caches() {
        let mut reg = FloorRegistry::new();
        let mut r = rng(5);
        assert!(!reg.contains(-1));
        reg.load(-1, &mut r);
        assert!(reg.contains(-1));

        // Mutate, then reload: the mutation must survive.
        reg.get_mut(-1).unwrap().enemies.clear();
        let floor = reg.load(-1, &mut r);
        assert!(floor.enemies.is_empty());
    }

    #[test]
    fn fresh_floor_has_standard_population() {
        let mut reg = FloorRegistry::new();
        let floor = reg.load(-1, &mut rng(42));
        assert_eq!(floor.chests.len(), 2);
        assert_eq!(floor.enemies.len(), 3);
        for enemy in &floor.enemies {
            assert!(BASIC_ENEMIES.contains(&enemy.kind));
        }
    }

    #[test]
    fn dynamic_content_never_on_walls() {
        for seed in 0..10 {
            let mut reg = FloorRegistry::new();
            let floor = reg.load(-1, &mut rng(seed));
            for chest in &floor.chests {
                assert!(!floor.maze.is_wall(chest.pos.x, chest.pos.y));
                assert_ne!(chest.pos, Pos::new(1, 1));
            }
            for enemy in &floor.enemies {
                assert!(!floor.maze.is_wall(enemy.pos.x, enemy.pos.y));
                assert_ne!(enemy.pos, Pos::new(1, 1));
            }
        }
    }

    #[test]
    fn chest_positions_are_distinct() {
        let mut reg = FloorRegistry::new();
        let floor = reg.load(-3, &mut rng(9));
        assert_ne!(floor.chests[0].pos, floor.chests[1].pos);
    }

    #[test]
    fn boss_tiers_by_depth() {
        assert_eq!(boss_for_depth(5), Some(EnemyKind::Minotaur));
        assert_eq!(boss_for_depth(10), Some(EnemyKind::Dragon));
        assert_eq!(boss_for_depth(15), Some(EnemyKind::DemonLord));
        assert_eq!(boss_for_depth(20), Some(EnemyKind::DemonLord));
        assert_eq!(boss_for_depth(-5), None);
        assert_eq!(boss_for_depth(-1), None);
        assert_eq!(boss_for_depth(3), None);
        assert_eq!(boss_for_depth(0), None);
    }

    #[test]
    fn boss_floor_has_single_boss_at_center() {
        let mut reg = FloorRegistry::new();
        let floor = reg.load(5, &mut rng(1));
        assert_eq!(floor.enemies.len(), 1);
        assert_eq!(floor.enemies[0].kind, EnemyKind::Minotaur);
        assert_eq!(floor.enemies[0].pos, BOSS_POS);
        // Boss floors still get their chests.
        assert_eq!(floor.chests.len(), 2);
    }

    #[test]
    fn distinct_depths_get_distinct_floors() {
        let mut reg = FloorRegistry::new();
        let mut r = rng(77);
        let a = reg.load(-1, &mut r).maze.clone();
        let b = reg.load(-2, &mut r).maze.clone();
        assert_ne!(a, b);
    }
}
