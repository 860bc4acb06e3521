//! Core data model — entities, static stat tables, session state. No game
//! logic lives here; the mode handlers in `logic.rs` and the subsystem
//! modules mutate this data.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::floor::FloorRegistry;
use crate::quest::QuestLog;

/// Every floor is a fixed 16×16 grid.
pub const FLOOR_WIDTH: usize = 16;
pub const FLOOR_HEIGHT: usize = 16;

/// Price of a night at the inn (full heal).
pub const INN_COST: i32 = 30;

// ── Grid primitives ───────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Cardinal facing, clockwise from north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Facing {
    North,
    East,
    South,
    West,
}

impl Facing {
    pub fn dx(self) -> i32 {
        match self {
            Facing::North | Facing::South => 0,
            Facing::East => 1,
            Facing::West => -1,
        }
    }

    pub fn dy(self) -> i32 {
        match self {
            Facing::North => -1,
            Facing::South => 1,
            Facing::East | Facing::West => 0,
        }
    }

    pub fn turn_left(self) -> Self {
        match self {
            Facing::North => Facing::West,
            Facing::West => Facing::South,
            Facing::South => Facing::East,
            Facing::East => Facing::North,
        }
    }

    pub fn turn_right(self) -> Self {
        match self {
            Facing::North => Facing::East,
            Facing::East => Facing::South,
            Facing::South => Facing::West,
            Facing::West => Facing::North,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CellKind {
    Wall,
    Floor,
    StairsUp,
    StairsDown,
}

/// An immutable carved grid. Dynamic content (enemies, chests) is overlaid
/// by [`FloorState`], never written into the grid itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maze {
    pub width: usize,
    pub height: usize,
    grid: Vec<Vec<CellKind>>,
}

impl Maze {
    pub fn filled(width: usize, height: usize, kind: CellKind) -> Self {
        Self {
            width,
            height,
            grid: vec![vec![kind; width]; height],
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> CellKind {
        self.grid[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, kind: CellKind) {
        self.grid[y][x] = kind;
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.grid[y][x] == CellKind::Wall
    }

    pub fn rows(&self) -> &[Vec<CellKind>] {
        &self.grid
    }
}

// ── Enemies ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum EnemyKind {
    Skeleton,
    Slime,
    Goblin,
    Minotaur,
    Dragon,
    DemonLord,
}

pub struct EnemyInfo {
    pub name: &'static str,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    /// Stored for every variant but never read by the combat resolver;
    /// reserved for a future initiative system.
    pub speed: i32,
    pub gold: i32,
}

pub fn enemy_info(kind: EnemyKind) -> EnemyInfo {
    match kind {
        EnemyKind::Skeleton => EnemyInfo {
            name: "Skeleton", max_hp: 40, attack: 20, defense: 10, speed: 3, gold: 20,
        },
        EnemyKind::Slime => EnemyInfo {
            name: "Slime", max_hp: 20, attack: 30, defense: 15, speed: 6, gold: 10,
        },
        EnemyKind::Goblin => EnemyInfo {
            name: "Goblin", max_hp: 30, attack: 40, defense: 4, speed: 4, gold: 30,
        },
        EnemyKind::Minotaur => EnemyInfo {
            name: "Minotaur", max_hp: 100, attack: 20, defense: 15, speed: 3, gold: 100,
        },
        EnemyKind::Dragon => EnemyInfo {
            name: "Dragon", max_hp: 200, attack: 30, defense: 20, speed: 2, gold: 300,
        },
        EnemyKind::DemonLord => EnemyInfo {
            name: "Demon Lord", max_hp: 300, attack: 50, defense: 25, speed: 5, gold: 500,
        },
    }
}

/// The roster floors are populated from (and kill quests drawn from).
pub const BASIC_ENEMIES: &[EnemyKind] =
    &[EnemyKind::Skeleton, EnemyKind::Slime, EnemyKind::Goblin];

/// A live enemy on a floor.
#[derive(Clone, Debug)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Pos,
    pub hp: i32,
}

impl Enemy {
    pub fn spawn(kind: EnemyKind, pos: Pos) -> Self {
        Self {
            kind,
            pos,
            hp: enemy_info(kind).max_hp,
        }
    }
}

// ── Items & equipment ─────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    Weapon,
    Shield,
    Head,
    Body,
    Feet,
}

pub const ALL_SLOTS: [Slot; 5] = [Slot::Weapon, Slot::Shield, Slot::Head, Slot::Body, Slot::Feet];

impl Slot {
    pub fn index(self) -> usize {
        match self {
            Slot::Weapon => 0,
            Slot::Shield => 1,
            Slot::Head => 2,
            Slot::Body => 3,
            Slot::Feet => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Slot::Weapon => "Weapon",
            Slot::Shield => "Shield",
            Slot::Head => "Head",
            Slot::Body => "Body",
            Slot::Feet => "Feet",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EquipKind {
    LongSword,
    LeatherArmor,
    SmallShield,
    IronHelmet,
    Boots,
}

pub struct EquipInfo {
    pub name: &'static str,
    pub slot: Slot,
    pub attack: i32,
    pub defense: i32,
    /// Reserved, like enemy speed: tracked on the sheet, unused in combat.
    pub evasion: i32,
}

pub fn equip_info(kind: EquipKind) -> EquipInfo {
    match kind {
        EquipKind::LongSword => EquipInfo {
            name: "Long Sword", slot: Slot::Weapon, attack: 15, defense: 0, evasion: 0,
        },
        EquipKind::LeatherArmor => EquipInfo {
            name: "Leather Armor", slot: Slot::Body, attack: 0, defense: 9, evasion: 0,
        },
        EquipKind::SmallShield => EquipInfo {
            name: "Small Shield", slot: Slot::Shield, attack: 0, defense: 7, evasion: 8,
        },
        EquipKind::IronHelmet => EquipInfo {
            name: "Iron Helmet", slot: Slot::Head, attack: 0, defense: 8, evasion: 0,
        },
        EquipKind::Boots => EquipInfo {
            name: "Boots", slot: Slot::Feet, attack: 0, defense: 0, evasion: 15,
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsumableKind {
    Potion,
    FireballScroll,
}

pub const CONSUMABLES: &[ConsumableKind] =
    &[ConsumableKind::Potion, ConsumableKind::FireballScroll];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item {
    Consumable(ConsumableKind),
    Equipment(EquipKind),
}

impl Item {
    pub fn name(self) -> &'static str {
        match self {
            Item::Consumable(ConsumableKind::Potion) => "Potion",
            Item::Consumable(ConsumableKind::FireballScroll) => "Fireball Scroll",
            Item::Equipment(kind) => equip_info(kind).name,
        }
    }
}

/// What the town shop sells, with prices.
pub const SHOP_CATALOG: &[(Item, i32)] = &[
    (Item::Consumable(ConsumableKind::Potion), 10),
    (Item::Consumable(ConsumableKind::FireballScroll), 20),
    (Item::Equipment(EquipKind::LongSword), 50),
    (Item::Equipment(EquipKind::LeatherArmor), 50),
    (Item::Equipment(EquipKind::SmallShield), 30),
];

// ── Player ────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Pos,
    pub facing: Facing,
    pub hp: i32,
    pub max_hp: i32,
    pub gold: i32,
    pub base_attack: i32,
    pub base_defense: i32,
    pub base_evasion: i32,
    pub inventory: Vec<Item>,
    /// One optional item per slot, indexed by [`Slot::index`].
    pub equipment: [Option<EquipKind>; 5],
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Pos::new(1, 1),
            facing: Facing::North,
            hp: 100,
            max_hp: 100,
            gold: 100,
            base_attack: 10,
            base_defense: 5,
            base_evasion: 0,
            inventory: Vec::new(),
            equipment: [None; 5],
        }
    }

    pub fn equipped(&self, slot: Slot) -> Option<EquipKind> {
        self.equipment[slot.index()]
    }

    /// Derived stat: base plus the sum of currently-equipped bonuses.
    pub fn attack(&self) -> i32 {
        self.base_attack + self.equip_sum(|i| i.attack)
    }

    pub fn defense(&self) -> i32 {
        self.base_defense + self.equip_sum(|i| i.defense)
    }

    pub fn evasion(&self) -> i32 {
        self.base_evasion + self.equip_sum(|i| i.evasion)
    }

    fn equip_sum(&self, f: impl Fn(&EquipInfo) -> i32) -> i32 {
        self.equipment
            .iter()
            .flatten()
            .map(|&kind| f(&equip_info(kind)))
            .sum()
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

// ── Floor content ─────────────────────────────────────────────

/// The hidden hazard attached to a chest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapKind {
    None,
    Alarm,
    Bomb,
}

#[derive(Clone, Debug)]
pub struct Chest {
    pub pos: Pos,
    pub trap: TrapKind,
}

/// Everything that lives on one dungeon depth: the immutable maze plus the
/// dynamic overlay. Cached for the whole session; revisits see the same
/// enemies and chests they left behind.
#[derive(Clone, Debug)]
pub struct FloorState {
    pub maze: Maze,
    pub enemies: Vec<Enemy>,
    pub chests: Vec<Chest>,
}

// ── Quests ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestKind {
    EnemyKill,
    ChestCollect,
}

#[derive(Clone, Debug)]
pub struct Quest {
    pub kind: QuestKind,
    /// Kill quests filter victories by this variant; `None` for chest quests.
    pub target: Option<EnemyKind>,
    pub required: u32,
    pub reward: i32,
    pub description: String,
    pub progress: u32,
}

// ── Modes ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum GuildView {
    Browse,
    QuestList,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ChestView {
    Selection,
    Inspecting,
    Result,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BattlePhase {
    PlayerTurn,
    PlayerLog,
    EnemyTurn,
    EnemyLog,
    Victory,
    Defeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MenuTab {
    Status,
    Equipment,
    Inventory,
}

/// The single active top-level game state. Sub-states are only reachable
/// from their parent mode; exhaustive matching in `logic.rs` keeps that
/// invariant honest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Mode {
    Town,
    Shop,
    Guild(GuildView),
    Dungeon,
    Chest(ChestView),
    Battle(BattlePhase),
    InventoryMenu,
    /// Terminal state after defeat; every intent is a no-op. Whether the
    /// surrounding application quits or restarts is its decision.
    Halted,
}

/// Engagement against one enemy, identified by its index into the current
/// floor's enemy list. The index stays valid for the battle's duration
/// because the list is only mutated when the battle ends.
#[derive(Clone, Copy, Debug)]
pub struct Battle {
    pub enemy_index: usize,
}

// ── Session ───────────────────────────────────────────────────

/// Root state for one play session. Owned exclusively by the caller and
/// threaded by `&mut` through every handler — there is no global state.
pub struct Session {
    pub mode: Mode,
    /// 0 while in town, negative below ground.
    pub depth: i32,
    pub player: Player,
    pub floors: FloorRegistry,
    pub quests: QuestLog,
    pub battle: Option<Battle>,
    /// Transient log line; cleared by the next Confirm intent.
    pub message: String,

    // Cursor state for the various menus.
    pub town_cursor: usize,
    pub shop_cursor: usize,
    pub guild_cursor: usize,
    pub quest_cursor: usize,
    pub chest_cursor: usize,
    pub battle_cursor: usize,
    pub menu_tab: MenuTab,
    pub slot_cursor: usize,
    pub item_cursor: usize,
    /// Mode to restore when the inventory menu closes.
    pub menu_return: Mode,

    pub rng: StdRng,
}

impl Session {
    /// Start a fresh session in town. All randomness derives from `seed`,
    /// so two sessions fed the same seed and intents evolve identically.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let quests = QuestLog::new(&mut rng);
        Self {
            mode: Mode::Town,
            depth: 0,
            player: Player::new(),
            floors: FloorRegistry::new(),
            quests,
            battle: None,
            message: String::new(),
            town_cursor: 0,
            shop_cursor: 0,
            guild_cursor: 0,
            quest_cursor: 0,
            chest_cursor: 0,
            battle_cursor: 0,
            menu_tab: MenuTab::Status,
            slot_cursor: 0,
            item_cursor: 0,
            menu_return: Mode::Town,
            rng,
        }
    }

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = text.into();
    }

    pub fn current_floor(&self) -> Option<&FloorState> {
        self.floors.get(self.depth)
    }

    pub fn current_floor_mut(&mut self) -> Option<&mut FloorState> {
        self.floors.get_mut(self.depth)
    }

    /// The enemy currently engaged in battle.
    ///
    /// Calling this outside a battle is a logic error; the battle state
    /// machine guarantees the index is live while `battle` is `Some`.
    pub fn battle_enemy(&self) -> &Enemy {
        let battle = self.battle.as_ref().expect("battle_enemy outside battle");
        &self.current_floor().expect("battle without a floor").enemies[battle.enemy_index]
    }

    pub fn battle_enemy_mut(&mut self) -> &mut Enemy {
        let index = self.battle.as_ref().expect("battle_enemy outside battle").enemy_index;
        &mut self.current_floor_mut().expect("battle without a floor").enemies[index]
    }
}

// ── Tests ─────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_session() {
        let s = Session::new(1);
        assert_eq!(s.mode, Mode::Town);
        assert_eq!(s.depth, 0);
        assert_eq!(s.player.hp, 100);
        assert_eq!(s.player.gold, 100);
        assert!(s.battle.is_none());
        assert!(s.message.is_empty());
        assert_eq!(s.quests.available.len(), 2);
    }

    #[test]
    fn facing_turns_are_inverse() {
        for f in [Facing::North, Facing::East, Facing::South, Facing::West] {
            assert_eq!(f.turn_left().turn_right(), f);
            assert_eq!(f.turn_right().turn_right().turn_right().turn_right(), f);
        }
    }

    #[test]
    fn facing_deltas_are_unit_vectors() {
        for f in [Facing::North, Facing::East, Facing::South, Facing::West] {
            assert_eq!(f.dx().abs() + f.dy().abs(), 1);
        }
    }

    #[test]
    fn derived_stats_without_equipment() {
        let p = Player::new();
        assert_eq!(p.attack(), 10);
        assert_eq!(p.defense(), 5);
        assert_eq!(p.evasion(), 0);
    }

    #[test]
    fn derived_stats_sum_equipped_bonuses() {
        let mut p = Player::new();
        p.equipment[Slot::Weapon.index()] = Some(EquipKind::LongSword);
        p.equipment[Slot::Shield.index()] = Some(EquipKind::SmallShield);
        assert_eq!(p.attack(), 25);
        assert_eq!(p.defense(), 12);
        assert_eq!(p.evasion(), 8);
    }

    #[test]
    fn enemy_spawn_starts_at_full_hp() {
        let e = Enemy::spawn(EnemyKind::Dragon, Pos::new(8, 8));
        assert_eq!(e.hp, 200);
        assert_eq!(e.pos, Pos::new(8, 8));
    }

    #[test]
    fn basic_roster_excludes_bosses() {
        for &kind in BASIC_ENEMIES {
            assert!(enemy_info(kind).max_hp <= 40);
        }
        assert!(!BASIC_ENEMIES.contains(&EnemyKind::Minotaur));
        assert!(!BASIC_ENEMIES.contains(&EnemyKind::Dragon));
        assert!(!BASIC_ENEMIES.contains(&EnemyKind::DemonLord));
    }

    #[test]
    fn every_slot_has_a_unique_index() {
        let mut seen = [false; 5];
        for slot in ALL_SLOTS {
            assert!(!seen[slot.index()]);
            seen[slot.index()] = true;
        }
    }

    #[test]
    fn shop_catalog_prices_positive() {
        for &(item, price) in SHOP_CATALOG {
            assert!(price > 0, "{} priced at {}", item.name(), price);
        }
    }

    #[test]
    fn maze_cell_roundtrip() {
        let mut m = Maze::filled(5, 5, CellKind::Wall);
        assert!(m.is_wall(2, 2));
        m.set(2, 2, CellKind::Floor);
        assert_eq!(m.cell(2, 2), CellKind::Floor);
        assert!(!m.in_bounds(5, 0));
        assert!(!m.in_bounds(-1, 0));
        assert!(m.in_bounds(4, 4));
    }
}
