//! Mode handlers — one step of the simulation per call.
//!
//! `step` is the crate's single entry point for advancing time: it takes
//! at most one intent, dispatches on the current mode, and mutates the
//! session in place. Intents that make no sense in the current mode fall
//! through as no-ops.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::combat;
use crate::intent::{Intent, SelectDir};
use crate::state::{
    equip_info, CellKind, ChestView, ConsumableKind, Enemy, GuildView, Item, MenuTab, Mode, Pos,
    Session, TrapKind, ALL_SLOTS, BASIC_ENEMIES, CONSUMABLES, INN_COST, SHOP_CATALOG,
};

/// Town square choices, in cursor order.
pub const TOWN_MENU: &[&str] = &["Inn", "Shop", "Enter Dungeon", "Guild"];
/// Guild counter choices, in cursor order.
pub const GUILD_MENU: &[&str] = &["Accept Quest", "Turn In", "Leave"];
/// Choices when standing on a chest, in cursor order.
pub const CHEST_MENU: &[&str] = &["Open", "Inspect", "Leave"];

/// Advance the simulation by one step.
///
/// A `Confirm` intent first clears the transient message line, so log
/// text survives exactly until the player acknowledges it.
pub fn step(session: &mut Session, intent: Option<Intent>) {
    if intent == Some(Intent::Confirm) {
        session.message.clear();
    }
    match session.mode {
        Mode::Town => town_step(session, intent),
        Mode::Shop => shop_step(session, intent),
        Mode::Guild(view) => guild_step(session, view, intent),
        Mode::Dungeon => dungeon_step(session, intent),
        Mode::Chest(view) => chest_step(session, view, intent),
        Mode::Battle(phase) => combat::battle_step(session, phase, intent),
        Mode::InventoryMenu => menu_step(session, intent),
        Mode::Halted => {}
    }
}

/// Enter the dungeon floor at `depth`: generate it on first visit, put the
/// player at the fixed entry cell.
pub fn load_floor(session: &mut Session, depth: i32) {
    session.floors.load(depth, &mut session.rng);
    session.depth = depth;
    session.player.pos = Pos::new(1, 1);
    session.mode = Mode::Dungeon;
}

fn move_cursor(cursor: &mut usize, len: usize, dir: SelectDir) {
    match dir {
        SelectDir::Up => {
            if *cursor > 0 {
                *cursor -= 1;
            }
        }
        SelectDir::Down => {
            if *cursor + 1 < len {
                *cursor += 1;
            }
        }
        SelectDir::Left | SelectDir::Right => {}
    }
}

// ── Town ──────────────────────────────────────────────────────

fn town_step(session: &mut Session, intent: Option<Intent>) {
    match intent {
        Some(Intent::DirectionalSelect(dir)) => {
            move_cursor(&mut session.town_cursor, TOWN_MENU.len(), dir);
        }
        Some(Intent::Confirm) => match session.town_cursor {
            0 => rest_at_inn(session),
            1 => {
                session.shop_cursor = 0;
                session.mode = Mode::Shop;
            }
            2 => load_floor(session, -1),
            _ => {
                session.guild_cursor = 0;
                session.mode = Mode::Guild(GuildView::Browse);
            }
        },
        Some(Intent::ToggleMenu) => open_menu(session, Mode::Town),
        _ => {}
    }
}

fn rest_at_inn(session: &mut Session) {
    if session.player.gold < INN_COST {
        session.set_message("Not enough gold.");
        return;
    }
    session.player.gold -= INN_COST;
    session.player.hp = session.player.max_hp;
    session.set_message("You rest at the inn. HP fully recovered!");
}

// ── Shop ──────────────────────────────────────────────────────

fn shop_step(session: &mut Session, intent: Option<Intent>) {
    // Catalog entries plus a trailing "Back" row.
    let rows = SHOP_CATALOG.len() + 1;
    match intent {
        Some(Intent::DirectionalSelect(dir)) => {
            move_cursor(&mut session.shop_cursor, rows, dir);
        }
        Some(Intent::Confirm) => {
            if session.shop_cursor == SHOP_CATALOG.len() {
                session.mode = Mode::Town;
            } else {
                buy(session, session.shop_cursor);
            }
        }
        Some(Intent::Cancel) => session.mode = Mode::Town,
        _ => {}
    }
}

fn buy(session: &mut Session, index: usize) {
    let (item, price) = SHOP_CATALOG[index];
    if session.player.gold < price {
        session.set_message("Not enough gold.");
        return;
    }
    session.player.gold -= price;
    session.player.inventory.push(item);
    session.set_message(format!("Bought a {}.", item.name()));
}

// ── Guild ─────────────────────────────────────────────────────

fn guild_step(session: &mut Session, view: GuildView, intent: Option<Intent>) {
    match view {
        GuildView::Browse => guild_browse(session, intent),
        GuildView::QuestList => guild_quest_list(session, intent),
    }
}

fn guild_browse(session: &mut Session, intent: Option<Intent>) {
    match intent {
        Some(Intent::DirectionalSelect(dir)) => {
            move_cursor(&mut session.guild_cursor, GUILD_MENU.len(), dir);
        }
        Some(Intent::Confirm) => match session.guild_cursor {
            0 => {
                if session.quests.active.is_some() {
                    session.set_message("Finish your current quest first.");
                } else {
                    session.quest_cursor = 0;
                    session.mode = Mode::Guild(GuildView::QuestList);
                }
            }
            1 => turn_in_quest(session),
            _ => session.mode = Mode::Town,
        },
        Some(Intent::Cancel) => session.mode = Mode::Town,
        _ => {}
    }
}

fn turn_in_quest(session: &mut Session) {
    if session.quests.active.is_none() {
        session.set_message("You have no quest to report.");
        return;
    }
    match session.quests.turn_in(&mut session.rng) {
        Some(reward) => {
            session.player.gold += reward;
            session.set_message(format!("Quest complete! Got {} gold!", reward));
        }
        None => session.set_message("The quest was unfinished. It has been withdrawn."),
    }
}

fn guild_quest_list(session: &mut Session, intent: Option<Intent>) {
    // Offers plus a trailing "Cancel" row.
    let rows = session.quests.available.len() + 1;
    match intent {
        Some(Intent::DirectionalSelect(dir)) => {
            move_cursor(&mut session.quest_cursor, rows, dir);
        }
        Some(Intent::Confirm) => {
            let index = session.quest_cursor;
            if index < session.quests.available.len() && session.quests.accept(index) {
                let desc = session.quests.active.as_ref().map(|q| q.description.clone());
                if let Some(desc) = desc {
                    session.set_message(format!("Quest accepted: {}", desc));
                }
            }
            session.mode = Mode::Guild(GuildView::Browse);
        }
        Some(Intent::Cancel) => session.mode = Mode::Guild(GuildView::Browse),
        _ => {}
    }
}

// ── Dungeon ───────────────────────────────────────────────────

fn dungeon_step(session: &mut Session, intent: Option<Intent>) {
    // Standing on a live enemy always means fighting it, however the
    // player came to be there (stacked spawns, a just-won battle on a
    // shared cell). Checked every step, before any intent is handled.
    if engage_enemy_here(session) {
        return;
    }
    match intent {
        Some(Intent::MoveForward) => walk(session, 1),
        Some(Intent::MoveBackward) => walk(session, -1),
        Some(Intent::TurnLeft) => session.player.facing = session.player.facing.turn_left(),
        Some(Intent::TurnRight) => session.player.facing = session.player.facing.turn_right(),
        Some(Intent::Confirm) => use_tile(session),
        Some(Intent::Cancel) => {
            session.depth = 0;
            session.town_cursor = 0;
            session.mode = Mode::Town;
            session.set_message("You return to town.");
        }
        Some(Intent::ToggleMenu) => open_menu(session, Mode::Dungeon),
        _ => {}
    }
}

/// Step one cell along the facing axis (`sign` of -1 walks backward).
/// Walking into a cell occupied by an enemy starts a battle.
fn walk(session: &mut Session, sign: i32) {
    let facing = session.player.facing;
    let nx = session.player.pos.x as i32 + facing.dx() * sign;
    let ny = session.player.pos.y as i32 + facing.dy() * sign;
    {
        let floor = match session.current_floor() {
            Some(f) => f,
            None => return,
        };
        if !floor.maze.in_bounds(nx, ny) || floor.maze.is_wall(nx as usize, ny as usize) {
            return;
        }
    }
    session.player.pos = Pos::new(nx as usize, ny as usize);
    engage_enemy_here(session);
}

/// Start a battle if a live enemy shares the player's cell. Returns
/// whether one started.
fn engage_enemy_here(session: &mut Session) -> bool {
    let here = session.player.pos;
    let engaged = session
        .current_floor()
        .and_then(|f| f.enemies.iter().position(|e| e.pos == here));
    match engaged {
        Some(index) => {
            combat::start_battle(session, index);
            true
        }
        None => false,
    }
}

/// Interact with the cell under the player: a chest takes priority over
/// whatever the tile itself is.
fn use_tile(session: &mut Session) {
    let here = session.player.pos;
    let floor = match session.current_floor() {
        Some(f) => f,
        None => return,
    };
    if floor.chests.iter().any(|c| c.pos == here) {
        session.chest_cursor = 0;
        session.mode = Mode::Chest(ChestView::Selection);
        return;
    }
    match floor.maze.cell(here.x, here.y) {
        CellKind::StairsDown => {
            load_floor(session, session.depth - 1);
            session.set_message("You descend the stairs.");
        }
        CellKind::StairsUp => {
            if session.depth == -1 {
                session.depth = 0;
                session.town_cursor = 0;
                session.mode = Mode::Town;
                session.set_message("You climb back to town.");
            } else {
                load_floor(session, session.depth + 1);
                session.set_message("You climb the stairs.");
            }
        }
        _ => {}
    }
}

// ── Chest ─────────────────────────────────────────────────────

fn chest_step(session: &mut Session, view: ChestView, intent: Option<Intent>) {
    match view {
        ChestView::Selection => match intent {
            Some(Intent::DirectionalSelect(dir)) => {
                move_cursor(&mut session.chest_cursor, CHEST_MENU.len(), dir);
            }
            Some(Intent::Confirm) => match session.chest_cursor {
                0 => open_chest(session),
                1 => inspect_chest(session),
                _ => session.mode = Mode::Dungeon,
            },
            Some(Intent::Cancel) => session.mode = Mode::Dungeon,
            _ => {}
        },
        // Both log views hold until acknowledged, then drop back to the
        // dungeon; an inspected chest stays on its tile.
        ChestView::Inspecting | ChestView::Result => {
            if intent == Some(Intent::Confirm) {
                session.mode = Mode::Dungeon;
            }
        }
    }
}

fn chest_index_here(session: &Session) -> Option<usize> {
    let here = session.player.pos;
    session
        .current_floor()
        .and_then(|f| f.chests.iter().position(|c| c.pos == here))
}

fn inspect_chest(session: &mut Session) {
    let index = match chest_index_here(session) {
        Some(i) => i,
        None => {
            session.mode = Mode::Dungeon;
            return;
        }
    };
    // Inspection reveals whether the chest is trapped, not what the trap is.
    let trap = session.current_floor().map(|f| f.chests[index].trap);
    session.set_message(match trap {
        Some(TrapKind::None) => "It looks safe.",
        _ => "Something about this chest feels wrong...",
    });
    session.mode = Mode::Chest(ChestView::Inspecting);
}

/// Opening always consumes the chest, whatever is inside.
fn open_chest(session: &mut Session) {
    let index = match chest_index_here(session) {
        Some(i) => i,
        None => {
            session.mode = Mode::Dungeon;
            return;
        }
    };
    let chest = session
        .current_floor_mut()
        .expect("chest without a floor")
        .chests
        .remove(index);
    session.quests.on_chest_opened();

    match chest.trap {
        TrapKind::Alarm => {
            let kind = *BASIC_ENEMIES
                .choose(&mut session.rng)
                .expect("roster is non-empty");
            let floor = session.current_floor_mut().expect("chest without a floor");
            floor.enemies.push(Enemy::spawn(kind, chest.pos));
            let index = floor.enemies.len() - 1;
            combat::start_battle(session, index);
        }
        TrapKind::Bomb => {
            let damage = session.rng.gen_range(10..=30);
            session.player.hp -= damage;
            if session.player.hp <= 0 {
                session.set_message("The chest explodes! You have fallen...");
                session.mode = Mode::Halted;
            } else {
                session.set_message(format!("The chest explodes! {} damage!", damage));
                session.mode = Mode::Chest(ChestView::Result);
            }
        }
        TrapKind::None => {
            loot_chest(session);
            session.mode = Mode::Chest(ChestView::Result);
        }
    }
}

fn loot_chest(session: &mut Session) {
    if session.rng.gen_bool(0.5) {
        let kind = CONSUMABLES[session.rng.gen_range(0..CONSUMABLES.len())];
        let item = Item::Consumable(kind);
        session.player.inventory.push(item);
        session.set_message(format!("Found a {}!", item.name()));
    } else {
        let gold = session.rng.gen_range(10..=50);
        session.player.gold += gold;
        session.set_message(format!("Found {} gold!", gold));
    }
}

// ── Inventory menu ────────────────────────────────────────────

fn open_menu(session: &mut Session, return_to: Mode) {
    session.menu_return = return_to;
    session.menu_tab = MenuTab::Status;
    session.slot_cursor = 0;
    session.item_cursor = 0;
    session.mode = Mode::InventoryMenu;
}

fn menu_step(session: &mut Session, intent: Option<Intent>) {
    match intent {
        Some(Intent::ToggleMenu) | Some(Intent::Cancel) => {
            session.mode = session.menu_return;
        }
        Some(Intent::DirectionalSelect(SelectDir::Left)) => {
            session.menu_tab = match session.menu_tab {
                MenuTab::Inventory => MenuTab::Equipment,
                _ => MenuTab::Status,
            };
        }
        Some(Intent::DirectionalSelect(SelectDir::Right)) => {
            session.menu_tab = match session.menu_tab {
                MenuTab::Status => MenuTab::Equipment,
                _ => MenuTab::Inventory,
            };
        }
        Some(Intent::DirectionalSelect(dir)) => match session.menu_tab {
            MenuTab::Status => {}
            MenuTab::Equipment => {
                move_cursor(&mut session.slot_cursor, ALL_SLOTS.len(), dir);
            }
            MenuTab::Inventory => {
                let len = session.player.inventory.len();
                if len > 0 {
                    move_cursor(&mut session.item_cursor, len, dir);
                }
            }
        },
        Some(Intent::Confirm) => match session.menu_tab {
            MenuTab::Status => {}
            MenuTab::Equipment => unequip_selected(session),
            MenuTab::Inventory => use_selected(session),
        },
        _ => {}
    }
}

fn unequip_selected(session: &mut Session) {
    let slot = ALL_SLOTS[session.slot_cursor];
    if let Some(kind) = session.player.equipment[slot.index()].take() {
        session.player.inventory.push(Item::Equipment(kind));
        session.set_message(format!("Removed the {}.", equip_info(kind).name));
    }
}

fn use_selected(session: &mut Session) {
    if session.player.inventory.is_empty() {
        return;
    }
    let index = session.item_cursor;
    match session.player.inventory[index] {
        Item::Consumable(ConsumableKind::Potion) => {
            session.player.inventory.remove(index);
            let healed = (session.player.hp + 20).min(session.player.max_hp);
            session.player.hp = healed;
            session.set_message("Drank the potion. Recovered 20 HP!");
        }
        Item::Consumable(ConsumableKind::FireballScroll) => {
            session.player.inventory.remove(index);
            session.player.hp -= 10;
            session.set_message("Ouch!!!");
            if session.player.hp <= 0 {
                session.mode = Mode::Halted;
            }
        }
        Item::Equipment(kind) => {
            session.player.inventory.remove(index);
            let slot = equip_info(kind).slot;
            if let Some(old) = session.player.equipment[slot.index()].replace(kind) {
                session.player.inventory.push(Item::Equipment(old));
            }
            session.set_message(format!("Equipped the {}.", equip_info(kind).name));
        }
    }
    let len = session.player.inventory.len();
    if session.item_cursor >= len && len > 0 {
        session.item_cursor = len - 1;
    }
}

// ── Tests ─────────────────────────────────────────────────────
