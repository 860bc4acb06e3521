//! Read-only render model — everything a presentation layer needs for one
//! frame, and nothing it should not see (trap contents stay hidden).
//!
//! The model is plain serializable data so a renderer, a replay tool or a
//! test harness can all consume the same snapshot.

use serde::Serialize;

use crate::combat::BATTLE_COMMANDS;
use crate::logic::{CHEST_MENU, GUILD_MENU, TOWN_MENU};
use crate::state::{
    enemy_info, equip_info, BattlePhase, CellKind, ChestView, Facing, GuildView, MenuTab, Mode,
    Pos, Session, ALL_SLOTS, SHOP_CATALOG,
};

#[derive(Clone, Debug, Serialize)]
pub struct PlayerStats {
    pub hp: i32,
    pub max_hp: i32,
    pub gold: i32,
    pub attack: i32,
    pub defense: i32,
}

/// The current floor as the renderer may draw it. Enemy and chest markers
/// carry positions only; kinds and traps are not exposed.
#[derive(Clone, Debug, Serialize)]
pub struct FloorView {
    pub depth: i32,
    pub grid: Vec<Vec<CellKind>>,
    pub player: Pos,
    pub facing: Facing,
    pub enemies: Vec<Pos>,
    pub chests: Vec<Pos>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MenuView {
    pub title: String,
    pub items: Vec<String>,
    pub cursor: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct BattleView {
    pub enemy: String,
    pub enemy_hp: i32,
    pub enemy_max_hp: i32,
}

#[derive(Clone, Debug, Serialize)]
pub struct RenderModel {
    pub mode: Mode,
    pub player: PlayerStats,
    pub floor: Option<FloorView>,
    pub menu: Option<MenuView>,
    pub battle: Option<BattleView>,
    pub message: String,
}

/// Snapshot the session for presentation.
pub fn render_model(session: &Session) -> RenderModel {
    RenderModel {
        mode: session.mode,
        player: PlayerStats {
            hp: session.player.hp,
            max_hp: session.player.max_hp,
            gold: session.player.gold,
            attack: session.player.attack(),
            defense: session.player.defense(),
        },
        floor: floor_view(session),
        menu: menu_view(session),
        battle: battle_view(session),
        message: session.message.clone(),
    }
}

fn floor_view(session: &Session) -> Option<FloorView> {
    match session.mode {
        Mode::Dungeon | Mode::Chest(_) | Mode::Battle(_) => {}
        _ => return None,
    }
    let floor = session.current_floor()?;
    Some(FloorView {
        depth: session.depth,
        grid: floor.maze.rows().to_vec(),
        player: session.player.pos,
        facing: session.player.facing,
        enemies: floor.enemies.iter().map(|e| e.pos).collect(),
        chests: floor.chests.iter().map(|c| c.pos).collect(),
    })
}

fn menu_view(session: &Session) -> Option<MenuView> {
    let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    match session.mode {
        Mode::Town => Some(MenuView {
            title: "Town".into(),
            items: owned(TOWN_MENU),
            cursor: session.town_cursor,
        }),
        Mode::Shop => {
            let mut items: Vec<String> = SHOP_CATALOG
                .iter()
                .map(|&(item, price)| format!("{} ({} G)", item.name(), price))
                .collect();
            items.push("Back".into());
            Some(MenuView {
                title: "Shop".into(),
                items,
                cursor: session.shop_cursor,
            })
        }
        Mode::Guild(GuildView::Browse) => Some(MenuView {
            title: "Guild".into(),
            items: owned(GUILD_MENU),
            cursor: session.guild_cursor,
        }),
        Mode::Guild(GuildView::QuestList) => {
            let mut items: Vec<String> = session
                .quests
                .available
                .iter()
                .map(|q| format!("{} ({} G)", q.description, q.reward))
                .collect();
            items.push("Cancel".into());
            Some(MenuView {
                title: "Quests".into(),
                items,
                cursor: session.quest_cursor,
            })
        }
        Mode::Chest(ChestView::Selection) => Some(MenuView {
            title: "Treasure Chest".into(),
            items: owned(CHEST_MENU),
            cursor: session.chest_cursor,
        }),
        Mode::Battle(BattlePhase::PlayerTurn) => Some(MenuView {
            title: "Command".into(),
            items: owned(BATTLE_COMMANDS),
            cursor: session.battle_cursor,
        }),
        Mode::InventoryMenu => Some(inventory_menu_view(session)),
        _ => None,
    }
}

fn inventory_menu_view(session: &Session) -> MenuView {
    match session.menu_tab {
        MenuTab::Status => MenuView {
            title: "Status".into(),
            items: vec![
                format!("HP {}/{}", session.player.hp, session.player.max_hp),
                format!("ATK {}", session.player.attack()),
                format!("DEF {}", session.player.defense()),
                format!("EVA {}", session.player.evasion()),
                format!("Gold {}", session.player.gold),
            ],
            cursor: 0,
        },
        MenuTab::Equipment => MenuView {
            title: "Equipment".into(),
            items: ALL_SLOTS
                .iter()
                .map(|&slot| {
                    let piece = session
                        .player
                        .equipped(slot)
                        .map(|kind| equip_info(kind).name)
                        .unwrap_or("-");
                    format!("{}: {}", slot.name(), piece)
                })
                .collect(),
            cursor: session.slot_cursor,
        },
        MenuTab::Inventory => MenuView {
            title: "Inventory".into(),
            items: session
                .player
                .inventory
                .iter()
                .map(|item| item.name().to_string())
                .collect(),
            cursor: session.item_cursor,
        },
    }
}

fn battle_view(session: &Session) -> Option<BattleView> {
    if !matches!(session.mode, Mode::Battle(_)) {
        return None;
    }
    session.battle.as_ref()?;
    let enemy = session.battle_enemy();
    let info = enemy_info(enemy.kind);
    Some(BattleView {
        enemy: info.name.to_string(),
        enemy_hp: enemy.hp.max(0),
        enemy_max_hp: info.max_hp,
    })
}

// ── Tests ─────────────────────────────────────────────────────
