//! Combat — the damage resolver and the turn-based battle state machine.
//!
//! Battles are strictly phased: the player acts, reads the log, the enemy
//! acts, reads the log, repeat. Every phase transition is driven by an
//! intent except [`BattlePhase::EnemyTurn`], which resolves on the next
//! step whether or not any intent arrives.

use rand::Rng;

use crate::intent::{Intent, SelectDir};
use crate::state::{enemy_info, Battle, BattlePhase, Mode, Session};

/// The two numbers the resolver cares about. Built from the player's
/// derived stats or an enemy's stat table entry.
#[derive(Clone, Copy, Debug)]
pub struct CombatStats {
    pub attack: i32,
    pub defense: i32,
}

impl CombatStats {
    pub fn of_player(session: &Session) -> Self {
        Self {
            attack: session.player.attack(),
            defense: session.player.defense(),
        }
    }

    pub fn of_enemy(session: &Session) -> Self {
        let info = enemy_info(session.battle_enemy().kind);
        Self {
            attack: info.attack,
            defense: info.defense,
        }
    }
}

/// Roll one attack: a uniform raw hit between half and full attack,
/// reduced by defense as a percentage capped at 80%. Always at least 1.
pub fn resolve_attack(
    attacker: &CombatStats,
    defender: &CombatStats,
    rng: &mut impl Rng,
) -> i32 {
    let lo = (attacker.attack / 2).max(1);
    let hi = attacker.attack.max(lo);
    let raw = rng.gen_range(lo..=hi);
    let reduction = (defender.defense as f64 / 100.0).clamp(0.0, 0.8);
    ((raw as f64 * (1.0 - reduction)).floor() as i32).max(1)
}

/// Engage the enemy at `enemy_index` on the current floor.
pub fn start_battle(session: &mut Session, enemy_index: usize) {
    session.battle = Some(Battle { enemy_index });
    session.battle_cursor = 0;
    session.mode = Mode::Battle(BattlePhase::PlayerTurn);
    session.set_message("Battle Start!");
}

/// Number of entries in the player-turn command menu (Attack, Flee).
pub const BATTLE_COMMANDS: &[&str] = &["Attack", "Flee"];

/// Advance the battle machine one step.
pub fn battle_step(session: &mut Session, phase: BattlePhase, intent: Option<Intent>) {
    match phase {
        BattlePhase::PlayerTurn => player_turn(session, intent),
        BattlePhase::PlayerLog => {
            if intent == Some(Intent::Confirm) {
                after_player_action(session);
            }
        }
        // Resolves unconditionally; the enemy does not wait for input.
        BattlePhase::EnemyTurn => enemy_turn(session),
        BattlePhase::EnemyLog => {
            if intent == Some(Intent::Confirm) {
                after_enemy_action(session);
            }
        }
        BattlePhase::Victory => {
            if intent == Some(Intent::Confirm) {
                claim_victory(session);
            }
        }
        BattlePhase::Defeat => {
            if intent == Some(Intent::Confirm) {
                session.mode = Mode::Halted;
            }
        }
    }
}

fn player_turn(session: &mut Session, intent: Option<Intent>) {
    match intent {
        Some(Intent::DirectionalSelect(SelectDir::Up)) => {
            if session.battle_cursor > 0 {
                session.battle_cursor -= 1;
            }
        }
        Some(Intent::DirectionalSelect(SelectDir::Down)) => {
            if session.battle_cursor + 1 < BATTLE_COMMANDS.len() {
                session.battle_cursor += 1;
            }
        }
        Some(Intent::Confirm) => match session.battle_cursor {
            0 => player_attack(session),
            _ => flee(session),
        },
        _ => {}
    }
}

fn player_attack(session: &mut Session) {
    let damage = {
        let attacker = CombatStats::of_player(session);
        let defender = CombatStats::of_enemy(session);
        resolve_attack(&attacker, &defender, &mut session.rng)
    };
    let enemy = session.battle_enemy_mut();
    enemy.hp -= damage;
    let name = enemy_info(enemy.kind).name;
    session.set_message(format!("You hit the {} for {} damage!", name, damage));
    session.mode = Mode::Battle(BattlePhase::PlayerLog);
}

/// Fleeing always works and despawns the enemy, so the player does not
/// walk straight back into it on the very next step.
fn flee(session: &mut Session) {
    let battle = session.battle.take().expect("flee outside battle");
    if let Some(floor) = session.current_floor_mut() {
        floor.enemies.remove(battle.enemy_index);
    }
    session.mode = Mode::Dungeon;
    session.set_message("You got away!");
}

fn after_player_action(session: &mut Session) {
    if session.battle_enemy().hp <= 0 {
        let name = enemy_info(session.battle_enemy().kind).name;
        session.set_message(format!("The {} is defeated!", name));
        session.mode = Mode::Battle(BattlePhase::Victory);
    } else {
        session.mode = Mode::Battle(BattlePhase::EnemyTurn);
    }
}

fn enemy_turn(session: &mut Session) {
    let damage = {
        let attacker = CombatStats::of_enemy(session);
        let defender = CombatStats::of_player(session);
        resolve_attack(&attacker, &defender, &mut session.rng)
    };
    session.player.hp -= damage;
    let name = enemy_info(session.battle_enemy().kind).name;
    session.set_message(format!("The {} hits you for {} damage!", name, damage));
    session.mode = Mode::Battle(BattlePhase::EnemyLog);
}

fn after_enemy_action(session: &mut Session) {
    if session.player.hp <= 0 {
        session.set_message("You have fallen...");
        session.mode = Mode::Battle(BattlePhase::Defeat);
    } else {
        session.battle_cursor = 0;
        session.mode = Mode::Battle(BattlePhase::PlayerTurn);
    }
}

fn claim_victory(session: &mut Session) {
    let battle = session.battle.take().expect("victory outside battle");
    let kind = {
        let floor = session.current_floor().expect("battle without a floor");
        floor.enemies[battle.enemy_index].kind
    };
    let gold = enemy_info(kind).gold;
    session.player.gold += gold;
    session.quests.on_enemy_defeated(kind);
    if let Some(floor) = session.current_floor_mut() {
        floor.enemies.remove(battle.enemy_index);
    }
    session.mode = Mode::Dungeon;
    session.set_message(format!("Got {} gold!", gold));
}

// ── Tests ─────────────────────────────────────────────────────
