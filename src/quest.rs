//! Guild quests — a pool of two offers, at most one accepted at a time.
//!
//! Turning in an active quest settles it either way: a finished quest pays
//! its reward, an unfinished one is forfeited. Both outcomes regenerate the
//! offer pool.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::state::{enemy_info, EnemyKind, Quest, QuestKind, BASIC_ENEMIES};

pub struct QuestLog {
    pub active: Option<Quest>,
    pub available: Vec<Quest>,
}

impl QuestLog {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut log = Self { active: None, available: Vec::new() };
        log.regenerate(rng);
        log
    }

    /// Replace the offer pool with a fresh kill quest and chest quest.
    pub fn regenerate(&mut self, rng: &mut impl Rng) {
        let target = *BASIC_ENEMIES.choose(rng).expect("roster is non-empty");
        let kills = rng.gen_range(1..=3);
        let chests = rng.gen_range(1..=3);
        self.available = vec![
            Quest {
                kind: QuestKind::EnemyKill,
                target: Some(target),
                required: kills,
                reward: rng.gen_range(30..=100),
                description: format!("Defeat {} x {}", enemy_info(target).name, kills),
                progress: 0,
            },
            Quest {
                kind: QuestKind::ChestCollect,
                target: None,
                required: chests,
                reward: rng.gen_range(20..=80),
                description: format!("Open {} treasure chests", chests),
                progress: 0,
            },
        ];
    }

    /// Accept the offer at `index`. Refused while a quest is already active.
    pub fn accept(&mut self, index: usize) -> bool {
        if self.active.is_some() || index >= self.available.len() {
            return false;
        }
        self.active = Some(self.available.remove(index));
        true
    }

    /// Settle the active quest. Returns the reward on completion, `None`
    /// on forfeit. No active quest means no change at all.
    pub fn turn_in(&mut self, rng: &mut impl Rng) -> Option<i32> {
        let quest = self.active.take()?;
        let reward = (quest.progress >= quest.required).then_some(quest.reward);
        self.regenerate(rng);
        reward
    }

    /// Progress hook fired by the battle machine on every victory.
    pub fn on_enemy_defeated(&mut self, kind: EnemyKind) {
        if let Some(quest) = &mut self.active {
            if quest.kind == QuestKind::EnemyKill && quest.target == Some(kind) {
                quest.progress += 1;
            }
        }
    }

    /// Progress hook fired whenever a chest is opened.
    pub fn on_chest_opened(&mut self) {
        if let Some(quest) = &mut self.active {
            if quest.kind == QuestKind::ChestCollect {
                quest.progress += 1;
            }
        }
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

    fn kill_index(log: &QuestLog) -> usize {
        log.available
            .iter()
            .position(|q| q.kind == QuestKind::EnemyKill)
            .expect("pool always holds a kill quest")
    }

    fn chest_index(log: &QuestLog) -> usize {
        log.available
            .iter()
            .position(|q| q.kind == QuestKind::ChestCollect)
            .expect("pool always holds a chest quest")
    }

    #[test]
    fn pool_holds_one_of_each_kind() {
        let mut r = rng(1);
        let log = QuestLog::new(&mut r);
        assert_eq!(log.available.len(), 2);
        let kill = &log.available[kill_index(&log)];
        let chest = &log.available[chest_index(&log)];
        assert!(BASIC_ENEMIES.contains(&kill.target.unwrap()));
        assert!((1..=3).contains(&kill.required));
        assert!((30..=100).contains(&kill.reward));
        assert!(chest.target.is_none());
        assert!((1..=3).contains(&chest.required));
        assert!((20..=80).contains(&chest.reward));
    }

    #[test]
    fn accept_moves_offer_to_active() {
        let mut r = rng(2);
        let mut log = QuestLog::new(&mut r);
        assert!(log.accept(0));
        assert!(log.active.is_some());
        assert_eq!(log.available.len(), 1);
    }

    #[test]
    fn cannot_accept_while_active() {
        let mut r = rng(3);
        let mut log = QuestLog::new(&mut r);
        assert!(log.accept(0));
        assert!(!log.accept(0));
        assert_eq!(log.available.len(), 1);
    }

    #[test]
    fn accept_out_of_range_is_refused() {
        let mut r = rng(4);
        let mut log = QuestLog::new(&mut r);
        assert!(!log.accept(5));
        assert!(log.active.is_none());
    }

    #[test]
    fn kill_progress_only_counts_the_target() {
        let mut r = rng(5);
        let mut log = QuestLog::new(&mut r);
        let idx = kill_index(&log);
        log.accept(idx);
        let target = log.active.as_ref().unwrap().target.unwrap();
        let other = *BASIC_ENEMIES.iter().find(|&&k| k != target).unwrap();

        log.on_enemy_defeated(other);
        assert_eq!(log.active.as_ref().unwrap().progress, 0);
        log.on_enemy_defeated(target);
        assert_eq!(log.active.as_ref().unwrap().progress, 1);
        // Chest openings never advance a kill quest.
        log.on_chest_opened();
        assert_eq!(log.active.as_ref().unwrap().progress, 1);
    }

    #[test]
    fn chest_progress_ignores_kills() {
        let mut r = rng(6);
        let mut log = QuestLog::new(&mut r);
        let idx = chest_index(&log);
        log.accept(idx);
        log.on_enemy_defeated(EnemyKind::Goblin);
        assert_eq!(log.active.as_ref().unwrap().progress, 0);
        log.on_chest_opened();
        assert_eq!(log.active.as_ref().unwrap().progress, 1);
    }

    #[test]
    fn completed_turn_in_pays_and_regenerates() {
        let mut r = rng(7);
        let mut log = QuestLog::new(&mut r);
        let idx = kill_index(&log);
        log.accept(idx);
        let (target, required, reward) = {
            let q = log.active.as_ref().unwrap();
            (q.target.unwrap(), q.required, q.reward)
        };
        for _ in 0..required {
            log.on_enemy_defeated(target);
        }

        assert_eq!(log.turn_in(&mut r), Some(reward));
        assert!(log.active.is_none());
        assert_eq!(log.available.len(), 2);
    }

    #[test]
    fn unfinished_turn_in_forfeits_the_quest() {
        let mut r = rng(8);
        let mut log = QuestLog::new(&mut r);
        log.accept(0);
        assert_eq!(log.turn_in(&mut r), None);
        assert!(log.active.is_none());
        assert_eq!(log.available.len(), 2);
    }

    #[test]
    fn turn_in_without_active_quest_is_a_no_op() {
        let mut r = rng(9);
        let mut log = QuestLog::new(&mut r);
        let before: Vec<String> =
            log.available.iter().map(|q| q.description.clone()).collect();
        assert_eq!(log.turn_in(&mut r), None);
        let after: Vec<String> =
            log.available.iter().map(|q| q.description.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn overshooting_progress_still_completes() {
        let mut r = rng(10);
        let mut log = QuestLog::new(&mut r);
        let idx = chest_index(&log);
        log.accept(idx);
        let reward = log.active.as_ref().unwrap().reward;
        for _ in 0..10 {
            log.on_chest_opened();
        }
        assert_eq!(log.turn_in(&mut r), Some(reward));
    }
}
