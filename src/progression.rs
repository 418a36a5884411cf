//! Chapter/stage progression, class unlocks and cumulative run statistics.

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::constants::BURST_WINDOW_TURNS;
use crate::data::chapters::get_all_chapters;
use crate::data::classes::{get_all_classes, UnlockCondition};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub completed: bool,
    pub attempts: u32,
    /// Fastest completion in seconds.
    pub best_time: Option<u64>,
    pub tech_debt_at_completion: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterRecord {
    pub unlocked: bool,
    pub completed: bool,
    pub boss_defeated: bool,
    /// High-water mark of completed stage numbers; never decreases.
    pub stages_completed: u32,
    pub total_stages: u32,
    pub stages: Vec<StageRecord>,
}

/// Cumulative statistics for the whole run. Class unlock conditions and
/// the secret ending are evaluated against these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub total_play_seconds: u64,
    /// Highest damage total over any rolling burst window of turns.
    pub burst_damage_peak: u64,
    recent_turn_damage: VecDeque<u64>,
    /// Seconds spent per chapter, accumulated as stages complete.
    pub chapter_clear_seconds: HashMap<u32, u64>,
    /// Chapters completed with tech debt at exactly zero.
    pub zero_debt_chapters: Vec<u32>,
    pub skips_used: u32,
    pub flees_used: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionLedger {
    pub chapters: Vec<ChapterRecord>,
    /// Cursor: the unit the player is currently on (1-based).
    pub current_chapter: u32,
    pub current_stage: u32,
    pub class_unlocks: HashMap<String, bool>,
    pub stats: RunStats,
}

impl Default for ProgressionLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionLedger {
    /// A fresh ledger built from the chapter catalog: chapter 1 unlocked,
    /// default classes available, everything else locked.
    pub fn new() -> Self {
        let chapters = get_all_chapters()
            .iter()
            .map(|def| ChapterRecord {
                unlocked: def.id == 1,
                completed: false,
                boss_defeated: false,
                stages_completed: 0,
                total_stages: def.stages.len() as u32,
                stages: vec![StageRecord::default(); def.stages.len()],
            })
            .collect();

        let class_unlocks = get_all_classes()
            .iter()
            .map(|c| (c.id.to_string(), c.unlock == UnlockCondition::Default))
            .collect();

        Self {
            chapters,
            current_chapter: 1,
            current_stage: 1,
            class_unlocks,
            stats: RunStats::default(),
        }
    }

    pub fn chapter(&self, chapter_id: u32) -> Option<&ChapterRecord> {
        self.chapters.get(chapter_id.checked_sub(1)? as usize)
    }

    fn chapter_mut(&mut self, chapter_id: u32) -> Option<&mut ChapterRecord> {
        self.chapters.get_mut(chapter_id.checked_sub(1)? as usize)
    }

    pub fn stage_record(&self, chapter_id: u32, stage_id: u32) -> Option<&StageRecord> {
        self.chapter(chapter_id)?.stages.get(stage_id.checked_sub(1)? as usize)
    }

    pub fn is_chapter_unlocked(&self, chapter_id: u32) -> bool {
        self.chapter(chapter_id).is_some_and(|c| c.unlocked)
    }

    /// Stage S in an unlocked chapter is playable iff S is 1 or stage S-1
    /// is completed.
    pub fn is_stage_playable(&self, chapter_id: u32, stage_id: u32) -> bool {
        let Some(chapter) = self.chapter(chapter_id) else {
            return false;
        };
        if !chapter.unlocked || stage_id == 0 || stage_id > chapter.total_stages {
            return false;
        }
        stage_id == 1
            || chapter
                .stages
                .get(stage_id as usize - 2)
                .is_some_and(|s| s.completed)
    }

    /// Records an attempt at the cursor's stage.
    pub fn record_attempt(&mut self) {
        let (c, s) = (self.current_chapter, self.current_stage);
        if let Some(rec) = self
            .chapter_mut(c)
            .and_then(|ch| ch.stages.get_mut(s.checked_sub(1)? as usize))
        {
            rec.attempts += 1;
        }
    }

    /// Records the cursor's stage as completed, advances chapter state and
    /// moves the cursor to the next playable unit. Saturates at the final
    /// stage of the final chapter once the whole game is complete.
    pub fn complete_stage(&mut self, tech_debt_at_completion: u32, elapsed_seconds: u64) {
        let (c, s) = (self.current_chapter, self.current_stage);
        let chapter_count = self.chapters.len() as u32;

        let Some(chapter) = self.chapter_mut(c) else {
            return;
        };
        let Some(rec) = s
            .checked_sub(1)
            .and_then(|i| chapter.stages.get_mut(i as usize))
        else {
            return;
        };

        rec.completed = true;
        rec.tech_debt_at_completion = Some(tech_debt_at_completion);
        rec.best_time = Some(match rec.best_time {
            Some(best) => best.min(elapsed_seconds),
            None => elapsed_seconds,
        });

        chapter.stages_completed = chapter.stages_completed.max(s);
        let is_boss_stage = s == chapter.total_stages;
        let first_clear = is_boss_stage && !chapter.completed;
        if first_clear {
            chapter.completed = true;
            chapter.boss_defeated = true;
        }

        // Stats only move once the stage record has been accepted
        *self
            .stats
            .chapter_clear_seconds
            .entry(c)
            .or_insert(0) += elapsed_seconds;
        if first_clear {
            if tech_debt_at_completion == 0 {
                self.stats.zero_debt_chapters.push(c);
            }
            if let Some(next) = self.chapter_mut(c + 1) {
                next.unlocked = true;
            }
        }

        // Advance the cursor
        if s < self.chapter(c).map(|ch| ch.total_stages).unwrap_or(0) {
            self.current_stage = s + 1;
        } else if c < chapter_count {
            self.current_chapter = c + 1;
            self.current_stage = 1;
        }
    }

    /// Skipping a stage completes it for progression purposes but is held
    /// against the secret ending forever.
    pub fn skip_stage(&mut self, tech_debt_now: u32, elapsed_seconds: u64) {
        self.stats.skips_used += 1;
        self.complete_stage(tech_debt_now, elapsed_seconds);
    }

    pub fn record_flee(&mut self) {
        self.stats.flees_used += 1;
    }

    /// Feeds one turn's player damage into the rolling burst window.
    pub fn record_burst_damage(&mut self, turn_damage: u64) {
        self.stats.recent_turn_damage.push_back(turn_damage);
        while self.stats.recent_turn_damage.len() > BURST_WINDOW_TURNS {
            self.stats.recent_turn_damage.pop_front();
        }
        let window_sum: u64 = self.stats.recent_turn_damage.iter().sum();
        self.stats.burst_damage_peak = self.stats.burst_damage_peak.max(window_sum);
    }

    pub fn add_play_time(&mut self, seconds: u64) {
        self.stats.total_play_seconds += seconds;
    }

    pub fn all_stages_completed(&self) -> bool {
        self.chapters
            .iter()
            .all(|c| c.stages.iter().all(|s| s.completed))
    }

    pub fn is_game_complete(&self) -> bool {
        self.chapters.iter().all(|c| c.completed)
    }

    pub fn is_class_unlocked(&self, class_id: &str) -> bool {
        self.class_unlocks.get(class_id).copied().unwrap_or(false)
    }

    /// Evaluates every locked class against the run statistics. Unlocks
    /// are one-way; nothing is ever re-locked. Returns the ids newly
    /// unlocked by this evaluation.
    pub fn evaluate_class_unlocks(&mut self) -> Vec<String> {
        let mut newly_unlocked = Vec::new();
        for class in get_all_classes() {
            if self.is_class_unlocked(class.id) {
                continue;
            }
            let met = match class.unlock {
                UnlockCondition::Default => true,
                UnlockCondition::BurstDamage { amount } => {
                    self.stats.burst_damage_peak >= amount
                }
                UnlockCondition::PlayTime { seconds } => {
                    self.stats.total_play_seconds >= seconds
                }
                UnlockCondition::ChapterClearTime { chapter, within_seconds } => {
                    self.chapter(chapter).is_some_and(|c| c.completed)
                        && self
                            .stats
                            .chapter_clear_seconds
                            .get(&chapter)
                            .is_some_and(|&t| t <= within_seconds)
                }
                UnlockCondition::ZeroDebtChapter => !self.stats.zero_debt_chapters.is_empty(),
            };
            if met {
                self.class_unlocks.insert(class.id.to_string(), true);
                newly_unlocked.push(class.id.to_string());
            }
        }
        newly_unlocked
    }
}
