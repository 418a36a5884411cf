//! Chapter and stage layout. Each chapter is a sequence of stages ending
//! in a boss stage.

#[derive(Debug, Clone)]
pub struct StageDef {
    pub id: u32,
    pub name: &'static str,
    pub monster_id: &'static str,
}

#[derive(Debug, Clone)]
pub struct ChapterDef {
    pub id: u32,
    pub name: &'static str,
    pub stages: Vec<StageDef>,
}

impl ChapterDef {
    /// The last stage of a chapter is always its boss stage.
    pub fn boss_stage_id(&self) -> u32 {
        self.stages.len() as u32
    }
}

/// Returns every chapter in play order.
pub fn get_all_chapters() -> Vec<ChapterDef> {
    vec![
        ChapterDef {
            id: 1,
            name: "Dev Environment",
            stages: vec![
                StageDef { id: 1, name: "First Compile", monster_id: "null_pointer" },
                StageDef { id: 2, name: "Strict Mode", monster_id: "type_mismatch" },
                StageDef { id: 3, name: "The Loop Review", monster_id: "off_by_one" },
                StageDef { id: 4, name: "Recursion Gone Wrong", monster_id: "stack_overflow" },
            ],
        },
        ChapterDef {
            id: 2,
            name: "Staging Server",
            stages: vec![
                StageDef { id: 1, name: "The Slow Creep", monster_id: "memory_leak" },
                StageDef { id: 2, name: "Thread Unsafe", monster_id: "race_condition" },
                StageDef { id: 3, name: "Frozen Pipeline", monster_id: "deadlock" },
                StageDef { id: 4, name: "It Works On My Machine", monster_id: "heisenbug" },
            ],
        },
        ChapterDef {
            id: 3,
            name: "Production",
            stages: vec![
                StageDef { id: 1, name: "Pegged CPU", monster_id: "infinite_loop" },
                StageDef { id: 2, name: "Out Of Bounds", monster_id: "buffer_overflow" },
                StageDef { id: 3, name: "Rebase Hell", monster_id: "merge_conflict" },
                StageDef { id: 4, name: "The Final Deploy", monster_id: "legacy_monolith" },
            ],
        },
    ]
}

pub fn get_chapter(chapter_id: u32) -> Option<ChapterDef> {
    get_all_chapters().into_iter().find(|c| c.id == chapter_id)
}

pub fn get_stage(chapter_id: u32, stage_id: u32) -> Option<StageDef> {
    get_chapter(chapter_id)?.stages.into_iter().find(|s| s.id == stage_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chapters_are_sequential() {
        let chapters = get_all_chapters();
        for (i, chapter) in chapters.iter().enumerate() {
            assert_eq!(chapter.id, i as u32 + 1);
            assert!(!chapter.stages.is_empty());
        }
    }

    #[test]
    fn test_stage_monsters_exist() {
        for chapter in get_all_chapters() {
            for stage in &chapter.stages {
                assert!(
                    crate::data::monsters::spawn(stage.monster_id).is_some(),
                    "stage {}-{} references unknown monster {}",
                    chapter.id,
                    stage.id,
                    stage.monster_id
                );
            }
        }
    }

    #[test]
    fn test_final_stage_is_a_boss() {
        use crate::monster::MonsterKind;
        for chapter in get_all_chapters() {
            let boss_stage = chapter.stages.last().unwrap();
            let monster = crate::data::monsters::spawn(boss_stage.monster_id).unwrap();
            assert_eq!(
                monster.kind,
                MonsterKind::Boss,
                "chapter {} does not end in a boss",
                chapter.id
            );
        }
    }
}
