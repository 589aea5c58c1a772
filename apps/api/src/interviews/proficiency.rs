use serde::Serialize;

/// Difficulty band derived from a skill's 1-10 proficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyBand {
    Beginner,
    Intermediate,
    Advanced,
}

impl ProficiencyBand {
    /// <=4 beginner, 5-7 intermediate, >=8 advanced.
    pub fn classify(proficiency: i32) -> Self {
        match proficiency {
            i32::MIN..=4 => ProficiencyBand::Beginner,
            5..=7 => ProficiencyBand::Intermediate,
            _ => ProficiencyBand::Advanced,
        }
    }
}
