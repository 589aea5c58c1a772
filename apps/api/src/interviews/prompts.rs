// All LLM prompt constants for the interview lifecycle.

use crate::interviews::proficiency::ProficiencyBand;
use crate::llm_client::GenerationParams;

/// Sampling for question generation: some variety, bounded length.
pub const QUESTION_PARAMS: GenerationParams = GenerationParams {
    temperature: Some(0.7),
    max_output_tokens: Some(500),
};

/// Replace `{language}` before sending.
pub const BEGINNER_PROMPT_TEMPLATE: &str =
    "Generate 3 basic technical interview questions for a beginner {language} developer.";
pub const INTERMEDIATE_PROMPT_TEMPLATE: &str =
    "Generate 3 intermediate technical interview questions for a {language} developer.";
pub const ADVANCED_PROMPT_TEMPLATE: &str =
    "Generate 3 advanced technical interview questions for an expert {language} developer.";

/// Answer evaluation prompt. Replace `{question}` and `{answer}`.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"Question: {question}
Answer: {answer}
Evaluate this answer and provide:
1. Score (0-100)
2. Detailed feedback"#;

pub fn question_prompt(band: ProficiencyBand, language: &str) -> String {
    let template = match band {
        ProficiencyBand::Beginner => BEGINNER_PROMPT_TEMPLATE,
        ProficiencyBand::Intermediate => INTERMEDIATE_PROMPT_TEMPLATE,
        ProficiencyBand::Advanced => ADVANCED_PROMPT_TEMPLATE,
    };
    template.replace("{language}", language)
}

pub fn evaluation_prompt(question: &str, answer: &str) -> String {
    EVALUATION_PROMPT_TEMPLATE
        .replace("{question}", question)
        .replace("{answer}", answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt_per_band() {
        assert_eq!(
            question_prompt(ProficiencyBand::Beginner, "Rust"),
            "Generate 3 basic technical interview questions for a beginner Rust developer."
        );
        assert!(question_prompt(ProficiencyBand::Intermediate, "Go").contains("intermediate"));
        assert!(question_prompt(ProficiencyBand::Advanced, "C++").contains("expert C++"));
    }

    #[test]
    fn test_evaluation_prompt_embeds_both_texts() {
        let prompt = evaluation_prompt("What is a lifetime?", "A scope for borrows.");
        assert!(prompt.starts_with("Question: What is a lifetime?\nAnswer: A scope for borrows."));
        assert!(prompt.contains("Score (0-100)"));
    }
}
