// Interview lifecycle: records, question generation, answer evaluation, completion.
// All LLM calls go through the injected `TextGenerator`.

pub mod completion;
pub mod evaluation;
pub mod handlers;
pub mod proficiency;
pub mod prompts;
pub mod questions;
pub mod records;

#[cfg(test)]
pub mod testing;
