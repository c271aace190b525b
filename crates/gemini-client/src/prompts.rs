use serde_json::{Value, json};

pub(crate) const STORY_START_PROMPT: &str = "Start a short, adventurous interactive story in Russian \
     (approx 50 words). Provide the story text and two distinct choices for what the main \
     character should do next.";

pub(crate) fn trivia_prompt(topic: &str) -> String {
    format!(
        "Generate a fun, engaging trivia question about {topic} in Russian language. \
         Provide 4 distinct options and indicate the correct one."
    )
}

pub(crate) fn story_continuation_prompt(current_story: &str, choice: &str) -> String {
    format!(
        "Continue this story in Russian: \"{current_story}\". The user chose: \"{choice}\". \
         Write the next segment (approx 50 words) and provide two new distinct choices."
    )
}

/// Response schema for a four-option trivia question.
pub fn trivia_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "question": { "type": "STRING" },
            "options": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "minItems": 4,
                "maxItems": 4
            },
            "correctAnswerIndex": {
                "type": "INTEGER",
                "description": "Index of the correct answer (0-3)"
            },
            "difficulty": {
                "type": "STRING",
                "enum": ["Easy", "Medium", "Hard"]
            }
        },
        "required": ["question", "options", "correctAnswerIndex", "difficulty"]
    })
}

/// Response schema for a story segment with two choices.
pub fn story_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "text": { "type": "STRING" },
            "optionA": { "type": "STRING" },
            "optionB": { "type": "STRING" }
        },
        "required": ["text", "optionA", "optionB"]
    })
}
