//! Prompt pair for quiz question generation.

pub const QUIZ_GENERATION_SYSTEM: &str = "You are a technical interviewer \
who writes precise, unambiguous assessment questions. You always respond \
with valid JSON and nothing else.";

pub const QUIZ_GENERATION_PROMPT: &str = r#"Generate exactly {count} quiz questions for a {role} candidate at {difficulty} difficulty.

Mix two kinds of questions:
- "mcq": a conceptual multiple-choice question
- "snippet": a short code snippet followed by a question about its behavior

Rules:
- Each question has exactly 4 options.
- "correctAnswer" must be copied verbatim from "options".
- "explanation" is one or two sentences on why the correct answer is right.
- Low difficulty targets fundamentals, Medium targets applied knowledge, High targets edge cases and internals.

Respond with a JSON array only, in this shape:
[
  {
    "type": "mcq",
    "question": "...",
    "options": ["...", "...", "...", "..."],
    "correctAnswer": "...",
    "explanation": "..."
  }
]"#;
