//! Instruction prompts for every gateway capability

use super::QueryContext;

/// Returned by the minutes call when the model produced no text
pub const MINUTES_FALLBACK: &str = "Could not generate the minutes.";

/// Returned by the decisions call when the model produced no text
pub const DECISIONS_FALLBACK: &str = "No decisions identified.";

/// Returned by the chat call when the model produced no text
pub const ANSWER_FALLBACK: &str = "Sorry, I could not process the answer.";

/// Instruction sent alongside the inline media
pub fn transcription_prompt(language: &str) -> String {
    format!(
        r#"Transcribe this audio/video in full into {language} text.
Identify the speakers if possible.
Return only the transcribed text, without Markdown formatting."#
    )
}

/// Prompt asking for structured meeting minutes
pub fn minutes_prompt(transcription: &str) -> String {
    format!(
        r#"Based on the following meeting transcription, produce structured meeting MINUTES in Markdown.

The minutes must contain:
1. Suggested title
2. Date (use today's date if none is mentioned)
3. Participants (if identifiable)
4. Overall summary
5. Topics discussed

Transcription:
{transcription}"#
    )
}

/// Prompt asking only for the decisions that were taken
pub fn decisions_prompt(transcription: &str) -> String {
    format!(
        r#"Based on the following transcription, extract ONLY the decisions that were made.
Return a simple numbered list. Be direct and objective.
Do not use complex Markdown formatting (plain text and numbers only).

Transcription:
{transcription}"#
    )
}

/// Compose the single text prompt for a chat question
///
/// Sections appear in a fixed order: transcription, minutes and decisions
/// when present, the prior chat turns when any, then the question.
pub fn query_prompt(query: &str, context: &QueryContext) -> String {
    let mut prompt = String::from(
        "You are an AI assistant analysing a meeting.\nUse the context below to answer the user's question.\n\n",
    );

    prompt.push_str(&format!(
        "--- TRANSCRIPTION ---\n{}\n\n",
        context.transcription
    ));

    if let Some(minutes) = &context.minutes {
        prompt.push_str(&format!("--- MINUTES (Summary) ---\n{minutes}\n\n"));
    }

    if let Some(decisions) = &context.decisions {
        prompt.push_str(&format!("--- DECISIONS MADE ---\n{decisions}\n\n"));
    }

    if !context.history.is_empty() {
        prompt.push_str("--- CHAT HISTORY ---\n");
        for message in &context.history {
            prompt.push_str(&format!("{}: {}\n", message.role.prompt_label(), message.text));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!("--- USER QUESTION ---\n{query}"));
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ChatMessage;

    #[test]
    fn test_transcription_prompt_mentions_language() {
        assert!(transcription_prompt("English").contains("into English text"));
    }

    #[test]
    fn test_query_prompt_minimal_context() {
        let context = QueryContext::new("we agreed to ship friday");
        let prompt = query_prompt("When do we ship?", &context);

        assert!(prompt.contains("--- TRANSCRIPTION ---\nwe agreed to ship friday"));
        assert!(!prompt.contains("MINUTES"));
        assert!(!prompt.contains("DECISIONS"));
        assert!(!prompt.contains("CHAT HISTORY"));
        assert!(prompt.ends_with("--- USER QUESTION ---\nWhen do we ship?"));
    }

    #[test]
    fn test_query_prompt_section_order() {
        let context = QueryContext {
            transcription: "t".to_string(),
            minutes: Some("m".to_string()),
            decisions: Some("1. d".to_string()),
            history: vec![ChatMessage::user("hi"), ChatMessage::model("hello")],
        };
        let prompt = query_prompt("q", &context);

        let order = [
            prompt.find("TRANSCRIPTION").unwrap(),
            prompt.find("MINUTES").unwrap(),
            prompt.find("DECISIONS MADE").unwrap(),
            prompt.find("CHAT HISTORY").unwrap(),
            prompt.find("USER QUESTION").unwrap(),
        ];
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(prompt.contains("User: hi\nAI: hello\n"));
    }
}
