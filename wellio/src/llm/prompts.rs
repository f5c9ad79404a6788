//! Prompt templates for LLM-powered features
//!
//! Templates use plain `format!()` interpolation.

/// System message sent ahead of every classification request.
pub const SMART_LOG_SYSTEM_PROMPT: &str = "You are a fitness coaching assistant that turns client \
journal entries into structured progress events. You answer with JSON only.";

/// Generate a prompt for classifying a smart log into progress events
///
/// The model is asked for an object `{"events": [...], "confidence": n}` where
/// each event carries an `eventType`, a `data` object and an optional
/// per-event `confidence`.
///
/// # Arguments
/// * `raw_text` - The trimmed free text of the log, if any
/// * `media_urls` - Attached image URLs
///
/// # Example
/// ```
/// use wellio::llm::prompts::smart_log_classification_prompt;
///
/// let prompt = smart_log_classification_prompt(Some("Ran 5k in 28 minutes"), &[]);
/// assert!(prompt.contains("Ran 5k"));
/// ```
pub fn smart_log_classification_prompt(raw_text: Option<&str>, media_urls: &[String]) -> String {
    let text = raw_text.unwrap_or("(no text)");
    let media = if media_urls.is_empty() {
        "(none)".to_string()
    } else {
        media_urls
            .iter()
            .map(|url| format!("- {url}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        r#"Classify the following client log into zero or more progress events.

Event types and their data fields (all fields optional, use null when unknown):
- nutrition: calories, proteinG, carbsG, fatG, mealType, notes
- exercise: activity, durationMinutes, caloriesBurned, avgHrBpm, intensity ("low" | "moderate" | "high"), notes
- sleep: durationHours, hrvRmssdMs, energy ("low" | "average" | "high"), quality
- weight: weightKg, bodyFatPct
- mood: score (1-10), label, notes
- check_in: weightKg, mood, sleepHours, energy ("low" | "average" | "high"), notes

Rules:
- Numbers must be JSON numbers, not strings. Convert units to kg, minutes and hours.
- One event per distinct activity, meal or measurement.
- If nothing in the log describes progress, return an empty events array.
- confidence is a score from 0.0 to 1.0 for how certain you are.

Log text:
{text}

Attached images:
{media}

Respond with valid JSON only. Example format:
{{
  "events": [
    {{"eventType": "exercise", "data": {{"activity": "run", "durationMinutes": 28}}, "confidence": 0.9}},
    {{"eventType": "nutrition", "data": {{"mealType": "breakfast", "calories": 450}}}}
  ],
  "confidence": 0.85
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text_and_media() {
        let media = vec![
            "https://cdn.example.com/a.jpg".to_string(),
            "https://cdn.example.com/b.jpg".to_string(),
        ];
        let prompt = smart_log_classification_prompt(Some("Leg day, felt strong"), &media);

        assert!(prompt.contains("Leg day, felt strong"));
        assert!(prompt.contains("- https://cdn.example.com/a.jpg"));
        assert!(prompt.contains("- https://cdn.example.com/b.jpg"));
        assert!(prompt.contains("\"events\""));
    }

    #[test]
    fn test_prompt_placeholders_when_empty() {
        let prompt = smart_log_classification_prompt(None, &[]);
        assert!(prompt.contains("(no text)"));
        assert!(prompt.contains("(none)"));
    }
}
