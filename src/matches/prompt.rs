use serde::Deserialize;
use serde_json::Value;

use crate::db::Profile;

use super::{MAX_SUGGESTIONS, MatchError};

/// One partner as named by the completion service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Suggestion {
    pub name: String,
    pub compatibility_score: f64,
    #[serde(default)]
    pub match_reason: Option<String>,
}

pub fn build(student: &Profile, candidates: &[Profile]) -> String {
    let mut prompt = format!(
        "You are an AI study partner matcher. Find the best {MAX_SUGGESTIONS} study partners for this student:\n\n\
        Student: {}\n\n\
        Available partners:\n",
        describe(student),
    );

    for candidate in candidates {
        prompt += &format!("- {}\n", describe(candidate));
    }

    prompt += &format!(
        "\nReturn a JSON array of at most {MAX_SUGGESTIONS} matches, using the partner names exactly as listed, in this format:\n\
        [\n  {{\n    \"name\": \"partner_name\",\n    \"compatibility_score\": 0.85,\n    \"match_reason\": \"Both love math and science, similar age group\"\n  }}\n]\n\n\
        Consider age compatibility (within 2-3 years), shared subjects, and grade level. Scores should be between 0.0 and 1.0.\n"
    );

    prompt
}

fn describe(profile: &Profile) -> String {
    format!(
        "{}, Age: {}, Grade: {}, Subjects: {}",
        profile.name, profile.age, profile.grade, profile.favorite_subjects
    )
}

/// Reads the suggestion list out of a completion.
///
/// Takes a bare array, or an object holding the array under `matches` or as
/// its only array field, with or without a surrounding markdown code fence.
pub fn parse_suggestions(text: &str) -> Result<Vec<Suggestion>, MatchError> {
    let text = strip_fence(text.trim());
    if text.is_empty() {
        return Err(MatchError::Malformed("empty response"));
    }

    let list = match serde_json::from_str::<Value>(text)? {
        list @ Value::Array(_) => list,
        Value::Object(mut fields) => match fields.remove("matches") {
            Some(list) => list,
            None => {
                let mut lists = fields.into_iter().map(|(_, value)| value).filter(Value::is_array);
                match (lists.next(), lists.next()) {
                    (Some(list), None) => list,
                    (Some(_), Some(_)) => return Err(MatchError::Malformed("several lists in response object")),
                    _ => return Err(MatchError::Malformed("no list of matches in response object")),
                }
            }
        },
        _ => return Err(MatchError::Malformed("expected a list of matches")),
    };

    Ok(serde_json::from_value(list)?)
}

fn strip_fence(text: &str) -> &str {
    let Some(fenced) = text.strip_prefix("```") else {
        return text;
    };
    // drop the info string, e.g. ```json
    let body = fenced.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(user_id: &str, name: &str, age: i64, subjects: &str) -> Profile {
        Profile {
            id: 1,
            user_id: user_id.to_owned(),
            name: name.to_owned(),
            age,
            grade: "9th".to_owned(),
            favorite_subjects: subjects.to_owned(),
            bio: String::new(),
            is_active: true,
            last_active_at: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn prompt_lists_student_and_every_candidate() {
        let prompt = build(
            &profile("me", "Sam", 14, "Math"),
            &[profile("a", "Alice", 15, "Math, Art"), profile("b", "Bob", 13, "History")],
        );

        assert!(prompt.contains("Student: Sam, Age: 14, Grade: 9th, Subjects: Math\n"));
        assert!(prompt.contains("- Alice, Age: 15, Grade: 9th, Subjects: Math, Art\n"));
        assert!(prompt.contains("- Bob, Age: 13, Grade: 9th, Subjects: History\n"));
        assert!(prompt.contains("\"compatibility_score\""));
    }

    #[test]
    fn parses_a_bare_array() {
        let suggestions = parse_suggestions(
            r#"[{"name":"Alice","compatibility_score":0.9,"match_reason":"Both like math"},
                {"name":"Bob","compatibility_score":0.4}]"#,
        )
        .unwrap();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].name, "Alice");
        assert_eq!(suggestions[0].match_reason.as_deref(), Some("Both like math"));
        assert_eq!(suggestions[1].match_reason, None);
    }

    #[test]
    fn parses_a_wrapped_fenced_array() {
        let suggestions = parse_suggestions(
            "```json\n{\"matches\": [{\"name\": \"Alice\", \"compatibility_score\": 0.7}]}\n```",
        )
        .unwrap();

        assert_eq!(suggestions[0].name, "Alice");
        assert_eq!(suggestions[0].compatibility_score, 0.7);
    }

    #[test]
    fn wrapped_arrays_are_found_by_name_or_alone() {
        let named = parse_suggestions(
            r#"{"alternates": [{"name": "Bob", "compatibility_score": 0.2}],
                "matches": [{"name": "Alice", "compatibility_score": 0.9}]}"#,
        )
        .unwrap();
        assert_eq!(named[0].name, "Alice");

        let alone = parse_suggestions(r#"{"partners": [{"name": "Bob", "compatibility_score": 0.4}], "count": 1}"#)
            .unwrap();
        assert_eq!(alone[0].name, "Bob");

        let ambiguous = parse_suggestions(r#"{"a": [], "b": [{"name": "Bob", "compatibility_score": 0.4}]}"#);
        assert!(matches!(ambiguous, Err(MatchError::Malformed(_))));
    }

    #[test]
    fn rejects_malformed_responses() {
        for text in ["", "   ", "not json", "42", r#"{"note": "no matches"}"#, r#"[{"name": "Alice"}]"#] {
            assert!(parse_suggestions(text).is_err(), "accepted {text:?}");
        }
    }
}
