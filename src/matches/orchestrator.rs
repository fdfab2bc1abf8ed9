use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{db::Profile, profiles};

use super::{Completion, MAX_SUGGESTIONS, MatchError, MatchWithProfile, prompt::{self, Suggestion}, store};

/// Asks the completion service for partners and records the new pairs.
///
/// A user without a profile, or with nobody else to pair with, gets an empty
/// list and the completion service is not called. Suggested names are matched
/// to the candidate pool by exact equality; unknown names are dropped and the
/// first profile carrying a shared name wins. At most three resolved partners
/// are kept. Scores and reasons in the result
/// come from this response, even for pairs that were stored earlier.
pub async fn find_matches(
    db_pool: &SqlitePool,
    completion: &dyn Completion,
    user_id: &str,
) -> Result<Vec<MatchWithProfile>, MatchError> {
    let Some(student) = profiles::store::find(db_pool, user_id).await? else {
        return Ok(Vec::new());
    };

    let candidates = profiles::store::active_except(db_pool, user_id).await?;
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let text = completion.complete(&prompt::build(&student, &candidates)).await?;
    let suggestions = prompt::parse_suggestions(&text)?;
    let suggested = suggestions.len();

    let resolved = resolve(suggestions, &candidates);

    let mut tx = db_pool.begin().await?;
    let mut inserted = 0;
    for (suggestion, partner) in &resolved {
        let added = store::insert_if_absent(
            &mut tx,
            user_id,
            &partner.user_id,
            suggestion.compatibility_score,
            suggestion.match_reason.as_deref(),
        )
        .await?;
        if added {
            inserted += 1;
        }
    }
    tx.commit().await?;

    tracing::info!(user_id = %user_id, suggested, resolved = resolved.len(), inserted, "generated matches");

    let now = OffsetDateTime::now_utc();
    Ok(resolved
        .into_iter()
        .map(|(suggestion, partner)| MatchWithProfile {
            id: Uuid::now_v7(),
            user_id: user_id.to_owned(),
            matched_user_id: partner.user_id.clone(),
            compatibility_score: suggestion.compatibility_score,
            match_reason: suggestion.match_reason,
            is_active: true,
            created_at: now,
            updated_at: now,
            matched_profile: partner.clone(),
        })
        .collect())
}

fn resolve(suggestions: Vec<Suggestion>, candidates: &[Profile]) -> Vec<(Suggestion, &Profile)> {
    let mut resolved: Vec<(Suggestion, &Profile)> = Vec::new();

    for suggestion in suggestions {
        if resolved.len() == MAX_SUGGESTIONS {
            break;
        }
        let Some(partner) = candidates.iter().find(|candidate| candidate.name == suggestion.name) else {
            tracing::debug!(name = %suggestion.name, "suggested partner is not in the pool");
            continue;
        };
        if resolved.iter().any(|(_, seen)| seen.user_id == partner.user_id) {
            continue;
        }
        resolved.push((suggestion, partner));
    }

    resolved
}
