use axum::{Json, debug_handler, extract::State};
use serde_json::{Value, json};
use sqlx::SqlitePool;

use crate::{AppResult, profiles, session::CurrentUser};

use super::{Conversation, store};

/// Counterparties without a profile are left out.
pub async fn list_conversations(db_pool: &SqlitePool, user_id: &str) -> Result<Vec<Conversation>, sqlx::Error> {
    let mut conversations = Vec::new();

    for partner_id in store::counterparties(db_pool, user_id).await? {
        let Some(partner) = profiles::store::find(db_pool, &partner_id).await? else {
            continue;
        };

        conversations.push(Conversation {
            last_message: store::latest_between(db_pool, user_id, &partner_id).await?,
            unread_count: store::unread_from(db_pool, user_id, &partner_id).await?,
            partner,
        });
    }

    Ok(conversations)
}

#[debug_handler(state = crate::AppState)]
pub async fn get_conversations(
    CurrentUser(user_id): CurrentUser,
    State(db_pool): State<SqlitePool>,
) -> AppResult<Json<Value>> {
    let conversations = list_conversations(&db_pool, &user_id).await?;
    Ok(Json(json!({ "conversations": conversations })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{messages::read_thread, testing::{seed_profile, test_pool}};

    #[tokio::test]
    async fn one_entry_per_counterparty_with_latest_and_unread() {
        let db_pool = test_pool().await;
        seed_profile(&db_pool, "me", "Sam", 14, "Math").await;
        seed_profile(&db_pool, "alice", "Alice", 15, "Math").await;
        seed_profile(&db_pool, "bob", "Bob", 13, "Art").await;

        store::insert(&db_pool, "alice", "me", "hi sam").await.unwrap();
        store::insert(&db_pool, "me", "alice", "hey").await.unwrap();
        store::insert(&db_pool, "alice", "me", "study at 5?").await.unwrap();
        store::insert(&db_pool, "me", "bob", "hello bob").await.unwrap();

        let conversations = list_conversations(&db_pool, "me").await.unwrap();
        assert_eq!(conversations.len(), 2);

        let alice = conversations.iter().find(|c| c.partner.user_id == "alice").unwrap();
        assert_eq!(alice.last_message.as_ref().unwrap().message, "study at 5?");
        assert_eq!(alice.unread_count, 2);

        let bob = conversations.iter().find(|c| c.partner.user_id == "bob").unwrap();
        assert_eq!(bob.last_message.as_ref().unwrap().message, "hello bob");
        assert_eq!(bob.unread_count, 0);
    }

    #[tokio::test]
    async fn reading_the_thread_clears_unread() {
        let db_pool = test_pool().await;
        seed_profile(&db_pool, "me", "Sam", 14, "Math").await;
        seed_profile(&db_pool, "alice", "Alice", 15, "Math").await;
        store::insert(&db_pool, "alice", "me", "one").await.unwrap();
        store::insert(&db_pool, "alice", "me", "two").await.unwrap();

        read_thread(&db_pool, "me", "alice").await.unwrap();

        let conversations = list_conversations(&db_pool, "me").await.unwrap();
        assert_eq!(conversations[0].unread_count, 0);
    }

    #[tokio::test]
    async fn counterparties_without_profiles_are_hidden() {
        let db_pool = test_pool().await;
        seed_profile(&db_pool, "me", "Sam", 14, "Math").await;
        store::insert(&db_pool, "ghost", "me", "boo").await.unwrap();

        assert!(list_conversations(&db_pool, "me").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn most_recent_conversation_comes_first() {
        let db_pool = test_pool().await;
        seed_profile(&db_pool, "alice", "Alice", 15, "Math").await;
        seed_profile(&db_pool, "bob", "Bob", 13, "Art").await;
        store::insert(&db_pool, "me", "alice", "first").await.unwrap();
        store::insert(&db_pool, "bob", "me", "second").await.unwrap();

        let partners: Vec<_> = list_conversations(&db_pool, "me")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.partner.user_id)
            .collect();
        assert_eq!(partners, ["bob", "alice"]);
    }
}
