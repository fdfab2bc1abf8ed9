use std::sync::{Arc, Mutex, atomic::{AtomicUsize, Ordering}};

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::{AppState, auth::Clients, db, matches::{Completion, CompletionError}, profiles::{self, NewProfile}};

pub(crate) async fn test_pool() -> SqlitePool {
    let db_pool = db::connect("sqlite::memory:", 1).await.unwrap();
    db::migrate(&db_pool).await.unwrap();
    db_pool
}

pub(crate) fn test_state(db_pool: SqlitePool, completion: Arc<dyn Completion>) -> AppState {
    AppState {
        db_pool,
        clients: Clients::default(),
        completion,
    }
}

pub(crate) async fn seed_profile(db_pool: &SqlitePool, user_id: &str, name: &str, age: i64, subjects: &str) {
    profiles::store::upsert(
        db_pool,
        user_id,
        &NewProfile {
            name: name.to_owned(),
            age,
            grade: "9th".to_owned(),
            favorite_subjects: subjects.to_owned(),
            bio: None,
        },
    )
    .await
    .unwrap();
}

/// Answers every prompt with the same canned text.
pub(crate) struct ScriptedCompletion {
    response: Result<String, String>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    pub(crate) fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Ok(text.to_owned()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            response: Err(reason.to_owned()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    pub(crate) fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Completion for ScriptedCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.prompts.lock().unwrap().push(prompt.to_owned());
        self.response.clone().map_err(CompletionError::Rejected)
    }
}
