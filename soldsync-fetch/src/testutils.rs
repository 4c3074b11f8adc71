//! Scripted fakes for the item API and the sleeper.

use async_trait::async_trait;
use reqwest::StatusCode;
use soldsync_core::{Credential, CredentialId, ItemId};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use crate::client::{ItemApi, ItemRecord};
use crate::error::FetchError;
use crate::retry::Sleeper;

/// One scripted answer.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Sold(u64),
    NoQuantity,
    Status(u16),
    Garbled,
}

impl Reply {
    fn into_result(self, item: &ItemId) -> Result<ItemRecord, FetchError> {
        match self {
            Self::Sold(n) => Ok(ItemRecord {
                id: Some(item.to_string()),
                title: None,
                sold_quantity: Some(n),
            }),
            Self::NoQuantity => Ok(ItemRecord {
                id: Some(item.to_string()),
                ..ItemRecord::default()
            }),
            Self::Status(code) => Err(FetchError::from_status(
                StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                None,
            )),
            Self::Garbled => Err(FetchError::Json(
                serde_json::from_str::<ItemRecord>("{").unwrap_err(),
            )),
        }
    }
}

/// Answers from per-(credential, item) queues; the last reply repeats.
#[derive(Default)]
pub struct ScriptedApi {
    replies: Mutex<HashMap<(CredentialId, String), VecDeque<Reply>>>,
    fallback: Option<Reply>,
    calls: Mutex<Vec<(CredentialId, String)>>,
}

impl ScriptedApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply used when nothing is scripted for a pair.
    pub fn with_fallback(mut self, reply: Reply) -> Self {
        self.fallback = Some(reply);
        self
    }

    pub fn script(self, credential: u32, item: &str, replies: &[Reply]) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert((CredentialId(credential), item.to_string()), replies.iter().copied().collect());
        self
    }

    pub fn calls(&self) -> Vec<(CredentialId, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, item: &str) -> usize {
        self.calls().iter().filter(|(_, i)| i == item).count()
    }
}

#[async_trait]
impl ItemApi for ScriptedApi {
    async fn get_item(&self, item: &ItemId, credential: &Credential) -> Result<ItemRecord, FetchError> {
        let key = (credential.id(), item.to_string());
        self.calls.lock().unwrap().push(key.clone());

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(&key) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().copied(),
                None => None,
            }
        }
        .or(self.fallback)
        .unwrap_or(Reply::Status(404));

        tokio::task::yield_now().await;
        reply.into_result(item)
    }
}

/// Records requested sleeps and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slept_secs(&self) -> Vec<u64> {
        self.slept.lock().unwrap().iter().map(Duration::as_secs).collect()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
        tokio::task::yield_now().await;
    }
}

pub fn item(id: &str) -> ItemId {
    ItemId::parse(id).unwrap()
}

pub fn credential(id: u32) -> Credential {
    Credential::new(id, format!("owner-{id}"), format!("token-{id}"))
}
