// Test doubles for the assistant's ports

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use chrono::{DateTime, Utc};

use super::errors::{AssistantError, AssistantResult};
use super::llm::{ChatModel, ChatRequest};
use crate::domain::inventory::InventoryItem;
use crate::domain::messaging::{GatewayError, GatewayResult, Media, MessagingGateway};
use crate::domain::repositories::{
    ProfileUpdate, RepositoryError, RepositoryResult, UserRepository,
};
use crate::domain::user::{ConversationTurn, PhoneNumber, User, UserPreferences};

/// Replays canned completions in order and records every request
pub struct ScriptedModel {
    replies: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<&str>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(String::from).collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Fails every request
    pub fn failing() -> Arc<Self> {
        Self::new(Vec::new())
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: ChatRequest) -> AssistantResult<String> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| AssistantError::Llm("script exhausted".to_string()))
    }
}

/// Records outbound messages and serves a fixed media payload
///
/// Messages whose body equals `reject` fail with an API error and are not
/// recorded.
#[derive(Default)]
pub struct RecordingGateway {
    pub sent: Mutex<Vec<(String, String)>>,
    pub media: Option<Media>,
    pub reject: Option<String>,
}

impl RecordingGateway {
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingGateway for RecordingGateway {
    async fn send_text(&self, to: &PhoneNumber, body: &str) -> GatewayResult<String> {
        if self.reject.as_deref() == Some(body) {
            return Err(GatewayError::Api("message rejected".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push((to.to_string(), body.to_string()));
        Ok(format!("SM{}", sent.len()))
    }

    async fn send_image(
        &self,
        to: &PhoneNumber,
        media_url: &str,
        caption: Option<&str>,
    ) -> GatewayResult<String> {
        let body = format!("{} {}", media_url, caption.unwrap_or_default());
        self.send_text(to, &body).await
    }

    async fn fetch_media(&self, _url: &str) -> GatewayResult<Media> {
        self.media
            .clone()
            .ok_or_else(|| GatewayError::Media("no media".to_string()))
    }
}

/// Repository whose every call fails as if the database were down
pub struct UnavailableRepository;

fn down<T>() -> RepositoryResult<T> {
    Err(RepositoryError::Database("connection refused".to_string()))
}

#[async_trait]
impl UserRepository for UnavailableRepository {
    async fn create(&self, _user: &User) -> RepositoryResult<()> {
        down()
    }

    async fn find_by_phone(&self, _phone: &PhoneNumber) -> RepositoryResult<Option<User>> {
        down()
    }

    async fn find_by_id(&self, _user_id: &str) -> RepositoryResult<Option<User>> {
        down()
    }

    async fn list(&self, _limit: usize, _offset: usize) -> RepositoryResult<Vec<User>> {
        down()
    }

    async fn update_profile(&self, _user_id: &str, _update: &ProfileUpdate) -> RepositoryResult<()> {
        down()
    }

    async fn update_preferences(
        &self,
        _user_id: &str,
        _preferences: &UserPreferences,
    ) -> RepositoryResult<()> {
        down()
    }

    async fn save_inventory(
        &self,
        _user_id: &str,
        _ingredients: &[InventoryItem],
        _last_updated: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        down()
    }

    async fn save_conversation(
        &self,
        _user_id: &str,
        _history: &[ConversationTurn],
        _updated_at: DateTime<Utc>,
    ) -> RepositoryResult<()> {
        down()
    }

    async fn delete(&self, _user_id: &str) -> RepositoryResult<()> {
        down()
    }
}
