//! The logical operations consumed from base44, one trait per surface.
//!
//! [`crate::Base44Client`] implements them over HTTP; the `memory` feature
//! provides an in-process implementation for tests.

use std::future::Future;

use common::error::Res;

use crate::{
    dtos::{
        conversation::{ConversationFilter, NewConversation},
        key::NewApiKey,
        settings::SiteSettingsData,
        upload::{FileUpload, UploadedFile},
    },
    models::{
        conversation::{Conversation, Message},
        key::ApiKey,
        settings::SiteSettings,
        user::User,
    },
    subscription::Subscription,
};

pub trait AuthBackend {
    /// `auth.me()`; fails with `Unauthenticated` when the token is not valid.
    fn me(&self, token: &str) -> impl Future<Output = Res<User>>;

    /// `auth.isAuthenticated()`.
    fn is_authenticated(&self, token: Option<&str>) -> impl Future<Output = Res<bool>> {
        async move {
            let Some(token) = token else {
                return Ok(false);
            };
            match self.me(token).await {
                Ok(_) => Ok(true),
                Err(err) if err.is_unauthenticated() => Ok(false),
                Err(err) => Err(err),
            }
        }
    }
}

pub trait KeyBackend {
    /// `entities.ApiKey.list(order)`.
    fn list_keys(&self, token: &str, order: &str) -> impl Future<Output = Res<Vec<ApiKey>>>;
    /// `entities.ApiKey.create(record)`; base44 assigns `id` and `created_date`.
    fn create_key(&self, token: &str, key: NewApiKey) -> impl Future<Output = Res<ApiKey>>;
    /// `entities.ApiKey.delete(id)`; not idempotent.
    fn delete_key(&self, token: &str, id: &str) -> impl Future<Output = Res<()>>;
}

pub trait SettingsBackend {
    /// `entities.SiteSettings.list()`; readable without a session.
    fn list_settings(&self, token: Option<&str>)
    -> impl Future<Output = Res<Vec<SiteSettings>>>;
    fn create_settings(
        &self,
        token: &str,
        data: SiteSettingsData,
    ) -> impl Future<Output = Res<SiteSettings>>;
    fn update_settings(
        &self,
        token: &str,
        id: &str,
        data: SiteSettingsData,
    ) -> impl Future<Output = Res<SiteSettings>>;
}

pub trait UploadBackend {
    /// `integrations.Core.UploadFile({file})`.
    fn upload_file(&self, token: &str, file: FileUpload)
    -> impl Future<Output = Res<UploadedFile>>;
}

pub trait AgentBackend {
    fn list_conversations(
        &self,
        token: &str,
        filter: &ConversationFilter,
    ) -> impl Future<Output = Res<Vec<Conversation>>>;
    fn get_conversation(&self, token: &str, id: &str) -> impl Future<Output = Res<Conversation>>;
    fn create_conversation(
        &self,
        token: &str,
        params: NewConversation,
    ) -> impl Future<Output = Res<Conversation>>;
    fn add_message(
        &self,
        token: &str,
        conversation: &Conversation,
        message: Message,
    ) -> impl Future<Output = Res<Message>>;
    /// Starts delivering updates for one conversation until the returned
    /// handle is dropped or unsubscribed.
    fn subscribe_to_conversation(&self, token: &str, id: &str) -> Subscription;
}
