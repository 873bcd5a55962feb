//! Typed client for the base44 backend-as-a-service.
//!
//! Every piece of persistence, authentication, file storage and agent
//! conversation state lives in base44. This crate owns the wire format:
//! raw records are normalized into the models in [`models`] before any
//! other crate sees them.

mod client;

pub mod agent;
pub mod auth;
pub mod key;
pub mod settings;
pub mod store;
pub mod subscription;
pub mod upload;

#[cfg(feature = "memory")]
pub mod memory;

pub mod models {
    pub mod conversation;
    pub mod key;
    pub mod settings;
    pub mod timestamp;
    pub mod user;
}

pub mod dtos {
    pub mod conversation;
    pub mod key;
    pub mod settings;
    pub mod upload;
}

pub use client::Base44Client;
