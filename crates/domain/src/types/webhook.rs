//! GitHub webhook event payloads
//!
//! Only the fields the receiver consumes are modelled; unknown fields
//! and unknown event shapes deserialize without error so deliveries for
//! event types we do not handle can still be acknowledged.

use serde::{Deserialize, Serialize};

/// Payload of an `issues` webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuesEvent {
    pub action: String,
    pub issue: EventIssue,
    pub repository: EventRepository,
}

/// Issue fields carried in an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventIssue {
    pub id: i64,
    pub number: i64,
    pub title: String,
    pub html_url: String,
}

/// Repository fields carried in an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRepository {
    pub id: i64,
    pub name: String,
    pub owner: EventRepositoryOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRepositoryOwner {
    pub login: String,
}
