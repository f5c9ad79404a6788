//! Enums shared by several v1 endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{AuthorType, GoalStatus};

/// Goal lifecycle on the wire: `"active"`, `"completed"` or `"abandoned"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum V1GoalStatus {
    Active,
    Completed,
    Abandoned,
}

impl From<GoalStatus> for V1GoalStatus {
    fn from(status: GoalStatus) -> Self {
        match status {
            GoalStatus::Active => V1GoalStatus::Active,
            GoalStatus::Completed => V1GoalStatus::Completed,
            GoalStatus::Abandoned => V1GoalStatus::Abandoned,
        }
    }
}

impl From<V1GoalStatus> for GoalStatus {
    fn from(status: V1GoalStatus) -> Self {
        match status {
            V1GoalStatus::Active => GoalStatus::Active,
            V1GoalStatus::Completed => GoalStatus::Completed,
            V1GoalStatus::Abandoned => GoalStatus::Abandoned,
        }
    }
}

/// Who wrote a smart log: `"client"` or `"coach"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum V1AuthorType {
    Client,
    Coach,
}

impl From<AuthorType> for V1AuthorType {
    fn from(author: AuthorType) -> Self {
        match author {
            AuthorType::Client => V1AuthorType::Client,
            AuthorType::Coach => V1AuthorType::Coach,
        }
    }
}

impl From<V1AuthorType> for AuthorType {
    fn from(author: V1AuthorType) -> Self {
        match author {
            V1AuthorType::Client => AuthorType::Client,
            V1AuthorType::Coach => AuthorType::Coach,
        }
    }
}
