//! Wire representations for the auth endpoints.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::model::Account;

/// Body for `POST /api/auth/sync`. Both fields are optional; verified
/// claims fill whatever the request leaves out.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub display_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            external_id: account.external_id,
            email: account.email,
            display_name: account.display_name,
            created_at: account.created_at,
        }
    }
}

/// Response for `POST /api/auth/sync`. `created` is `false` on replays.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub user: AccountDto,
    pub created: bool,
}

/// Response for `GET /api/auth/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: AccountDto,
}
