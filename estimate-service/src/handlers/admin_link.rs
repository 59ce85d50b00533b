//! Staff chat-account linking.
//!
//! A two-step browser flow: `/admin/link?role=owner` redirects into the chat
//! provider's consent screen, and the callback stores the long-lived refresh
//! token under that role. Estimate memos go to every linked role.

use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
};
use serde::Deserialize;

use crate::startup::AppState;
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct LinkQuery {
    pub role: Option<String>,
}

pub async fn start_link(
    State(app): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> Result<Redirect, AppError> {
    let role = query
        .role
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("role query parameter is required")))?;

    let url = app
        .memo
        .link_url(&role)
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;

    tracing::info!(role = %role, "starting admin chat link");

    Ok(Redirect::temporary(&url))
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

pub async fn finish_link(
    State(app): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> Result<Html<String>, AppError> {
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("code query parameter is required")))?;
    let role = query
        .state
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("state query parameter is required")))?;

    let refresh_token = app
        .memo
        .exchange_code(&code)
        .await
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))?;

    app.db.upsert_admin_recipient(&role, &refresh_token).await?;

    tracing::info!(role = %role, "admin chat link stored");

    Ok(Html(format!(
        "<html>\
         <body style=\"font-family:Arial; padding:40px;\">\
         <h2>카카오 연동 완료</h2>\
         <p>역할(role): <b>{}</b></p>\
         <p>이제 새 견적이 접수되면 자동으로 알림이 전송됩니다.</p>\
         </body>\
         </html>",
        role
    )))
}
