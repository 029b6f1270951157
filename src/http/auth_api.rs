//! Accounts API: register, login, logout.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::accounts::{Account, AccountError, AccountStore};
use crate::http::response::Envelope;
use crate::http::server::AppState;
use crate::session::cookie::{clear_credentials, store_credentials};
use crate::session::keys;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `data` of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPayload {
    pub token_name: String,
    pub token_value: String,
    pub login_id: u64,
}

fn account_error_status(err: &AccountError) -> StatusCode {
    match err {
        AccountError::MissingField(_) | AccountError::AlreadyExists => StatusCode::BAD_REQUEST,
        AccountError::InvalidCredentials => StatusCode::NOT_FOUND,
        AccountError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn account_failure(err: AccountError) -> Response {
    let status = account_error_status(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "Account operation failed");
    }
    Envelope::<()>::fail(status, err.to_string()).into_response()
}

/// Run a bcrypt-bound account operation off the async workers.
async fn blocking<T, F>(accounts: Arc<AccountStore>, op: F) -> Result<Result<T, AccountError>, Response>
where
    T: Send + 'static,
    F: FnOnce(&AccountStore) -> Result<T, AccountError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&accounts))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Account task failed");
            Envelope::<()>::fail(StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        })
}

/// `POST /api/register`
pub async fn register(State(state): State<AppState>, Json(credentials): Json<Credentials>) -> Response {
    let result = blocking(state.accounts.clone(), move |accounts| {
        accounts.register(&credentials.username, &credentials.password)
    })
    .await;

    match result {
        Ok(Ok(_)) => Envelope::<()>::ok(StatusCode::CREATED, "user created", None).into_response(),
        Ok(Err(err)) => account_failure(err),
        Err(response) => response,
    }
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Response {
    let result = blocking(state.accounts.clone(), move |accounts| {
        accounts.authenticate(&credentials.username, &credentials.password)
    })
    .await;

    let account: Account = match result {
        Ok(Ok(account)) => account,
        Ok(Err(err)) => return account_failure(err),
        Err(response) => return response,
    };

    // A repeat login from the same browser replaces its earlier credential.
    if let Some(previous) = jar.get(keys::SA_TOKEN) {
        if state.tokens.revoke(previous.value()) {
            tracing::debug!(login_id = account.id, "Previous session token revoked");
        }
    }

    let token = state.tokens.issue(account.id, &account.role);
    tracing::info!(login_id = account.id, username = %account.username, "Login succeeded");

    let jar = store_credentials(jar, &token, &account.role, state.secure_cookies);
    let payload = TokenPayload {
        token_name: keys::SA_TOKEN.to_string(),
        token_value: token,
        login_id: account.id,
    };
    (jar, Envelope::ok(StatusCode::OK, account.role, Some(payload))).into_response()
}

/// `POST /api/logout`
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = jar.get(keys::SA_TOKEN).map(|c| c.value().to_owned()) {
        match state.tokens.lookup(&token) {
            Some(info) => {
                state.tokens.revoke(&token);
                tracing::info!(login_id = info.login_id, "Logged out");
            }
            None => tracing::debug!("Logout with unknown token"),
        }
    }
    (clear_credentials(jar), Envelope::<()>::ok(StatusCode::OK, "logged out", None)).into_response()
}
