use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tracing::{debug, error};

use postbox_db::MailboxStore;
use postbox_types::api::{self, SkillRequest, SkillResponse};

use crate::dispatch;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<dyn MailboxStore>,
}

/// Builds the skill router around an injected store. A single POST route;
/// the router itself answers 405 for any other verb.
pub fn router(store: Arc<dyn MailboxStore>) -> Router {
    Router::new()
        .route("/", post(webhook))
        .with_state(Arc::new(AppStateInner { store }))
}

/// One utterance in, one spoken reply out.
pub async fn webhook(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SkillResponse>, StatusCode> {
    // The platform is the only caller; a body it failed to encode is an
    // internal fault, not a client error.
    let req: SkillRequest = match serde_json::from_slice(&body) {
        Ok(req) => req,
        Err(err) => {
            debug!("cannot decode request JSON body: {err}");
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if req.request.kind != api::TYPE_SIMPLE_UTTERANCE {
        debug!("unsupported request type {:?}", req.request.kind);
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    // Run blocking store calls off the async runtime
    let store = state.store.clone();
    let text = tokio::task::spawn_blocking(move || dispatch::dispatch(store.as_ref(), &req))
        .await
        .map_err(|err| {
            error!("spawn_blocking join error: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })??;

    Ok(Json(SkillResponse::with_text(text)))
}
