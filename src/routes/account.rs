use crate::models::{DeleteAccountResponse, ErrorResponse, MatchesResponse};
use crate::routes::{require_auth, AppState};
use crate::services::{AccountDeletion, ProfileStore};
use actix_web::{web, HttpRequest, HttpResponse, Responder};

/// Configure routes that act on the signed-in account
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches", web::get().to(get_matches))
        .route("/account", web::delete().to(delete_account));
}

/// Liked and super-liked candidates for the caller
///
/// GET /api/v1/matches
async fn get_matches(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let (claims, token) = match require_auth(&state, &http_req) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let user_id = claims.sub;

    let matches = match &state.ledger {
        Some(ledger) => ledger.list_matches(&user_id).await.map_err(|e| e.to_string()),
        None => state
            .backend
            .list_matches(&token, &user_id)
            .await
            .map_err(|e| e.to_string()),
    };

    match matches {
        Ok(matches) => HttpResponse::Ok().json(MatchesResponse {
            user_id,
            count: matches.len(),
            matches,
        }),
        Err(e) => {
            tracing::error!("Failed to fetch matches for {}: {}", user_id, e);
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to fetch matches",
                e,
                500,
            ))
        }
    }
}

/// Delete the caller's account
///
/// DELETE /api/v1/account
///
/// The deletion function is authoritative. Profile and ledger cleanup run
/// afterwards and only log on failure.
async fn delete_account(state: web::Data<AppState>, http_req: HttpRequest) -> impl Responder {
    let (claims, token) = match require_auth(&state, &http_req) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let user_id = claims.sub;

    match state.backend.delete_account(&token).await {
        Ok(result) if result.success => {}
        Ok(result) => {
            let message = result.error.unwrap_or_else(|| "Account deletion was refused".to_string());
            tracing::warn!("Account deletion refused for {}: {}", user_id, message);
            return HttpResponse::BadGateway().json(ErrorResponse::new(
                "Failed to delete account",
                message,
                502,
            ));
        }
        Err(e) => {
            tracing::error!("Account deletion failed for {}: {}", user_id, e);
            return HttpResponse::BadGateway().json(ErrorResponse::new(
                "Failed to delete account",
                e.to_string(),
                502,
            ));
        }
    }

    // Stop open decks before clearing the ledger so nothing is re-recorded
    state.sessions.close_user(&user_id).await;

    if let Err(e) = state.backend.delete_profile(&user_id).await {
        tracing::warn!("Account {} deleted but profile cleanup failed: {}", user_id, e);
    }

    if let Some(ledger) = &state.ledger {
        if let Err(e) = ledger.clear_user(&user_id).await {
            tracing::warn!("Account {} deleted but ledger cleanup failed: {}", user_id, e);
        }
    }

    tracing::info!("Deleted account {}", user_id);

    HttpResponse::Ok().json(DeleteAccountResponse { success: true })
}
