use actix_web::HttpResponse;
use serde::Serialize;

#[derive(Serialize)]
struct HealthcheckResponse {
    ok: bool,
}

/// §6 `GetHealthcheck` -> `{"ok": true}`.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthcheckResponse { ok: true })
}
