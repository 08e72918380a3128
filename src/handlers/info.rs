use crate::auth::MaybeIdentity;
use crate::views::content::{self, Footer, HomePage, HostelInfo, Navbar, HOME, HOSTEL};
use axum::{response::Json, routing::get, Router};
use chrono::{Datelike, Utc};

/// The fixed page copy as JSON, for clients that render it themselves.
pub fn info_routes() -> Router {
    Router::new()
        .route("/api/info/home", get(home))
        .route("/api/info/hostel", get(hostel))
        .route("/api/info/navbar", get(navbar))
        .route("/api/info/footer", get(footer))
}

async fn home() -> Json<HomePage> {
    Json(HOME)
}

async fn hostel() -> Json<HostelInfo> {
    Json(HOSTEL)
}

async fn navbar(identity: MaybeIdentity) -> Json<Navbar> {
    Json(content::navbar(identity.0.is_some()))
}

async fn footer() -> Json<Footer> {
    Json(content::footer(Utc::now().year()))
}
