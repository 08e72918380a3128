use crate::auth::MaybeIdentity;
use crate::campus::PointOfInterest;
use crate::models::event::{EventCard, EventRecord};
use crate::utils::display_date;
use crate::views::content::{HomePage, HostelInfo, HOME, HOSTEL};
use crate::views::layout::Layout;
use crate::AppState;
use askama::Template;
use axum::{extract::Extension, routing::get, Router};
use std::sync::Arc;

pub fn ui_routes() -> Router {
    Router::new()
        .route("/", get(home_page))
        .route("/campus", get(campus_page))
        .route("/events", get(events_page))
        .route("/hostel", get(hostel_page))
        .route("/login", get(login_page))
        .route("/signup", get(signup_page))
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub home: &'static HomePage,
}

pub async fn home_page(identity: MaybeIdentity) -> HomeTemplate {
    HomeTemplate {
        layout: Layout::new("Home", identity.0.is_some()),
        home: &HOME,
    }
}

#[derive(Template)]
#[template(path = "campus.html")]
pub struct CampusTemplate {
    pub layout: Layout,
    pub locations: &'static [PointOfInterest],
}

pub async fn campus_page(Extension(state): Extension<Arc<AppState>>, identity: MaybeIdentity) -> CampusTemplate {
    CampusTemplate {
        layout: Layout::new("Campus", identity.0.is_some()),
        locations: state.map.directory().all(),
    }
}

/// One event as the events page shows it.
pub struct EventCardView {
    pub event: EventRecord,
    pub date: String,
    pub registered: bool,
    pub can_register: bool,
}

impl From<EventCard> for EventCardView {
    fn from(card: EventCard) -> Self {
        Self {
            date: display_date(card.event.date),
            event: card.event,
            registered: card.registered,
            can_register: card.can_register,
        }
    }
}

#[derive(Template)]
#[template(path = "events.html")]
pub struct EventsTemplate {
    pub layout: Layout,
    pub cards: Vec<EventCardView>,
    pub signed_in: bool,
}

pub async fn events_page(Extension(state): Extension<Arc<AppState>>, identity: MaybeIdentity) -> EventsTemplate {
    let overview = state.events.overview(identity.user_id()).await;
    EventsTemplate {
        layout: Layout::new("Events", overview.signed_in),
        cards: overview.events.into_iter().map(EventCardView::from).collect(),
        signed_in: overview.signed_in,
    }
}

#[derive(Template)]
#[template(path = "hostel.html")]
pub struct HostelTemplate {
    pub layout: Layout,
    pub hostel: &'static HostelInfo,
}

pub async fn hostel_page(identity: MaybeIdentity) -> HostelTemplate {
    HostelTemplate {
        layout: Layout::new("Hostel", identity.0.is_some()),
        hostel: &HOSTEL,
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
}

pub async fn login_page(identity: MaybeIdentity) -> LoginTemplate {
    LoginTemplate {
        layout: Layout::new("Login", identity.0.is_some()),
    }
}

#[derive(Template)]
#[template(path = "signup.html")]
pub struct SignupTemplate {
    pub layout: Layout,
}

pub async fn signup_page(identity: MaybeIdentity) -> SignupTemplate {
    SignupTemplate {
        layout: Layout::new("Sign Up", identity.0.is_some()),
    }
}
