//! Dashboard handlers: the ticket listing and the close action.

use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
};
use std::sync::Arc;
use tracing::{error, warn};

use holonet_core::Ticket;

use crate::state::AppState;

/// Application version, shown in the page footer
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Ticket listing page template
#[derive(Template)]
#[template(path = "index.html")]
struct DashboardTemplate {
    tickets: Vec<Ticket>,
    version: &'static str,
}

/// Render the open-ticket listing.
///
/// Storage failures degrade to an empty listing; nothing is surfaced
/// to the operator.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let tickets = match state.ticket_store().list_open() {
        Ok(tickets) => tickets,
        Err(e) => {
            warn!("Failed to list open tickets: {}", e);
            Vec::new()
        }
    };

    let page = DashboardTemplate {
        tickets,
        version: VERSION,
    };
    match page.render() {
        Ok(html) => Html(html),
        Err(e) => {
            error!("Failed to render dashboard: {}", e);
            Html(String::new())
        }
    }
}

/// Close a ticket and return to the listing.
///
/// Unknown ids are ignored by the store, so this always redirects.
pub async fn close_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Redirect {
    if let Err(e) = state.ticket_store().close(id) {
        warn!("Failed to close ticket {}: {}", id, e);
    }

    Redirect::to("/")
}
