pub mod badges;
pub mod contract_dates;
pub mod contracts;
pub mod planners;
pub mod responses;

use std::net::{IpAddr, SocketAddr};

use actix_web::{HttpRequest, web};

use crate::contracts::ContractService;
use crate::error::{AppError, AppResult};

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub service: ContractService,
    /// Read the responder address from `Forwarded`/`X-Forwarded-For`. Only
    /// safe behind a proxy that overwrites those headers.
    pub trust_forwarded_for: bool,
}

impl AppState {
    pub fn new(service: ContractService) -> Self {
        Self {
            service,
            trust_forwarded_for: false,
        }
    }

    pub fn with_trusted_proxy(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// The address recorded with a signature.
    pub(crate) fn client_ip(&self, req: &HttpRequest) -> AppResult<IpAddr> {
        client_ip(req, self.trust_forwarded_for)
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // ── Planner views and contract generation ──
    cfg.service(
        web::scope("/planners")
            .route("/{id}/assignments", web::get().to(planners::get_assignments))
            .route("/{id}/musicians", web::get().to(planners::get_musician_groups))
            .route(
                "/{id}/musicians/{musician_id}/selection",
                web::post().to(planners::selection_state),
            )
            .route("/{id}/contracts", web::post().to(planners::generate_contracts)),
    );

    // ── Monthly contracts ──
    cfg.service(
        web::scope("/monthly-contracts")
            .route("/{id}", web::get().to(contracts::get_contract))
            .route("/{id}/musicians", web::get().to(contracts::get_contract_musicians))
            .route("/{id}/send", web::post().to(contracts::send_contract)),
    );
    cfg.service(
        web::scope("/contracts")
            .route("/{id}/resend", web::post().to(contracts::resend_contract))
            .route("/{id}/cancel", web::post().to(contracts::cancel_contract)),
    );

    // ── Staff changes to single dates ──
    cfg.service(
        web::resource("/contract-dates/{id}/status")
            .route(web::put().to(contract_dates::update_status)),
    );

    // ── Musician response link (no login; the token is the credential) ──
    cfg.service(
        web::scope("/respond/{token}")
            .route("", web::get().to(responses::get_by_token))
            .route("/dates/{date_id}", web::put().to(responses::respond_to_date))
            .route("/accept-all", web::post().to(responses::accept_all))
            .route("/reject-all", web::post().to(responses::reject_all)),
    );

    cfg.service(web::resource("/badges/{status}").route(web::get().to(badges::get_badge)));
}

/// The responder's address: the socket peer, or the forwarded client
/// address when the proxy in front is trusted.
pub(crate) fn client_ip(req: &HttpRequest, trust_forwarded_for: bool) -> AppResult<IpAddr> {
    let forwarded = if trust_forwarded_for {
        req.connection_info()
            .realip_remote_addr()
            .and_then(parse_ip)
    } else {
        None
    };

    forwarded
        .or_else(|| req.peer_addr().map(|addr| addr.ip()))
        .ok_or_else(|| AppError::validation("Could not determine the responder's IP address"))
}

fn parse_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    raw.parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|addr| addr.ip()))
}
