use actix_cors::Cors;
use actix_web::middleware::Compress;
use actix_web::{http::header, web, App, HttpServer};
use actix_web_prometheus::PrometheusMetricsBuilder;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod organigram;
pub mod state;

pub use crate::config::AppConfig;
pub use crate::state::AppState;

use crate::organigram::Announcement;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub timestamp: String,
    /// Live-region message the page should show instead of the chart.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announcement: Option<Announcement>,
}

impl ErrorResponse {
    pub fn new(error_type: &str, message: &str) -> Self {
        Self {
            error: error_type.to_string(),
            message: message.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            announcement: None,
        }
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NotFound", message)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BadRequest", message)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("InternalServerError", message)
    }

    pub fn with_announcement(mut self, announcement: Announcement) -> Self {
        self.announcement = Some(announcement);
        self
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::organigram::routes::get_summary,
        crate::organigram::routes::get_all_members,
        crate::organigram::routes::get_filtered_view,
        crate::organigram::routes::search_members,
        crate::organigram::routes::reload,
        crate::organigram::routes::create_session,
        crate::organigram::routes::get_session,
        crate::organigram::routes::delete_session,
        crate::organigram::routes::get_cards,
        crate::organigram::routes::get_diagram,
        crate::organigram::routes::get_finder,
        crate::organigram::routes::toggle,
        crate::organigram::routes::expand_path,
        crate::organigram::routes::select,
        crate::organigram::routes::collapse_all,
        crate::organigram::routes::expand_all,
        crate::organigram::routes::set_scope,
        crate::organigram::routes::set_query,
        crate::organigram::routes::navigate
    ),
    components(
        schemas(
            ErrorResponse,
            organigram::model::OrgNode,
            organigram::model::NodeId,
            organigram::model::Department,
            organigram::model::DepartmentScope,
            organigram::model::FilterScope,
            organigram::filter::FilteredView,
            organigram::error::TreeWarning,
            organigram::announcer::Announcement,
            organigram::announcer::Politeness,
            organigram::search::MatchTier,
            organigram::navigation::NavKey,
            organigram::views::CardNode,
            organigram::views::Diagram,
            organigram::views::DiagramNode,
            organigram::views::DiagramEdge,
            organigram::views::FinderEntry,
            organigram::views::Crumb,
            organigram::routes::OrganigramSummary,
            organigram::routes::CreateSessionRequest,
            organigram::routes::QueryRequest,
            organigram::routes::NavigateRequest,
            organigram::routes::SessionSnapshot,
        )
    ),
    tags(
        (name = "Organigram", description = "Club organigram, department filter and responsibility finder.")
    ),
    servers(
        (url = "http://127.0.0.1:8080", description = "Localhost")
    )
)]
pub struct ApiDoc;

pub async fn run() -> std::io::Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    let app_state = web::Data::new(AppState::new(&config));

    // Build once at boot so content errors show up in the logs right away.
    if let Err(e) = app_state.get_organigram().await {
        log::warn!(
            "Organigram not available yet ({}); requests will retry the load",
            e
        );
    }

    let prometheus = PrometheusMetricsBuilder::new("club_organigram")
        .endpoint("/metrics")
        .build()
        .expect("Failed to create Prometheus metrics middleware");

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let allowed_origins = config.allowed_origins.clone();
    HttpServer::new(move || {
        let app_state = app_state.clone();
        let prometheus = prometheus.clone();
        let cors = allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .wrap(Compress::default())
            .wrap(prometheus)
            .wrap(cors)
            .app_data(app_state)
            .service(web::scope("/api").configure(organigram::routes::config))
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
    })
    .keep_alive(actix_web::http::KeepAlive::Os)
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
