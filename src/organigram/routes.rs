use crate::organigram::announcer::Announcement;
use crate::organigram::filter::{filter, FilteredView};
use crate::organigram::model::{Department, DepartmentScope, FilterScope, NodeId, OrgNode};
use crate::organigram::navigation::{parse_deep_link, NavKey};
use crate::organigram::session::OrganigramSession;
use crate::organigram::views::{self, CardNode, Diagram, FinderEntry};
use crate::organigram::{OrganigramError, TreeWarning};
use crate::{AppState, ErrorResponse};
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganigramSummary {
    pub total: usize,
    pub roots: Vec<NodeId>,
    #[schema(value_type = Object)]
    pub counts_by_department: BTreeMap<Department, usize>,
    pub warnings: Vec<TreeWarning>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FilterQuery {
    /// `all`, `hoofdbestuur` or `jeugdbestuur`; defaults to `all`.
    pub department: Option<DepartmentScope>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub department: Option<DepartmentScope>,
}

#[derive(Serialize, Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub department: Option<DepartmentScope>,
    /// URL fragment identifying a member, e.g. `#lid-penningmeester`.
    #[schema(example = "#lid-penningmeester")]
    pub deep_link: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct NavigateRequest {
    pub key: NavKey,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub scope: FilterScope,
    pub expanded: Vec<NodeId>,
    pub focused: Option<NodeId>,
    pub query: String,
    /// Members rendered by the card and diagram views.
    pub rendered_count: usize,
    pub announcement: Option<Announcement>,
}

impl SessionSnapshot {
    /// Hands over the pending announcement, so each message reaches the page
    /// exactly once.
    fn of(session_id: Uuid, session: &mut OrganigramSession) -> Self {
        Self {
            session_id,
            scope: session.scope(),
            expanded: session.expansion().iter().cloned().collect(),
            focused: session.focused().cloned(),
            query: session.query().to_string(),
            rendered_count: session.rendered_ids().len(),
            announcement: session.take_announcement(),
        }
    }
}

fn error_response(err: &OrganigramError) -> HttpResponse {
    match err {
        OrganigramError::Tree(e) => HttpResponse::UnprocessableEntity().json(
            ErrorResponse::new("InvalidOrganigram", &e.to_string())
                .with_announcement(Announcement::load_failed()),
        ),
        OrganigramError::Source(e) => HttpResponse::InternalServerError().json(
            ErrorResponse::internal_error(&e.to_string())
                .with_announcement(Announcement::load_failed()),
        ),
        OrganigramError::UnknownNode(_) | OrganigramError::SessionNotFound => {
            HttpResponse::NotFound().json(ErrorResponse::not_found(&err.to_string()))
        }
    }
}

fn scope_of(department: Option<DepartmentScope>) -> FilterScope {
    FilterScope::new(department.unwrap_or_default())
}

/// Runs one transition under the session lock and answers with the
/// resulting snapshot.
async fn with_session<F>(state: &AppState, session_id: Uuid, transition: F) -> HttpResponse
where
    F: FnOnce(&mut OrganigramSession) -> Result<(), OrganigramError>,
{
    let shared = match state.get_session(&session_id).await {
        Ok(session) => session,
        Err(e) => return error_response(&e),
    };
    let mut session = shared.lock();
    match transition(&mut *session) {
        Ok(()) => HttpResponse::Ok().json(SessionSnapshot::of(session_id, &mut session)),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/organigram",
    tag = "Organigram",
    responses(
        (status = 200, description = "Organigram summary", body = OrganigramSummary),
        (status = 422, description = "Member list is not a valid tree", body = ErrorResponse)
    )
)]
pub async fn get_summary(state: web::Data<AppState>) -> impl Responder {
    match state.get_organigram().await {
        Ok(organigram) => {
            let counts = filter(&organigram.tree, FilterScope::all()).counts_by_department;
            HttpResponse::Ok().json(OrganigramSummary {
                total: organigram.tree.len(),
                roots: organigram.tree.roots().cloned().collect(),
                counts_by_department: counts,
                warnings: organigram.tree.warnings().to_vec(),
            })
        }
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/organigram/members",
    tag = "Organigram",
    responses(
        (status = 200, description = "All members in content order", body = Vec<OrgNode>)
    )
)]
pub async fn get_all_members(state: web::Data<AppState>) -> impl Responder {
    match state.get_organigram().await {
        Ok(organigram) => HttpResponse::Ok().json(organigram.tree.nodes()),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/organigram/filter",
    tag = "Organigram",
    params(FilterQuery),
    responses(
        (status = 200, description = "Visible members and department counts", body = FilteredView)
    )
)]
pub async fn get_filtered_view(
    state: web::Data<AppState>,
    query: web::Query<FilterQuery>,
) -> impl Responder {
    match state.get_organigram().await {
        Ok(organigram) => {
            HttpResponse::Ok().json(filter(&organigram.tree, scope_of(query.department)))
        }
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/organigram/search",
    tag = "Organigram",
    params(SearchQuery),
    responses(
        (status = 200, description = "Ranked finder results", body = Vec<FinderEntry>)
    )
)]
pub async fn search_members(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> impl Responder {
    match state.get_organigram().await {
        Ok(organigram) => {
            let view = filter(&organigram.tree, scope_of(query.department));
            let results = views::finder(&organigram.tree, &organigram.index, &view, &query.q);
            HttpResponse::Ok().json(results)
        }
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/organigram/reload",
    tag = "Organigram",
    responses(
        (status = 200, description = "Organigram rebuilt from the member source", body = OrganigramSummary),
        (status = 422, description = "Member list is not a valid tree", body = ErrorResponse)
    )
)]
pub async fn reload(state: web::Data<AppState>) -> impl Responder {
    state.invalidate_organigram().await;
    get_summary(state).await
}

#[utoipa::path(
    post,
    path = "/api/organigram/sessions",
    tag = "Organigram",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = SessionSnapshot),
        (status = 400, description = "Deep link names no member", body = ErrorResponse),
        (status = 404, description = "Deep-link target not found", body = ErrorResponse),
        (status = 422, description = "Member list is not a valid tree", body = ErrorResponse)
    )
)]
pub async fn create_session(
    state: web::Data<AppState>,
    item: web::Json<CreateSessionRequest>,
) -> impl Responder {
    let deep_link = match item.deep_link.as_deref() {
        Some(fragment) => match parse_deep_link(fragment) {
            Some(target) => Some(target),
            None => {
                return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!(
                    "'{}' does not name a member",
                    fragment
                )))
            }
        },
        None => None,
    };
    match state.create_session(item.department, deep_link.as_ref()).await {
        Ok((id, session)) => {
            HttpResponse::Created().json(SessionSnapshot::of(id, &mut session.lock()))
        }
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/organigram/sessions/{id}",
    tag = "Organigram",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Current session state", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    with_session(&state, path.into_inner(), |_| Ok(())).await
}

#[utoipa::path(
    delete,
    path = "/api/organigram/sessions/{id}",
    tag = "Organigram",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session ended"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn delete_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    if state.end_session(&path.into_inner()).await {
        HttpResponse::Ok().finish()
    } else {
        error_response(&OrganigramError::SessionNotFound)
    }
}

#[utoipa::path(
    get,
    path = "/api/organigram/sessions/{id}/cards",
    tag = "Organigram",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Collapsible card hierarchy", body = Vec<CardNode>),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_cards(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match state.get_session(&path.into_inner()).await {
        Ok(session) => HttpResponse::Ok().json(session.lock().cards()),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/organigram/sessions/{id}/diagram",
    tag = "Organigram",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Node-link diagram layout", body = Diagram),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_diagram(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match state.get_session(&path.into_inner()).await {
        Ok(session) => HttpResponse::Ok().json(session.lock().diagram()),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/organigram/sessions/{id}/finder",
    tag = "Organigram",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Finder results for the session query", body = Vec<FinderEntry>),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_finder(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match state.get_session(&path.into_inner()).await {
        Ok(session) => HttpResponse::Ok().json(session.lock().finder()),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/organigram/sessions/{id}/toggle/{node_id}",
    tag = "Organigram",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("node_id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Member toggled", body = SessionSnapshot),
        (status = 404, description = "Session or member not found", body = ErrorResponse)
    )
)]
pub async fn toggle(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> impl Responder {
    let (session_id, node_id) = path.into_inner();
    let node_id = NodeId::from(node_id);
    with_session(&state, session_id, |session| {
        session.toggle(&node_id).map(|_| ())
    })
    .await
}

#[utoipa::path(
    post,
    path = "/api/organigram/sessions/{id}/expand-path/{node_id}",
    tag = "Organigram",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("node_id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Ancestors of the member expanded", body = SessionSnapshot),
        (status = 404, description = "Session or member not found", body = ErrorResponse)
    )
)]
pub async fn expand_path(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> impl Responder {
    let (session_id, node_id) = path.into_inner();
    let node_id = NodeId::from(node_id);
    with_session(&state, session_id, |session| {
        session.expand_path(&node_id).map(|_| ())
    })
    .await
}

#[utoipa::path(
    post,
    path = "/api/organigram/sessions/{id}/select/{node_id}",
    tag = "Organigram",
    params(
        ("id" = Uuid, Path, description = "Session ID"),
        ("node_id" = String, Path, description = "Member ID")
    ),
    responses(
        (status = 200, description = "Finder result opened and focused", body = SessionSnapshot),
        (status = 404, description = "Session or member not found", body = ErrorResponse)
    )
)]
pub async fn select(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> impl Responder {
    let (session_id, node_id) = path.into_inner();
    let node_id = NodeId::from(node_id);
    with_session(&state, session_id, |session| session.select(&node_id)).await
}

#[utoipa::path(
    post,
    path = "/api/organigram/sessions/{id}/collapse-all",
    tag = "Organigram",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Everything collapsed", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn collapse_all(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    with_session(&state, path.into_inner(), |session| {
        session.collapse_all();
        Ok(())
    })
    .await
}

#[utoipa::path(
    post,
    path = "/api/organigram/sessions/{id}/expand-all",
    tag = "Organigram",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Everything expanded", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn expand_all(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    with_session(&state, path.into_inner(), |session| {
        session.expand_all();
        Ok(())
    })
    .await
}

#[utoipa::path(
    post,
    path = "/api/organigram/sessions/{id}/scope",
    tag = "Organigram",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = FilterScope,
    responses(
        (status = 200, description = "Department scope changed", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn set_scope(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    item: web::Json<FilterScope>,
) -> impl Responder {
    let scope = item.into_inner();
    with_session(&state, path.into_inner(), |session| {
        session.set_scope(scope);
        Ok(())
    })
    .await
}

#[utoipa::path(
    post,
    path = "/api/organigram/sessions/{id}/query",
    tag = "Organigram",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = QueryRequest,
    responses(
        (status = 200, description = "Finder query updated", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn set_query(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    item: web::Json<QueryRequest>,
) -> impl Responder {
    let query = item.into_inner().query;
    with_session(&state, path.into_inner(), |session| {
        session.set_query(query);
        Ok(())
    })
    .await
}

#[utoipa::path(
    post,
    path = "/api/organigram/sessions/{id}/navigate",
    tag = "Organigram",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = NavigateRequest,
    responses(
        (status = 200, description = "Key press applied", body = SessionSnapshot),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn navigate(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    item: web::Json<NavigateRequest>,
) -> impl Responder {
    let key = item.key;
    with_session(&state, path.into_inner(), |session| {
        session.navigate(key).map(|_| ())
    })
    .await
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/organigram").route(web::get().to(get_summary)))
        .service(web::resource("/organigram/members").route(web::get().to(get_all_members)))
        .service(web::resource("/organigram/filter").route(web::get().to(get_filtered_view)))
        .service(web::resource("/organigram/search").route(web::get().to(search_members)))
        .service(web::resource("/organigram/reload").route(web::post().to(reload)))
        .service(web::resource("/organigram/sessions").route(web::post().to(create_session)))
        .service(
            web::resource("/organigram/sessions/{id}")
                .route(web::get().to(get_session))
                .route(web::delete().to(delete_session)),
        )
        .service(web::resource("/organigram/sessions/{id}/cards").route(web::get().to(get_cards)))
        .service(
            web::resource("/organigram/sessions/{id}/diagram").route(web::get().to(get_diagram)),
        )
        .service(web::resource("/organigram/sessions/{id}/finder").route(web::get().to(get_finder)))
        .service(
            web::resource("/organigram/sessions/{id}/toggle/{node_id}")
                .route(web::post().to(toggle)),
        )
        .service(
            web::resource("/organigram/sessions/{id}/expand-path/{node_id}")
                .route(web::post().to(expand_path)),
        )
        .service(
            web::resource("/organigram/sessions/{id}/select/{node_id}")
                .route(web::post().to(select)),
        )
        .service(
            web::resource("/organigram/sessions/{id}/collapse-all")
                .route(web::post().to(collapse_all)),
        )
        .service(
            web::resource("/organigram/sessions/{id}/expand-all")
                .route(web::post().to(expand_all)),
        )
        .service(web::resource("/organigram/sessions/{id}/scope").route(web::post().to(set_scope)))
        .service(web::resource("/organigram/sessions/{id}/query").route(web::post().to(set_query)))
        .service(
            web::resource("/organigram/sessions/{id}/navigate").route(web::post().to(navigate)),
        );
}
