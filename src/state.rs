//! Application state shared by all HTTP workers.

use crate::config::AppConfig;
use crate::organigram::{
    DepartmentScope, FilterScope, JsonFileSource, MemberSource, NodeId, Organigram,
    OrganigramError, OrganigramSession,
};
use moka::future::Cache;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub type SharedSession = Arc<Mutex<OrganigramSession>>;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn MemberSource + Send + Sync>,
    pub organigram_cache: Cache<String, Arc<Organigram>>,
    pub sessions: Cache<Uuid, SharedSession>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        let source = Arc::new(JsonFileSource::new(config.members_path.clone()));
        Self::with_source(source, config.cache_ttl, config.session_ttl)
    }

    pub fn with_source(
        source: Arc<dyn MemberSource + Send + Sync>,
        cache_ttl: Duration,
        session_ttl: Duration,
    ) -> Self {
        let organigram_cache = Cache::builder()
            .time_to_live(cache_ttl)
            .max_capacity(10)
            .build();

        let sessions = Cache::builder()
            .time_to_idle(session_ttl)
            .max_capacity(10_000)
            .build();

        AppState {
            source,
            organigram_cache,
            sessions,
        }
    }

    /// Built organigram, from cache or freshly loaded and validated.
    pub async fn get_organigram(&self) -> Result<Arc<Organigram>, OrganigramError> {
        let key = self.source.key();
        if let Some(organigram) = self.organigram_cache.get(&key).await {
            log::debug!("Organigram cache hit for {}", key);
            return Ok(organigram);
        }

        let members = self.source.load_members().await?;
        let organigram = match Organigram::build(members) {
            Ok(organigram) => Arc::new(organigram),
            Err(e) => {
                log::error!("Rejected organigram from {}: {}", key, e);
                return Err(e.into());
            }
        };
        log::info!(
            "Organigram built from {} ({} members, {} warnings)",
            key,
            organigram.tree.len(),
            organigram.tree.warnings().len()
        );

        self.organigram_cache
            .insert(key, organigram.clone())
            .await;
        Ok(organigram)
    }

    /// Drops the cached organigram so the next request rebuilds it.
    pub async fn invalidate_organigram(&self) {
        self.organigram_cache.invalidate(&self.source.key()).await;
        log::info!("Organigram cache invalidated");
    }

    pub async fn create_session(
        &self,
        department: Option<DepartmentScope>,
        deep_link: Option<&NodeId>,
    ) -> Result<(Uuid, SharedSession), OrganigramError> {
        let organigram = self.get_organigram().await?;
        let mut session = match deep_link {
            Some(target) => OrganigramSession::with_deep_link(organigram, target)?,
            None => OrganigramSession::new(organigram),
        };
        // A scope that hides the deep-link target also drops its focus.
        if let Some(department) = department {
            session.set_scope(FilterScope::new(department));
        }

        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(session));
        self.sessions.insert(id, session.clone()).await;
        log::info!("Organigram session {} created", id);
        Ok((id, session))
    }

    pub async fn get_session(&self, id: &Uuid) -> Result<SharedSession, OrganigramError> {
        self.sessions
            .get(id)
            .await
            .ok_or(OrganigramError::SessionNotFound)
    }

    pub async fn end_session(&self, id: &Uuid) -> bool {
        let existed = self.sessions.remove(id).await.is_some();
        if existed {
            log::info!("Organigram session {} ended", id);
        }
        existed
    }
}
