//! Session state — one user's wizard progress and derived results.
//!
//! Each session lives behind its own `tokio::sync::Mutex`, so the handler
//! serving a button press has exclusive access for the whole pipeline call.
//! Nothing is persisted; dropping the session drops everything.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::company::CompanyQuery;
use crate::models::job::JobRecord;
use crate::models::profile::InstitutionProfile;
use crate::outreach::normalizer::JobExtraction;

/// Wizard page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Landing,
    Setup,
    Main,
}

/// Everything produced by one company search. Swapped in as a unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyResearch {
    pub query: CompanyQuery,
    pub report: String,
    pub jobs: JobExtraction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutreachEmail {
    pub body_text: String,
}

/// An open email draft: either for one job or a general partnership pitch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OutreachDraft {
    pub selected_job: Option<JobRecord>,
    pub email: Option<OutreachEmail>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("'{action}' is only available on the {expected:?} step (session is on {actual:?})")]
    WrongStep {
        action: &'static str,
        expected: Step,
        actual: Step,
    },

    #[error("search for a company first")]
    NoCompany,

    #[error("start an outreach draft first")]
    NoOutreach,

    #[error("job {index} does not exist ({available} jobs available)")]
    JobIndexOutOfRange { index: usize, available: usize },
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub step: Step,
    pub profile: Option<InstitutionProfile>,
    pub company: Option<CompanyResearch>,
    pub outreach: Option<OutreachDraft>,
}

impl SessionState {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            step: Step::Landing,
            profile: None,
            company: None,
            outreach: None,
        }
    }

    pub fn require_step(&self, action: &'static str, expected: Step) -> Result<(), SessionError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(SessionError::WrongStep {
                action,
                expected,
                actual: self.step,
            })
        }
    }

    /// Landing → Setup.
    pub fn begin_setup(&mut self) -> Result<(), SessionError> {
        self.require_step("begin setup", Step::Landing)?;
        self.step = Step::Setup;
        Ok(())
    }

    /// Setup → Main. A new profile invalidates every result derived from the old one.
    pub fn complete_setup(&mut self, profile: InstitutionProfile) -> Result<(), SessionError> {
        self.require_step("submit profile", Step::Setup)?;
        self.profile = Some(profile);
        self.company = None;
        self.outreach = None;
        self.step = Step::Main;
        Ok(())
    }

    /// Main → Setup. The current profile stays active until a new one is submitted.
    pub fn edit_profile(&mut self) -> Result<(), SessionError> {
        self.require_step("edit profile", Step::Main)?;
        self.step = Step::Setup;
        Ok(())
    }

    /// Replaces the previous search in one assignment and closes any draft,
    /// so no email can be written against a stale company.
    pub fn replace_company(&mut self, research: CompanyResearch) {
        self.company = Some(research);
        self.outreach = None;
    }

    /// Opens a draft for job `job_index`, or a general pitch when `None`.
    pub fn start_outreach(&mut self, job_index: Option<usize>) -> Result<(), SessionError> {
        self.require_step("start outreach", Step::Main)?;
        let company = self.company.as_ref().ok_or(SessionError::NoCompany)?;

        let selected_job = match job_index {
            Some(index) => {
                let jobs = company.jobs.jobs();
                let job = jobs.get(index).ok_or(SessionError::JobIndexOutOfRange {
                    index,
                    available: jobs.len(),
                })?;
                Some(job.clone())
            }
            None => None,
        };

        self.outreach = Some(OutreachDraft {
            selected_job,
            email: None,
        });
        Ok(())
    }

    pub fn clear_outreach(&mut self) {
        self.outreach = None;
    }

    pub fn store_email(&mut self, body_text: String) -> Result<(), SessionError> {
        let draft = self.outreach.as_mut().ok_or(SessionError::NoOutreach)?;
        draft.email = Some(OutreachEmail { body_text });
        Ok(())
    }

    /// The last generated email, if a draft is open and has one.
    pub fn latest_email(&self) -> Option<&OutreachEmail> {
        self.outreach.as_ref().and_then(|d| d.email.as_ref())
    }

    pub fn institution_summary(&self) -> &str {
        self.profile
            .as_ref()
            .map_or("", |p| p.institution_summary.as_str())
    }
}

pub type SessionHandle = Arc<Mutex<SessionState>>;

/// Sessions untouched for this long are dropped.
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct StoredSession {
    handle: SessionHandle,
    last_seen: Instant,
}

/// In-memory session registry shared by all handlers.
///
/// Abandoned sessions expire after `idle_timeout` without a lookup. Expired
/// entries are evicted on every `create`, on lookup, and by `evict_idle`.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, StoredSession>>,
    idle_timeout: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_IDLE_TIMEOUT)
    }
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            idle_timeout,
        }
    }

    pub fn create(&self) -> SessionHandle {
        self.evict_idle();
        let id = Uuid::new_v4();
        let handle = Arc::new(Mutex::new(SessionState::new(id)));
        self.sessions.insert(
            id,
            StoredSession {
                handle: handle.clone(),
                last_seen: Instant::now(),
            },
        );
        handle
    }

    /// Looks a session up and marks it active. Expired sessions are not returned.
    pub fn get(&self, id: Uuid) -> Option<SessionHandle> {
        let mut entry = self.sessions.get_mut(&id)?;
        if entry.last_seen.elapsed() >= self.idle_timeout {
            drop(entry);
            self.sessions.remove(&id);
            debug!("Session {id} expired");
            return None;
        }
        entry.last_seen = Instant::now();
        Some(entry.handle.clone())
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// Drops every session idle for at least `idle_timeout`. Returns how many went.
    pub fn evict_idle(&self) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, stored| stored.last_seen.elapsed() < self.idle_timeout);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            info!("Evicted {evicted} idle sessions");
        }
        evicted
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
