//! Generation sessions.
//!
//! A [`Session`] runs at most one generation at a time and keeps the last successful result.
//! A failed or rejected generation never replaces that result. Sessions in a
//! [`SessionStore`] share nothing with each other.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::WireframeConfig;
use crate::document::{assemble, Document};
use crate::error::{WireframeError, WireframeResult};
use crate::model::Website;
use crate::prompt::build_prompt;
use crate::validator::parse_response;

/// Failure reported by a [`TextGenerator`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    #[error("request failed: {message}")]
    Failed {
        message: String,
        /// Whatever text arrived before the failure.
        partial: Option<String>,
    },

    #[error("blocked by content policy: {reason}")]
    Blocked { reason: String },
}

/// The hosted text-generation model, seen as an opaque prompt-to-text function
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GeneratorError>;
}

/// One successful generation
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub description: String,
    pub outline: Option<String>,
    pub website: Website,
    pub raw: String,
    pub generated_at: DateTime<Utc>,
}

impl Generation {
    pub fn document(&self, config: &WireframeConfig) -> Document {
        assemble(&self.website, config)
    }
}

pub struct Session {
    config: WireframeConfig,
    busy: AtomicBool,
    last: Mutex<Option<Arc<Generation>>>,
}

/// Clears the busy flag when the generation finishes or its future is dropped.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Session {
    pub fn new(config: WireframeConfig) -> Self {
        Self {
            config,
            busy: AtomicBool::new(false),
            last: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &WireframeConfig {
        &self.config
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// The last successful generation, if any.
    pub fn current(&self) -> Option<Arc<Generation>> {
        self.last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Ask `generator` for a wireframe of `description` and store it on success.
    ///
    /// Fails with [`WireframeError::Busy`] while another generation of this session is
    /// running. Model errors, timeouts and unusable responses leave the stored result as it
    /// was.
    pub async fn generate<G>(&self, generator: &G, description: &str) -> WireframeResult<Arc<Generation>>
    where
        G: TextGenerator + ?Sized,
    {
        if description.trim().is_empty() {
            return Err(WireframeError::GenerationFailure {
                message: "the description is empty".to_string(),
                raw: None,
            });
        }

        let _guard = BusyGuard::acquire(&self.busy).ok_or(WireframeError::Busy)?;

        let prompt = build_prompt(description, self.config.convention);
        let timeout = Duration::from_secs(self.config.generation_timeout_secs);
        tracing::info!(convention = ?self.config.convention, "requesting wireframe");

        let raw = match tokio::time::timeout(timeout, generator.generate(&prompt)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(GeneratorError::Failed { message, partial })) => {
                tracing::warn!(%message, "generation failed");
                return Err(WireframeError::GenerationFailure {
                    message,
                    raw: partial,
                });
            }
            Ok(Err(err @ GeneratorError::Blocked { .. })) => {
                tracing::warn!(error = %err, "generation blocked");
                return Err(WireframeError::GenerationFailure {
                    message: err.to_string(),
                    raw: None,
                });
            }
            Err(_) => {
                tracing::warn!(timeout_secs = timeout.as_secs(), "generation timed out");
                return Err(WireframeError::GenerationFailure {
                    message: format!("no response within {} seconds", timeout.as_secs()),
                    raw: None,
                });
            }
        };

        let parsed = parse_response(&raw, self.config.convention).inspect_err(|err| {
            tracing::warn!(error = %err, "model response rejected");
        })?;

        let generation = Arc::new(Generation {
            description: description.to_string(),
            outline: parsed.outline,
            website: parsed.website,
            raw,
            generated_at: Utc::now(),
        });

        *self
            .last
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Arc::clone(&generation));
        tracing::info!(pages = generation.website.pages.len(), "wireframe generated");
        Ok(generation)
    }
}

/// Independent sessions keyed by session id
pub struct SessionStore {
    config: WireframeConfig,
    sessions: DashMap<String, Arc<Session>>,
}

impl SessionStore {
    pub fn new(config: WireframeConfig) -> Self {
        Self {
            config,
            sessions: DashMap::new(),
        }
    }

    pub fn get_or_create(&self, session_id: &str) -> Arc<Session> {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Session::new(self.config.clone())))
            .clone()
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<Session>> {
        self.sessions.get(session_id).map(|s| Arc::clone(&s))
    }

    pub fn remove(&self, session_id: &str) -> Option<Arc<Session>> {
        self.sessions.remove(session_id).map(|(_, s)| s)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
