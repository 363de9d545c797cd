//! Main application state management

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::{SessionContext, TokenStore, UserStore};
use crate::{
    error::{Result, TrackerError},
    models::{NewPracticeSession, PracticeSession, UserDocument, UserUpdate},
    reports::{aggregate, format_duration, history, HistoryFilter, RangeKind, Report},
    timer::{Clock, SessionTimer, TimerSnapshot},
};

/// Shared state behind every request.
///
/// Lock order is timers, then store, then tokens. No guard is held across an await.
#[derive(Debug)]
pub struct AppState {
    store: Mutex<UserStore>,
    tokens: Mutex<TokenStore>,
    /// One timer per user, created on first use
    timers: Mutex<HashMap<Uuid, SessionTimer>>,
    clock: Arc<dyn Clock>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
}

impl AppState {
    pub fn new(
        store: UserStore,
        token_ttl: Duration,
        clock: Arc<dyn Clock>,
        port: u16,
        host: String,
    ) -> Self {
        Self {
            store: Mutex::new(store),
            tokens: Mutex::new(TokenStore::new(token_ttl)),
            timers: Mutex::new(HashMap::new()),
            clock,
            start_time: Instant::now(),
            port,
            host,
        }
    }

    fn store(&self) -> Result<MutexGuard<'_, UserStore>> {
        self.store.lock().map_err(|e| TrackerError::lock("user store", e))
    }

    fn tokens(&self) -> Result<MutexGuard<'_, TokenStore>> {
        self.tokens.lock().map_err(|e| TrackerError::lock("token store", e))
    }

    fn timers(&self) -> Result<MutexGuard<'_, HashMap<Uuid, SessionTimer>>> {
        self.timers.lock().map_err(|e| TrackerError::lock("timers", e))
    }

    /// Create an account and log it in
    pub fn register(&self, username: &str, email: &str, password: &str) -> Result<(String, UserDocument)> {
        let record = self.store()?.register(username, email, password)?;
        let token = self.tokens()?.issue(record.id, self.clock.now());
        Ok((token, UserDocument::from(&record)))
    }

    pub fn login(&self, email: &str, password: &str) -> Result<(String, UserDocument)> {
        let document = {
            let store = self.store()?;
            UserDocument::from(store.authenticate(email, password)?)
        };
        let token = self.tokens()?.issue(document.id, self.clock.now());
        info!("User {} logged in", document.id);
        Ok((token, document))
    }

    pub fn logout(&self, ctx: &SessionContext) -> Result<()> {
        self.tokens()?.revoke(&ctx.token);
        debug!("Token revoked for user {}", ctx.user_id);
        Ok(())
    }

    /// Resolve a bearer token into a caller context
    pub fn authorize(&self, token: &str) -> Result<SessionContext> {
        let ctx = self.tokens()?.resolve(token, self.clock.now())?;
        // The account may have been deleted while the token was still cached
        self.store()?
            .get(ctx.user_id)
            .map_err(|_| TrackerError::unauthorized("Account no longer exists"))?;
        Ok(ctx)
    }

    pub fn user_document(&self, ctx: &SessionContext) -> Result<UserDocument> {
        Ok(UserDocument::from(self.store()?.get(ctx.user_id)?))
    }

    pub fn update_user(&self, ctx: &SessionContext, update: UserUpdate) -> Result<UserDocument> {
        let mut store = self.store()?;
        Ok(UserDocument::from(store.update(ctx.user_id, update)?))
    }

    /// Delete the account along with its timer and every token
    pub fn delete_user(&self, ctx: &SessionContext) -> Result<()> {
        let mut timers = self.timers()?;
        self.store()?.delete(ctx.user_id)?;
        timers.remove(&ctx.user_id);
        let revoked = self.tokens()?.revoke_user(ctx.user_id);
        info!("Account {} deleted, {} tokens revoked", ctx.user_id, revoked);
        Ok(())
    }

    pub fn add_practice(&self, ctx: &SessionContext, session: NewPracticeSession) -> Result<UserDocument> {
        let mut store = self.store()?;
        let stored = store.add_practice(ctx.user_id, session)?;
        info!(
            "Practice session {} recorded: {} on {} ({})",
            stored.id,
            stored.category,
            stored.instrument,
            format_duration(stored.duration)
        );
        Ok(UserDocument::from(store.get(ctx.user_id)?))
    }

    pub fn delete_practice(&self, ctx: &SessionContext, session_id: Uuid) -> Result<UserDocument> {
        let mut store = self.store()?;
        store.delete_practice(ctx.user_id, session_id)?;
        Ok(UserDocument::from(store.get(ctx.user_id)?))
    }

    pub fn practice_history(&self, ctx: &SessionContext, filter: &HistoryFilter) -> Result<Vec<PracticeSession>> {
        let store = self.store()?;
        let record = store.get(ctx.user_id)?;
        Ok(history(record.profile.practice_sessions(), filter)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn report(&self, ctx: &SessionContext, range: RangeKind) -> Result<Report> {
        let store = self.store()?;
        let record = store.get(ctx.user_id)?;
        Ok(aggregate(record.profile.practice_sessions(), range, self.clock.now()))
    }

    /// Run `f` against the caller's timer and return its result with a fresh snapshot
    pub fn with_timer<T>(
        &self,
        ctx: &SessionContext,
        f: impl FnOnce(&mut SessionTimer) -> Result<T>,
    ) -> Result<(T, TimerSnapshot)> {
        let mut timers = self.timers()?;
        let timer = timers
            .entry(ctx.user_id)
            .or_insert_with(|| SessionTimer::new(Arc::clone(&self.clock)));
        let out = f(timer)?;
        Ok((out, timer.snapshot()))
    }

    pub fn timer_snapshot(&self, ctx: &SessionContext) -> Result<TimerSnapshot> {
        self.with_timer(ctx, |_| Ok(())).map(|(_, snapshot)| snapshot)
    }

    /// Turn the caller's timer into a stored practice session.
    ///
    /// The timer lock is held from validation through the store write and the
    /// reset, so two saves for the same user cannot interleave.
    pub fn save_timer(
        &self,
        ctx: &SessionContext,
        instrument: &str,
        category: &str,
        notes: Option<&str>,
    ) -> Result<UserDocument> {
        let mut timers = self.timers()?;
        let timer = timers
            .entry(ctx.user_id)
            .or_insert_with(|| SessionTimer::new(Arc::clone(&self.clock)));

        let mut store = self.store()?;
        let session = {
            let profile = &store.get(ctx.user_id)?.profile;
            timer.save(
                instrument,
                category,
                notes,
                profile.instruments(),
                profile.categories(),
            )?
        };
        let stored = store.add_practice(ctx.user_id, session)?;
        timer.reset();

        info!(
            "Timer saved as session {} ({})",
            stored.id,
            format_duration(stored.duration)
        );
        Ok(UserDocument::from(store.get(ctx.user_id)?))
    }

    /// Drop expired tokens, returning how many were removed
    pub fn sweep_tokens(&self) -> Result<usize> {
        Ok(self.tokens()?.sweep_expired(self.clock.now()))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Server uptime in compound form
    pub fn get_uptime(&self) -> String {
        format_duration(self.start_time.elapsed().as_secs())
    }
}
