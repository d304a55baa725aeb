//! Persistent login session
//!
//! A session is five storage entries written together on login: the bearer
//! token, the JSON user record, the authenticated flag, the login time and the
//! expiration time. Expiration is always `login time + session duration`
//! until [`SessionStore::extend`] pushes it forward.

use crate::clock::{Clock, SystemClock};
use crate::config::{PortalConfig, SessionConfig};
use crate::storage::KeyValueStorage;
use crate::types::UserRecord;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde_json::{Map, Value as JsonValue};
use tracing::{debug, info, warn};

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Time left before the session expires
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemainingTime {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub expired: bool,
}

impl RemainingTime {
    fn expired() -> Self {
        Self {
            expired: true,
            ..Self::default()
        }
    }

    fn from_millis(remaining: i64) -> Self {
        if remaining <= 0 {
            return Self::expired();
        }
        Self {
            days: remaining / DAY_MS,
            hours: (remaining % DAY_MS) / HOUR_MS,
            minutes: (remaining % HOUR_MS) / MINUTE_MS,
            expired: false,
        }
    }
}

/// Session persistence over an injected key/value storage
#[derive(Debug)]
pub struct SessionStore<S, C = SystemClock> {
    storage: S,
    clock: C,
    duration: TimeDelta,
}

impl<S: KeyValueStorage> SessionStore<S> {
    /// Session store using wall-clock time and the default 20 day lifetime
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, SystemClock)
    }

    /// Session store using the lifetime configured in `config.session`
    pub fn from_config(storage: S, config: &PortalConfig) -> Self {
        Self::new(storage).with_duration(config.session_duration())
    }
}

impl<S: KeyValueStorage, C: Clock> SessionStore<S, C> {
    pub fn with_clock(storage: S, clock: C) -> Self {
        Self {
            storage,
            clock,
            duration: SessionConfig::duration(SessionConfig::DEFAULT_DURATION_DAYS),
        }
    }

    /// Override the session lifetime
    pub fn with_duration(mut self, duration: TimeDelta) -> Self {
        self.duration = duration;
        self
    }

    pub fn duration(&self) -> TimeDelta {
        self.duration
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Persist a fresh session for `token` and `user`
    pub fn save(&self, token: &str, user: &UserRecord) {
        let now = self.clock.now();
        let expiration = now + self.duration;

        let user_json = match serde_json::to_string(user) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "Failed to serialize user record, storing empty object");
                "{}".to_string()
            }
        };

        self.storage.set(SessionConfig::TOKEN_KEY, token);
        self.storage.set(SessionConfig::USER_KEY, &user_json);
        self.storage.set(SessionConfig::AUTHENTICATED_KEY, "true");
        self.storage
            .set(SessionConfig::LOGIN_TIME_KEY, &format_timestamp(now));
        self.storage
            .set(SessionConfig::EXPIRATION_KEY, &format_timestamp(expiration));

        info!(expires_at = %format_timestamp(expiration), "Session saved");
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(SessionConfig::TOKEN_KEY)
    }

    /// The cached user record; unreadable data counts as no user
    pub fn user(&self) -> Option<UserRecord> {
        let raw = self.storage.get(SessionConfig::USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!(error = %err, "Discarding unreadable stored user data");
                None
            }
        }
    }

    pub fn login_time(&self) -> Option<DateTime<Utc>> {
        self.read_timestamp(SessionConfig::LOGIN_TIME_KEY)
    }

    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.read_timestamp(SessionConfig::EXPIRATION_KEY)
    }

    /// True when no usable expiration is stored or it has passed
    pub fn is_expired(&self) -> bool {
        match self.expiration() {
            Some(expiration) => self.clock.now() > expiration,
            None => true,
        }
    }

    /// Flag set, token present and not expired
    pub fn is_authenticated(&self) -> bool {
        self.storage.get(SessionConfig::AUTHENTICATED_KEY).as_deref() == Some("true")
            && self.token().is_some_and(|token| !token.is_empty())
            && !self.is_expired()
    }

    pub fn remaining_time(&self) -> RemainingTime {
        match self.expiration() {
            Some(expiration) => {
                RemainingTime::from_millis((expiration - self.clock.now()).num_milliseconds())
            }
            None => RemainingTime::expired(),
        }
    }

    /// Push the expiration to now + session duration.
    ///
    /// Returns false when there is no session to extend.
    pub fn extend(&self) -> bool {
        if self.storage.get(SessionConfig::EXPIRATION_KEY).is_none() {
            return false;
        }
        let expiration = self.clock.now() + self.duration;
        self.storage
            .set(SessionConfig::EXPIRATION_KEY, &format_timestamp(expiration));
        debug!(expires_at = %format_timestamp(expiration), "Session extended");
        true
    }

    /// Remove every session entry
    pub fn clear(&self) {
        for key in SessionConfig::ALL_KEYS {
            self.storage.remove(key);
        }
        debug!("Session cleared");
    }

    /// Shallow-merge `partial` over the cached user and persist the result
    ///
    /// A merge that does not form a valid user record is logged and dropped;
    /// the stored record is returned unchanged in that case.
    pub fn update_user(&self, partial: Map<String, JsonValue>) -> UserRecord {
        let mut merged = self
            .storage
            .get(SessionConfig::USER_KEY)
            .and_then(|raw| match serde_json::from_str::<JsonValue>(&raw) {
                Ok(JsonValue::Object(map)) => Some(map),
                _ => None,
            })
            .unwrap_or_default();
        merged.extend(partial);

        let merged = JsonValue::Object(merged);
        let user = match serde_json::from_value::<UserRecord>(merged.clone()) {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "Rejected user update, keeping stored record");
                return self.user().unwrap_or_default();
            }
        };
        self.storage.set(SessionConfig::USER_KEY, &merged.to_string());
        debug!("Cached user updated");
        user
    }

    /// Drop a session whose expiration is missing, unreadable or past.
    ///
    /// Returns whether a valid authenticated session remains.
    pub fn validate(&self) -> bool {
        if self.is_expired() {
            let has_leftovers = SessionConfig::ALL_KEYS
                .iter()
                .any(|key| self.storage.get(key).is_some());
            if has_leftovers {
                info!("Session expired or invalid, clearing stored session");
                self.clear();
            }
            return false;
        }
        self.is_authenticated()
    }

    fn read_timestamp(&self, key: &str) -> Option<DateTime<Utc>> {
        let raw = self.storage.get(key)?;
        match DateTime::parse_from_rfc3339(&raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(err) => {
                warn!(key, error = %err, "Ignoring unreadable session timestamp");
                None
            }
        }
    }
}

/// ISO 8601 with millisecond precision and a `Z` suffix
fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;
    use serde_json::json;
    use std::sync::Arc;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn fixture() -> (
        Arc<MemoryStorage>,
        Arc<ManualClock>,
        SessionStore<Arc<MemoryStorage>, Arc<ManualClock>>,
    ) {
        let storage = Arc::new(MemoryStorage::new());
        let clock = Arc::new(ManualClock::new(start()));
        let store = SessionStore::with_clock(Arc::clone(&storage), Arc::clone(&clock));
        (storage, clock, store)
    }

    fn partner() -> UserRecord {
        serde_json::from_value(json!({
            "_id": "665f1c",
            "email": "ops@acme.test",
            "emailVerify": true,
            "isVerified": true,
            "companyDetails": { "RegisteredCompanyName": "Acme" },
            "userAccess": ["Insurance"]
        }))
        .unwrap()
    }

    #[test]
    fn save_then_read_back() {
        let (storage, _, store) = fixture();
        let user = partner();

        store.save("tok-123", &user);

        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("tok-123"));
        assert_eq!(store.user(), Some(user));
        assert_eq!(storage.len(), 5);
        assert_eq!(
            storage.get(SessionConfig::AUTHENTICATED_KEY).as_deref(),
            Some("true")
        );
        assert_eq!(
            storage.get(SessionConfig::LOGIN_TIME_KEY).as_deref(),
            Some("2024-03-01T09:30:00.000Z")
        );
        assert_eq!(
            storage.get(SessionConfig::EXPIRATION_KEY).as_deref(),
            Some("2024-03-21T09:30:00.000Z")
        );
        assert_eq!(store.login_time(), Some(start()));
        assert_eq!(store.expiration(), Some(start() + TimeDelta::days(20)));
    }

    #[test]
    fn empty_store_is_expired_and_unauthenticated() {
        let (_, _, store) = fixture();
        assert!(store.is_expired());
        assert!(!store.is_authenticated());
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn expires_after_twenty_days() {
        let (_, clock, store) = fixture();
        store.save("tok", &partner());

        clock.advance(TimeDelta::days(20));
        assert!(!store.is_expired());
        assert!(store.is_authenticated());

        clock.advance(TimeDelta::seconds(1));
        assert!(store.is_expired());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn authentication_requires_flag_and_token() {
        let (storage, _, store) = fixture();
        store.save("tok", &partner());

        storage.remove(SessionConfig::AUTHENTICATED_KEY);
        assert!(!store.is_authenticated());

        storage.set(SessionConfig::AUTHENTICATED_KEY, "false");
        assert!(!store.is_authenticated());

        storage.set(SessionConfig::AUTHENTICATED_KEY, "true");
        storage.remove(SessionConfig::TOKEN_KEY);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn empty_token_is_not_authenticated() {
        let (_, _, store) = fixture();
        store.save("", &partner());

        assert_eq!(store.token().as_deref(), Some(""));
        assert!(!store.is_expired());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn unreadable_expiration_fails_closed() {
        let (storage, _, store) = fixture();
        store.save("tok", &partner());
        storage.set(SessionConfig::EXPIRATION_KEY, "next tuesday");

        assert!(store.is_expired());
        assert!(!store.is_authenticated());
        assert!(store.remaining_time().expired);
    }

    #[test]
    fn corrupt_user_reads_as_absent() {
        let (storage, _, store) = fixture();
        store.save("tok", &partner());
        storage.set(SessionConfig::USER_KEY, "{not json");

        assert_eq!(store.user(), None);
        assert_eq!(store.token().as_deref(), Some("tok"));
    }

    #[test]
    fn remaining_time_floors_each_unit() {
        let (_, clock, store) = fixture();
        store.save("tok", &partner());

        assert_eq!(
            store.remaining_time(),
            RemainingTime {
                days: 20,
                hours: 0,
                minutes: 0,
                expired: false
            }
        );

        clock.advance(TimeDelta::days(3) + TimeDelta::minutes(90) + TimeDelta::seconds(59));
        assert_eq!(
            store.remaining_time(),
            RemainingTime {
                days: 16,
                hours: 22,
                minutes: 29,
                expired: false
            }
        );

        clock.advance(TimeDelta::days(17));
        assert_eq!(
            store.remaining_time(),
            RemainingTime {
                days: 0,
                hours: 0,
                minutes: 0,
                expired: true
            }
        );
    }

    #[test]
    fn remaining_time_without_session() {
        let (_, _, store) = fixture();
        assert_eq!(
            store.remaining_time(),
            RemainingTime {
                days: 0,
                hours: 0,
                minutes: 0,
                expired: true
            }
        );
    }

    #[test]
    fn extend_moves_expiration_only() {
        let (_, clock, store) = fixture();
        store.save("tok", &partner());
        let before = store.expiration().unwrap();

        clock.advance(TimeDelta::days(5));
        assert!(store.extend());

        let extended = store.expiration().unwrap();
        assert_eq!(extended, start() + TimeDelta::days(25));
        assert!(extended > before);
        assert_eq!(store.login_time(), Some(start()));
        assert_eq!(store.token().as_deref(), Some("tok"));
        assert_eq!(store.user(), Some(partner()));
    }

    #[test]
    fn extend_without_session_is_a_no_op() {
        let (storage, _, store) = fixture();
        assert!(!store.extend());
        assert!(storage.is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let (storage, _, store) = fixture();
        store.save("tok", &partner());

        store.clear();
        store.clear();

        assert!(storage.is_empty());
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
        assert!(!store.is_authenticated());
        assert!(store.is_expired());
    }

    #[test]
    fn update_user_merges_shallowly() {
        let (_, _, store) = fixture();
        store.save("tok", &partner());

        let partial = json!({
            "isVerified": false,
            "companyDetails": { "city": "Pune" }
        });
        let merged = store.update_user(partial.as_object().cloned().unwrap());

        assert_eq!(merged.is_verified, Some(false));
        assert_eq!(merged.email.as_deref(), Some("ops@acme.test"));
        // nested objects are replaced, not merged
        assert!(!merged.has_company_details());
        assert_eq!(store.user(), Some(merged));
    }

    #[test]
    fn update_user_without_prior_user_keeps_partial() {
        let (_, _, store) = fixture();
        let partial = json!({ "email": "new@acme.test", "userAccess": ["Loan"] });

        let merged = store.update_user(partial.as_object().cloned().unwrap());

        assert_eq!(merged.email.as_deref(), Some("new@acme.test"));
        assert_eq!(merged.capabilities(), ["Loan"]);
        assert_eq!(merged.id, None);
        assert_eq!(store.user(), Some(merged));
    }

    #[test]
    fn update_user_rejects_invalid_fields() {
        let (_, _, store) = fixture();
        store.save("tok", &partner());

        let partial = json!({ "emailVerify": "yes" });
        let unchanged = store.update_user(partial.as_object().cloned().unwrap());

        assert_eq!(unchanged, partner());
        assert_eq!(store.user(), Some(partner()));
    }

    #[test]
    fn validate_clears_expired_sessions() {
        let (storage, clock, store) = fixture();
        store.save("tok", &partner());
        assert!(store.validate());

        clock.advance(TimeDelta::days(21));
        assert!(!store.validate());
        assert!(storage.is_empty());
    }

    #[test]
    fn validate_clears_sessions_missing_expiration() {
        let (storage, _, store) = fixture();
        store.save("tok", &partner());
        storage.remove(SessionConfig::EXPIRATION_KEY);

        assert!(!store.validate());
        assert!(storage.is_empty());
    }

    #[test]
    fn configured_duration_is_used() {
        let mut config = PortalConfig::default();
        config.session.duration_days = 2;
        let store = SessionStore::from_config(MemoryStorage::new(), &config);
        assert_eq!(store.duration(), TimeDelta::days(2));

        store.save("tok", &partner());
        assert!(store.is_authenticated());
        assert_eq!(
            store.expiration().zip(store.login_time()).map(|(end, start)| end - start),
            Some(TimeDelta::days(2))
        );
    }

    #[test]
    fn custom_duration() {
        let (_, clock, store) = fixture();
        let store = store.with_duration(TimeDelta::hours(1));
        store.save("tok", &partner());

        clock.advance(TimeDelta::minutes(61));
        assert!(store.is_expired());
    }
}
