//! Keyed cache of query results
//!
//! Each key owns one slot holding the last successful value as an immutable
//! `Arc` snapshot, the last error and the id of the request currently in
//! flight. A slot is only ever replaced by the resolution of its own
//! in-flight request, so responses arriving out of order cannot leak into
//! another key.
//!
//! The cache is free of any reactive or browser types; time is passed in
//! by the caller as milliseconds.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::Arc;

/// Base delay of the retry back-off, ms
const RETRY_BASE_DELAY_MS: u32 = 1_000;
/// Upper bound of the retry back-off, ms
const RETRY_MAX_DELAY_MS: u32 = 30_000;

/// Cache behaviour shared by all queries of a client
#[derive(Clone, Debug, PartialEq)]
pub struct QueryOptions {
    /// Age after which a cached value is revalidated on next use
    pub stale_time_ms: f64,
    /// Retries after the first failed attempt
    pub retry: u32,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time_ms: 0.0,
            retry: 3,
        }
    }
}

/// Delay before retry number `attempt` (0-based): 1s, 2s, 4s ... capped at 30s
pub fn retry_delay_ms(attempt: u32) -> u32 {
    RETRY_BASE_DELAY_MS
        .saturating_mul(2u32.saturating_pow(attempt))
        .min(RETRY_MAX_DELAY_MS)
}

/// Key whose value stands in while `key` has none of its own
///
/// `key` takes over once it holds a value; until then the previous
/// placeholder stays, so a late response for a key that is no longer
/// current never replaces what is on screen.
pub fn next_placeholder<K: Clone>(current: Option<&K>, key: &K, key_has_data: bool) -> Option<K> {
    if key_has_data {
        Some(key.clone())
    } else {
        current.cloned()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(u64);

/// Proof that the holder owns the in-flight slot of `key`
#[derive(Clone, Debug, PartialEq)]
pub struct FetchTicket<K> {
    key: K,
    request_id: RequestId,
}

impl<K> FetchTicket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Debug)]
struct QueryEntry<V> {
    data: Option<Arc<V>>,
    updated_at: Option<f64>,
    error: Option<String>,
    in_flight: Option<RequestId>,
    invalidated: bool,
}

impl<V> Default for QueryEntry<V> {
    fn default() -> Self {
        Self {
            data: None,
            updated_at: None,
            error: None,
            in_flight: None,
            invalidated: false,
        }
    }
}

/// What a view should display for one key
#[derive(Debug)]
pub struct QuerySnapshot<V> {
    /// Value for the key, or the placeholder key's value while it loads
    pub data: Option<Arc<V>>,
    /// Nothing to show yet and no error either
    pub is_loading: bool,
    /// A request for the key is in flight
    pub is_fetching: bool,
    /// `data` belongs to the placeholder key, not the requested one
    pub is_placeholder: bool,
    /// Last failure for the key, cleared by the next success
    pub error: Option<String>,
}

impl<V> Clone for QuerySnapshot<V> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            is_loading: self.is_loading,
            is_fetching: self.is_fetching,
            is_placeholder: self.is_placeholder,
            error: self.error.clone(),
        }
    }
}

impl<V> PartialEq for QuerySnapshot<V> {
    fn eq(&self, other: &Self) -> bool {
        let same_data = match (&self.data, &other.data) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_data
            && self.is_loading == other.is_loading
            && self.is_fetching == other.is_fetching
            && self.is_placeholder == other.is_placeholder
            && self.error == other.error
    }
}

#[derive(Debug)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, QueryEntry<V>>,
    next_request: u64,
    options: QueryOptions,
}

impl<K, V> QueryCache<K, V>
where
    K: Clone + Eq + Hash,
{
    pub fn new(options: QueryOptions) -> Self {
        Self {
            entries: HashMap::new(),
            next_request: 0,
            options,
        }
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Whether activating `key` at `now` should start a request
    ///
    /// False while a request is already in flight or while the cached value
    /// is younger than `stale_time_ms`.
    pub fn needs_fetch(&self, key: &K, now: f64) -> bool {
        let Some(entry) = self.entries.get(key) else {
            return true;
        };
        if entry.in_flight.is_some() {
            return false;
        }
        if entry.invalidated || entry.data.is_none() {
            return true;
        }
        match entry.updated_at {
            Some(updated_at) => now - updated_at >= self.options.stale_time_ms,
            None => true,
        }
    }

    /// Claim the in-flight slot of `key`; `None` if a request is already running
    pub fn begin_fetch(&mut self, key: &K) -> Option<FetchTicket<K>> {
        let entry = self.entries.entry(key.clone()).or_default();
        if entry.in_flight.is_some() {
            return None;
        }
        self.next_request += 1;
        let request_id = RequestId(self.next_request);
        entry.in_flight = Some(request_id);
        Some(FetchTicket {
            key: key.clone(),
            request_id,
        })
    }

    /// Store the outcome of a request
    ///
    /// Returns false and changes nothing when the ticket no longer owns the
    /// slot. A failure keeps the previous value.
    pub fn resolve<E: Display>(
        &mut self,
        ticket: FetchTicket<K>,
        result: Result<V, E>,
        now: f64,
    ) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return false;
        };
        if entry.in_flight != Some(ticket.request_id) {
            return false;
        }
        entry.in_flight = None;
        match result {
            Ok(value) => {
                entry.data = Some(Arc::new(value));
                entry.updated_at = Some(now);
                entry.error = None;
                entry.invalidated = false;
            }
            Err(err) => {
                entry.error = Some(err.to_string());
            }
        }
        true
    }

    /// Mark every entry stale so its next activation refetches
    pub fn invalidate_all(&mut self) {
        for entry in self.entries.values_mut() {
            entry.invalidated = true;
        }
    }

    pub fn has_data(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .map(|entry| entry.data.is_some())
            .unwrap_or(false)
    }

    pub fn is_fetching(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .map(|entry| entry.in_flight.is_some())
            .unwrap_or(false)
    }

    /// View of `key`, falling back to `placeholder`'s value while `key` has none
    pub fn snapshot(&self, key: &K, placeholder: Option<&K>) -> QuerySnapshot<V> {
        let entry = self.entries.get(key);
        let own_data = entry.and_then(|e| e.data.clone());
        let error = entry.and_then(|e| e.error.clone());
        let is_fetching = entry.map(|e| e.in_flight.is_some()).unwrap_or(false);

        let (data, is_placeholder) = match own_data {
            Some(data) => (Some(data), false),
            None => {
                let fallback = placeholder
                    .filter(|p| *p != key)
                    .and_then(|p| self.entries.get(p))
                    .and_then(|e| e.data.clone());
                let is_placeholder = fallback.is_some();
                (fallback, is_placeholder)
            }
        };

        QuerySnapshot {
            is_loading: data.is_none() && error.is_none(),
            data,
            is_fetching,
            is_placeholder,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Cache = QueryCache<&'static str, Vec<u32>>;

    fn cache() -> Cache {
        QueryCache::new(QueryOptions::default())
    }

    fn ok(values: &[u32]) -> Result<Vec<u32>, String> {
        Ok(values.to_vec())
    }

    #[test]
    fn test_single_request_in_flight_per_key() {
        let mut cache = cache();
        let ticket = cache.begin_fetch(&"a");
        assert!(ticket.is_some());
        assert!(cache.begin_fetch(&"a").is_none());
        assert!(!cache.needs_fetch(&"a", 0.0));
        // Другой ключ независим
        assert!(cache.begin_fetch(&"b").is_some());
    }

    #[test]
    fn test_resolve_stores_value_and_frees_slot() {
        let mut cache = cache();
        let ticket = cache.begin_fetch(&"a").unwrap();
        assert!(cache.resolve(ticket, ok(&[1, 2]), 10.0));
        let snapshot = cache.snapshot(&"a", None);
        assert_eq!(snapshot.data.as_deref(), Some(&vec![1, 2]));
        assert!(!snapshot.is_loading);
        assert!(!snapshot.is_fetching);
        assert!(cache.begin_fetch(&"a").is_some());
    }

    #[test]
    fn test_initial_snapshot_is_loading() {
        let cache = cache();
        let snapshot = cache.snapshot(&"a", None);
        assert!(snapshot.is_loading);
        assert!(snapshot.data.is_none());
    }

    #[test]
    fn test_placeholder_shown_while_new_key_loads() {
        let mut cache = cache();
        let first = cache.begin_fetch(&"all").unwrap();
        cache.resolve(first, ok(&[1, 2, 3]), 0.0);

        let _pending = cache.begin_fetch(&"saas").unwrap();
        let snapshot = cache.snapshot(&"saas", Some(&"all"));
        assert_eq!(snapshot.data.as_deref(), Some(&vec![1, 2, 3]));
        assert!(snapshot.is_placeholder);
        assert!(snapshot.is_fetching);
        assert!(!snapshot.is_loading);
    }

    #[test]
    fn test_placeholder_replaced_once_new_key_resolves() {
        let mut cache = cache();
        let first = cache.begin_fetch(&"all").unwrap();
        cache.resolve(first, ok(&[1, 2, 3]), 0.0);
        let second = cache.begin_fetch(&"saas").unwrap();
        cache.resolve(second, ok(&[2]), 5.0);

        let snapshot = cache.snapshot(&"saas", Some(&"all"));
        assert_eq!(snapshot.data.as_deref(), Some(&vec![2]));
        assert!(!snapshot.is_placeholder);
    }

    #[test]
    fn test_failure_keeps_previous_value() {
        let mut cache = cache();
        let first = cache.begin_fetch(&"a").unwrap();
        cache.resolve(first, ok(&[7]), 0.0);
        let second = cache.begin_fetch(&"a").unwrap();
        cache.resolve(second, Err::<Vec<u32>, _>("HTTP error: 500"), 1.0);

        let snapshot = cache.snapshot(&"a", None);
        assert_eq!(snapshot.data.as_deref(), Some(&vec![7]));
        assert_eq!(snapshot.error.as_deref(), Some("HTTP error: 500"));
    }

    #[test]
    fn test_failure_on_new_key_keeps_placeholder() {
        let mut cache = cache();
        let first = cache.begin_fetch(&"all").unwrap();
        cache.resolve(first, ok(&[1]), 0.0);
        let second = cache.begin_fetch(&"saas").unwrap();
        cache.resolve(second, Err::<Vec<u32>, _>("Request failed"), 1.0);

        let snapshot = cache.snapshot(&"saas", Some(&"all"));
        assert_eq!(snapshot.data.as_deref(), Some(&vec![1]));
        assert!(snapshot.is_placeholder);
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_some());
    }

    #[test]
    fn test_late_response_only_updates_its_own_key() {
        let mut cache = cache();
        let electronics = cache.begin_fetch(&"electronics").unwrap();
        let all = cache.begin_fetch(&"all").unwrap();
        cache.resolve(all, ok(&[1, 2, 3]), 1.0);
        // Ответ по старому фильтру приходит позже
        cache.resolve(electronics, ok(&[9]), 2.0);

        let current = cache.snapshot(&"all", Some(&"electronics"));
        assert_eq!(current.data.as_deref(), Some(&vec![1, 2, 3]));
        assert!(!current.is_placeholder);
        assert_eq!(
            cache.snapshot(&"electronics", None).data.as_deref(),
            Some(&vec![9])
        );
    }

    #[test]
    fn test_foreign_ticket_is_discarded() {
        let mut cache = cache();
        let real = cache.begin_fetch(&"a").unwrap();
        let forged = FetchTicket {
            key: "a",
            request_id: RequestId(real.request_id.0 + 100),
        };
        assert!(!cache.resolve(forged, ok(&[5]), 0.0));
        assert!(cache.is_fetching(&"a"));
        assert!(!cache.has_data(&"a"));

        let unknown = FetchTicket {
            key: "b",
            request_id: RequestId(1),
        };
        assert!(!cache.resolve(unknown, ok(&[5]), 0.0));
    }

    #[test]
    fn test_stale_time_controls_refetch() {
        let mut cache = QueryCache::new(QueryOptions {
            stale_time_ms: 1_000.0,
            retry: 0,
        });
        let ticket = cache.begin_fetch(&"a").unwrap();
        cache.resolve(ticket, ok(&[1]), 100.0);
        assert!(!cache.needs_fetch(&"a", 500.0));
        assert!(cache.needs_fetch(&"a", 1_100.0));
    }

    #[test]
    fn test_zero_stale_time_always_revalidates() {
        let mut cache = cache();
        let ticket = cache.begin_fetch(&"a").unwrap();
        cache.resolve(ticket, ok(&[1]), 100.0);
        assert!(cache.needs_fetch(&"a", 100.0));
    }

    #[test]
    fn test_invalidate_all_forces_refetch() {
        let mut cache = QueryCache::new(QueryOptions {
            stale_time_ms: f64::INFINITY,
            retry: 0,
        });
        let ticket = cache.begin_fetch(&"a").unwrap();
        cache.resolve(ticket, ok(&[1]), 0.0);
        assert!(!cache.needs_fetch(&"a", 1.0));
        cache.invalidate_all();
        assert!(cache.needs_fetch(&"a", 1.0));
        // Данные остаются доступны до повторной загрузки
        assert!(cache.has_data(&"a"));
    }

    #[test]
    fn test_next_placeholder_waits_for_own_value() {
        assert_eq!(next_placeholder(None, &"a", false), None);
        assert_eq!(next_placeholder(None, &"a", true), Some("a"));
        assert_eq!(next_placeholder(Some(&"a"), &"b", false), Some("a"));
        assert_eq!(next_placeholder(Some(&"a"), &"b", true), Some("b"));
    }

    #[test]
    fn test_placeholder_across_key_switches() {
        let mut cache = cache();
        let mut placeholder: Option<&'static str> = None;

        let a = cache.begin_fetch(&"a").unwrap();
        cache.resolve(a, ok(&[1]), 1.0);
        placeholder = next_placeholder(placeholder.as_ref(), &"a", cache.has_data(&"a"));
        assert_eq!(placeholder, Some("a"));

        // B и C запрошены, ни один ещё не ответил
        let b = cache.begin_fetch(&"b").unwrap();
        placeholder = next_placeholder(placeholder.as_ref(), &"b", cache.has_data(&"b"));
        let shown = cache.snapshot(&"b", placeholder.as_ref());
        assert_eq!(shown.data.as_deref(), Some(&vec![1]));
        assert!(shown.is_placeholder);

        let c = cache.begin_fetch(&"c").unwrap();
        placeholder = next_placeholder(placeholder.as_ref(), &"c", cache.has_data(&"c"));
        assert_eq!(placeholder, Some("a"));

        // B отвечает, когда текущий ключ уже C: на экране по-прежнему A
        cache.resolve(b, ok(&[2]), 2.0);
        placeholder = next_placeholder(placeholder.as_ref(), &"c", cache.has_data(&"c"));
        let shown = cache.snapshot(&"c", placeholder.as_ref());
        assert_eq!(placeholder, Some("a"));
        assert_eq!(shown.data.as_deref(), Some(&vec![1]));
        assert!(shown.is_placeholder);
        assert!(!shown.is_loading);

        // C отвечает и становится заглушкой для следующих ключей
        cache.resolve(c, ok(&[3]), 3.0);
        placeholder = next_placeholder(placeholder.as_ref(), &"c", cache.has_data(&"c"));
        assert_eq!(placeholder, Some("c"));
        let shown = cache.snapshot(&"c", placeholder.as_ref());
        assert_eq!(shown.data.as_deref(), Some(&vec![3]));
        assert!(!shown.is_placeholder);

        // Возврат на B: его собственные данные уже в кэше
        placeholder = next_placeholder(placeholder.as_ref(), &"b", cache.has_data(&"b"));
        assert_eq!(placeholder, Some("b"));
        assert_eq!(
            cache.snapshot(&"b", placeholder.as_ref()).data.as_deref(),
            Some(&vec![2])
        );
    }

    #[test]
    fn test_loading_flag_stable_while_switching_keys() {
        // Снимки меняются, флаг загрузки нет
        let mut cache = cache();
        let a = cache.begin_fetch(&"a").unwrap();
        cache.resolve(a, ok(&[1]), 1.0);
        let shown_a = cache.snapshot(&"a", Some(&"a"));

        let b = cache.begin_fetch(&"b").unwrap();
        let pending_b = cache.snapshot(&"b", Some(&"a"));
        cache.resolve(b, ok(&[2]), 2.0);
        let shown_b = cache.snapshot(&"b", Some(&"b"));

        assert!(shown_a != pending_b);
        assert!(pending_b != shown_b);
        for snapshot in [&shown_a, &pending_b, &shown_b] {
            assert!(!snapshot.is_loading);
        }
    }

    #[test]
    fn test_failed_new_key_keeps_previous_placeholder() {
        let mut cache = cache();
        let a = cache.begin_fetch(&"a").unwrap();
        cache.resolve(a, ok(&[1]), 1.0);
        let mut placeholder = next_placeholder(None, &"a", cache.has_data(&"a"));

        let b = cache.begin_fetch(&"b").unwrap();
        cache.resolve(b, Err::<Vec<u32>, _>("HTTP error: 500"), 2.0);
        placeholder = next_placeholder(placeholder.as_ref(), &"b", cache.has_data(&"b"));
        assert_eq!(placeholder, Some("a"));
        let shown = cache.snapshot(&"b", placeholder.as_ref());
        assert_eq!(shown.data.as_deref(), Some(&vec![1]));
        assert!(shown.error.is_some());
    }

    #[test]
    fn test_retry_delay_backoff() {
        assert_eq!(retry_delay_ms(0), 1_000);
        assert_eq!(retry_delay_ms(1), 2_000);
        assert_eq!(retry_delay_ms(2), 4_000);
        assert_eq!(retry_delay_ms(5), 30_000);
        assert_eq!(retry_delay_ms(40), 30_000);
    }
}
