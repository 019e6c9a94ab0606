use super::cache::{next_placeholder, retry_delay_ms, QueryCache, QueryOptions, QuerySnapshot};
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use std::fmt::{Debug, Display};
use std::future::Future;
use std::hash::Hash;
use wasm_bindgen_futures::spawn_local;

/// Reactive handle to a [`QueryCache`], shared through context
///
/// One client per value type; keys of the same type share its slots.
pub struct QueryClient<K: 'static, V: 'static> {
    cache: RwSignal<QueryCache<K, V>>,
}

impl<K, V> Clone for QueryClient<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for QueryClient<K, V> {}

impl<K, V> QueryClient<K, V>
where
    K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub fn new(options: QueryOptions) -> Self {
        Self {
            cache: RwSignal::new(QueryCache::new(options)),
        }
    }

    /// Start a request for `key` unless one is running or the value is fresh
    ///
    /// `force` skips the freshness check, never the in-flight check. Failed
    /// attempts are retried with back-off before the error is stored.
    pub fn fetch<F, Fut, E>(&self, key: K, force: bool, fetcher: F)
    where
        F: Fn(K) -> Fut + 'static,
        Fut: Future<Output = Result<V, E>> + 'static,
        E: Display + 'static,
    {
        let now = js_sys::Date::now();
        let claimed = self
            .cache
            .try_update(|cache| {
                if !force && !cache.needs_fetch(&key, now) {
                    return None;
                }
                let retry = cache.options().retry;
                cache.begin_fetch(&key).map(|ticket| (ticket, retry))
            })
            .flatten();

        let Some((ticket, retry)) = claimed else {
            return;
        };

        let cache = self.cache;
        spawn_local(async move {
            let mut attempt = 0;
            let result = loop {
                match fetcher(ticket.key().clone()).await {
                    Ok(value) => break Ok(value),
                    Err(err) if attempt < retry => {
                        let delay = retry_delay_ms(attempt);
                        log::warn!(
                            "Query {:?} failed ({}), retry {}/{} in {} ms",
                            ticket.key(),
                            err,
                            attempt + 1,
                            retry,
                            delay
                        );
                        TimeoutFuture::new(delay).await;
                        attempt += 1;
                    }
                    Err(err) => {
                        log::error!("Query {:?} failed: {}", ticket.key(), err);
                        break Err(err);
                    }
                }
            };

            let key = ticket.key().clone();
            let now = js_sys::Date::now();
            let applied = cache
                .try_update(|cache| cache.resolve(ticket, result, now))
                .unwrap_or(false);
            if !applied {
                log::debug!("Discarded response for {:?}", key);
            }
        });
    }

    pub fn invalidate_all(&self) {
        self.cache.update(|cache| cache.invalidate_all());
    }

    fn has_data(&self, key: &K) -> bool {
        self.cache.with(|cache| cache.has_data(key))
    }

    fn snapshot(&self, key: &K, placeholder: Option<&K>) -> QuerySnapshot<V> {
        self.cache.with(|cache| cache.snapshot(key, placeholder))
    }
}

/// Result of [`use_query`]: a reactive snapshot plus a manual refetch
pub struct QueryResult<V: Send + Sync + 'static> {
    pub snapshot: Memo<QuerySnapshot<V>>,
    refetch: Callback<()>,
}

impl<V: Send + Sync + 'static> Clone for QueryResult<V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V: Send + Sync + 'static> Copy for QueryResult<V> {}

impl<V: Send + Sync + 'static> QueryResult<V> {
    /// Revalidate the current key, ignoring freshness
    pub fn refetch(&self) {
        self.refetch.run(());
    }
}

/// Subscribe to `key` in `client`
///
/// Every change of `key` activates its slot (fetching per the client's
/// options). While the new key has no value yet, the value of the last key
/// that had one is returned as a placeholder, so views never flash empty.
pub fn use_query<K, V, F, Fut, E>(
    client: QueryClient<K, V>,
    key: Signal<K>,
    fetcher: F,
) -> QueryResult<V>
where
    K: Clone + Eq + Hash + Debug + Send + Sync + 'static,
    V: Send + Sync + 'static,
    F: Fn(K) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = Result<V, E>> + 'static,
    E: Display + 'static,
{
    // Last key whose own value was shown
    let placeholder_key = RwSignal::new(None::<K>);

    let activate = fetcher.clone();
    Effect::new(move |_| {
        let key = key.get();
        client.fetch(key, false, activate.clone());
    });

    Effect::new(move |_| {
        let key = key.get();
        let current = placeholder_key.get_untracked();
        let next = next_placeholder(current.as_ref(), &key, client.has_data(&key));
        if next != current {
            placeholder_key.set(next);
        }
    });

    let snapshot = Memo::new(move |_| {
        let key = key.get();
        placeholder_key.with(|placeholder| client.snapshot(&key, placeholder.as_ref()))
    });

    let refetch = Callback::new(move |_: ()| {
        client.fetch(key.get_untracked(), true, fetcher.clone());
    });

    QueryResult { snapshot, refetch }
}
