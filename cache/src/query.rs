//! Keyed bookkeeping for asynchronous backend queries.
//!
//! Each call to [`QueryCache::begin`] hands out a [`Ticket`] carrying a fresh
//! generation number. A result is only stored when it arrives with the ticket
//! of the newest request for its key, so a slow answer to an older request
//! can never overwrite a newer one.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<V> {
    Loading,
    Ready(V),
    Failed(String),
}

/// Handle for one in-flight request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    pub key: K,
    generation: u64,
}

impl<K> Ticket<K> {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug)]
struct Entry<V> {
    state: QueryState<V>,
    in_flight: Option<u64>,
    stale: bool,
}

#[derive(Debug)]
pub struct QueryCache<K, V> {
    entries: HashMap<K, Entry<V>>,
    next_generation: u64,
}

impl<K, V> Default for QueryCache<K, V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next_generation: 0,
        }
    }
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new request for `key`, superseding any request still in
    /// flight for it. Data already cached stays visible until the answer
    /// arrives.
    pub fn begin(&mut self, key: K) -> Ticket<K> {
        self.next_generation += 1;
        let generation = self.next_generation;
        let entry = self.entries.entry(key.clone()).or_insert(Entry {
            state: QueryState::Loading,
            in_flight: None,
            stale: false,
        });
        entry.in_flight = Some(generation);
        entry.stale = false;
        Ticket { key, generation }
    }

    /// Store the outcome of a request. Returns `false` when the ticket was
    /// superseded and the result was dropped.
    pub fn complete(&mut self, ticket: &Ticket<K>, result: Result<V, String>) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.key) else {
            return false;
        };
        if entry.in_flight != Some(ticket.generation) {
            return false;
        }
        entry.in_flight = None;
        entry.state = match result {
            Ok(value) => QueryState::Ready(value),
            Err(e) => QueryState::Failed(e),
        };
        true
    }

    pub fn get(&self, key: &K) -> Option<&QueryState<V>> {
        self.entries.get(key).map(|e| &e.state)
    }

    pub fn data(&self, key: &K) -> Option<&V> {
        match self.get(key) {
            Some(QueryState::Ready(value)) => Some(value),
            _ => None,
        }
    }

    pub fn is_fetching(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .map_or(false, |e| e.in_flight.is_some())
    }

    /// The ticket a result for `key` must carry to be accepted.
    pub fn latest_ticket(&self, key: &K) -> Option<Ticket<K>> {
        self.entries.get(key).and_then(|e| {
            e.in_flight.map(|generation| Ticket {
                key: key.clone(),
                generation,
            })
        })
    }

    /// Whether `key` has never been requested, was invalidated since, or
    /// last failed. Never true while a request is in flight.
    pub fn needs_fetch(&self, key: &K) -> bool {
        match self.entries.get(key) {
            None => true,
            Some(e) => {
                e.in_flight.is_none() && (e.stale || matches!(e.state, QueryState::Failed(_)))
            }
        }
    }

    /// Mark matching entries stale. Their data stays readable until refetched.
    pub fn invalidate<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&K) -> bool,
    {
        for (key, entry) in self.entries.iter_mut() {
            if predicate(key) {
                entry.stale = true;
            }
        }
    }

    pub fn invalidate_all(&mut self) {
        self.invalidate(|_| true);
    }

    pub fn remove(&mut self, key: &K) {
        self.entries.remove(key);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_request_supersedes_older() {
        let mut cache: QueryCache<String, u32> = QueryCache::new();
        let first = cache.begin("a".into());
        let second = cache.begin("a".into());

        assert!(!cache.complete(&first, Ok(1)));
        assert_eq!(cache.get(&"a".to_string()), Some(&QueryState::Loading));
        assert!(cache.complete(&second, Ok(2)));
        assert_eq!(cache.data(&"a".to_string()), Some(&2));

        // A late answer to the first request is still ignored.
        assert!(!cache.complete(&first, Ok(1)));
        assert_eq!(cache.data(&"a".to_string()), Some(&2));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut cache: QueryCache<(String, Vec<String>), u32> = QueryCache::new();
        let plain = cache.begin(("d1".into(), vec![]));
        let tagged = cache.begin(("d1".into(), vec!["dog".into()]));

        assert!(cache.complete(&tagged, Ok(3)));
        assert!(cache.complete(&plain, Ok(10)));
        assert_eq!(cache.data(&("d1".into(), vec![])), Some(&10));
        assert_eq!(cache.data(&("d1".into(), vec!["dog".into()])), Some(&3));
    }

    #[test]
    fn test_failure_is_recorded() {
        let mut cache: QueryCache<&'static str, u32> = QueryCache::new();
        let t = cache.begin("k");
        assert!(cache.is_fetching(&"k"));
        assert!(cache.complete(&t, Err("offline".into())));
        assert_eq!(cache.get(&"k"), Some(&QueryState::Failed("offline".into())));
        assert!(!cache.is_fetching(&"k"));
        assert_eq!(cache.data(&"k"), None);
        assert!(cache.needs_fetch(&"k"));
    }

    #[test]
    fn test_invalidate_keeps_data_until_refetch() {
        let mut cache: QueryCache<&'static str, u32> = QueryCache::new();
        assert!(cache.needs_fetch(&"k"));
        let t = cache.begin("k");
        assert!(!cache.needs_fetch(&"k"));
        cache.complete(&t, Ok(7));
        assert!(!cache.needs_fetch(&"k"));

        cache.invalidate_all();
        assert!(cache.needs_fetch(&"k"));
        assert_eq!(cache.data(&"k"), Some(&7));

        let t = cache.begin("k");
        assert_eq!(cache.latest_ticket(&"k"), Some(t.clone()));
        cache.complete(&t, Ok(8));
        assert_eq!(cache.data(&"k"), Some(&8));
        assert_eq!(cache.latest_ticket(&"k"), None);
    }

    #[test]
    fn test_invalidate_by_predicate() {
        let mut cache: QueryCache<&'static str, u32> = QueryCache::new();
        for key in ["a", "b"] {
            let t = cache.begin(key);
            cache.complete(&t, Ok(1));
        }
        cache.invalidate(|k| *k == "a");
        assert!(cache.needs_fetch(&"a"));
        assert!(!cache.needs_fetch(&"b"));
        cache.remove(&"a");
        assert_eq!(cache.len(), 1);
    }
}
