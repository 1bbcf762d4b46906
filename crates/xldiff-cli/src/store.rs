//! Keyed store for comparison results awaiting download
//!
//! Each entry expires `ttl` after insertion, and the store never holds more
//! than `capacity` entries; inserting into a full store evicts the oldest.
//! A `ttl` too large to add to the clock never expires.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use axum::body::Bytes;
use uuid::Uuid;

struct Entry {
    data: Bytes,
    /// `None` when `ttl` overflows the clock
    expires_at: Option<Instant>,
}

pub struct ResultStore {
    entries: HashMap<Uuid, Entry>,
    /// Insertion order, oldest first
    order: VecDeque<Uuid>,
    ttl: Duration,
    capacity: usize,
}

impl ResultStore {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    pub fn insert(&mut self, data: Bytes) -> Uuid {
        self.insert_at(data, Instant::now())
    }

    pub fn get(&mut self, token: &Uuid) -> Option<Bytes> {
        self.get_at(token, Instant::now())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn insert_at(&mut self, data: Bytes, now: Instant) -> Uuid {
        self.purge_expired(now);
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        let token = Uuid::new_v4();
        self.entries.insert(
            token,
            Entry {
                data,
                expires_at: now.checked_add(self.ttl),
            },
        );
        self.order.push_back(token);
        token
    }

    fn get_at(&mut self, token: &Uuid, now: Instant) -> Option<Bytes> {
        self.purge_expired(now);
        self.entries.get(token).map(|e| e.data.clone())
    }

    /// Entries expire in insertion order, so only the front needs checking
    fn purge_expired(&mut self, now: Instant) {
        while let Some(token) = self.order.front() {
            let expired = self
                .entries
                .get(token)
                .map_or(true, |e| e.expires_at.is_some_and(|at| at <= now));
            if !expired {
                break;
            }
            if let Some(token) = self.order.pop_front() {
                self.entries.remove(&token);
            }
        }
    }
}
