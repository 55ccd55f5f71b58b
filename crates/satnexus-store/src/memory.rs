//! In-memory storage implementations for development and testing.
//!
//! Records are kept with an insertion sequence number so that records sharing
//! a creation timestamp still list newest-insert first. For production
//! workloads, use the PostgreSQL backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use satnexus_core::error::{Result, SatnexusError};
use satnexus_core::models::{
    AnalysisFilter, AnalysisId, ChangeAnalysis, Image, ImageId, User, UserId,
};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::ports::{AnalysisStore, ImageStore, UserStore};

/// A record plus the order in which it was inserted
#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    record: T,
}

/// Keyed collection with insertion ordering
#[derive(Debug)]
struct Collection<K, T> {
    records: HashMap<K, Stored<T>>,
    next_seq: u64,
}

impl<K, T> Default for Collection<K, T> {
    fn default() -> Self {
        Self { records: HashMap::new(), next_seq: 0 }
    }
}

impl<K: Eq + Hash + Copy + std::fmt::Display, T: Clone> Collection<K, T> {
    fn insert(&mut self, key: K, record: T) -> Result<()> {
        if self.records.contains_key(&key) {
            return Err(SatnexusError::storage(format!("Duplicate record id: {}", key)));
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.records.insert(key, Stored { seq, record });
        Ok(())
    }

    fn get(&self, key: &K) -> Option<T> {
        self.records.get(key).map(|s| s.record.clone())
    }

    /// Matching records ordered newest first
    fn sorted<F>(&self, created_at: F, predicate: impl Fn(&T) -> bool) -> Vec<T>
    where
        F: Fn(&T) -> DateTime<Utc>,
    {
        let mut matching: Vec<&Stored<T>> =
            self.records.values().filter(|s| predicate(&s.record)).collect();
        matching.sort_by(|a, b| {
            created_at(&b.record).cmp(&created_at(&a.record)).then(b.seq.cmp(&a.seq))
        });
        matching.into_iter().map(|s| s.record.clone()).collect()
    }
}

fn paginate<T>(items: Vec<T>, skip: u64, limit: u64) -> Vec<T> {
    items
        .into_iter()
        .skip(usize::try_from(skip).unwrap_or(usize::MAX))
        .take(usize::try_from(limit).unwrap_or(usize::MAX))
        .collect()
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| SatnexusError::storage("In-memory store lock poisoned"))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| SatnexusError::storage("In-memory store lock poisoned"))
}

/// In-memory implementation of ImageStore
#[derive(Debug, Clone, Default)]
pub struct MemoryImageStore {
    images: Arc<RwLock<Collection<ImageId, Image>>>,
}

impl MemoryImageStore {
    /// Create a new in-memory image store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn insert_image(&self, image: &Image) -> Result<()> {
        write(&self.images)?.insert(image.id, image.clone())
    }

    async fn get_image(&self, id: ImageId) -> Result<Option<Image>> {
        Ok(read(&self.images)?.get(&id))
    }

    async fn list_images(&self, skip: u64, limit: u64) -> Result<Vec<Image>> {
        let images = read(&self.images)?.sorted(|i| i.created_at, |_| true);
        Ok(paginate(images, skip, limit))
    }

    async fn count_images(&self) -> Result<u64> {
        Ok(read(&self.images)?.records.len() as u64)
    }
}

/// In-memory implementation of AnalysisStore
#[derive(Debug, Clone, Default)]
pub struct MemoryAnalysisStore {
    analyses: Arc<RwLock<Collection<AnalysisId, ChangeAnalysis>>>,
}

impl MemoryAnalysisStore {
    /// Create a new in-memory analysis store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn insert_analysis(&self, analysis: &ChangeAnalysis) -> Result<()> {
        write(&self.analyses)?.insert(analysis.id, analysis.clone())
    }

    async fn get_analysis(&self, id: AnalysisId) -> Result<Option<ChangeAnalysis>> {
        Ok(read(&self.analyses)?.get(&id))
    }

    async fn find_analyses(
        &self,
        filter: &AnalysisFilter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<ChangeAnalysis>> {
        let analyses = read(&self.analyses)?.sorted(|a| a.created_at, |a| filter.matches(a));
        Ok(paginate(analyses, skip, limit))
    }

    async fn count_analyses(&self, filter: &AnalysisFilter) -> Result<u64> {
        let analyses = read(&self.analyses)?;
        Ok(analyses.records.values().filter(|s| filter.matches(&s.record)).count() as u64)
    }
}

/// In-memory implementation of UserStore
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl MemoryUserStore {
    /// Create a new in-memory user store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = write(&self.users)?;

        if users.contains_key(&user.id) {
            return Err(SatnexusError::storage(format!("Duplicate record id: {}", user.id)));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(SatnexusError::conflict("Email is already registered"));
        }
        if users.values().any(|u| u.username.to_lowercase() == user.username.to_lowercase()) {
            return Err(SatnexusError::conflict("Username is already taken"));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>> {
        Ok(read(&self.users)?.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(read(&self.users)?.values().find(|u| u.email == email).cloned())
    }
}
