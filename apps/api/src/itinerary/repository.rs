//! Itinerary storage.
//!
//! `ItineraryRepository` is the persistence seam; `ItineraryService` carries an
//! `Arc<dyn ItineraryRepository>`. Updates are read-modify-write under one lock
//! acquisition: the mutation runs against a draft and is committed only when it
//! succeeds, so concurrent partial updates to the same itinerary never lose a write.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::itinerary::validation::ValidationError;
use crate::models::itinerary::Itinerary;

/// Merge-and-check step run by `update_with` while the record is locked.
pub type Mutation = Box<dyn FnOnce(&mut Itinerary) -> Result<(), ValidationError> + Send>;

pub fn mutation<F>(f: F) -> Mutation
where
    F: FnOnce(&mut Itinerary) -> Result<(), ValidationError> + Send + 'static,
{
    Box::new(f)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RepositoryError {
    #[error("itinerary {0} not found")]
    NotFound(Uuid),

    #[error("itinerary {0} already exists")]
    AlreadyExists(Uuid),

    /// The mutation refused the change; nothing was written.
    #[error(transparent)]
    Rejected(#[from] ValidationError),
}

#[async_trait]
pub trait ItineraryRepository: Send + Sync {
    async fn create(&self, itinerary: Itinerary) -> Result<(), RepositoryError>;

    async fn get(&self, id: Uuid) -> Result<Itinerary, RepositoryError>;

    async fn list(&self) -> Result<Vec<Itinerary>, RepositoryError>;

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Itinerary>, RepositoryError>;

    /// Applies `mutate` to the stored itinerary `id` atomically and returns the result.
    async fn update_with(&self, id: Uuid, mutate: Mutation) -> Result<Itinerary, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

#[derive(Default)]
pub struct InMemoryItineraryRepository {
    itineraries: RwLock<HashMap<Uuid, Itinerary>>,
}

impl InMemoryItineraryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Oldest first; ties broken by id so listings are stable.
fn sorted(mut itineraries: Vec<Itinerary>) -> Vec<Itinerary> {
    itineraries.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    itineraries
}

#[async_trait]
impl ItineraryRepository for InMemoryItineraryRepository {
    async fn create(&self, itinerary: Itinerary) -> Result<(), RepositoryError> {
        let mut map = self.itineraries.write().await;
        if map.contains_key(&itinerary.id) {
            return Err(RepositoryError::AlreadyExists(itinerary.id));
        }
        map.insert(itinerary.id, itinerary);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Result<Itinerary, RepositoryError> {
        self.itineraries
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Itinerary>, RepositoryError> {
        let map = self.itineraries.read().await;
        Ok(sorted(map.values().cloned().collect()))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Itinerary>, RepositoryError> {
        let map = self.itineraries.read().await;
        Ok(sorted(
            map.values()
                .filter(|i| i.user_id == user_id)
                .cloned()
                .collect(),
        ))
    }

    async fn update_with(&self, id: Uuid, mutate: Mutation) -> Result<Itinerary, RepositoryError> {
        let mut map = self.itineraries.write().await;
        let stored = map.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;

        let mut draft = stored.clone();
        mutate(&mut draft)?;
        *stored = draft.clone();
        Ok(draft)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.itineraries
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound(id))
    }
}
