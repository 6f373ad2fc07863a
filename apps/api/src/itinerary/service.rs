//! Itinerary service: validation, storage and report rendering behind one facade.
//!
//! Validation errors return before the repository is touched. Rendering reads the
//! stored aggregate and never mutates it, so a failed render can simply be retried.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::itinerary::repository::{mutation, ItineraryRepository, RepositoryError};
use crate::itinerary::validation::{validate_create, validate_update};
use crate::models::itinerary::{CreateItineraryRequest, Itinerary, UpdateItineraryRequest};
use crate::report::ReportAssembler;

#[derive(Clone)]
pub struct ItineraryService {
    repo: Arc<dyn ItineraryRepository>,
    assembler: ReportAssembler,
}

impl ItineraryService {
    pub fn new(repo: Arc<dyn ItineraryRepository>, assembler: ReportAssembler) -> Self {
        Self { repo, assembler }
    }

    pub async fn create(&self, req: CreateItineraryRequest) -> Result<Itinerary, AppError> {
        if let Err(e) = validate_create(&req) {
            warn!("Rejected itinerary for user {}: {e}", req.user_id);
            return Err(e.into());
        }

        let itinerary = req.into_itinerary(Uuid::new_v4(), Utc::now());
        self.repo.create(itinerary.clone()).await?;

        info!(
            "Created itinerary {} for user {} ({} days)",
            itinerary.id,
            itinerary.user_id,
            itinerary.days.len()
        );
        Ok(itinerary)
    }

    pub async fn get(&self, id: Uuid) -> Result<Itinerary, AppError> {
        Ok(self.repo.get(id).await?)
    }

    /// Lists every itinerary, or only those owned by `user_id` when given.
    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Itinerary>, AppError> {
        let itineraries = match user_id {
            Some(user_id) => self.repo.list_by_user(user_id).await?,
            None => self.repo.list().await?,
        };
        Ok(itineraries)
    }

    /// Merges `req` into the stored itinerary and re-validates it, all while the
    /// record is locked. A rejected update writes nothing.
    pub async fn update(
        &self,
        id: Uuid,
        req: UpdateItineraryRequest,
    ) -> Result<Itinerary, AppError> {
        let merge = mutation(move |itinerary| {
            let touched = req.clone();
            req.apply_to(itinerary);
            validate_update(itinerary, &touched)?;
            itinerary.updated_at = Utc::now();
            Ok(())
        });

        match self.repo.update_with(id, merge).await {
            Ok(itinerary) => {
                info!("Updated itinerary {id}");
                Ok(itinerary)
            }
            Err(RepositoryError::Rejected(e)) => {
                warn!("Rejected update to itinerary {id}: {e}");
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(id).await?;
        info!("Deleted itinerary {id}");
        Ok(())
    }

    /// Renders the stored itinerary to a PDF and returns the artifact path.
    ///
    /// Assembly and file I/O are blocking, so they run on the blocking pool.
    pub async fn render_report(&self, id: Uuid) -> Result<PathBuf, AppError> {
        let itinerary = self.repo.get(id).await?;
        let assembler = self.assembler.clone();

        let path = tokio::task::spawn_blocking(move || assembler.render_pdf(&itinerary))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

        Ok(path)
    }
}
