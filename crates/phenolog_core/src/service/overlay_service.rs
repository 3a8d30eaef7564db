//! Overlay authoring service.
//!
//! # Responsibility
//! - Own the current overlay snapshot for the editing workflow.
//! - Apply one edit, persist the new document, then publish it.
//!
//! # Invariants
//! - Snapshots are copy-on-write: published `Arc`s are never mutated.
//! - A failed save leaves the in-memory snapshot unchanged.
//! - Single writer; concurrent editors are not coordinated.

use crate::engine::merge::merge_schema;
use crate::model::overlay::{
    CustomOverlayStore, GroupLocation, OverlayEditError, TraitDraft, TraitLocation,
};
use crate::model::schema::{TraitDefinition, TraitSchema};
use crate::now_epoch_ms;
use crate::repo::overlay_repo::{OverlayRepository, RepoError};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Errors from overlay service operations.
#[derive(Debug)]
pub enum OverlayServiceError {
    /// Authoring rule rejected the edit; nothing was persisted.
    Edit(OverlayEditError),
    /// Persistence failed; the previous snapshot stays active.
    Repo(RepoError),
}

impl Display for OverlayServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Edit(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for OverlayServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Edit(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<OverlayEditError> for OverlayServiceError {
    fn from(value: OverlayEditError) -> Self {
        Self::Edit(value)
    }
}

impl From<RepoError> for OverlayServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Overlay service facade over a repository implementation.
pub struct OverlayService<R: OverlayRepository> {
    repo: R,
    baseline: TraitSchema,
    current: Arc<CustomOverlayStore>,
}

impl<R: OverlayRepository> OverlayService<R> {
    /// Loads the stored overlay once; an absent document starts empty.
    pub fn load(repo: R, baseline: TraitSchema) -> Result<Self, OverlayServiceError> {
        let stored = repo.load_overlay().map_err(|err| {
            error!("event=overlay_load module=service status=error error={err}");
            err
        })?;
        let current = stored.unwrap_or_default();
        info!(
            "event=overlay_load module=service status=ok custom_traits={} custom_areas={}",
            current.definitions().count(),
            current.custom_areas.len()
        );
        Ok(Self {
            repo,
            baseline,
            current: Arc::new(current),
        })
    }

    /// Current published snapshot.
    pub fn snapshot(&self) -> Arc<CustomOverlayStore> {
        Arc::clone(&self.current)
    }

    pub fn baseline(&self) -> &TraitSchema {
        &self.baseline
    }

    /// Baseline merged with the current snapshot.
    pub fn merged_schema(&self) -> TraitSchema {
        merge_schema(&self.baseline, &self.current)
    }

    /// Creates a custom trait with a generated unique field.
    pub fn add_custom_trait(
        &mut self,
        location: &TraitLocation,
        draft: &TraitDraft,
    ) -> Result<TraitDefinition, OverlayServiceError> {
        let (next, definition) =
            self.current
                .with_trait(&self.baseline, location, draft, now_epoch_ms())?;
        self.commit(next, "trait_add")?;
        Ok(definition)
    }

    /// Edits one custom trait in place of its previous definition.
    pub fn update_custom_trait(
        &mut self,
        field: &str,
        draft: &TraitDraft,
    ) -> Result<TraitDefinition, OverlayServiceError> {
        let (next, definition) = self
            .current
            .with_trait_updated(field, draft, now_epoch_ms())?;
        self.commit(next, "trait_update")?;
        Ok(definition)
    }

    /// Deletes one custom trait. Recorded observations keep their field.
    pub fn delete_custom_trait(&mut self, field: &str) -> Result<(), OverlayServiceError> {
        let next = self.current.without_trait(field)?;
        self.commit(next, "trait_delete")
    }

    pub fn add_custom_group(
        &mut self,
        location: &GroupLocation,
        name: &str,
    ) -> Result<(), OverlayServiceError> {
        let next = self.current.with_group(&self.baseline, location, name)?;
        self.commit(next, "group_add")
    }

    pub fn delete_custom_group(
        &mut self,
        location: &GroupLocation,
        name: &str,
    ) -> Result<(), OverlayServiceError> {
        let next = self.current.without_group(location, name)?;
        self.commit(next, "group_delete")
    }

    pub fn add_custom_area(&mut self, name: &str) -> Result<(), OverlayServiceError> {
        let next = self.current.with_area(&self.baseline, name)?;
        self.commit(next, "area_add")
    }

    pub fn delete_custom_area(&mut self, name: &str) -> Result<(), OverlayServiceError> {
        let next = self.current.without_area(name)?;
        self.commit(next, "area_delete")
    }

    fn commit(
        &mut self,
        next: CustomOverlayStore,
        action: &'static str,
    ) -> Result<(), OverlayServiceError> {
        if let Err(err) = self.repo.save_overlay(&next) {
            error!(
                "event=overlay_commit module=service status=error action={action} error={err}"
            );
            return Err(err.into());
        }
        self.current = Arc::new(next);
        info!(
            "event=overlay_commit module=service status=ok action={action} custom_traits={}",
            self.current.definitions().count()
        );
        Ok(())
    }
}
