//! Item lifecycle use-case service.
//!
//! # Responsibility
//! - Validate item drafts field by field before any write.
//! - Confirm the owning project exists before creating items.
//! - Delegate content checks to the validator and persistence to the
//!   repository.
//!
//! # Invariants
//! - Validation order: title, type, position, points, explanation, owner
//!   existence, content. The first failure is reported.
//! - Content that failed validation is never persisted.
//! - Update re-validates content against the submitted type even when the
//!   type did not change.
//! - The service holds no mutable state and can be shared across callers.

use crate::error::ItemError;
use crate::model::item::{
    Item, ItemDraft, ItemFields, ItemId, ItemType, ITEM_EXPLANATION_MAX_CHARS,
    ITEM_POINTS_MAX, ITEM_TITLE_MAX_CHARS,
};
use crate::model::project::ProjectId;
use crate::repo::item_repo::ItemRepository;
use crate::repo::project_repo::ProjectLookup;
use crate::validation::validate_content;
use log::{info, warn};

/// Item lifecycle service facade.
pub struct ItemService<P: ProjectLookup, R: ItemRepository> {
    projects: P,
    items: R,
}

/// Draft fields that passed the cheap checks; content is still raw.
struct CheckedDraft {
    title: String,
    item_type: ItemType,
    position: i64,
    points: Option<u32>,
    explanation: Option<String>,
}

impl<P: ProjectLookup, R: ItemRepository> ItemService<P, R> {
    /// Creates service from project lookup and item repository.
    pub fn new(projects: P, items: R) -> Self {
        Self { projects, items }
    }

    /// Creates one item at a caller-assigned position.
    pub fn create_item(
        &self,
        project_uuid: ProjectId,
        draft: &ItemDraft,
    ) -> Result<Item, ItemError> {
        let result = self.create_item_inner(project_uuid, draft);
        match &result {
            Ok(item) => info!(
                "event=item_create module=item status=ok item_id={} project_id={} type={} position={}",
                item.uuid,
                project_uuid,
                item.kind(),
                item.position
            ),
            Err(err) => log_rejection("item_create", err),
        }
        result
    }

    /// Replaces every writable attribute of an existing item.
    pub fn update_item(&self, item_uuid: ItemId, draft: &ItemDraft) -> Result<Item, ItemError> {
        let result = self.update_item_inner(item_uuid, draft);
        match &result {
            Ok(item) => info!(
                "event=item_update module=item status=ok item_id={} project_id={} type={} position={}",
                item.uuid,
                item.project_uuid,
                item.kind(),
                item.position
            ),
            Err(err) => log_rejection("item_update", err),
        }
        result
    }

    /// Loads one item by id.
    pub fn get_item(&self, item_uuid: ItemId) -> Result<Item, ItemError> {
        self.items
            .get_item(item_uuid)?
            .ok_or(ItemError::ItemNotFound(item_uuid))
    }

    /// Lists a project's items in ascending position order.
    pub fn list_items(&self, project_uuid: ProjectId) -> Result<Vec<Item>, ItemError> {
        self.ensure_project_exists(project_uuid)?;
        Ok(self.items.list_items(project_uuid)?)
    }

    /// Deletes one item. Deleting an absent item reports `ItemNotFound`
    /// and changes nothing.
    pub fn delete_item(&self, item_uuid: ItemId) -> Result<(), ItemError> {
        let result = self.items.delete_item(item_uuid).map_err(ItemError::from);
        match &result {
            Ok(()) => info!("event=item_delete module=item status=ok item_id={item_uuid}"),
            Err(err) => log_rejection("item_delete", err),
        }
        result
    }

    /// Returns the position right after the project's last item.
    pub fn next_position(&self, project_uuid: ProjectId) -> Result<i64, ItemError> {
        self.ensure_project_exists(project_uuid)?;
        Ok(self.items.next_position(project_uuid)?)
    }

    fn create_item_inner(
        &self,
        project_uuid: ProjectId,
        draft: &ItemDraft,
    ) -> Result<Item, ItemError> {
        let checked = check_draft(draft)?;
        self.ensure_project_exists(project_uuid)?;
        let fields = finish_fields(checked, draft)?;
        Ok(self.items.create_item(project_uuid, &fields)?)
    }

    fn update_item_inner(&self, item_uuid: ItemId, draft: &ItemDraft) -> Result<Item, ItemError> {
        let checked = check_draft(draft)?;
        if self.items.get_item(item_uuid)?.is_none() {
            return Err(ItemError::ItemNotFound(item_uuid));
        }
        let fields = finish_fields(checked, draft)?;
        Ok(self.items.update_item(item_uuid, &fields)?)
    }

    fn ensure_project_exists(&self, project_uuid: ProjectId) -> Result<(), ItemError> {
        if !self.projects.project_exists(project_uuid)? {
            return Err(ItemError::ProjectNotFound(project_uuid));
        }
        Ok(())
    }
}

fn check_draft(draft: &ItemDraft) -> Result<CheckedDraft, ItemError> {
    let title = normalize_title(&draft.title)?;
    let item_type = ItemType::parse(&draft.type_tag)
        .ok_or_else(|| ItemError::TypeInvalid(draft.type_tag.clone()))?;
    if draft.position < 0 {
        return Err(ItemError::PositionInvalid(draft.position));
    }
    let points = draft.points.map(check_points).transpose()?;
    let explanation = draft
        .explanation
        .as_deref()
        .map(check_explanation)
        .transpose()?;

    Ok(CheckedDraft {
        title,
        item_type,
        position: draft.position,
        points,
        explanation,
    })
}

fn finish_fields(checked: CheckedDraft, draft: &ItemDraft) -> Result<ItemFields, ItemError> {
    let content =
        validate_content(checked.item_type, &draft.content).map_err(ItemError::ContentInvalid)?;
    Ok(ItemFields {
        title: checked.title,
        content,
        position: checked.position,
        required: draft.required,
        points: checked.points,
        explanation: checked.explanation,
    })
}

fn normalize_title(value: &str) -> Result<String, ItemError> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();
    if length == 0 {
        return Err(ItemError::TitleTooShort);
    }
    if length > ITEM_TITLE_MAX_CHARS {
        return Err(ItemError::TitleTooLong {
            max: ITEM_TITLE_MAX_CHARS,
            actual: length,
        });
    }
    Ok(trimmed.to_string())
}

fn check_points(value: i64) -> Result<u32, ItemError> {
    if !(0..=ITEM_POINTS_MAX).contains(&value) {
        return Err(ItemError::PointsOutOfRange {
            max: ITEM_POINTS_MAX,
            actual: value,
        });
    }
    u32::try_from(value).map_err(|_| ItemError::PointsOutOfRange {
        max: ITEM_POINTS_MAX,
        actual: value,
    })
}

fn check_explanation(value: &str) -> Result<String, ItemError> {
    let length = value.chars().count();
    if length > ITEM_EXPLANATION_MAX_CHARS {
        return Err(ItemError::ExplanationTooLong {
            max: ITEM_EXPLANATION_MAX_CHARS,
            actual: length,
        });
    }
    Ok(value.to_string())
}

fn log_rejection(event: &str, err: &ItemError) {
    warn!(
        "event={} module=item status=error retryable={} field={} error={}",
        event,
        err.is_retryable(),
        err.field().as_deref().unwrap_or("-"),
        err
    );
}
