//! Item repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `items` storage.
//! - Apply batch position updates as one all-or-nothing transaction.
//!
//! # Invariants
//! - `UNIQUE(project_uuid, position)` is the enforcement point for position
//!   uniqueness; violations surface as `RepoError::PositionConflict`.
//! - Listing is deterministic: `position ASC, uuid ASC`.
//! - Read paths re-validate persisted content instead of masking corrupt rows.

use super::{
    bool_to_int, ensure_connection_ready, int_to_bool, is_foreign_key_violation,
    is_unique_violation, parse_uuid, RepoError, RepoResult,
};
use crate::model::item::{Item, ItemFields, ItemId, ItemType, PositionUpdate};
use crate::model::project::ProjectId;
use crate::validation::validate_content;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const ITEM_SELECT_SQL: &str = "SELECT
    uuid,
    project_uuid,
    type,
    title,
    content,
    position,
    required,
    points,
    explanation,
    created_at,
    updated_at
FROM items";

/// Repository interface for item operations.
pub trait ItemRepository {
    /// Inserts one item under a project and returns the persisted row.
    fn create_item(&self, project_uuid: ProjectId, fields: &ItemFields) -> RepoResult<Item>;
    /// Replaces every writable attribute of one item.
    fn update_item(&self, item_uuid: ItemId, fields: &ItemFields) -> RepoResult<Item>;
    fn get_item(&self, item_uuid: ItemId) -> RepoResult<Option<Item>>;
    /// Lists the items of one project ordered by position.
    fn list_items(&self, project_uuid: ProjectId) -> RepoResult<Vec<Item>>;
    fn delete_item(&self, item_uuid: ItemId) -> RepoResult<()>;
    /// Returns the first position after the current highest one.
    fn next_position(&self, project_uuid: ProjectId) -> RepoResult<i64>;
    /// Applies every update or none of them.
    fn update_positions(&self, updates: &[PositionUpdate]) -> RepoResult<()>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            "items",
            &[
                "uuid",
                "project_uuid",
                "type",
                "title",
                "content",
                "position",
                "required",
                "points",
                "explanation",
                "created_at",
                "updated_at",
            ],
        )?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn create_item(&self, project_uuid: ProjectId, fields: &ItemFields) -> RepoResult<Item> {
        let item_uuid = Uuid::new_v4();
        let content_json = encode_content(fields)?;

        self.conn
            .execute(
                "INSERT INTO items (
                    uuid,
                    project_uuid,
                    type,
                    title,
                    content,
                    position,
                    required,
                    points,
                    explanation
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
                params![
                    item_uuid.to_string(),
                    project_uuid.to_string(),
                    fields.content.kind().as_str(),
                    fields.title.as_str(),
                    content_json,
                    fields.position,
                    bool_to_int(fields.required),
                    fields.points,
                    fields.explanation.as_deref(),
                ],
            )
            .map_err(|err| {
                if is_foreign_key_violation(&err) {
                    RepoError::ProjectNotFound(project_uuid)
                } else {
                    classify_position_write(err, item_uuid, fields.position)
                }
            })?;

        load_required_item(self.conn, item_uuid)
    }

    fn update_item(&self, item_uuid: ItemId, fields: &ItemFields) -> RepoResult<Item> {
        let content_json = encode_content(fields)?;

        let changed = self
            .conn
            .execute(
                "UPDATE items
                 SET
                    type = ?2,
                    title = ?3,
                    content = ?4,
                    position = ?5,
                    required = ?6,
                    points = ?7,
                    explanation = ?8,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?1;",
                params![
                    item_uuid.to_string(),
                    fields.content.kind().as_str(),
                    fields.title.as_str(),
                    content_json,
                    fields.position,
                    bool_to_int(fields.required),
                    fields.points,
                    fields.explanation.as_deref(),
                ],
            )
            .map_err(|err| classify_position_write(err, item_uuid, fields.position))?;

        if changed == 0 {
            return Err(RepoError::ItemNotFound(item_uuid));
        }

        load_required_item(self.conn, item_uuid)
    }

    fn get_item(&self, item_uuid: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE uuid = ?1;"))?;
        let item = stmt
            .query_row([item_uuid.to_string()], |row| Ok(parse_item_row(row)))
            .optional()?;
        item.transpose()
    }

    fn list_items(&self, project_uuid: ProjectId) -> RepoResult<Vec<Item>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ITEM_SELECT_SQL}
             WHERE project_uuid = ?1
             ORDER BY position ASC, uuid ASC;"
        ))?;
        let mut rows = stmt.query([project_uuid.to_string()])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }
        Ok(items)
    }

    fn delete_item(&self, item_uuid: ItemId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM items WHERE uuid = ?1;", [item_uuid.to_string()])?;
        if changed == 0 {
            return Err(RepoError::ItemNotFound(item_uuid));
        }
        Ok(())
    }

    fn next_position(&self, project_uuid: ProjectId) -> RepoResult<i64> {
        let next = self.conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1
             FROM items
             WHERE project_uuid = ?1;",
            [project_uuid.to_string()],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    fn update_positions(&self, updates: &[PositionUpdate]) -> RepoResult<()> {
        if updates.is_empty() {
            return Ok(());
        }

        // Dropping `tx` on any early return rolls back every write below.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        // Unique checks run per statement, so a swap written directly would
        // collide with itself. Park every moved item on a distinct negative
        // slot first; committed positions are never negative.
        for (index, update) in updates.iter().enumerate() {
            let parked = -1 - index as i64;
            let changed = write_position(&tx, update.item_uuid, parked)?;
            if changed == 0 {
                return Err(RepoError::ItemNotFound(update.item_uuid));
            }
        }

        for update in updates {
            write_position(&tx, update.item_uuid, update.position)?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn write_position(tx: &Transaction<'_>, item_uuid: ItemId, position: i64) -> RepoResult<usize> {
    tx.execute(
        "UPDATE items
         SET position = ?2,
             updated_at = (strftime('%s', 'now') * 1000)
         WHERE uuid = ?1;",
        params![item_uuid.to_string(), position],
    )
    .map_err(|err| classify_position_write(err, item_uuid, position))
}

fn classify_position_write(err: rusqlite::Error, item_uuid: ItemId, position: i64) -> RepoError {
    if is_unique_violation(&err) {
        RepoError::PositionConflict {
            item_uuid,
            position,
        }
    } else {
        err.into()
    }
}

fn encode_content(fields: &ItemFields) -> RepoResult<String> {
    let payload = fields
        .content
        .to_payload()
        .map_err(|err| RepoError::InvalidData(format!("cannot encode item content: {err}")))?;
    Ok(payload.to_string())
}

fn load_required_item(conn: &Connection, item_uuid: ItemId) -> RepoResult<Item> {
    let mut stmt = conn.prepare(&format!("{ITEM_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([item_uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return parse_item_row(row);
    }
    Err(RepoError::ItemNotFound(item_uuid))
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let uuid_text: String = row.get("uuid")?;
    let project_text: String = row.get("project_uuid")?;

    let type_text: String = row.get("type")?;
    let kind = ItemType::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid item type `{type_text}` in items.type"))
    })?;

    let content_text: String = row.get("content")?;
    let raw: serde_json::Value = serde_json::from_str(&content_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid json in items.content for type `{kind}`"))
    })?;
    let content = validate_content(kind, &raw).map_err(|err| {
        RepoError::InvalidData(format!("persisted `{kind}` content failed validation: {err}"))
    })?;

    let points = row
        .get::<_, Option<i64>>("points")?
        .map(|value| {
            u32::try_from(value).map_err(|_| {
                RepoError::InvalidData(format!("invalid points value `{value}` in items.points"))
            })
        })
        .transpose()?;

    Ok(Item {
        uuid: parse_uuid(&uuid_text, "items.uuid")?,
        project_uuid: parse_uuid(&project_text, "items.project_uuid")?,
        title: row.get("title")?,
        content,
        position: row.get("position")?,
        required: int_to_bool(row.get("required")?, "items.required")?,
        points,
        explanation: row.get("explanation")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
