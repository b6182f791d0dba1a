//! HR office notes.

use crate::{
    entities::{Note, note},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use tracing::info;

/// Stores a new note.
pub async fn create_note(db: &DatabaseConnection, title: &str, content: &str) -> Result<note::Model> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::Validation {
            message: "note title cannot be empty".to_string(),
        });
    }

    let created = note::ActiveModel {
        title: Set(title.to_string()),
        content: Set(content.trim().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Note {} created: {}", created.id, created.title);
    Ok(created)
}

/// All notes, newest first.
pub async fn get_all_notes(db: &DatabaseConnection) -> Result<Vec<note::Model>> {
    Note::find()
        .order_by_desc(note::Column::CreatedAt)
        .order_by_desc(note::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Deletes a note by id.
pub async fn delete_note(db: &DatabaseConnection, note_id: i64) -> Result<()> {
    let result = Note::delete_by_id(note_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::NoteNotFound { id: note_id });
    }
    info!("Note {note_id} deleted");
    Ok(())
}
