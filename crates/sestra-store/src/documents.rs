//! Documents

use crate::{SqliteStore, StoreError};
use rusqlite::{params, OptionalExtension};
use sestra_domain::traits::DocumentRepository;
use sestra_domain::{Document, DocumentId, ProjectId};

impl DocumentRepository for SqliteStore {
    fn find_document_id(&self, project_id: ProjectId, name: &str) -> Result<Option<DocumentId>, StoreError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM documents WHERE project_id = ?1 AND name = ?2",
                params![project_id.value(), name],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(id.map(DocumentId::from_value))
    }

    fn find_document(
        &self,
        project_id: ProjectId,
        name: &str,
    ) -> Result<Option<(DocumentId, Document)>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, text FROM documents WHERE project_id = ?1 AND name = ?2",
                params![project_id.value(), name],
                |row| {
                    Ok((
                        DocumentId::from_value(row.get(0)?),
                        Document::new(row.get::<_, String>(1)?, row.get::<_, String>(2)?),
                    ))
                },
            )
            .optional()?;
        Ok(row)
    }

    fn exists_document(&self, project_id: ProjectId, name: &str) -> Result<bool, StoreError> {
        Ok(self.find_document_id(project_id, name)?.is_some())
    }

    fn save_document(
        &mut self,
        project_id: ProjectId,
        document: &Document,
        created_by: &str,
    ) -> Result<DocumentId, StoreError> {
        self.conn.execute(
            "INSERT INTO documents (project_id, name, text, created_by) VALUES (?1, ?2, ?3, ?4)",
            params![project_id.value(), document.name, document.text, created_by],
        )?;
        let document_id = DocumentId::from_value(self.conn.last_insert_rowid());

        tracing::debug!(document = %document.name, id = %document_id, "Saved document");
        Ok(document_id)
    }

    fn list_document_names(&self, project_id: ProjectId) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM documents WHERE project_id = ?1 ORDER BY id")?;
        let names = stmt
            .query_map(params![project_id.value()], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}
