use axum::extract::Multipart;

use crate::errors::AppError;
use crate::ingestion::payload::UploadedDocument;

/// Collects every file part of a multipart body in submission order.
/// Non-file parts are ignored.
pub async fn read_documents(mut multipart: Multipart) -> Result<Vec<UploadedDocument>, AppError> {
    let mut documents = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read '{name}': {e}")))?;
        documents.push(UploadedDocument::new(name, content_type, bytes));
    }

    if documents.is_empty() {
        return Err(AppError::Validation(
            "Attach at least one PDF or text file".to_string(),
        ));
    }
    Ok(documents)
}

/// Exactly one file, for endpoints that take a single document.
pub async fn read_single_document(multipart: Multipart) -> Result<UploadedDocument, AppError> {
    let mut documents = read_documents(multipart).await?;
    if documents.len() > 1 {
        return Err(AppError::Validation(format!(
            "Expected one file, got {}",
            documents.len()
        )));
    }
    documents
        .pop()
        .ok_or_else(|| AppError::Validation("Attach a file".to_string()))
}
