//! Sequential batch processing for multi-file uploads.
//!
//! Files run strictly one at a time: file n's full round trip completes before file
//! n+1 starts. A success is committed to the session before the next file begins, and a
//! failure is recorded for that file only.

use std::future::Future;

use serde::Serialize;
use tracing::{info, warn};

use crate::ingestion::payload::UploadedDocument;
use crate::ingestion::ExtractionError;
use crate::session::{Session, SharedSession};

/// One file that could not be turned into an entity.
#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport<T> {
    pub added: Vec<T>,
    pub failures: Vec<ItemFailure>,
}

impl<T> BatchReport<T> {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

pub async fn run_sequential_batch<T, F, Fut, C>(
    session: &SharedSession,
    documents: Vec<UploadedDocument>,
    mut extract: F,
    commit: C,
) -> BatchReport<T>
where
    T: Clone,
    F: FnMut(UploadedDocument) -> Fut,
    Fut: Future<Output = Result<T, ExtractionError>>,
    C: Fn(&mut Session, T),
{
    let total = documents.len();
    let mut report = BatchReport {
        added: Vec::with_capacity(total),
        failures: Vec::new(),
    };

    for (index, document) in documents.into_iter().enumerate() {
        let name = document.name.clone();
        info!("Processing {} ({}/{})", name, index + 1, total);

        match extract(document).await {
            Ok(entity) => {
                commit(&mut *session.write().await, entity.clone());
                report.added.push(entity);
            }
            Err(e) => {
                warn!("Skipping {}: {}", name, e);
                report.failures.push(ItemFailure {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    if report.is_clean() {
        info!("Batch finished: {} added", report.added.len());
    } else {
        warn!(
            "Batch finished: {} added, {} failed",
            report.added.len(),
            report.failures.len()
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::session::fixtures;

    fn docs(names: &[&str]) -> Vec<UploadedDocument> {
        names
            .iter()
            .map(|n| UploadedDocument::new(*n, None, Bytes::from_static(b"x")))
            .collect()
    }

    #[tokio::test]
    async fn test_failed_item_does_not_abort_siblings() {
        let session = Session::new(None).shared();
        let report = run_sequential_batch(
            &session,
            docs(&["a.pdf", "b.pdf", "c.pdf"]),
            |doc| async move {
                if doc.name == "b.pdf" {
                    Err(ExtractionError::shape("no name"))
                } else {
                    Ok(fixtures::candidate(&doc.name, "Analyst"))
                }
            },
            |s, c| s.add_candidate(c),
        )
        .await;

        assert_eq!(report.added.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].name, "b.pdf");
        let names: Vec<_> = session
            .read()
            .await
            .candidates()
            .iter()
            .map(|c| c.name.clone())
            .collect();
        assert_eq!(names, vec!["a.pdf", "c.pdf"]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_clean() {
        let session = Session::new(None).shared();
        let report = run_sequential_batch(
            &session,
            Vec::new(),
            |doc| async move { Ok(fixtures::candidate(&doc.name, "Analyst")) },
            |s, c| s.add_candidate(c),
        )
        .await;
        assert!(report.is_clean());
        assert!(report.added.is_empty());
    }
}
