use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::types::internal::deletion::FileRemovalSummary;
use crate::types::internal::kyc::{DocumentIntake, IncomingDocument, StoredDocument};

/// MIME types accepted for identity documents
const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "application/pdf"];

/// Extension fallback for clients that send `application/octet-stream` or no type
const EXTENSION_MIME_TYPES: [(&str, &str); 6] = [
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("pdf", "application/pdf"),
    ("jfif", "image/jpeg"),
];

const MAX_BASENAME_LEN: usize = 100;

/// Validated file intake and best-effort removal under the upload root
pub struct DocumentProvider {
    upload_dir: PathBuf,
    max_upload_bytes: u64,
}

impl DocumentProvider {
    pub fn new(upload_dir: impl Into<PathBuf>, max_upload_bytes: u64) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_upload_bytes,
        }
    }

    /// Validate and persist each file under `{upload_dir}/{purpose}/`
    ///
    /// A file that fails validation or cannot be written is rejected on its
    /// own with a message naming its field; the rest are still stored.
    pub async fn accept(&self, purpose: &str, documents: Vec<IncomingDocument>) -> DocumentIntake {
        let mut intake = DocumentIntake::default();
        let directory = self.upload_dir.join(purpose);

        if let Err(e) = tokio::fs::create_dir_all(&directory).await {
            tracing::warn!("Could not create upload directory {}: {}", directory.display(), e);
            intake.rejected = documents
                .iter()
                .map(|doc| format!("{}: could not be stored", doc.doc_type.field_name()))
                .collect();
            return intake;
        }

        for doc in documents {
            let field = doc.doc_type.field_name();
            let original_name = doc.file_name.clone().unwrap_or_else(|| field.to_string());

            if let Err(reason) = self.validate(&doc) {
                tracing::info!("Rejected upload {} ({}): {}", field, original_name, reason);
                intake.rejected.push(format!("{}: {}", field, reason));
                continue;
            }

            let stored_name = format!(
                "{}-{}-{}",
                Utc::now().timestamp_millis(),
                field,
                sanitize_basename(&original_name)
            );
            let path = directory.join(stored_name);

            if let Err(e) = tokio::fs::write(&path, &doc.bytes).await {
                tracing::warn!("Failed to write upload {} to {}: {}", field, path.display(), e);
                intake.rejected.push(format!("{}: could not be stored", field));
                continue;
            }

            intake.accepted.push(StoredDocument {
                doc_type: doc.doc_type,
                path: path.to_string_lossy().into_owned(),
                original_name,
            });
        }

        intake
    }

    fn validate(&self, doc: &IncomingDocument) -> Result<(), String> {
        if doc.bytes.is_empty() {
            return Err("file is empty".to_string());
        }

        if doc.bytes.len() as u64 > self.max_upload_bytes {
            return Err(format!("file exceeds the {} byte limit", self.max_upload_bytes));
        }

        let declared = doc
            .content_type
            .as_deref()
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());

        if declared.as_deref().is_some_and(is_allowed_mime) {
            return Ok(());
        }

        let guessed = doc
            .file_name
            .as_deref()
            .and_then(mime_from_extension);

        match guessed {
            Some(mime) if is_allowed_mime(mime) => Ok(()),
            _ => Err(format!(
                "unsupported file type {}",
                declared.unwrap_or_else(|| "unknown".to_string())
            )),
        }
    }

    /// Attempt to unlink every path, continuing past failures
    ///
    /// Only files that resolve to a location inside the upload root are
    /// touched; anything else is recorded as failed and left in place.
    pub async fn remove<P: AsRef<Path>>(&self, paths: &[P]) -> FileRemovalSummary {
        let mut summary = FileRemovalSummary::default();
        let root = tokio::fs::canonicalize(&self.upload_dir).await.ok();

        for path in paths {
            let path = path.as_ref();
            let resolved = match tokio::fs::canonicalize(path).await {
                Ok(resolved) => resolved,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!("File already gone: {}", path.display());
                    summary.missing += 1;
                    continue;
                }
                Err(e) => {
                    tracing::warn!("Failed to resolve {}: {}", path.display(), e);
                    summary.failed.push((path.display().to_string(), e.to_string()));
                    continue;
                }
            };

            if !root.as_deref().is_some_and(|root| resolved.starts_with(root)) {
                tracing::warn!(
                    "Refusing to remove {}: outside the upload directory {}",
                    path.display(),
                    self.upload_dir.display()
                );
                summary
                    .failed
                    .push((path.display().to_string(), "outside the upload directory".to_string()));
                continue;
            }

            match tokio::fs::remove_file(&resolved).await {
                Ok(()) => summary.removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    tracing::debug!("File already gone: {}", path.display());
                    summary.missing += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to remove {}: {}", path.display(), e);
                    summary.failed.push((path.display().to_string(), e.to_string()));
                }
            }
        }

        summary
    }
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    EXTENSION_MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

/// Final path component with anything outside `[A-Za-z0-9._-]` replaced by `_`
pub fn sanitize_basename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);

    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    let truncated: String = if cleaned.len() > MAX_BASENAME_LEN {
        cleaned[cleaned.len() - MAX_BASENAME_LEN..].to_string()
    } else {
        cleaned.to_string()
    };

    if truncated.is_empty() {
        "document".to_string()
    } else {
        truncated
    }
}
