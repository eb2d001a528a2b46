use poem::error::SizedLimitError;
use poem::web::headers::{self, HeaderMapExt};
use poem::{Body, Endpoint, Middleware, Request, Result};
use tokio::io::AsyncReadExt;

use crate::config::LifecycleSettings;
use crate::types::internal::kyc::DocumentType;

/// Room for multipart boundaries and the text fields of a KYC form
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Caps request bodies before any handler buffers them
///
/// A declared `Content-Length` above the cap is refused with 413. Bodies
/// without a length are cut off at the cap, which the multipart parser
/// then reports as a malformed request.
pub struct BodyLimit {
    max_bytes: u64,
}

impl BodyLimit {
    pub fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// One maximum-size file per document type plus form overhead
    pub fn for_uploads(settings: &LifecycleSettings) -> Self {
        let files = settings
            .max_upload_bytes()
            .saturating_mul(DocumentType::ALL.len() as u64);
        Self::new(files.saturating_add(FORM_OVERHEAD_BYTES))
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }
}

impl<E: Endpoint> Middleware<E> for BodyLimit {
    type Output = BodyLimitEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        BodyLimitEndpoint {
            inner: ep,
            max_bytes: self.max_bytes,
        }
    }
}

pub struct BodyLimitEndpoint<E> {
    inner: E,
    max_bytes: u64,
}

impl<E: Endpoint> Endpoint for BodyLimitEndpoint<E> {
    type Output = E::Output;

    async fn call(&self, mut req: Request) -> Result<Self::Output> {
        match req.headers().typed_get::<headers::ContentLength>() {
            Some(length) if length.0 > self.max_bytes => {
                tracing::info!("Refusing {} byte body for {}", length.0, req.uri().path());
                return Err(SizedLimitError::PayloadTooLarge.into());
            }
            Some(_) => {}
            None => {
                let body = req.take_body().into_async_read().take(self.max_bytes);
                req.set_body(Body::from_async_read(body));
            }
        }

        self.inner.call(req).await
    }
}
