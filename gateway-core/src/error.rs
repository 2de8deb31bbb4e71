use thiserror::Error;

use crate::provider::ProviderId;

/// A failed call to an upstream API.
///
/// Callers only ever see the provider name; the underlying cause (transport
/// error, status code, decode error) stays in `source` for logging.
#[derive(Debug, Error)]
#[error("failed to fetch {provider} data")]
pub struct UpstreamFetchError {
    pub provider: ProviderId,
    #[source]
    pub source: anyhow::Error,
}

impl UpstreamFetchError {
    pub fn new(provider: ProviderId, source: anyhow::Error) -> Self {
        Self { provider, source }
    }
}

/// Errors produced by the gateway's operations, independent of the transport
/// that eventually renders them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// Client-facing failure of a single upstream fetch, or a rejected upload.
    #[error("{0}")]
    BadRequest(String),

    /// Request parameters failed shape validation.
    #[error("{0}")]
    Validation(String),

    /// Upload request carried no file.
    #[error("{0}")]
    NotFound(String),

    /// Upload exceeded the size limit.
    #[error("{0}")]
    PayloadTooLarge(String),

    /// Combined summary failed because one of its fetches failed.
    #[error("Error fetching summary data: {0}")]
    SummaryAggregation(String),
}

impl From<validator::ValidationErrors> for GatewayError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Vec::new();
        collect_validation_messages(&errors, &mut fields);
        fields.sort();

        GatewayError::Validation(fields.join(", "))
    }
}

fn collect_validation_messages(errors: &validator::ValidationErrors, out: &mut Vec<String>) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                let reason = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                out.push(format!("{field} {reason}"));
            }
            ValidationErrorsKind::Struct(inner) => collect_validation_messages(inner, out),
            ValidationErrorsKind::List(items) => {
                for inner in items.values() {
                    collect_validation_messages(inner, out);
                }
            }
        }
    }
}
