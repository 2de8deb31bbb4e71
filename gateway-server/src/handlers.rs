use axum::extract::{
    Multipart, Path, Query, State,
    multipart::{Field, MultipartRejection},
    rejection::{PathRejection, QueryRejection},
};
use gateway_core::{
    CombinedSummary, GatewayError, RawRepository, RawWeather, RepoQuery, SummaryQuery,
    UploadMetadata, WeatherQuery,
    upload::{self, IncomingFile},
};
use tracing::{debug, info};
use validator::Validate;

use crate::{
    envelope::{self, Envelope},
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Name of the multipart field carrying the upload.
pub const UPLOAD_FIELD: &str = "file";

pub async fn hello(State(state): State<AppState>) -> &'static str {
    state.service.hello()
}

pub async fn user_repos(
    State(state): State<AppState>,
    query: Result<Query<RepoQuery>, QueryRejection>,
) -> ApiResult<Envelope<Vec<RawRepository>>> {
    let Query(query) = query?;
    query.validate().map_err(GatewayError::from)?;

    let repos = state.service.get_user_repos(&query).await?;
    Ok(envelope::ok(repos))
}

pub async fn summary(
    State(state): State<AppState>,
    query: Result<Query<SummaryQuery>, QueryRejection>,
) -> ApiResult<Envelope<CombinedSummary>> {
    let Query(query) = query?;
    query.validate().map_err(GatewayError::from)?;

    let summary = state.service.get_summary_data(&query).await?;
    Ok(envelope::ok(summary))
}

pub async fn weather(
    State(state): State<AppState>,
    params: Result<Path<WeatherQuery>, PathRejection>,
) -> ApiResult<Envelope<RawWeather>> {
    let Path(params) = params?;
    params.validate().map_err(GatewayError::from)?;

    let weather = state.service.get_current_weather(&params.city).await?;
    Ok(envelope::ok(weather))
}

/// Accepts a PNG or JPEG in the `file` field and reports its name and size.
/// The bytes are counted and dropped.
pub async fn upload_file(
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Envelope<UploadMetadata>> {
    // A request that isn't multipart carries no file.
    let Ok(mut multipart) = multipart else {
        return Err(missing_file());
    };

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let media_type = field.content_type().map(str::to_string);

        upload::validate_media_type(media_type.as_deref())?;
        let size = drain_field(field).await?;

        let meta = upload::accept_upload(Some(IncomingFile {
            filename: &filename,
            media_type: media_type.as_deref(),
            size,
        }))?;

        info!(filename = %meta.filename, size = meta.size, "Upload accepted");
        return Ok(envelope::ok(meta));
    }

    Err(missing_file())
}

fn missing_file() -> ApiError {
    GatewayError::NotFound(upload::FILE_NOT_FOUND.to_string()).into()
}

/// Read a field to the end, counting bytes and stopping once over the limit.
async fn drain_field(mut field: Field<'_>) -> ApiResult<usize> {
    let mut size = 0usize;
    while let Some(chunk) = field.chunk().await? {
        size += chunk.len();
        upload::validate_size(size)?;
    }
    debug!(size, "Upload field drained");
    Ok(size)
}
