use crate::error::{AppError, Result};
use crate::model::{CreatePasteResponse, PasteResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use inkdrop_core::{CreatePasteParams, PasteId};
use jiff::Timestamp;

/// Request header carrying a time override in epoch milliseconds. Only
/// honored in test mode.
pub const TEST_NOW_HEADER: &str = "x-test-now-ms";

const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";
const DEFAULT_PROTO: &str = "http";
const DEFAULT_HOST: &str = "localhost:3000";

fn header_str<'a>(headers: &'a HeaderMap, name: impl header::AsHeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn request_now(state: &AppState, headers: &HeaderMap) -> Timestamp {
    state
        .time()
        .now_with_override(header_str(headers, TEST_NOW_HEADER))
}

fn base_url(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(base) = state.public_base_url() {
        return base.trim_end_matches('/').to_owned();
    }

    // proxies may append their own scheme: "https, http"
    let proto = header_str(headers, FORWARDED_PROTO_HEADER)
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .unwrap_or(DEFAULT_PROTO);
    let host = header_str(headers, header::HOST).unwrap_or(DEFAULT_HOST);

    format!("{proto}://{host}")
}

/// Malformed ids can never name a stored paste.
fn parse_id(raw: String) -> Result<PasteId> {
    PasteId::new(raw).map_err(|_| AppError::NotFound)
}

pub async fn create_paste_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: std::result::Result<Json<CreatePasteParams>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatePasteResponse>)> {
    let Json(params) = payload?;
    let now = request_now(&state, &headers);

    let created = state.pastebin().create(params, now).await?;
    let url = created.id.to_url(&base_url(&state, &headers));

    Ok((
        StatusCode::CREATED,
        Json(CreatePasteResponse {
            id: created.id.to_string(),
            url,
        }),
    ))
}

pub async fn get_paste_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<PasteResponse>> {
    let id = parse_id(id)?;
    let now = request_now(&state, &headers);

    let view = state.pastebin().view(&id, now).await?;
    Ok(Json(PasteResponse::from(view)))
}

pub async fn raw_paste_handler(
    Path(id): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse> {
    let id = parse_id(id)?;
    let now = request_now(&state, &headers);

    let view = state.pastebin().view(&id, now).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        view.content,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use inkdrop_core::{ManualClock, TimeSource};
    use inkdrop_generator::SeqGenerator;
    use inkdrop_service::PasteService;
    use inkdrop_storage::InMemoryPasteStore;
    use std::sync::Arc;

    fn state(public_base_url: Option<&str>) -> AppState {
        let service = PasteService::new(InMemoryPasteStore::new(), SeqGenerator::with_prefix("p"));
        let clock = ManualClock::new(Timestamp::from_second(1_700_000_000).unwrap());
        AppState::new(Arc::new(service), TimeSource::new(clock, true))
            .with_public_base_url(public_base_url.map(str::to_owned))
    }

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn base_url_defaults_without_headers() {
        assert_eq!(base_url(&state(None), &HeaderMap::new()), "http://localhost:3000");
    }

    #[test]
    fn base_url_from_forwarding_headers() {
        let headers = headers(&[("host", "paste.example"), ("x-forwarded-proto", "https, http")]);
        assert_eq!(base_url(&state(None), &headers), "https://paste.example");
    }

    #[test]
    fn configured_base_url_wins() {
        let headers = headers(&[("host", "internal:3000")]);
        assert_eq!(
            base_url(&state(Some("https://ink.example/")), &headers),
            "https://ink.example"
        );
    }

    #[test]
    fn malformed_id_is_not_found() {
        assert!(matches!(parse_id("no/slashes".into()), Err(AppError::NotFound)));
        assert!(parse_id("abc_DEF-123".into()).is_ok());
    }
}
