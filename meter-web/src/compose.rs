use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::HeaderName, request::Parts, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
};
use std::convert::Infallible;

use crate::{
    error::HandlerError,
    handlers::{Event, Outcome},
    render::{self, Render},
};

/// Present only on requests issued by the fragment-swapping client.
pub const HX_REQUEST: HeaderName = HeaderName::from_static("hx-request");
pub const HX_TRIGGER: HeaderName = HeaderName::from_static("hx-trigger");
pub const HX_TARGET: HeaderName = HeaderName::from_static("hx-target");
pub const HX_PUSH: HeaderName = HeaderName::from_static("hx-push");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Fragment,
    FullPage,
}

impl RenderMode {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        if headers.contains_key(HX_REQUEST) {
            Self::Fragment
        } else {
            Self::FullPage
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RenderMode
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Turn a handler result into a response for the given client kind.
pub fn respond<V: Render>(mode: RenderMode, result: Result<Outcome<V>, HandlerError>) -> Response {
    match result {
        Ok(outcome) => compose(mode, outcome),
        Err(err) => compose_error(mode, err),
    }
}

pub fn compose<V: Render>(mode: RenderMode, outcome: Outcome<V>) -> Response {
    let body = match mode {
        RenderMode::Fragment => outcome.view.fragment(),
        RenderMode::FullPage => render::page(&outcome.view.title(), &outcome.view.page_content()),
    };

    let mut response = (outcome.status, Html(body)).into_response();
    if let Some(event) = &outcome.event {
        attach_directives(response.headers_mut(), event);
    }
    response
}

fn compose_error(mode: RenderMode, err: HandlerError) -> Response {
    match &err {
        HandlerError::Store(source) => {
            metrics::counter!("handler_errors_total").increment(1);
            tracing::error!(error = %source, "store failure while handling request");
        }
        other => tracing::debug!(error = %other, "request rejected"),
    }

    match mode {
        RenderMode::Fragment => err.into_response(),
        RenderMode::FullPage => {
            let status = err.status();
            let body = render::page(
                status.canonical_reason().unwrap_or("Error"),
                &render::error_fragment(status, &err.public_message()),
            );
            (status, Html(body)).into_response()
        }
    }
}

/// Write the toast, target and history-push headers for `event`.
pub fn attach_directives(headers: &mut HeaderMap, event: &Event) {
    let trigger = ascii_json(&serde_json::json!({ "showToast": event.message }));

    let directives = [
        (HX_TRIGGER, trigger),
        (HX_TARGET, event.target.selector().to_string()),
        (HX_PUSH, event.push.clone()),
    ];
    for (name, value) in directives {
        match HeaderValue::from_str(&value) {
            Ok(value) => {
                headers.insert(name, value);
            }
            Err(e) => tracing::warn!(header = %name, error = %e, "dropping unencodable directive"),
        }
    }
}

/// Serialize to JSON with every non-ASCII or control character written as a
/// `\u` escape, so the result is a valid header value.
fn ascii_json(value: &serde_json::Value) -> String {
    let json = value.to_string();
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() && !c.is_ascii_control() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Target;
    use axum::http::StatusCode;

    struct Stub;

    impl Render for Stub {
        fn title(&self) -> String {
            "Stub".to_string()
        }

        fn fragment(&self) -> String {
            "<p>stub</p>".to_string()
        }
    }

    fn event(message: &str) -> Event {
        Event {
            message: message.to_string(),
            target: Target::ReadingsPartial,
            push: "/meter/7".to_string(),
        }
    }

    #[test]
    fn marker_header_selects_fragment_mode() {
        let mut headers = HeaderMap::new();
        assert_eq!(RenderMode::from_headers(&headers), RenderMode::FullPage);

        headers.insert(HX_REQUEST, HeaderValue::from_static("true"));
        assert_eq!(RenderMode::from_headers(&headers), RenderMode::Fragment);
    }

    #[test]
    fn directives_survive_in_both_modes() {
        for mode in [RenderMode::Fragment, RenderMode::FullPage] {
            let outcome = Outcome::with_event(StatusCode::CREATED, Stub, event("saved"));
            let response = compose(mode, outcome);

            assert_eq!(response.status(), StatusCode::CREATED);
            let headers = response.headers();
            assert_eq!(headers[HX_TRIGGER], r#"{"showToast":"saved"}"#);
            assert_eq!(headers[HX_TARGET], "#meter_data_partial");
            assert_eq!(headers[HX_PUSH], "/meter/7");
        }
    }

    #[test]
    fn reads_carry_no_directives() {
        let response = compose(RenderMode::Fragment, Outcome::ok(Stub));

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(HX_TRIGGER).is_none());
        assert!(response.headers().get(HX_TARGET).is_none());
        assert!(response.headers().get(HX_PUSH).is_none());
    }

    #[test]
    fn non_ascii_toast_is_escaped() {
        let mut headers = HeaderMap::new();
        attach_directives(&mut headers, &event("Zähler ✓"));

        let trigger = headers[HX_TRIGGER].to_str().unwrap();
        assert_eq!(trigger, r#"{"showToast":"Z\u00e4hler \u2713"}"#);
        let decoded: serde_json::Value = serde_json::from_str(trigger).unwrap();
        assert_eq!(decoded["showToast"], "Zähler ✓");
    }

    #[test]
    fn delete_character_in_toast_keeps_every_directive() {
        let mut headers = HeaderMap::new();
        attach_directives(&mut headers, &event("Meter Gar\u{7f}age was created"));

        let trigger = headers[HX_TRIGGER].to_str().unwrap();
        assert_eq!(trigger, r#"{"showToast":"Meter Gar\u007fage was created"}"#);
        let decoded: serde_json::Value = serde_json::from_str(trigger).unwrap();
        assert_eq!(decoded["showToast"], "Meter Gar\u{7f}age was created");
        assert_eq!(headers[HX_TARGET], "#meter_data_partial");
        assert_eq!(headers[HX_PUSH], "/meter/7");
    }

    #[test]
    fn errors_map_to_status_without_directives() {
        let response = respond::<Stub>(RenderMode::FullPage, Err(HandlerError::MeterNotFound(4)));

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(HX_TRIGGER).is_none());
    }
}
