//! Per-request trace ids and request logging.
//!
//! [`Trace`] mints a [`TraceId`] for every request, runs the rest of the
//! pipeline inside its scope and a `request` span, logs the outcome, and
//! echoes the id in the `trace-id` response header.

use std::rc::Rc;
use std::time::Instant;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, info, info_span, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Middleware factory; wrap the app with it once.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use devassist::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = TraceService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceService {
            inner: Rc::new(service),
        }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceService<S> {
    inner: Rc<S>,
}

fn attach_header<B>(response: &mut ServiceResponse<B>, trace_id: TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => warn!(%error, "trace id is not a valid header value"),
    }
}

impl<S, B> Service<ServiceRequest> for TraceService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(inner);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::generate();
        let span = info_span!(
            "request",
            %trace_id,
            method = %req.method(),
            path = %req.path(),
        );
        let inner = Rc::clone(&self.inner);
        let started = Instant::now();

        Box::pin(
            trace_id
                .scope(async move {
                    let mut response = inner.call(req).await?;
                    attach_header(&mut response, trace_id);
                    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
                    info!(
                        status = response.status().as_u16(),
                        elapsed_ms,
                        "request completed"
                    );
                    Ok::<_, actix_web::Error>(response)
                })
                .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use actix_web::dev::ServiceResponse;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use super::*;
    use crate::domain::Error;

    async fn echo_trace_id() -> HttpResponse {
        let body = TraceId::current().map(|id| id.to_string()).unwrap_or_default();
        HttpResponse::Ok().body(body)
    }

    async fn refuse() -> Result<HttpResponse, Error> {
        Err(Error::forbidden("Security check failed."))
    }

    async fn call(uri: &str) -> ServiceResponse {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/echo", web::get().to(echo_trace_id))
                .route("/refuse", web::get().to(refuse)),
        )
        .await;
        test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await
    }

    fn header_id<B>(response: &ServiceResponse<B>) -> String {
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .expect("trace-id header")
            .to_str()
            .expect("ascii header")
            .to_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn handler_sees_the_id_sent_in_the_header() {
        let response = call("/echo").await;
        let sent = header_id(&response);
        let body = test::read_body(response).await;

        assert!(sent.parse::<TraceId>().is_ok());
        assert_eq!(std::str::from_utf8(&body).expect("utf-8"), sent);
    }

    #[rstest]
    #[actix_web::test]
    async fn error_envelopes_carry_the_same_id() {
        let response = call("/refuse").await;
        let sent = header_id(&response);
        let body: serde_json::Value = test::read_body_json(response).await;

        assert_eq!(body["traceId"], sent.as_str());
        assert_eq!(body["code"], "forbidden");
    }

    #[rstest]
    #[actix_web::test]
    async fn every_request_gets_a_fresh_id() {
        let first = header_id(&call("/echo").await);
        let second = header_id(&call("/echo").await);
        assert_ne!(first, second);
    }
}
