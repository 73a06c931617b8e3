use actix_web::{web, HttpRequest, HttpResponse};

use super::dispatcher::Dispatcher;
use super::request::WebRequest;

/// Single actix entry point. Every request, whatever its path or method,
/// goes through the dispatcher.
pub async fn serve(
    req: HttpRequest,
    body: web::Bytes,
    dispatcher: web::Data<Dispatcher>,
) -> HttpResponse {
    let request = WebRequest::from_http(&req, body);
    dispatcher.dispatch(request).into_http_response()
}

/// Mounts [`serve`] as the default service of an `App`. Bodies over the
/// dispatcher's payload limit are refused with 413 before dispatch.
pub fn configure(dispatcher: web::Data<Dispatcher>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let limit = dispatcher.payload_limit();
        cfg.app_data(web::PayloadConfig::new(limit))
            .app_data(dispatcher)
            .default_service(web::to(serve));
    }
}
