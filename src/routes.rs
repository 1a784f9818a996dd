use actix_web::{http::Method, web};

use crate::handlers::{health, webhook_handlers};

// Configure public webhook routes (no authentication beyond the signature
// check - /webhooks/*). POST and OPTIONS share one resource so every other
// method on the path answers 405.
pub fn configure_webhook_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhooks").service(
            web::resource("/stripe")
                .route(web::post().to(webhook_handlers::stripe_webhook))
                .route(
                    web::route()
                        .method(Method::OPTIONS)
                        .to(webhook_handlers::stripe_webhook_preflight),
                ),
        ),
    );
}

// Configure operational routes (/health)
pub fn configure_health_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn test_health_route_responds() {
        let app = test::init_service(App::new().configure(configure_health_routes)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }
}
