use serde_json::{json, Value};
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock commerce backend for exercising the HTTP gateway
pub struct BackendMockServer {
    server: MockServer,
}

impl BackendMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Mock a successful reply on `route` for a request whose body equals `expected_body` exactly
    pub async fn mock_exact(&self, route: &str, expected_body: Value, reply: Value) {
        Mock::given(method("POST"))
            .and(path(route))
            .and(header("content-type", "application/json"))
            .and(body_json(expected_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Mock an error status with a plain-text body
    pub async fn mock_error(&self, route: &str, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a 2xx reply whose body is not JSON
    pub async fn mock_garbage(&self, route: &str) {
        Mock::given(method("POST"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_awake(&self) {
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "server": "Active" })))
            .mount(&self.server)
            .await;
    }
}

pub fn sample_products() -> Value {
    json!([
        {
            "product_name": "Trail Runner 2",
            "price": "89.99",
            "description": "Lightweight trail shoe",
            "url": "https://shop.example/trail-runner-2",
            "image_url": "https://cdn.example/trail-runner-2.jpg",
            "rating_overall": 4.6
        },
        {
            "product_name": "Road Glide",
            "price": 74.5,
            "url": "https://shop.example/road-glide"
        }
    ])
}
