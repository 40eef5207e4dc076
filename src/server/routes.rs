use std::sync::Arc;

use crate::data::registry::GameData;
use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

fn json_ok(body: String) -> HttpResponse {
    HttpResponse {
        status_code: 200,
        status_text: "OK",
        content_type: "application/json",
        body,
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!("{{\"error\": {}}}", serde_json::json!(message)),
    }
}

pub fn route_request(data: &Arc<GameData>, method: &str, path: &str, body: &str) -> HttpResponse {
    match (method, path) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/pilots") => match api::pilots_payload(data) {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/enemies") => match api::enemies_payload(data) {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/bosses") => match api::bosses_payload(data) {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/validate") => match api::validate_payload(data) {
            Ok(payload) => json_ok(payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/simulate") => match api::simulate_payload(data, body) {
            Ok(payload) => json_ok(payload),
            Err(api::SimulatePayloadError::Parse(err)) => {
                error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
            }
            Err(api::SimulatePayloadError::Validation(msg)) => {
                error_response(400, "Bad Request", &msg)
            }
        },
        ("POST", "/api/batch") => match api::batch_payload(data, body) {
            Ok(payload) => json_ok(payload),
            Err(api::SimulatePayloadError::Parse(err)) => {
                error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
            }
            Err(api::SimulatePayloadError::Validation(msg)) => {
                error_response(400, "Bad Request", &msg)
            }
        },
        _ => error_response(404, "Not Found", "no such route"),
    }
}

fn index_html() -> String {
    "<!doctype html>\n<html>\n<head><title>scrapfall</title></head>\n<body>\n\
     <h1>scrapfall combat core</h1>\n\
     <p>GET /api/health, /api/pilots, /api/enemies, /api/bosses, /api/validate</p>\n\
     <p>POST /api/simulate, /api/batch</p>\n\
     </body>\n</html>\n"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_route_returns_json() {
        let data = GameData::builtin();
        let response = route_request(&data, "GET", "/api/health", "");
        assert_eq!(response.status_code, 200);
        assert_eq!(response.content_type, "application/json");
        assert!(response.body.contains("scrapfall-api"));
    }

    #[test]
    fn unknown_route_is_404() {
        let data = GameData::builtin();
        let response = route_request(&data, "GET", "/api/nothing", "");
        assert_eq!(response.status_code, 404);
    }

    #[test]
    fn simulate_route_rejects_bad_json() {
        let data = GameData::builtin();
        let response = route_request(&data, "POST", "/api/simulate", "{broken");
        assert_eq!(response.status_code, 400);
    }

    #[test]
    fn http_string_carries_content_length() {
        let response = HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "application/json",
            body: "{}".to_string(),
        };
        let raw = response.to_http_string();
        assert!(raw.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(raw.contains("Content-Length: 2\r\n"));
    }
}
