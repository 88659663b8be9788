//! HTTP access to the prediction service.

use crate::api::{ErrorBody, PredictionResponse, StatsEnvelope, StatsSnapshot};
use crate::error::{ClassifierError, Result};
use crate::input::SelectedImage;
use reqwest::blocking::{Client, Response, multipart};
use std::time::Duration;

/// Multipart form field carrying the image.
pub const IMAGE_FIELD: &str = "image";

/// Operations the UI needs from the prediction service.
pub trait ClassifierApi: Send + Sync {
    fn predict(&self, image: &SelectedImage) -> Result<PredictionResponse>;
    fn fetch_stats(&self) -> Result<StatsSnapshot>;
}

/// [`ClassifierApi`] over blocking reqwest.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    base_url: String,
    http: Client,
}

impl HttpClassifier {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl ClassifierApi for HttpClassifier {
    fn predict(&self, image: &SelectedImage) -> Result<PredictionResponse> {
        let part = multipart::Part::bytes(image.bytes().to_vec())
            .file_name(image.name.clone())
            .mime_str(&image.mime)?;
        let form = multipart::Form::new().part(IMAGE_FIELD, part);
        tracing::info!(
            "Uploading {} ({} bytes, {})",
            image.name,
            image.bytes().len(),
            image.mime
        );
        let resp = self.http.post(self.url("predict")).multipart(form).send()?;
        let body = read_success_body(resp)?;
        Ok(serde_json::from_str(&body)?)
    }

    fn fetch_stats(&self) -> Result<StatsSnapshot> {
        let resp = self.http.get(self.url("stats")).send()?;
        let body = read_success_body(resp)?;
        let envelope: StatsEnvelope = serde_json::from_str(&body)?;
        Ok(envelope.stats)
    }
}

/// Returns the body of a 2xx response, or [`ClassifierError::Server`] with the
/// `error` field of the body when there is one.
fn read_success_body(resp: Response) -> Result<String> {
    let status = resp.status();
    let body = resp.text()?;
    if status.is_success() {
        return Ok(body);
    }
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty());
    tracing::warn!("Request failed with {status}: {message:?}");
    Err(ClassifierError::Server {
        status: status.as_u16(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::png_bytes;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serves one canned response and hands back the raw request it received.
    fn serve_once(response: String) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let request = read_request(&mut stream);
                let _ = stream.write_all(response.as_bytes());
                let _ = tx.send(request);
            }
        });
        (format!("http://{addr}/"), rx)
    }

    fn read_request(stream: &mut std::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data);
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }

    fn json_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    fn sample_image() -> SelectedImage {
        SelectedImage::from_bytes("apple.png", png_bytes(2, 2), None).unwrap()
    }

    #[test]
    fn predict_posts_multipart_image_field() {
        let body = r#"{"prediction":{"fruit":"Manzana","confidence":0.873,"alternatives":[]},"processing_time":"123ms"}"#;
        let (url, requests) = serve_once(json_response("200 OK", body));
        let client = HttpClassifier::new(&url, Some(Duration::from_secs(5))).unwrap();

        let result = client.predict(&sample_image()).unwrap();
        assert_eq!(result.prediction.fruit, "Manzana");
        assert_eq!(result.processing_time, "123ms");

        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST /predict "));
        assert!(request.contains("multipart/form-data"));
        assert!(request.contains("name=\"image\""));
        assert!(request.contains("filename=\"apple.png\""));
        assert!(request.contains("image/png"));
    }

    #[test]
    fn predict_surfaces_server_error_message() {
        let (url, _requests) = serve_once(json_response(
            "400 Bad Request",
            r#"{"error":"Imagen corrupta"}"#,
        ));
        let client = HttpClassifier::new(&url, Some(Duration::from_secs(5))).unwrap();
        let err = client.predict(&sample_image()).unwrap_err();
        match err {
            ClassifierError::Server { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message.as_deref(), Some("Imagen corrupta"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn predict_without_error_field_has_no_message() {
        let (url, _requests) = serve_once(json_response("500 Internal Server Error", "oops"));
        let client = HttpClassifier::new(&url, Some(Duration::from_secs(5))).unwrap();
        let err = client.predict(&sample_image()).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::Server {
                status: 500,
                message: None
            }
        ));
    }

    #[test]
    fn fetch_stats_unwraps_envelope() {
        let body = r#"{"stats":{"total_predictions":3,"uptime_formatted":"0:01:00","start_time":"2024-01-02T03:04:05","predictions_by_class":{"Kiwi":3}}}"#;
        let (url, requests) = serve_once(json_response("200 OK", body));
        let client = HttpClassifier::new(&url, Some(Duration::from_secs(5))).unwrap();
        let stats = client.fetch_stats().unwrap();
        assert_eq!(stats.total_predictions, 3);
        assert_eq!(stats.predictions_by_class["Kiwi"], 3);
        assert!(requests.recv().unwrap().starts_with("GET /stats "));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = HttpClassifier::new("http://localhost:5000///", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/stats"), "http://localhost:5000/stats");
    }

    #[test]
    fn unreachable_service_is_an_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client =
            HttpClassifier::new(&format!("http://{addr}"), Some(Duration::from_secs(2))).unwrap();
        assert!(matches!(client.fetch_stats(), Err(ClassifierError::Http(_))));
    }
}
