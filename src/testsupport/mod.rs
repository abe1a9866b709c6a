//! Shared test fixtures for config, tunnel, client, and session test modules.

use crate::tunnel::{ForwardSpec, TunnelLauncher};
use crate::ui::render::{ProgressHandle, RenderSink};

mod fixtures;

pub use fixtures::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_resolves_children() {
        let fixture = TestTempDir::new("fixture");
        let child = fixture.child("a/b.toml");
        assert!(child.starts_with(fixture.path()));
    }

    #[tokio::test]
    async fn stub_records_request_body() {
        let (port, handle) = spawn_http_stub(vec![StubResponse::ok("{}")]).await;
        let client = reqwest::Client::new();
        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/generate"))
            .body(r#"{"a":1}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        let recorded = handle.await.unwrap();
        assert!(recorded[0].starts_with("POST /api/generate"));
        assert_eq!(recorded[0].json()["a"], 1);
    }
}
