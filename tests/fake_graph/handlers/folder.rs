//! Mail folder lookup handler (`GET /me/mailFolders/{id}`).

use crate::fake_graph::io::{error_body, write_response};
use crate::fake_graph::tenant::Tenant;
use serde_json::json;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Answer with the folder's display name, or 404.
pub async fn handle_folder<S: AsyncRead + AsyncWrite + Unpin>(
    folder_id: &str,
    tenant: &Tenant,
    stream: &mut BufReader<S>,
) {
    match tenant.folder_name(folder_id) {
        Some(name) => {
            let body = json!({"id": folder_id, "displayName": name});
            let _ = write_response(stream, 200, Some(&body)).await;
        }
        None => {
            let body = error_body("ErrorItemNotFound", "folder not found");
            let _ = write_response(stream, 404, Some(&body)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_graph::tenant::TenantBuilder;
    use tokio::io::BufReader;

    async fn run(folder_id: &str, tenant: &Tenant) -> String {
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);

        handle_folder(folder_id, tenant, &mut stream).await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn known_folder_returns_display_name() {
        let tenant = TenantBuilder::new("t").folder("f1", "Sent Items").build();
        let output = run("f1", &tenant).await;

        assert!(output.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(output.contains("\"displayName\":\"Sent Items\""));
    }

    #[tokio::test]
    async fn unknown_folder_is_404() {
        let tenant = TenantBuilder::new("t").build();
        let output = run("nope", &tenant).await;
        assert!(output.starts_with("HTTP/1.1 404 "));
    }
}
