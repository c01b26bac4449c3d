//! In-process fake Microsoft Graph server for integration testing
//!
//! # How Graph paging works (overview)
//!
//! Collection endpoints such as `GET /v1.0/me/messages` return one
//! page of records in a JSON envelope. When more records remain, the
//! envelope carries an `@odata.nextLink`: an absolute URL the client
//! fetches verbatim to get the next page. The last page has no link.
//!
//! ```text
//!   GET /v1.0/me/messages?$top=50
//!   200 {"value": [m1, m2], "@odata.nextLink": ".../me/messages?$skip=2"}
//!   GET /v1.0/me/messages?$skip=2
//!   200 {"value": [m3]}
//! ```
//!
//! Every request must carry `Authorization: Bearer <token>`; anything
//! else answers 401, the way an expired token does.
//!
//! The server speaks just enough HTTP/1.1 for reqwest: one request per
//! connection, answered with `Connection: close`.

use super::handlers::{handle_delete, handle_folder, handle_list};
use super::io::{error_body, write_response};
use super::tenant::Tenant;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, BufReader};
use tokio::net::TcpListener;

/// A fake Graph server on localhost with an OS-assigned port.
pub struct FakeGraphServer {
    port: u16,
    tenant: Arc<Mutex<Tenant>>,
    /// Accept loop, aborted on drop.
    handle: tokio::task::JoinHandle<()>,
}

impl FakeGraphServer {
    /// Start a new fake Graph server serving `tenant`.
    ///
    /// Binds to `127.0.0.1:0` and spawns a tokio task that accepts
    /// connections. The task is aborted when the server is dropped.
    pub async fn start(tenant: Tenant) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to ephemeral port");
        let port = listener.local_addr().unwrap().port();
        let base = format!("http://127.0.0.1:{port}/v1.0");
        let tenant = Arc::new(Mutex::new(tenant));

        let shared = tenant.clone();
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _addr)) = listener.accept().await else {
                    break;
                };
                let tenant = shared.clone();
                let base = base.clone();
                tokio::spawn(async move {
                    handle_connection(stream, &base, &tenant).await;
                });
            }
        });

        Self {
            port,
            tenant,
            handle,
        }
    }

    /// The port the server is listening on.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Graph API root to configure clients with.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}/v1.0", self.port)
    }

    /// Shared handle on the served tenant.
    pub fn tenant(&self) -> Arc<Mutex<Tenant>> {
        self.tenant.clone()
    }

    /// Clone of the current tenant state.
    pub fn state(&self) -> Tenant {
        self.tenant.lock().unwrap().clone()
    }
}

impl Drop for FakeGraphServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A parsed request head.
struct Request {
    method: String,
    path: String,
    query: String,
    authorization: Option<String>,
}

/// Read the request line and headers, discarding any body.
async fn read_request<S: AsyncRead + AsyncWrite + Unpin>(
    reader: &mut BufReader<S>,
) -> Option<Request> {
    let mut line = String::new();
    reader.read_line(&mut line).await.ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?;
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    let mut authorization = None;
    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).await.ok()? == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            let value = value.trim();
            if name.eq_ignore_ascii_case("authorization") {
                authorization = Some(value.to_string());
            } else if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
        }
    }

    if content_length > 0 {
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await.ok()?;
    }

    Some(Request {
        method,
        path: path.to_string(),
        query: query.to_string(),
        authorization,
    })
}

/// Serve one request on a fresh connection.
///
/// Read handlers receive a snapshot (`Tenant` clone) taken under lock.
/// The delete handler receives `&Mutex<Tenant>` and locks briefly to
/// mutate state.
async fn handle_connection<S: AsyncRead + AsyncWrite + Unpin>(
    stream: S,
    base: &str,
    tenant: &Mutex<Tenant>,
) {
    let mut reader = BufReader::new(stream);
    let Some(request) = read_request(&mut reader).await else {
        return;
    };

    let snap = {
        let mut guard = tenant.lock().unwrap();
        let line = if request.query.is_empty() {
            format!("{} {}", request.method, request.path)
        } else {
            format!("{} {}?{}", request.method, request.path, request.query)
        };
        guard.requests.push(line);
        guard.clone()
    };

    let expected = format!("Bearer {}", snap.token);
    if request.authorization.as_deref() != Some(expected.as_str()) {
        let body = error_body("InvalidAuthenticationToken", "Access token has expired.");
        let _ = write_response(&mut reader, 401, Some(&body)).await;
        return;
    }

    let segments: Vec<&str> = request
        .path
        .trim_start_matches("/v1.0")
        .trim_matches('/')
        .split('/')
        .collect();

    match (request.method.as_str(), segments.as_slice()) {
        ("GET", ["me", "mailFolders", id]) => {
            handle_folder(id, &snap, &mut reader).await;
        }
        ("GET", ["me", collection]) => {
            handle_list(collection, &request.query, base, &snap, &mut reader).await;
        }
        ("DELETE", ["me", collection, id]) => {
            handle_delete(collection, id, tenant, &mut reader).await;
        }
        _ => {
            let body = error_body("BadRequest", "unsupported route");
            let _ = write_response(&mut reader, 400, Some(&body)).await;
        }
    }
}
