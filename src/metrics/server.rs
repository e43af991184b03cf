use prometheus::{Encoder, TextEncoder};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Binds the Prometheus endpoint and serves it in the background
///
/// Binding happens before returning so a port conflict surfaces to the caller.
pub async fn start_metrics_server(port: u16) -> std::io::Result<JoinHandle<()>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!(
        "Serving Prometheus metrics on http://{}/metrics",
        listener.local_addr()?
    );

    Ok(tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    debug!("Metrics request from {}", peer);
                    tokio::spawn(handle_connection(stream));
                }
                Err(e) => {
                    error!("Metrics server accept error: {}", e);
                }
            }
        }
    }))
}

async fn handle_connection(mut stream: TcpStream) {
    let mut buffer = [0; 1024];

    let read = match stream.read(&mut buffer).await {
        Ok(read) => read,
        Err(e) => {
            error!("Failed to read from stream: {}", e);
            return;
        }
    };

    let request = String::from_utf8_lossy(&buffer[..read]);
    let response = if is_metrics_request(&request) {
        match render_metrics() {
            Some(body) => format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/plain; version=0.0.4\r\nContent-Length: {}\r\n\r\n{}",
                body.len(),
                body
            ),
            None => "HTTP/1.1 500 Internal Server Error\r\nContent-Length: 0\r\n\r\n".to_string(),
        }
    } else {
        "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n".to_string()
    };

    if let Err(e) = stream.write_all(response.as_bytes()).await {
        debug!("Failed to write metrics response: {}", e);
    }
}

/// Accepts `GET /metrics` and `GET /`
fn is_metrics_request(request: &str) -> bool {
    let mut parts = request.split_whitespace();
    matches!(
        (parts.next(), parts.next()),
        (Some("GET"), Some("/metrics")) | (Some("GET"), Some("/"))
    )
}

fn render_metrics() -> Option<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut metrics_buffer = Vec::new();

    encoder.encode(&metric_families, &mut metrics_buffer).ok()?;
    String::from_utf8(metrics_buffer).ok()
}
