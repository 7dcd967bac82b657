use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use crate::error::{AppError, AppResult};

/// Request as seen by the stub server.
#[derive(Debug, Clone, Default)]
pub(crate) struct SeenRequest {
    pub(crate) method: String,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: String,
}

impl SeenRequest {
    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

pub(crate) struct StubReply {
    pub(crate) status: u16,
    pub(crate) headers: Vec<(&'static str, String)>,
    pub(crate) body: String,
}

impl StubReply {
    pub(crate) fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", "application/json".to_owned())],
            body: body.to_owned(),
        }
    }
}

type Handler = dyn Fn(&SeenRequest) -> StubReply + Send + Sync;

pub(crate) struct StubServer {
    pub(crate) url: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl StubServer {
    pub(crate) fn seen(&self) -> Vec<SeenRequest> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawns a blocking HTTP/1.1 server on an ephemeral port. Each connection
/// carries one request; `handler` builds the reply.
pub(crate) fn spawn_stub_server<F>(handler: F) -> AppResult<StubServer>
where
    F: Fn(&SeenRequest) -> StubReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| AppError::validation(format!("bind stub server failed: {}", err)))?;
    let addr = listener
        .local_addr()
        .map_err(|err| AppError::validation(format!("stub server addr failed: {}", err)))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| AppError::validation(format!("set_nonblocking failed: {}", err)))?;

    let handler: Arc<Handler> = Arc::new(handler);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_for_thread = Arc::clone(&seen);
    let (shutdown_tx, shutdown_rx) = mpsc::channel();

    let thread = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }
            match listener.accept() {
                Ok((stream, _)) => {
                    let handler = Arc::clone(&handler);
                    let seen = Arc::clone(&seen_for_thread);
                    thread::spawn(move || handle_client(stream, handler.as_ref(), &seen));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
                }
                Err(_) => break,
            }
        }
    });

    Ok(StubServer {
        url: format!("http://{}", addr),
        seen,
        shutdown: shutdown_tx,
        thread: Some(thread),
    })
}

fn handle_client(mut stream: TcpStream, handler: &Handler, seen: &Mutex<Vec<SeenRequest>>) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(request) = read_request(&mut stream) else {
        return;
    };
    let reply = handler(&request);
    if let Ok(mut seen) = seen.lock() {
        seen.push(request);
    }

    let extra_headers: String = reply
        .headers
        .iter()
        .map(|(key, value)| format!("{}: {}\r\n", key, value))
        .collect();
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n{}",
        reply.status,
        reason(reply.status),
        reply.body.len(),
        extra_headers,
        reply.body
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    drop(stream.flush());
    drop(stream.shutdown(Shutdown::Both));
}

fn read_request(stream: &mut TcpStream) -> Option<SeenRequest> {
    let mut raw = Vec::new();
    let mut buffer = [0u8; 1024];
    let header_end = loop {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            return None;
        }
        raw.extend_from_slice(buffer.get(..read)?);
        if let Some(position) = raw.windows(4).position(|window| window == b"\r\n\r\n") {
            break position.saturating_add(4);
        }
    };

    let head = String::from_utf8_lossy(raw.get(..header_end)?).into_owned();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_owned();
    let path = request_line.next()?.to_owned();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = raw.get(header_end..)?.to_vec();
    while body.len() < content_length {
        let read = stream.read(&mut buffer).ok()?;
        if read == 0 {
            break;
        }
        body.extend_from_slice(buffer.get(..read)?);
    }

    Some(SeenRequest {
        method,
        path,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

const fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}

/// Accepts connections and never answers them.
pub(crate) fn spawn_silent_server() -> AppResult<(String, thread::JoinHandle<()>)> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| AppError::validation(format!("bind silent server failed: {}", err)))?;
    let addr = listener
        .local_addr()
        .map_err(|err| AppError::validation(format!("silent server addr failed: {}", err)))?;
    let handle = thread::spawn(move || {
        if let Ok((stream, _)) = listener.accept() {
            thread::sleep(Duration::from_secs(2));
            drop(stream);
        }
    });
    Ok((format!("http://{}", addr), handle))
}

pub(crate) fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: std::future::Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}
