use antfriend_core::{describe_selection, Event, EventBus, GraphInput, Site, SiteSnapshot};
use antfriend_data::load_site;
use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tiny_http::{Header, Method, Response, Server, StatusCode};

#[derive(Debug, Parser)]
#[command(name = "antfriend-web", about = "Host the site pages and the JSON API")]
struct Cli {
    /// Interface to bind. Use 0.0.0.0 for LAN access.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8000, value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,
    /// Directory to serve. Defaults to the workspace `web/` directory.
    #[arg(long)]
    root: Option<PathBuf>,
    /// Directory holding banjo.json and vis/.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    debug: bool,
}

const DEFAULT_SEED: u64 = 0xBA_0A;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_filter = if cli.debug {
        "debug"
    } else {
        "antfriend_web=info,antfriend_core=info,antfriend_data=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(cli.debug)
        .init();

    let root = cli.root.clone().unwrap_or_else(default_root);
    let root = root
        .canonicalize()
        .ok()
        .filter(|path| path.is_dir())
        .with_context(|| {
            format!(
                "--root must be an existing directory, got: {}",
                root.display()
            )
        })?;

    let site = load_site(&cli.assets, cli.seed.unwrap_or(DEFAULT_SEED))
        .with_context(|| format!("load site from {}", cli.assets.display()))?;
    let state = Arc::new(Mutex::new(AppState::new(site)));

    let server = Server::http((cli.host.as_str(), cli.port)).map_err(|err| {
        anyhow::anyhow!("could not start server on {}:{}: {err}", cli.host, cli.port)
    })?;
    let base_url = format!("http://{}:{}/", cli.host, cli.port);
    tracing::info!(root = %root.display(), "serving");
    tracing::info!("URL: {base_url}");
    tracing::info!("Index: {base_url}index.html");

    for request in server.incoming_requests() {
        if let Err(err) = handle_request(request, &state, &root) {
            tracing::warn!(%err, "request error");
        }
    }
    Ok(())
}

fn default_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("web")
}

struct AppState {
    site: Site,
    events: EventBus,
    last: Instant,
}

impl AppState {
    fn new(mut site: Site) -> Self {
        let mut events = EventBus::default();
        site.boot(&mut events);
        Self {
            site,
            events,
            last: Instant::now(),
        }
    }

    /// Brings the site's timers up to the wall clock before a request is
    /// served.
    fn catch_up(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.site.catch_up(elapsed_ms, &mut self.events);
    }

    fn click(&mut self, slot: usize) -> ApiResponse {
        match self.site.click_card(slot, &mut self.events) {
            Ok(selection) => self.respond(Some(describe_selection(selection)), None),
            Err(err) => self.respond(None, Some(err.to_string())),
        }
    }

    fn command(&mut self, input: &str) -> ApiResponse {
        match self.site.interpret(input, &mut self.events) {
            Some(reply) => self.respond(Some(reply), None),
            None => self.respond(None, Some(format!("command not found: {input}"))),
        }
    }

    fn graph(&mut self, input: GraphInput) -> ApiResponse {
        self.site.graph_input(input, &mut self.events);
        self.respond(None, None)
    }

    fn respond(&mut self, reply: Option<String>, error: Option<String>) -> ApiResponse {
        ApiResponse {
            ok: error.is_none(),
            error,
            reply,
            state: self.site.snapshot(),
            events: self.events.drain().collect(),
        }
    }
}

#[derive(Serialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
    reply: Option<String>,
    state: SiteSnapshot,
    events: Vec<Event>,
}

#[derive(Deserialize)]
struct ClickRequest {
    slot: usize,
}

#[derive(Deserialize)]
struct CommandRequest {
    input: String,
}

fn handle_request(
    mut request: tiny_http::Request,
    state: &Arc<Mutex<AppState>>,
    root: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let url = request.url().to_string();
    let method = request.method().clone();
    let path = url.split(['?', '#']).next().unwrap_or_default();
    tracing::debug!(%method, path, "request");
    match (&method, path) {
        (&Method::Get, "/api/state") => {
            let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
            guard.catch_up();
            let response = guard.respond(None, None);
            respond_json(request, &response)
        }
        (&Method::Post, "/api/click" | "/api/command" | "/api/graph") => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
            guard.catch_up();
            match apply(&mut guard, path, &body) {
                Ok(response) => respond_json(request, &response),
                Err(err) => respond_error(request, 400, &err.to_string()),
            }
        }
        (&Method::Get | &Method::Head, _) => match resolve_static(root, path) {
            Some(file) => respond_with_file(request, &file),
            None => respond_error(request, 404, &format!("not found: {path}")),
        },
        _ => respond_error(request, 405, "method not allowed"),
    }
}

fn apply(state: &mut AppState, path: &str, body: &str) -> Result<ApiResponse, serde_json::Error> {
    Ok(match path {
        "/api/click" => {
            let click: ClickRequest = serde_json::from_str(body)?;
            state.click(click.slot)
        }
        "/api/command" => {
            let command: CommandRequest = serde_json::from_str(body)?;
            state.command(&command.input)
        }
        _ => {
            let input: GraphInput = serde_json::from_str(body)?;
            state.graph(input)
        }
    })
}

/// Maps a request path onto a file under `root`. Paths that would leave the
/// root are refused; directories resolve to their `index.html`.
fn resolve_static(root: &Path, url_path: &str) -> Option<PathBuf> {
    let relative = Path::new(url_path.trim_start_matches('/'));
    if !relative
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }
    let mut path = root.join(relative);
    if path.is_dir() {
        path = path.join("index.html");
    }
    path.is_file().then_some(path)
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("js") => "application/javascript",
        Some("css") => "text/css; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        _ => "application/octet-stream",
    }
}

fn respond_with_file(
    request: tiny_http::Request,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = std::fs::read(path)?;
    let header = Header::from_bytes(&b"Content-Type"[..], content_type(path))
        .map_err(|_| "invalid content type header")?;
    request.respond(Response::from_data(content).with_header(header))?;
    Ok(())
}

fn respond_json(
    request: tiny_http::Request,
    response: &ApiResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec_pretty(response)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "invalid content type header")?;
    request.respond(Response::from_data(body).with_header(header))?;
    Ok(())
}

fn respond_error(
    request: tiny_http::Request,
    status: u16,
    message: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_vec(&serde_json::json!({ "ok": false, "error": message }))?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "invalid content type header")?;
    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(header);
    request.respond(response)?;
    Ok(())
}
