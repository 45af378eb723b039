//! HTTP front-end
//!
//! Routes a slug to the content loader and wraps the result in a page.
//! Anything not matched by a route is served from the content directory,
//! which is how the raw `{slug}.md` sources are published.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::highlight::theme_css;
use crate::content::{ContentLoader, DirFetcher, LoadError, RenderedPost};
use crate::templates::{SiteData, TemplateRenderer};
use crate::Blog;

/// Server state
struct ServerState {
    blog: Blog,
    site: SiteData,
    loader: ContentLoader,
    fetcher: DirFetcher,
    templates: TemplateRenderer,
    stylesheet: String,
}

impl ServerState {
    fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            site: SiteData::from_config(&blog.config),
            loader: blog.loader(),
            fetcher: blog.fetcher(),
            templates: TemplateRenderer::new()?,
            stylesheet: theme_css(&blog.config.highlight.theme)?,
        })
    }

    async fn load(&self, slug: &str) -> Result<RenderedPost, LoadError> {
        let result = self.loader.render(slug, &self.fetcher).await;
        match &result {
            Ok(_) => tracing::debug!("Rendered post {}", slug),
            Err(e) if e.is_not_found() => tracing::debug!("{}", e),
            Err(e) => tracing::error!("{}", e),
        }
        result
    }

    fn error_page(&self, status: StatusCode, message: &str) -> Response {
        match self
            .templates
            .render_error(&self.site, status.as_u16(), message)
        {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (status, message.to_string()).into_response()
            }
        }
    }

    fn load_error_page(&self, err: &LoadError) -> Response {
        if err.is_not_found() {
            self.error_page(StatusCode::NOT_FOUND, "Post not found")
        } else {
            self.error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load post")
        }
    }
}

/// Build the application router
pub fn router(blog: &Blog) -> Result<Router> {
    let state = Arc::new(ServerState::new(blog)?);
    let assets = ServeDir::new(&blog.content_dir);

    Ok(Router::new()
        .route("/", get(index_handler))
        .route("/blog/:slug", get(post_handler))
        .route("/api/posts", get(posts_api_handler))
        .route("/api/blog/:slug", get(post_api_handler))
        .route("/highlight.css", get(stylesheet_handler))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let app = router(blog)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Listing of published posts
async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    let posts = state.blog.posts.published();
    match state.templates.render_index(&state.site, &posts) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render index: {}", e);
            state.error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render index")
        }
    }
}

/// A single rendered post page
async fn post_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    let rendered = match state.load(&slug).await {
        Ok(rendered) => rendered,
        Err(e) => return state.load_error_page(&e),
    };

    let meta = state.blog.posts.get(&slug);
    match state
        .templates
        .render_post(&state.site, meta.as_ref(), &rendered)
    {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render page for {}: {}", slug, e);
            state.error_page(StatusCode::INTERNAL_SERVER_ERROR, "Failed to render post")
        }
    }
}

/// The whole catalog, in catalog order
async fn posts_api_handler(State(state): State<Arc<ServerState>>) -> Response {
    Json(state.blog.posts.snapshot().to_vec()).into_response()
}

/// `{ slug, post }` for a single post
async fn post_api_handler(
    State(state): State<Arc<ServerState>>,
    Path(slug): Path<String>,
) -> Response {
    match state.load(&slug).await {
        Ok(rendered) => Json(rendered).into_response(),
        Err(e) => {
            let status = if e.is_not_found() {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            (status, Json(serde_json::json!({ "error": e.to_string() }))).into_response()
        }
    }
}

async fn stylesheet_handler(State(state): State<Arc<ServerState>>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        state.stylesheet.clone(),
    )
        .into_response()
}
