use staffdesk::{
    auth,
    config::session::{validate_production_config, SessionConfig},
    db, handlers,
    repositories::{SqliteRoleRepository, SqliteUserRepository},
    services::{
        create_email_service, AuthService, ClientService, EmploymentService, MagicLinkService,
        UserService,
    },
    AppState,
};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get, post},
    Router,
};
use staffdesk::auth::signed_url::LinkSigner;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tower_sessions::Session;
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "staffdesk=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = db::create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    // Repositories
    let user_repository = Arc::new(SqliteUserRepository::new(pool.clone()));
    let role_repository = Arc::new(SqliteRoleRepository::new(pool.clone()));

    // Services
    let auth_service = Arc::new(AuthService::new(
        user_repository.clone(),
        role_repository.clone(),
    ));
    let user_service = Arc::new(UserService::new(
        user_repository.clone(),
        role_repository.clone(),
    ));
    let email_service = create_email_service();
    let magic_link_service = Arc::new(MagicLinkService::new(
        user_repository.clone(),
        LinkSigner::from_env(),
        email_service,
    ));
    let client_service = Arc::new(ClientService::new(pool.clone()));
    let employment_service = Arc::new(EmploymentService::new(pool.clone()));

    let app_state = AppState {
        auth_service,
        user_service,
        magic_link_service,
        client_service,
        employment_service,
        pool: pool.clone(),
    };

    // Session store
    validate_production_config();
    let session_store = SqliteStore::new(pool.clone())
        .with_table_name("sessions")
        .expect("Invalid session table name");
    session_store.migrate().await?;

    let session_layer = SessionConfig::from_env().create_layer(session_store);

    let admin_routes = Router::new()
        .route("/admin/dashboard", get(handlers::admin_dashboard))
        .route("/admin/users", get(handlers::list_users))
        .route(
            "/admin/clients",
            get(handlers::list_clients).post(handlers::create_client),
        )
        .route("/admin/clients/{id}", post(handlers::update_client))
        .route("/admin/clients/{id}/delete", post(handlers::delete_client))
        .route(
            "/admin/employments",
            get(handlers::list_employments).post(handlers::create_employment),
        )
        .route("/admin/employments/{id}", post(handlers::update_employment))
        .route(
            "/admin/employments/{id}/delete",
            post(handlers::delete_employment),
        )
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth::middleware::require_admin,
        ));

    let protected_routes = Router::new()
        .route("/dashboard", get(handlers::dashboard))
        .route("/employments", get(handlers::my_employments))
        .route("/employments/{id}", get(handlers::employment_detail))
        // DELETE is the canonical logout; POST serves plain HTML forms.
        .route("/auth/session", delete(handlers::logout).post(handlers::logout))
        .layer(middleware::from_fn(auth::middleware::require_auth));

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/login", get(handlers::login_page))
        .route("/auth/password", post(handlers::password_login))
        .route("/auth/magic-link", post(handlers::request_magic_link))
        .route("/auth/magic-link/{user}", get(handlers::verify_magic_link))
        .merge(protected_routes)
        .merge(admin_routes)
        .nest_service("/static", ServeDir::new("static"))
        .layer(session_layer)
        .layer(middleware::from_fn(add_security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()?;

    let addr = SocketAddr::from((host.parse::<std::net::IpAddr>()?, port));

    tracing::info!("Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_security_headers(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self'; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' data:; \
             frame-ancestors 'none';",
        ),
    );
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if staffdesk::config::session::is_production() {
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        );
    }

    response
}

/// GET / - landing page, or straight to the dashboard when already signed in.
async fn index_handler(
    State(_state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, (axum::http::StatusCode, String)> {
    use askama::Template;

    let user_id = session
        .get::<i64>(auth::SESSION_USER_KEY)
        .await
        .map_err(|e| (axum::http::StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    if user_id.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let template = templates::IndexTemplate {};
    let html = template
        .render()
        .unwrap_or_else(|_| "Template error".to_string());
    Ok(axum::response::Html(html).into_response())
}

mod templates {
    use askama::Template;
    use askama_web::WebTemplate;

    #[derive(Template, WebTemplate)]
    #[template(path = "index.html")]
    pub struct IndexTemplate {}
}
