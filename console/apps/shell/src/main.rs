//! Console Shell Entry Point
//!
//! Restores the operator session, resolves the requested route and loads
//! the list behind it. Uses `anyhow` for startup errors; everything below
//! the shell reports through `kernel::error::AppError`.

mod shell;

use std::env;
use std::sync::Arc;

use auth::presentation::LoginForm;
use auth::{AuthConfig, CredentialStore, HttpAuthGateway, SessionController, SessionReader};
use listing::{
    Conversations, Faqs, HttpListSource, ListConfig, ListSource, Resource,
    ResourceListController, Suggestions, Users,
};
use platform::client::ApiClient;
use platform::config::ClientConfig;
use platform::cookie::MemoryCookieJar;
use platform::notify::TracingNotifier;
use platform::storage::FileStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::shell::{AppShell, Location};

const DEFAULT_DATA_DIR: &str = ".console";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shell=info,auth=info,listing=info,platform=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api = ApiClient::new(ClientConfig::from_env())?;
    tracing::info!(base_url = %api.config().base_url, "API client ready");

    let data_dir = env::var("CONSOLE_DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let storage = Arc::new(FileStore::open(&data_dir)?);

    let auth_config = Arc::new(if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig::default()
    });
    let store = Arc::new(CredentialStore::new(
        storage,
        Arc::new(MemoryCookieJar::new()),
        auth_config.clone(),
    ));
    let gateway = Arc::new(HttpAuthGateway::new(api.clone()));
    let session = Arc::new(SessionController::new(gateway, store, auth_config));

    let shell = Arc::new(AppShell::new(session.clone()));
    let listener = shell.spawn_event_listener();

    if !session.restore().await.is_authenticated() {
        sign_in(&session).await?;
    }

    let requested = env::args().nth(1).unwrap_or_else(|| "/".to_string());
    shell.navigate(&requested);
    let location = shell.settle();
    tracing::info!(location = location.path(), "Route settled");

    if let Some(profile) = session.snapshot().profile() {
        let nav: Vec<&str> = shell
            .routes()
            .navigable_for(profile.role)
            .iter()
            .map(|route| route.label)
            .collect();
        tracing::info!(?nav, "Navigation");
    }

    if let Location::At(path) = &location {
        let reader = session.reader();
        match path.as_str() {
            "/conversations" => load::<Conversations>(&api, reader).await,
            "/faqs" => load::<Faqs>(&api, reader).await,
            "/suggestions" => load::<Suggestions>(&api, reader).await,
            "/users" => load::<Users>(&api, reader).await,
            _ => {}
        }
    }

    listener.abort();
    Ok(())
}

/// Sign in with credentials from the environment, when present
async fn sign_in(session: &SessionController<HttpAuthGateway>) -> anyhow::Result<()> {
    let (Ok(username), Ok(password)) = (env::var("CONSOLE_USERNAME"), env::var("CONSOLE_PASSWORD"))
    else {
        tracing::info!("No stored session and no credentials configured");
        return Ok(());
    };

    let mut form = LoginForm::new();
    form.set_username(username);
    form.set_password(password);
    let profile = form.submit(session).await?;
    tracing::info!(username = %profile.username, role = %profile.role.as_str(), "Session started");
    Ok(())
}

async fn load<R>(api: &ApiClient, reader: SessionReader)
where
    R: Resource,
    HttpListSource<SessionReader>: ListSource<R>,
{
    let source = Arc::new(HttpListSource::new(api.clone(), reader));
    let list = ResourceListController::<R, _>::new(
        source,
        Arc::new(TracingNotifier),
        Arc::new(ListConfig::default()),
    );

    match list.refresh().await {
        Ok(()) => {
            let result = list.result();
            tracing::info!(
                resource = R::VOCABULARY.resource,
                items = result.items.len(),
                total = result.pagination.total,
                page = result.pagination.page,
                "List loaded"
            );
        }
        Err(err) => tracing::warn!(resource = R::VOCABULARY.resource, error = %err, "List failed"),
    }
}
