use std::{process, sync::Arc};

use rozgar::{
    application::{
        admin::{
            aifill::AiFillService, auth::AdminAuthService, candidates::CandidateLedger,
            postings::AdminPostingService, settings::AdminSettingsService,
        },
        error::AppError,
        feed::FeedService,
        notify::{self, NewPostingWatch},
        store::{PostingsStore, SettingsStore},
        sweep,
    },
    config,
    domain::postings::ScheduleGate,
    infra::{
        ai::GenAiClient,
        error::InfraError,
        http::{self, AdminState, PublicState},
        last_seen::FileLastSeenStore,
        store::{MemoryStore, PostgresStore},
        telemetry,
    },
};
use tokio::try_join;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (_cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    run_serve(settings).await
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let gate = if settings.lifecycle.schedule_fail_closed {
        ScheduleGate::FailClosed
    } else {
        ScheduleGate::FailOpen
    };

    let (postings_store, settings_store) = init_stores(&settings).await?;

    // First-read initialization of the settings singleton.
    settings_store.ensure_settings().await?;

    let feed = Arc::new(FeedService::new(
        postings_store.subscribe(),
        settings_store.subscribe(),
        gate,
    ));

    let notify_handle = spawn_notification_watch(&settings, &postings_store);

    let sweep_handle = settings
        .scheduler
        .persist_scheduled
        .then(|| sweep::spawn_sweep(postings_store.clone(), settings.scheduler.cadence));

    let ai_client = settings
        .ai
        .api_key
        .as_ref()
        .map(|key| GenAiClient::new(key.clone(), settings.ai.model.clone()));
    if ai_client.is_none() {
        info!(target = "rozgar::admin", "no AI key configured, content fill disabled");
    }

    let admin_state = AdminState {
        auth: Arc::new(AdminAuthService::new(settings.admin.password.clone())),
        postings: Arc::new(AdminPostingService::new(postings_store.clone())),
        settings: Arc::new(AdminSettingsService::new(settings_store.clone())),
        aifill: AiFillService::new(ai_client),
        candidates: Arc::new(CandidateLedger::new()),
    };
    let public_state = PublicState { feed };

    let result = serve_http(&settings, public_state, admin_state).await;

    notify_handle.abort();
    let _ = notify_handle.await;
    if let Some(handle) = sweep_handle {
        handle.abort();
        let _ = handle.await;
    }

    result
}

async fn init_stores(
    settings: &config::Settings,
) -> Result<(Arc<dyn PostingsStore>, Arc<dyn SettingsStore>), AppError> {
    match settings.database.url.as_deref() {
        Some(url) => {
            let pool = PostgresStore::connect(url, settings.database.max_connections.get())
                .await
                .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;
            PostgresStore::run_migrations(&pool)
                .await
                .map_err(|err| AppError::from(InfraError::database(err.to_string())))?;
            let store = Arc::new(PostgresStore::new(pool));
            store.prime().await?;
            info!(target = "rozgar::store", "postgres store ready");
            Ok((store.clone() as _, store as _))
        }
        None => {
            warn!(
                target = "rozgar::store",
                "no database configured, postings are held in memory only"
            );
            let store = Arc::new(MemoryStore::new());
            Ok((store.clone() as _, store as _))
        }
    }
}

/// Watch store pushes for newest-published transitions and deliver the
/// operator-facing notification for each.
fn spawn_notification_watch(
    settings: &config::Settings,
    store: &Arc<dyn PostingsStore>,
) -> tokio::task::JoinHandle<()> {
    let mut receiver = store.subscribe();
    let watch = NewPostingWatch::new(FileLastSeenStore::new(settings.state_dir.clone()));
    tokio::spawn(async move {
        loop {
            let snapshot = receiver.borrow_and_update().clone();
            if let Some(alert) = watch.observe(&snapshot) {
                notify::deliver(&alert);
            }
            if receiver.changed().await.is_err() {
                break;
            }
        }
    })
}

async fn serve_http(
    settings: &config::Settings,
    public_state: PublicState,
    admin_state: AdminState,
) -> Result<(), AppError> {
    let public_router = http::build_public_router(public_state);
    let admin_router = http::build_admin_router(admin_state);

    let public_listener = tokio::net::TcpListener::bind(settings.server.public_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    let admin_listener = tokio::net::TcpListener::bind(settings.server.admin_addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target = "rozgar::http",
        public = %settings.server.public_addr,
        admin = %settings.server.admin_addr,
        "listening",
    );

    let public_server = axum::serve(public_listener, public_router.into_make_service());
    let admin_server = axum::serve(admin_listener, admin_router.into_make_service());

    try_join!(public_server, admin_server)
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}
