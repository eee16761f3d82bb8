use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;

use config::Config;
use middleware::auth::ApiKeys;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::competitions::handlers::list_competitions,
        features::competitions::handlers::get_competition,
        features::competitions::handlers::list_stages,
        features::athletes::handlers::list_athletes,
        features::athletes::handlers::get_athlete,
        features::clubs::handlers::list_clubs,
        features::events::handlers::list_events,
        features::events::handlers::get_event,
        features::events::handlers::get_bracket,
        features::events::handlers::create_event,
        features::events::handlers::seed_time_trial,
        features::events::handlers::process_phase,
        features::events::handlers::approve_entries,
        features::races::handlers::get_race,
        features::races::handlers::record_results,
        features::rankings::handlers::get_rankings,
        features::rankings::handlers::list_ranking_systems,
        features::rankings::handlers::create_ranking_system,
    ),
    components(
        schemas(
            storage::dto::common::PaginationMeta,
            storage::dto::event::CreateEventRequest,
            storage::dto::event::EventResponse,
            storage::dto::event::SeedTimeTrialRequest,
            storage::dto::event::ProcessPhaseResponse,
            storage::dto::event::BracketResponse,
            storage::dto::event::ApproveEntriesRequest,
            storage::dto::event::BatchApprovalResponse,
            storage::dto::event::EntryFailure,
            storage::dto::race::RecordResultsRequest,
            storage::dto::race::LaneResultInput,
            storage::dto::race::RaceDetail,
            storage::dto::race::LaneDetail,
            storage::dto::ranking::RankingsResponse,
            storage::dto::ranking::RankingEntry,
            storage::dto::ranking::RankingScore,
            storage::dto::ranking::EntityRef,
            storage::dto::ranking::GroupMetadata,
            storage::dto::ranking::StageInfo,
            storage::dto::ranking::CreateRankingSystemRequest,
            storage::dto::ranking::PointTableRow,
            storage::models::Athlete,
            storage::models::BoatClass,
            storage::models::Category,
            storage::models::Club,
            storage::models::Competition,
            storage::models::Stage,
            storage::models::CompetitionEntry,
            storage::models::Event,
            storage::models::Race,
            storage::models::Lane,
            storage::models::RaceWithLanes,
            storage::models::RankingSystem,
        )
    ),
    tags(
        (name = "competitions", description = "Public competition endpoints"),
        (name = "athletes", description = "Public athlete endpoints"),
        (name = "clubs", description = "Public club endpoints"),
        (name = "events", description = "Event progression endpoints"),
        (name = "races", description = "Race and result endpoints"),
        (name = "rankings", description = "Ranking endpoints"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting federation competition API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin_routes = Router::new()
        .merge(features::events::routes::admin_routes())
        .merge(features::races::routes::admin_routes())
        .merge(features::rankings::routes::admin_routes())
        .layer(axum::middleware::from_fn_with_state(
            api_keys,
            middleware::auth::require_api_key,
        ));

    let api = Router::new()
        .merge(features::competitions::routes::routes())
        .merge(features::athletes::routes::routes())
        .merge(features::clubs::routes::routes())
        .merge(features::events::routes::routes())
        .merge(features::races::routes::routes())
        .merge(features::rankings::routes::routes())
        .merge(admin_routes);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", api)
        .layer(cors)
        .with_state(db);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .context("Failed to bind server address")?;
    axum::serve(listener, app).await?;

    Ok(())
}
