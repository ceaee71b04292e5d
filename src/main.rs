use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cooking_assistant_api::api::{self, AppState};
use cooking_assistant_api::assistant::{CookingAssistant, MessageDispatcher};
use cooking_assistant_api::config::Settings;
use cooking_assistant_api::infrastructure::database;
use cooking_assistant_api::infrastructure::repositories::MongoUserRepository;
use cooking_assistant_api::infrastructure::{OpenAiClient, TwilioClient};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cooking_assistant_api=info,tower_http=info")),
        )
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    // Connect to database
    tracing::info!(database = %settings.database_name, "Connecting to MongoDB...");
    let db = database::connect(&settings.mongodb_url, &settings.database_name)
        .await
        .expect("Failed to connect to MongoDB");

    let users = Arc::new(MongoUserRepository::new(&db));
    let llm = Arc::new(OpenAiClient::new(&settings.openai).expect("Failed to build OpenAI client"));
    let gateway =
        Arc::new(TwilioClient::new(&settings.twilio).expect("Failed to build Twilio client"));

    let assistant = Arc::new(CookingAssistant::new(
        llm,
        users.clone(),
        settings.openai.vision_model.clone(),
        settings.max_stored_history,
    ));
    let dispatcher = Arc::new(MessageDispatcher::new(assistant, users.clone(), gateway));

    let app = api::router(AppState::new(&settings, users, dispatcher));

    // Start server
    let addr = settings.bind_addr;
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    tracing::info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
