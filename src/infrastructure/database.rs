// MongoDB connection setup

use bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};

use crate::domain::user::User;

pub const USERS_COLLECTION: &str = "users";

/// Connect, verify the server answers, and ensure indexes exist
pub async fn connect(url: &str, database: &str) -> mongodb::error::Result<Database> {
    let mut options = ClientOptions::parse(url).await?;
    options.app_name = Some("cooking-assistant-api".to_string());

    let client = Client::with_options(options)?;
    let db = client.database(database);
    db.run_command(doc! { "ping": 1 }, None).await?;
    tracing::info!(database, "Connected to MongoDB");

    ensure_indexes(&db).await?;
    Ok(db)
}

pub async fn ensure_indexes(db: &Database) -> mongodb::error::Result<()> {
    let users = db.collection::<User>(USERS_COLLECTION);

    let phone = IndexModel::builder()
        .keys(doc! { "phone_number": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    let user_id = IndexModel::builder().keys(doc! { "user_id": 1 }).build();

    users.create_indexes(vec![phone, user_id], None).await?;
    Ok(())
}
