// Infrastructure layer module
// Contains database adapters and external service integrations
// Follows Hexagonal Architecture

pub mod database;
pub mod openai;
pub mod repositories;
pub mod twilio;

pub use openai::OpenAiClient;
pub use twilio::TwilioClient;
