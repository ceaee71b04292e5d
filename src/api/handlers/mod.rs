pub mod auth;
pub mod docs;
pub mod users;
pub mod whatsapp;
