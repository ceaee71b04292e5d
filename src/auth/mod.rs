// Authentication for the admin API

pub mod jwt;
pub mod password;
