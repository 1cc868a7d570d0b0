// src/presentation/http/controllers/mod.rs
pub mod auth;
pub mod gateway;
pub mod proxy;
