//! `shiftdesk-gateway`: the axum HTTP surface over the scheduler.

pub mod app;
pub mod http;
