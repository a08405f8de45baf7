//! `orderflow-api` — HTTP boundary for the order lifecycle engine.

pub mod app;
