//! Middleware module - request logging

pub mod request_log;
