pub mod config;
pub mod logging;

pub mod batch;
pub mod dedup;
pub mod guard;
pub mod http;
pub mod media;
pub mod naming;
pub mod pipeline;
pub mod storage;
pub mod url_model;
