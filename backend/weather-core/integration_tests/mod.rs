mod config;
mod helpers;
mod pipeline;
mod request;
