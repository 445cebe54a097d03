mod buffer;
mod config;
mod settings;
