mod config;
mod export;
mod validate;
