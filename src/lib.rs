pub mod api;
pub mod app;
pub mod browser;
pub mod cli;
pub mod config;
pub mod model;
pub mod output;
pub mod page;

#[cfg(test)]
mod tests;
