pub mod config;
pub mod lifecycle;
pub mod menu;
pub mod pin;
pub mod releases;
pub mod sheets;
pub mod terminal;
pub mod transport;

#[cfg(test)]
pub mod test_support;
