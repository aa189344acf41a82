// Test modules for all components
pub mod test_config;
pub mod test_environment;
pub mod test_replay_buffer;
