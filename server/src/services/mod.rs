pub mod chat_pump;
pub mod game_clock;
pub mod generation;
pub mod log_buffer;
