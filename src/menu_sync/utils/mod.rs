pub mod guards;
pub mod ids;
pub mod image;
pub mod progress;
pub mod time;
pub mod timeout;
