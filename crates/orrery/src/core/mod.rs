pub mod body;
pub mod constants;
pub mod rotation;
pub mod system;
pub mod time;
