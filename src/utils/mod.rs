pub mod password;
pub mod time;

pub use time::format_duration;
