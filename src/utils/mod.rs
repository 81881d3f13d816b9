pub mod paths;
pub mod terminal;
pub mod timestamps;

pub use paths::{format_path_with_tilde, validate_file_size};
pub use terminal::strip_ansi_codes;
pub use timestamps::{format_age, format_call_time, format_duration};
