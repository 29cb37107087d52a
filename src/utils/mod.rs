pub mod cancel;
pub mod environment;
pub mod logging;
pub mod paths;
pub mod terminal;

pub use cancel::CancelToken;
pub use environment::{default_worker_count, get_home_dir};
pub use paths::{
    MAX_HISTORY_FILE_BYTES, format_path_with_tilde, is_readable_file, open_history_file,
    validate_file_size,
};
pub use terminal::sanitize_for_display;
