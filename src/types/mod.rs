pub mod date_window;
pub mod query;
pub mod record;
pub(crate) mod utils;
