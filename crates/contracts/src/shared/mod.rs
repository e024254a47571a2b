pub mod api_error;
pub mod grid;
