//! UI components for the file sharing app.

mod app;
mod shared_files;
mod upload;

pub use app::*;
pub use shared_files::*;
pub use upload::*;
