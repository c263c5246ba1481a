pub mod render;
pub mod switcher;

pub use render::{draw_session, project_session_view, DetailView, SessionView};
pub use switcher::{drive_session, run_session_scripted, run_session_tui};
