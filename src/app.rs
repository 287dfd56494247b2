//! Application module: the browsing model used by the TUI and runtime.
//!
//! `App` lives in `app::model` and holds the library list, the cursor and the
//! filter state.

mod model;

pub use model::*;
