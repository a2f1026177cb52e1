//! Presentational widgets rendered to HTML fragments
//!
//! Widgets are either embedded by authors in post bodies (file tree,
//! terminal blocks) or placed on pages by the generator (theme toggle,
//! series navigation).

pub mod file_tree;
pub mod series_nav;
pub mod terminal;
pub mod theme_toggle;

pub use file_tree::{parse_structure, FileNode, NodeKind, TreeError};
pub use terminal::{CommandOutput, Terminal, TerminalSession};
