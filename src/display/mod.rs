//! Presentation of scan results: day-grouped listing, JSON, and paging

pub mod formatter;
pub mod pager;

pub use formatter::{render_commits, render_json, Palette};
pub use pager::{page, print, should_page};
