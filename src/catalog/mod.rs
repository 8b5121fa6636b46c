//! Catalog consistency and reporting core: artist identity resolution,
//! display formatting, the report engine, and playlist membership.

mod artist_resolver;
pub mod display;
mod playlist;
mod report;

pub use artist_resolver::ArtistResolver;
pub use playlist::PlaylistMembership;
pub use report::{ReportEngine, ReportFilter};
