mod dates;
pub mod page_marker;
mod planetsuzy;
mod registry;
mod traits;

pub use dates::parse_post_date;
pub use planetsuzy::PlanetSuzyAdapter;
pub use registry::{ForumKind, ForumRegistry, UnsupportedForumKind};
pub use traits::{ForumAdapter, NavigationMode};
