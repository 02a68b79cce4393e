// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod ranker;
pub mod scoring;
pub mod selector;

pub use distance::{distance_km, haversine_distance};
pub use filters::{is_listable, within_radius, within_rent_ceiling};
pub use matcher::{Matcher, SearchResult};
pub use ranker::rank;
pub use scoring::{calculate_match_score, tally_criteria, CriteriaTally};
pub use selector::{CandidateSelector, Selection};
