pub mod movie;
pub mod search_event;

pub use movie::{GenreRecord, MovieDetails, MovieRecord, YearRange};
pub use search_event::{
    LogCollectionStats, PopularSearchSummary, RecentSearchSummary, SearchEvent, SearchKind,
    SearchParams,
};
