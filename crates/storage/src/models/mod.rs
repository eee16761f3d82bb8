pub mod athlete;
pub mod boat_class;
pub mod category;
pub mod club;
pub mod competition;
pub mod entry;
pub mod event;
pub mod gender;
pub mod race;
pub mod ranking_system;

pub use athlete::Athlete;
pub use boat_class::BoatClass;
pub use category::Category;
pub use club::Club;
pub use competition::{Competition, Stage};
pub use entry::{CompetitionEntry, EntryStatus};
pub use event::{Event, EventStatus, Medals, Phase, ProgressionConfig};
pub use gender::Gender;
pub use race::{Lane, LaneStatus, Race, RaceStatus, RaceWithLanes};
pub use ranking_system::{
    EntityType, GroupBy, JourneyMode, PointMode, RankingSystem, ScoringMode,
};
