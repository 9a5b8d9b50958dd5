pub use crate::domain::participant::{Participant, ParticipantKind};
pub use crate::domain::category::{Category, KnockoutStage, TournamentFormat};
pub use crate::domain::group::GroupLabel;
pub use crate::domain::rounds::{MatchSide, Round, Seat};
pub use crate::domain::matches::{Match, MatchInsertRecord, MatchScore, MatchStatus, SetScore};
pub use crate::domain::calendar::{DayWindow, TournamentCalendar, TRANSITION_BUFFER_MINUTES};
pub use crate::standings::{rank_group, GroupStanding};
pub use uuid::Uuid;
