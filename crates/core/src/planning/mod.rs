//! Planning Store: the technical staff roster and communication plan of a project.

mod store;
mod types;

pub use store::PlanningStore;
pub use types::{CommunicationItem, NewCommunicationItem, NewTeamMember, TeamMember};
