pub mod game_operators;
pub mod game_squads;
pub mod games;
pub mod join_requests;
pub mod operators;
pub mod payments;
pub mod rankings;
pub mod squad_members;
pub mod squads;

pub use game_operators::Entity as GameOperators;
pub use game_squads::Entity as GameSquads;
pub use games::Entity as Games;
pub use games::Model as Game;
pub use join_requests::Entity as JoinRequests;
pub use operators::Entity as Operators;
pub use operators::Model as Operator;
pub use payments::Entity as Payments;
pub use rankings::Entity as Rankings;
pub use rankings::Model as Ranking;
pub use squad_members::Entity as SquadMembers;
pub use squads::Entity as Squads;
pub use squads::Model as Squad;
