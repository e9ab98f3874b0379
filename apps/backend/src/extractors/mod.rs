pub mod current_user;
pub mod path_ids;

pub use current_user::CurrentUser;
pub use path_ids::{GameId, OperatorId, SquadId};
