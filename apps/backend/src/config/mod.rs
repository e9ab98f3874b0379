pub mod app;
pub mod db;

pub use app::AppConfig;
pub use db::{db_url, DbKind, DbOwner, RuntimeEnv};
