/// Database models
///
/// Each model owns its persistence operations as `async fn`s taking a
/// `&SqlitePool`, keeping the domain types independent of how handlers
/// compose them.
///
/// - `user`: user accounts (credential store)
/// - `task`: task records, always scoped to an owning user

pub mod task;
pub mod user;
