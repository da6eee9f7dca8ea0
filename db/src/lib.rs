mod database;

pub use database::friend::FriendRepo;
pub use database::message::MsgRepo;
pub use database::post::PostRepo;
pub use database::project::ProjectRepo;
pub use database::story::StoryRepo;
pub use database::user::UserRepo;
pub use database::DbRepo;
