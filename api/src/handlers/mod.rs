pub(crate) mod files;
pub(crate) mod friends;
pub(crate) mod messages;
pub(crate) mod posts;
pub(crate) mod projects;
pub(crate) mod stories;
pub(crate) mod users;
