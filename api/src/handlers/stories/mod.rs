mod story_handlers;

pub(crate) use story_handlers::*;
