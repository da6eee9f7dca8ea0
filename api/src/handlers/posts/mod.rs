mod post_handlers;

pub(crate) use post_handlers::*;
