mod project_handlers;

pub(crate) use project_handlers::*;
