pub(crate) mod custom_extract;
