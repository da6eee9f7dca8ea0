use bson::{Bson, Document};
use serde::Serialize;

use common::errors::Error;

pub(crate) fn to_doc<T: Serialize>(value: &T) -> Result<Document, Error> {
    let bson = bson::to_bson(value)?;
    match bson {
        Bson::Document(doc) => Ok(doc),
        _ => Err(Error::internal_with_details(
            "value did not serialize to a document".to_string(),
        )),
    }
}
