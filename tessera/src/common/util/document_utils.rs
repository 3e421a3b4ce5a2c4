use crate::collection::Document;
use crate::common::DOC_ID;

/// Keeps only the given paths plus the identifier.
pub(crate) fn project_include(document: &Document, fields: &[String]) -> Document {
    let mut projected = Document::new();
    if let Some(id) = document.get(DOC_ID) {
        projected.set(DOC_ID, id.clone());
    }

    for field in fields {
        if let Some(value) = document.get(field) {
            projected.set(field, value.clone());
        }
    }
    projected
}

/// Drops the given paths, identifier included when it is listed.
pub(crate) fn project_exclude(document: &Document, fields: &[String]) -> Document {
    let mut projected = document.clone();
    for field in fields {
        projected.unset(field);
    }
    projected
}
