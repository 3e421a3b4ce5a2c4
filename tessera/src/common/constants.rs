// document constants
pub const DOC_ID: &str = "id";
pub const FIELD_SEPARATOR: &str = ".";

// timestamp bookkeeping fields
pub const CREATED_AT: &str = "createdAt";
pub const UPDATED_AT: &str = "updatedAt";

// wire format constants
pub const WIRE_ID: &str = "_id";
pub const WIRE_OID: &str = "$oid";
pub const WIRE_DATE: &str = "$date";
pub const WIRE_NUMBER_DOUBLE: &str = "$numberDouble";

// store constants
pub const DEFAULT_STORE_NAME: &str = "tessera-memory";
