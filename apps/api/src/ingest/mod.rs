// Resume ingestion: multipart PDF upload, text extraction, contact and
// skill extraction, in-memory storage. Everything here is peripheral to the
// evaluation core — it only produces the text and skill sets the core scores.

pub mod contact;
pub mod handlers;
pub mod parser;
pub mod store;
