// Batch candidate analysis: runs the evaluation core over every stored
// resume and ranks the results.

pub mod batch;
pub mod handlers;
