// Candidate-evaluation core.
// Pure scoring math lives here; the only async boundaries are the calls into
// the injected embedding capability.

pub mod evaluator;
pub mod extractor;
pub mod similarity;
pub mod skill_gap;
pub mod vocabulary;
