// Resume analysis: upload checks, the analysis call, and persistence of
// finished analyses.

pub mod analysis;
pub mod handlers;
pub mod upload;

pub use analysis::ResumeAnalysisCall;
