// Career suggestions: questionnaire validation, prompt, normalized result,
// and the long-lived operations clients poll for the outcome.

pub mod form;
pub mod handlers;
pub mod prompts;
pub mod salary;
pub mod suggestion;

pub use suggestion::CareerSuggestionCall;
