pub mod error;
pub mod loader;
pub mod record;
pub mod taxonomy;

pub use error::{QuizError, Result};
pub use loader::load_records;
pub use record::QuestionRecord;
pub use taxonomy::{TaxonomyPlan, ThemeEntry};
