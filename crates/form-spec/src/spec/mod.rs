pub mod field;
pub mod logic;

pub use field::{Choice, Field, FieldKind, InputType, QuestionType};
pub use logic::{Behavior, Conditions, Logic, Repeat, Trigger};
