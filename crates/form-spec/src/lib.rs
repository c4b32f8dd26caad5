#![allow(missing_docs)]

pub mod catalog;
pub mod compile;
pub mod edit;
pub mod expr;
pub mod form;
pub mod group;
pub mod ids;
pub mod rules;
pub mod spec;
pub mod store;
pub mod translate;

pub use catalog::{QuestionTemplate, question_pool, template};
pub use compile::{LogicDraft, LogicError, LogicMode, compile_logic};
pub use edit::{EditError, FieldEdit, NewQuestion, entries_from_texts};
pub use expr::{Expression, Operator};
pub use form::{Form, FormError};
pub use group::{FieldGroup, group_fields};
pub use ids::{IdSource, RandomIds, SequentialIds, generate_id};
pub use rules::{Rule, RuleKind, RuleValue, decode_rule, encode_rule};
pub use spec::{
    Behavior, Choice, Conditions, Field, FieldKind, InputType, Logic, QuestionType, Repeat,
    Trigger,
};
pub use store::{
    MemoryStore, Overwrite, SnapshotEntry, SnapshotIndex, SnapshotStore, StoreError, validate_name,
};
pub use translate::{
    FormNode, SurveyDocument, SurveyElement, TranslateOptions, translate, translate_grouped,
    translate_nodes,
};
