//! Course catalog domain model.
//!
//! # Responsibility
//! - Define students, teachers, categories and courses.
//! - Provide factory methods keyed by kind names and an in-memory catalog.
//!
//! # Invariants
//! - Only `Student` and `Category` are persistable.
//! - Enrollment and category membership are in-memory associations; the
//!   persistence layer neither stores nor cascades them.

use thiserror::Error;

mod catalog;
mod category;
mod course;
mod user;

pub use catalog::Catalog;
pub use category::Category;
pub use course::{Course, CourseFactory, CourseKind};
pub use user::{Student, Teacher, User, UserFactory, UserKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown user kind `{0}`; expected student|teacher")]
    UnknownUserKind(String),
    #[error("unknown course kind `{0}`; expected interactive|record")]
    UnknownCourseKind(String),
    #[error("no category with id {0}")]
    CategoryNotFound(i64),
    #[error("invalid form value: {0}")]
    InvalidFormValue(String),
}
