//! Courses, their kinds and enrollment.

use super::{Category, DomainError, Student};
use crate::domain::Shared;
use std::rc::Rc;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseKind {
    Interactive,
    Record,
}

impl FromStr for CourseKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "interactive" => Ok(Self::Interactive),
            "record" => Ok(Self::Record),
            other => Err(DomainError::UnknownCourseKind(other.to_string())),
        }
    }
}

/// Course filed under one category, with its enrolled students.
#[derive(Debug)]
pub struct Course {
    kind: CourseKind,
    name: String,
    category: Shared<Category>,
    students: Vec<Shared<Student>>,
}

impl Course {
    /// Creates the course and files it under `category`.
    pub fn new(kind: CourseKind, name: impl Into<String>, category: &Shared<Category>) -> Self {
        let name = name.into();
        category.borrow_mut().courses.push(name.clone());
        Self {
            kind,
            name,
            category: Rc::clone(category),
            students: Vec::new(),
        }
    }

    pub fn kind(&self) -> CourseKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &Shared<Category> {
        &self.category
    }

    /// Enrolls `student`, linking the course on both sides.
    pub fn add_student(&mut self, student: &Shared<Student>) {
        self.students.push(Rc::clone(student));
        student.borrow_mut().courses.push(self.name.clone());
    }

    pub fn students(&self) -> &[Shared<Student>] {
        &self.students
    }

    /// Enrolled student by enrollment position.
    pub fn student(&self, index: usize) -> Option<&Shared<Student>> {
        self.students.get(index)
    }
}

/// Builds courses from a kind name.
pub struct CourseFactory;

impl CourseFactory {
    pub fn create(
        kind: &str,
        name: impl Into<String>,
        category: &Shared<Category>,
    ) -> Result<Course, DomainError> {
        let kind = kind.parse::<CourseKind>()?;
        Ok(Course::new(kind, name, category))
    }
}
