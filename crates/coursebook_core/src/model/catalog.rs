//! In-memory catalog of users, categories and courses.

use super::{Category, Course, CourseFactory, DomainError, Student, Teacher, User, UserFactory};
use crate::domain::{shared, DomainObject, Shared};
use std::rc::Rc;

/// In-memory registry of everything the application works with.
#[derive(Debug, Default)]
pub struct Catalog {
    pub teachers: Vec<Teacher>,
    pub students: Vec<Shared<Student>>,
    pub courses: Vec<Course>,
    pub categories: Vec<Shared<Category>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_user(kind: &str, name: impl Into<String>) -> Result<User, DomainError> {
        UserFactory::create(kind, name)
    }

    pub fn create_category(name: impl Into<String>) -> Shared<Category> {
        shared(Category::new(name))
    }

    pub fn create_course(
        kind: &str,
        name: impl Into<String>,
        category: &Shared<Category>,
    ) -> Result<Course, DomainError> {
        CourseFactory::create(kind, name, category)
    }

    /// Files a created user in the matching list and returns the student
    /// handle when the user is a student.
    pub fn add_user(&mut self, user: User) -> Option<Shared<Student>> {
        match user {
            User::Student(student) => {
                let student = shared(student);
                self.students.push(Rc::clone(&student));
                Some(student)
            }
            User::Teacher(teacher) => {
                self.teachers.push(teacher);
                None
            }
        }
    }

    /// # Errors
    /// - `CategoryNotFound` when no category carries `id`.
    pub fn find_category_by_id(&self, id: i64) -> Result<Shared<Category>, DomainError> {
        self.categories
            .iter()
            .find(|category| category.borrow().id() == Some(id))
            .map(Rc::clone)
            .ok_or(DomainError::CategoryNotFound(id))
    }

    pub fn get_course(&self, name: &str) -> Option<&Course> {
        self.courses.iter().find(|course| course.name() == name)
    }

    pub fn get_course_mut(&mut self, name: &str) -> Option<&mut Course> {
        self.courses.iter_mut().find(|course| course.name() == name)
    }

    pub fn get_student(&self, name: &str) -> Option<Shared<Student>> {
        self.students
            .iter()
            .find(|student| student.borrow().name == name)
            .map(Rc::clone)
    }
}
