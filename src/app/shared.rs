// RosterSleuth - app/shared.rs
//
// A roster shared between several callers (e.g. threads serving UI actions).
//
// The manager updates its sequence and index in separate steps, so readers
// must never observe it mid-operation. Every method here takes the lock
// once, runs one manager operation to completion, and releases it.

use crate::app::storage;
use crate::core::manager::StudentManager;
use crate::core::model::{Course, Student};
use crate::util::error::{PersistError, RecordError};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// Cloneable handle to one lock-protected roster.
#[derive(Debug, Clone, Default)]
pub struct SharedRoster {
    inner: Arc<Mutex<StudentManager>>,
}

impl SharedRoster {
    pub fn new(manager: StudentManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Run `f` with exclusive access to the manager.
    ///
    /// For compound operations that must not interleave with other callers.
    pub fn with<T>(&self, f: impl FnOnce(&mut StudentManager) -> T) -> T {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of the roster in its current order.
    pub fn snapshot(&self) -> Vec<Student> {
        self.inner.lock().students().to_vec()
    }

    pub fn add_student(&self, student: Student) -> Result<(), RecordError> {
        self.inner.lock().add_student(student)
    }

    pub fn update_student_cgpa(&self, id: &str, cgpa: f64) -> Result<(), RecordError> {
        self.inner.lock().update_student_cgpa(id, cgpa)
    }

    pub fn remove_student(&self, id: &str) -> Option<Student> {
        self.inner.lock().remove_student(id)
    }

    pub fn linear_search(&self, id: &str) -> Option<Student> {
        self.inner.lock().linear_search(id).cloned()
    }

    pub fn binary_search(&self, id: &str) -> Option<Student> {
        self.inner.lock().binary_search(id).cloned()
    }

    pub fn sort_by_name_quick(&self) {
        self.inner.lock().sort_by_name_quick();
    }

    pub fn sort_by_cgpa_bubble_desc(&self) {
        self.inner.lock().sort_by_cgpa_bubble_desc();
    }

    pub fn sort_by_id_insertion(&self) {
        self.inner.lock().sort_by_id_insertion();
    }

    pub fn add_result(&self, student_id: &str, course: &Course, score: f64) -> Result<(), RecordError> {
        self.inner.lock().add_result(student_id, course, score)
    }

    pub fn class_average(&self, course_code: &str) -> Result<f64, RecordError> {
        self.inner.lock().class_average(course_code)
    }

    pub fn top_performer_by_cgpa(&self) -> Option<Student> {
        self.inner.lock().top_performer_by_cgpa().cloned()
    }

    pub fn top_performer_by_avg_score(&self) -> Option<Student> {
        self.inner.lock().top_performer_by_avg_score().cloned()
    }

    pub fn save_students_full(&self, path: &Path) -> Result<usize, PersistError> {
        storage::save_students_full(&self.inner.lock(), path)
    }

    pub fn load_students_full(&self, path: &Path) -> Result<usize, PersistError> {
        storage::load_students_full(&mut self.inner.lock(), path)
    }

    pub fn load_results(&self, path: &Path) -> Result<usize, PersistError> {
        storage::load_results(&mut self.inner.lock(), path)
    }
}
