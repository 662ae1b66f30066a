// RosterSleuth - core/manager.rs
//
// The roster: an ordered sequence of students plus an id -> position index.
//
// Invariant: `index` holds exactly one entry per student in `students`,
// keyed by the id as stored (case-sensitive), pointing at that student's
// current position. Every operation that reorders or shrinks the sequence
// rebuilds the index before returning. The sequence itself carries no sort
// invariant; its order is whatever the last sort or insertion left.

use crate::core::algorithms;
use crate::core::model::{Course, CourseResult, Student};
use crate::util::constants::{MAX_SCORE, MIN_SCORE, NO_GRADES_SENTINEL};
use crate::util::error::RecordError;
use std::collections::HashMap;

/// Owns the roster and its id index. The only mutator of either.
#[derive(Debug, Default, Clone)]
pub struct StudentManager {
    students: Vec<Student>,
    index: HashMap<String, usize>,
}

impl StudentManager {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// The roster in its current order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Student> {
        self.students.iter()
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Exact (case-sensitive) lookup through the index.
    pub fn get(&self, id: &str) -> Option<&Student> {
        self.index.get(id).map(|&pos| &self.students[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Every recorded (student, course) score, in roster order.
    pub fn results(&self) -> Vec<CourseResult> {
        self.students
            .iter()
            .flat_map(|s| {
                s.grades().iter().map(move |(code, score)| CourseResult {
                    student_id: s.id().to_string(),
                    course_code: code.clone(),
                    score: *score,
                })
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Add / update / remove
    // -------------------------------------------------------------------------

    /// Append a student.
    ///
    /// Fails with `DuplicateKey` if a student with the identical id exists.
    /// Ids differing only by case are accepted.
    pub fn add_student(&mut self, student: Student) -> Result<(), RecordError> {
        if self.index.contains_key(student.id()) {
            return Err(RecordError::DuplicateKey {
                id: student.id().to_string(),
            });
        }
        tracing::debug!(id = student.id(), "Adding student");
        self.index
            .insert(student.id().to_string(), self.students.len());
        self.students.push(student);
        Ok(())
    }

    /// Construct and append a student with no grades.
    pub fn add_new_student(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        cgpa: f64,
    ) -> Result<(), RecordError> {
        self.add_student(Student::new(id, name, cgpa))
    }

    /// Overwrite a student's CGPA. No range check; callers own the scale.
    pub fn update_student_cgpa(&mut self, id: &str, cgpa: f64) -> Result<(), RecordError> {
        let student = self.get_mut(id)?;
        tracing::debug!(id, old = student.cgpa(), new = cgpa, "Updating CGPA");
        student.set_cgpa(cgpa);
        Ok(())
    }

    /// Overwrite a student's display name.
    pub fn rename_student(&mut self, id: &str, name: impl Into<String>) -> Result<(), RecordError> {
        self.get_mut(id)?.set_name(name);
        Ok(())
    }

    /// Remove a student from both the sequence and the index.
    ///
    /// Unknown ids are a no-op and return `None`.
    pub fn remove_student(&mut self, id: &str) -> Option<Student> {
        let pos = self.index.remove(id)?;
        let removed = self.students.remove(pos);
        self.reindex();
        tracing::debug!(id, "Removed student");
        Some(removed)
    }

    /// Drop every student.
    pub fn clear(&mut self) {
        self.students.clear();
        self.index.clear();
    }

    /// Replace the whole roster with another manager's contents.
    pub fn replace_with(&mut self, other: StudentManager) {
        *self = other;
    }

    // -------------------------------------------------------------------------
    // Searching
    // -------------------------------------------------------------------------

    /// Case-insensitive scan in current roster order.
    pub fn linear_search(&self, id: &str) -> Option<&Student> {
        algorithms::linear_search_by_id(&self.students, id).map(|pos| &self.students[pos])
    }

    /// Case-insensitive binary search.
    ///
    /// Sorts the roster by id first, so the roster order changes as a side
    /// effect of every call.
    pub fn binary_search(&mut self, id: &str) -> Option<&Student> {
        self.sort_by_id_insertion();
        algorithms::binary_search_by_id(&self.students, id).map(|pos| &self.students[pos])
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    pub fn sort_by_name_quick(&mut self) {
        algorithms::quick_sort_by_name(&mut self.students);
        self.reindex();
    }

    pub fn sort_by_cgpa_bubble_desc(&mut self) {
        let passes = algorithms::bubble_sort_by_cgpa_desc(&mut self.students);
        tracing::trace!(passes, "Bubble sort finished");
        self.reindex();
    }

    pub fn sort_by_id_insertion(&mut self) {
        algorithms::insertion_sort_by_id(&mut self.students);
        self.reindex();
    }

    // -------------------------------------------------------------------------
    // Results and summaries
    // -------------------------------------------------------------------------

    /// Record a score for a student in a course.
    ///
    /// Fails with `NotFound` for an unknown student, then `OutOfRange` for a
    /// score outside 0-100. Overwrites any earlier score for the course.
    pub fn add_result(
        &mut self,
        student_id: &str,
        course: &Course,
        score: f64,
    ) -> Result<(), RecordError> {
        let student = self.get_mut(student_id)?;
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(RecordError::OutOfRange {
                field: "score",
                value: score,
                min: MIN_SCORE,
                max: MAX_SCORE,
            });
        }
        student.add_named_grade(course.code.as_str(), course.name.as_str(), score);
        tracing::debug!(
            id = student_id,
            course = %course.code,
            credits = course.credits,
            "Recorded result"
        );
        Ok(())
    }

    /// Mean score for a course across every student who has one.
    pub fn class_average(&self, course_code: &str) -> Result<f64, RecordError> {
        let (sum, count) = self
            .students
            .iter()
            .filter_map(|s| s.grade(course_code))
            .fold((0.0, 0usize), |(sum, n), score| (sum + score, n + 1));

        if count == 0 {
            return Err(RecordError::NoData {
                course_code: course_code.to_string(),
            });
        }
        Ok(sum / count as f64)
    }

    /// Student with the highest CGPA; the earliest in roster order wins ties.
    pub fn top_performer_by_cgpa(&self) -> Option<&Student> {
        first_max_by_key(&self.students, Student::cgpa)
    }

    /// Student with the highest mean score; the earliest wins ties.
    ///
    /// Students without grades rank at -1, below any real average.
    pub fn top_performer_by_avg_score(&self) -> Option<&Student> {
        first_max_by_key(&self.students, |s| {
            s.average_score().unwrap_or(NO_GRADES_SENTINEL)
        })
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn get_mut(&mut self, id: &str) -> Result<&mut Student, RecordError> {
        match self.index.get(id) {
            Some(&pos) => Ok(&mut self.students[pos]),
            None => Err(RecordError::NotFound { id: id.to_string() }),
        }
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (pos, student) in self.students.iter().enumerate() {
            self.index.insert(student.id().to_string(), pos);
        }
    }
}

/// Maximum by an `f64` key, keeping the first element among equals.
fn first_max_by_key<F>(students: &[Student], key: F) -> Option<&Student>
where
    F: Fn(&Student) -> f64,
{
    let mut best: Option<(&Student, f64)> = None;
    for student in students {
        let k = key(student);
        match best {
            Some((_, best_k)) if k <= best_k => {}
            _ => best = Some((student, k)),
        }
    }
    best.map(|(s, _)| s)
}
