// RosterSleuth - core/model.rs
//
// Core data model types: the student record and the value types that carry
// course results into the roster. Pure data definitions plus the row codec
// of the students-full format; no I/O.

use crate::util::constants::{
    FULL_MIN_FIELDS, GRADE_PART_SEPARATOR, GRADE_SEPARATOR, UNKNOWN_COURSE_NAME,
};
use crate::util::error::FormatError;
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Student
// =============================================================================

/// A single student record.
///
/// The id is fixed at construction. Name, CGPA, and grades are mutable, but
/// only through the roster manager once the record has been added to one.
/// CGPA is not range-checked here; callers enforce the scale they use.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    id: String,
    name: String,
    cgpa: f64,

    /// Course code -> score (0-100).
    grades: BTreeMap<String, f64>,

    /// Course code -> display name. May lack entries present in `grades`.
    course_names: BTreeMap<String, String>,
}

impl Student {
    /// Create a student with no grades.
    pub fn new(id: impl Into<String>, name: impl Into<String>, cgpa: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cgpa,
            grades: BTreeMap::new(),
            course_names: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn cgpa(&self) -> f64 {
        self.cgpa
    }

    pub fn set_cgpa(&mut self, cgpa: f64) {
        self.cgpa = cgpa;
    }

    /// All recorded scores, keyed by course code.
    pub fn grades(&self) -> &BTreeMap<String, f64> {
        &self.grades
    }

    /// Score for one course, if recorded.
    pub fn grade(&self, course_code: &str) -> Option<f64> {
        self.grades.get(course_code).copied()
    }

    /// Display name for a course code, or `"Unknown Course"` when none is known.
    pub fn course_name(&self, course_code: &str) -> &str {
        self.course_names
            .get(course_code)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_COURSE_NAME)
    }

    /// Insert or overwrite the score for a course. The course name is untouched.
    pub fn add_grade(&mut self, course_code: impl Into<String>, score: f64) {
        self.grades.insert(course_code.into(), score);
    }

    /// Insert or overwrite both the score and the display name for a course.
    pub fn add_named_grade(
        &mut self,
        course_code: impl Into<String>,
        course_name: impl Into<String>,
        score: f64,
    ) {
        let code = course_code.into();
        self.course_names.insert(code.clone(), course_name.into());
        self.grades.insert(code, score);
    }

    /// Mean of all recorded scores, or `None` with no grades.
    pub fn average_score(&self) -> Option<f64> {
        if self.grades.is_empty() {
            return None;
        }
        let sum: f64 = self.grades.values().sum();
        Some(sum / self.grades.len() as f64)
    }

    // -------------------------------------------------------------------------
    // Students-full row codec
    // -------------------------------------------------------------------------

    /// Encode as a students-full row: `id,name,cgpa,code:score:name;...`.
    ///
    /// CGPA is written with two decimals. Scores use the shortest exact
    /// representation so they survive a round trip unchanged.
    pub fn to_row(&self) -> String {
        let grades = self
            .grades
            .iter()
            .map(|(code, score)| {
                format!(
                    "{code}{sep}{score}{sep}{name}",
                    sep = GRADE_PART_SEPARATOR,
                    name = self.course_name(code)
                )
            })
            .collect::<Vec<_>>()
            .join(&GRADE_SEPARATOR.to_string());

        format!("{},{},{:.2},{}", self.id, self.name, self.cgpa, grades)
    }

    /// Decode a students-full row. See [`Student::from_fields`].
    pub fn from_row(row: &str) -> Result<Self, FormatError> {
        let fields: Vec<&str> = row.split(',').collect();
        Self::from_fields(&fields)
    }

    /// Decode from already-split top-level fields.
    ///
    /// Requires id, name, and cgpa. An optional fourth field holds
    /// `;`-separated grade tokens, each `code:score` or `code:score:name`.
    /// Tokens with fewer than two parts are ignored; a non-numeric score
    /// fails the whole row.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, FormatError> {
        if fields.len() < FULL_MIN_FIELDS {
            return Err(FormatError::MissingFields {
                row: fields
                    .iter()
                    .map(|f| f.as_ref())
                    .collect::<Vec<&str>>()
                    .join(","),
                found: fields.len(),
                expected: FULL_MIN_FIELDS,
            });
        }

        let id: &str = fields[0].as_ref();
        let name: &str = fields[1].as_ref();
        let cgpa = parse_number("cgpa", fields[2].as_ref())?;
        let mut student = Student::new(id, name, cgpa);

        let grades: Option<&str> = fields.get(3).map(|g| g.as_ref());
        if let Some(grades) = grades {
            if !grades.is_empty() {
                for token in grades.split(GRADE_SEPARATOR) {
                    let parts: Vec<&str> = token.splitn(3, GRADE_PART_SEPARATOR).collect();
                    match parts.as_slice() {
                        [code, score] => {
                            student.add_grade(*code, parse_number("score", score)?);
                        }
                        [code, score, course_name] => {
                            student.add_named_grade(
                                *code,
                                *course_name,
                                parse_number("score", score)?,
                            );
                        }
                        _ => {
                            tracing::debug!(token, "Skipping malformed grade token");
                        }
                    }
                }
            }
        }

        Ok(student)
    }
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} | CGPA: {:.2}", self.id, self.name, self.cgpa)
    }
}

/// Parse a numeric field, ignoring surrounding whitespace.
pub(crate) fn parse_number(field: &'static str, raw: &str) -> Result<f64, FormatError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| FormatError::InvalidNumber {
            field,
            raw: raw.to_string(),
        })
}

// =============================================================================
// Course and results
// =============================================================================

/// A course offering. Carries data into `StudentManager::add_result`;
/// the roster stores only the code and name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub code: String,
    pub name: String,
    pub credits: u32,
}

impl Course {
    pub fn new(code: impl Into<String>, name: impl Into<String>, credits: u32) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            credits,
        }
    }
}

/// One recorded score: a (student, course) grade pair.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseResult {
    pub student_id: String,
    pub course_code: String,
    pub score: f64,
}

impl fmt::Display for CourseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}: {}", self.student_id, self.course_code, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_name_defaults_to_unknown() {
        let mut s = Student::new("S1", "Alice", 4.5);
        s.add_grade("CS101", 90.0);
        assert_eq!(s.grade("CS101"), Some(90.0));
        assert_eq!(s.course_name("CS101"), "Unknown Course");

        s.add_named_grade("CS101", "Programming", 95.0);
        assert_eq!(s.grade("CS101"), Some(95.0));
        assert_eq!(s.course_name("CS101"), "Programming");
    }

    #[test]
    fn test_average_score() {
        let mut s = Student::new("S1", "Alice", 4.5);
        assert_eq!(s.average_score(), None);
        s.add_grade("A", 80.0);
        s.add_grade("B", 90.0);
        assert_eq!(s.average_score(), Some(85.0));
    }

    #[test]
    fn test_to_row_formats_cgpa_and_grades() {
        let mut s = Student::new("S1", "Alice", 4.5);
        s.add_named_grade("CS101", "Programming", 90.0);
        s.add_grade("MA201", 72.5);
        assert_eq!(
            s.to_row(),
            "S1,Alice,4.50,CS101:90:Programming;MA201:72.5:Unknown Course"
        );
    }

    #[test]
    fn test_to_row_without_grades_has_empty_trailing_field() {
        let s = Student::new("S2", "Bob", 3.0);
        assert_eq!(s.to_row(), "S2,Bob,3.00,");
    }

    #[test]
    fn test_from_row_reads_two_and_three_part_tokens() {
        let s = Student::from_row("S1,Alice,4.5,CS101:90.0:Programming;MA201:72.5").unwrap();
        assert_eq!(s.id(), "S1");
        assert_eq!(s.name(), "Alice");
        assert_eq!(s.cgpa(), 4.5);
        assert_eq!(s.grade("CS101"), Some(90.0));
        assert_eq!(s.course_name("CS101"), "Programming");
        assert_eq!(s.grade("MA201"), Some(72.5));
        assert_eq!(s.course_name("MA201"), "Unknown Course");
    }

    #[test]
    fn test_from_row_without_grades_field() {
        let s = Student::from_row("S3,Carol,2.75").unwrap();
        assert_eq!(s.cgpa(), 2.75);
        assert!(s.grades().is_empty());
    }

    #[test]
    fn test_from_row_skips_token_without_score() {
        let s = Student::from_row("S1,Alice,4.5,CS101;MA201:60").unwrap();
        assert_eq!(s.grades().len(), 1);
        assert_eq!(s.grade("MA201"), Some(60.0));
    }

    #[test]
    fn test_from_row_keeps_colons_in_course_name() {
        let s = Student::from_row("S1,Alice,4.5,CS101:90:Intro: Part 2;MA201:60").unwrap();
        assert_eq!(s.grade("CS101"), Some(90.0));
        assert_eq!(s.course_name("CS101"), "Intro: Part 2");
        assert_eq!(s.grade("MA201"), Some(60.0));
    }

    #[test]
    fn test_from_row_too_few_fields() {
        let err = Student::from_row("S1,Alice").unwrap_err();
        assert_eq!(
            err,
            FormatError::MissingFields {
                row: "S1,Alice".to_string(),
                found: 2,
                expected: 3,
            }
        );
    }

    #[test]
    fn test_from_row_non_numeric_cgpa() {
        let err = Student::from_row("S1,Alice,high").unwrap_err();
        assert!(matches!(err, FormatError::InvalidNumber { field: "cgpa", .. }));
    }

    #[test]
    fn test_from_row_non_numeric_score() {
        let err = Student::from_row("S1,Alice,4.0,CS101:ninety:Programming").unwrap_err();
        assert!(matches!(err, FormatError::InvalidNumber { field: "score", .. }));
    }

    #[test]
    fn test_row_round_trip_preserves_grades() {
        let mut s = Student::new("S1", "Alice", 4.5);
        s.add_named_grade("CS101", "Programming", 88.25);
        s.add_named_grade("PH110", "Physics", 61.0);
        let back = Student::from_row(&s.to_row()).unwrap();
        assert_eq!(back, s);
    }

    #[test]
    fn test_display() {
        let s = Student::new("S1", "Alice", 4.5);
        assert_eq!(s.to_string(), "S1 - Alice | CGPA: 4.50");

        let r = CourseResult {
            student_id: "S1".to_string(),
            course_code: "CS101".to_string(),
            score: 90.0,
        };
        assert_eq!(r.to_string(), "S1 - CS101: 90");
    }
}
