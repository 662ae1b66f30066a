// RosterSleuth - core/persist.rs
//
// Codecs for the three roster file dialects. Core layer: readers and writers
// are any `Read`/`Write`; the path is carried only for error context.
//
// All dialects are plain comma-separated text with no quoting. Fields are
// written verbatim, so a name containing a comma shifts the columns of its
// row; readers accept rows of any length and apply per-dialect minimums.

use crate::core::manager::StudentManager;
use crate::core::model::{parse_number, Course, Student};
use crate::util::constants::{
    FULL_HEADER, RESULTS_HEADER, RESULTS_LOAD_FIELDS, SUMMARY_HEADER, SUMMARY_MIN_FIELDS,
};
use crate::util::error::{FormatError, PersistError};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::io::{Read, Write};
use std::path::Path;

// =============================================================================
// Builders
// =============================================================================

fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .from_writer(writer)
}

fn csv_reader<R: Read>(reader: R, trim: Trim) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(trim)
        .from_reader(reader)
}

fn csv_err(path: &Path) -> impl Fn(csv::Error) -> PersistError + '_ {
    move |source| PersistError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn format_err(path: &Path, line: u64) -> impl Fn(FormatError) -> PersistError + '_ {
    move |source| PersistError::Format {
        path: path.to_path_buf(),
        line,
        source,
    }
}

fn flush<W: Write>(mut writer: csv::Writer<W>, path: &Path) -> Result<(), PersistError> {
    writer.flush().map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// Students-summary: ID,Name,CGPA
// =============================================================================

/// Write every student as `id,name,cgpa` with a two-decimal CGPA.
pub fn write_summary<W: Write>(
    manager: &StudentManager,
    writer: W,
    path: &Path,
) -> Result<usize, PersistError> {
    let mut out = csv_writer(writer);
    out.write_record(SUMMARY_HEADER).map_err(csv_err(path))?;

    for student in manager.iter() {
        let cgpa = format!("{:.2}", student.cgpa());
        out.write_record([student.id(), student.name(), cgpa.as_str()])
            .map_err(csv_err(path))?;
    }

    flush(out, path)?;
    Ok(manager.len())
}

/// Read a summary file into a fresh roster.
///
/// Fields are trimmed and empty fields are dropped before counting, so
/// `S1,Alice,` has two fields. Rows with fewer than three are skipped; a
/// non-numeric CGPA or a repeated id fails the load.
pub fn read_summary<R: Read>(reader: R, path: &Path) -> Result<StudentManager, PersistError> {
    let mut input = csv_reader(reader, Trim::All);
    let mut roster = StudentManager::new();

    for record in input.records() {
        let record = record.map_err(csv_err(path))?;
        let line = line_of(&record);
        let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
        if fields.len() < SUMMARY_MIN_FIELDS {
            tracing::debug!(path = %path.display(), line, "Skipping short summary row");
            continue;
        }

        let cgpa = parse_number("cgpa", fields[2]).map_err(format_err(path, line))?;
        roster
            .add_student(Student::new(fields[0], fields[1], cgpa))
            .map_err(|source| PersistError::Record {
                path: path.to_path_buf(),
                line,
                source,
            })?;
    }

    Ok(roster)
}

// =============================================================================
// Students-full: ID,Name,CGPA,Grades
// =============================================================================

/// Write every student as its full row, grades included.
pub fn write_full<W: Write>(
    manager: &StudentManager,
    writer: W,
    path: &Path,
) -> Result<usize, PersistError> {
    let mut out = csv_writer(writer);
    out.write_record(FULL_HEADER).map_err(csv_err(path))?;

    for student in manager.iter() {
        let row = student.to_row();
        out.write_record(row.split(',')).map_err(csv_err(path))?;
    }

    flush(out, path)?;
    Ok(manager.len())
}

/// Read a full file into a fresh roster. Every row must decode.
pub fn read_full<R: Read>(reader: R, path: &Path) -> Result<StudentManager, PersistError> {
    let mut input = csv_reader(reader, Trim::None);
    let mut roster = StudentManager::new();

    for record in input.records() {
        let record = record.map_err(csv_err(path))?;
        let line = line_of(&record);
        let fields: Vec<&str> = record.iter().collect();

        let student = Student::from_fields(&fields).map_err(format_err(path, line))?;
        roster
            .add_student(student)
            .map_err(|source| PersistError::Record {
                path: path.to_path_buf(),
                line,
                source,
            })?;
    }

    Ok(roster)
}

// =============================================================================
// Results
// =============================================================================

/// Write every recorded score as `id,code,score` (two decimals).
///
/// Note the loader expects a different, five-field row shape; a results
/// file written here cannot be read back by [`read_results`].
pub fn write_results<W: Write>(
    manager: &StudentManager,
    writer: W,
    path: &Path,
) -> Result<usize, PersistError> {
    let mut out = csv_writer(writer);
    out.write_record(RESULTS_HEADER).map_err(csv_err(path))?;

    let results = manager.results();
    for result in &results {
        let score = format!("{:.2}", result.score);
        out.write_record([
            result.student_id.as_str(),
            result.course_code.as_str(),
            score.as_str(),
        ])
        .map_err(csv_err(path))?;
    }

    flush(out, path)?;
    Ok(results.len())
}

/// Apply a results file to an existing roster.
///
/// Each row is `id,code,name,credits,score` and goes through
/// `StudentManager::add_result`, so unknown students and out-of-range scores
/// fail the load. Trailing empty fields are not counted, and rows with fewer
/// than five fields are skipped. Rows applied before a failure stay applied.
pub fn read_results<R: Read>(
    manager: &mut StudentManager,
    reader: R,
    path: &Path,
) -> Result<usize, PersistError> {
    let mut input = csv_reader(reader, Trim::All);
    let mut applied = 0;

    for record in input.records() {
        let record = record.map_err(csv_err(path))?;
        let line = line_of(&record);
        let fields = record.len() - record.iter().rev().take_while(|f| f.is_empty()).count();
        if fields < RESULTS_LOAD_FIELDS {
            tracing::debug!(
                path = %path.display(),
                line,
                fields,
                "Skipping short results row"
            );
            continue;
        }

        let credits: u32 = record[3]
            .parse()
            .map_err(|_| FormatError::InvalidNumber {
                field: "credits",
                raw: record[3].to_string(),
            })
            .map_err(format_err(path, line))?;
        let score = parse_number("score", &record[4]).map_err(format_err(path, line))?;
        let course = Course::new(&record[1], &record[2], credits);

        manager
            .add_result(&record[0], &course, score)
            .map_err(|source| PersistError::Record {
                path: path.to_path_buf(),
                line,
                source,
            })?;
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::RecordError;

    fn p() -> &'static Path {
        Path::new("roster.csv")
    }

    fn sample() -> StudentManager {
        let mut m = StudentManager::new();
        m.add_new_student("S1", "Alice", 4.5).unwrap();
        m.add_new_student("S2", "bob", 3.0).unwrap();
        m.add_result("S1", &Course::new("CS101", "Programming", 3), 90.0)
            .unwrap();
        m.add_result("S1", &Course::new("MA201", "Calculus", 4), 72.5)
            .unwrap();
        m
    }

    fn written<F>(write: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<usize, PersistError>,
    {
        let mut buf = Vec::new();
        write(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_summary() {
        let m = sample();
        let out = written(|buf| write_summary(&m, buf, p()));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["ID,Name,CGPA", "S1,Alice,4.50", "S2,bob,3.00"]);
    }

    #[test]
    fn test_read_summary_trims_and_skips_short_rows() {
        let input = "ID,Name,CGPA\n S1 , Alice , 4.50\nS2,bob\nS3,Carol,2.25\n";
        let m = read_summary(input.as_bytes(), p()).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("S1").unwrap().name(), "Alice");
        assert_eq!(m.get("S3").unwrap().cgpa(), 2.25);
        assert!(m.get("S2").is_none());
    }

    #[test]
    fn test_read_summary_skips_rows_with_empty_fields() {
        let input = "ID,Name,CGPA\nS1,Alice,\nS2,,3.0\nS3,Carol,2.25\n";
        let m = read_summary(input.as_bytes(), p()).unwrap();
        assert_eq!(m.len(), 1);
        assert_eq!(m.get("S3").unwrap().cgpa(), 2.25);
    }

    #[test]
    fn test_read_summary_takes_fields_after_empty_ones() {
        let input = "ID,Name,CGPA\nS1,,Alice,4.0\n";
        let m = read_summary(input.as_bytes(), p()).unwrap();
        assert_eq!(m.get("S1").unwrap().name(), "Alice");
        assert_eq!(m.get("S1").unwrap().cgpa(), 4.0);
    }

    #[test]
    fn test_read_summary_bad_cgpa_reports_line() {
        let input = "ID,Name,CGPA\nS1,Alice,4.5\nS2,Bob,abc\n";
        let err = read_summary(input.as_bytes(), p()).unwrap_err();
        match err {
            PersistError::Format { line, source, .. } => {
                assert_eq!(line, 3);
                assert!(matches!(source, FormatError::InvalidNumber { field: "cgpa", .. }));
            }
            other => panic!("expected Format error, got {other:?}"),
        }
    }

    #[test]
    fn test_read_summary_duplicate_id_fails() {
        let input = "ID,Name,CGPA\nS1,Alice,4.5\nS1,Again,3.0\n";
        let err = read_summary(input.as_bytes(), p()).unwrap_err();
        assert!(matches!(
            err,
            PersistError::Record {
                source: RecordError::DuplicateKey { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_write_full() {
        let m = sample();
        let out = written(|buf| write_full(&m, buf, p()));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "ID,Name,CGPA,Grades",
                "S1,Alice,4.50,CS101:90:Programming;MA201:72.5:Calculus",
                "S2,bob,3.00,",
            ]
        );
    }

    #[test]
    fn test_full_round_trip() {
        let m = sample();
        let out = written(|buf| write_full(&m, buf, p()));
        let back = read_full(out.as_bytes(), p()).unwrap();
        assert_eq!(back.students(), m.students());
    }

    #[test]
    fn test_read_full_short_row_fails() {
        let input = "ID,Name,CGPA,Grades\nS1,Alice\n";
        let err = read_full(input.as_bytes(), p()).unwrap_err();
        assert!(matches!(
            err,
            PersistError::Format {
                line: 2,
                source: FormatError::MissingFields { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_name_with_comma_corrupts_row() {
        let mut m = StudentManager::new();
        m.add_new_student("S1", "Doe, Jane", 4.0).unwrap();
        let out = written(|buf| write_summary(&m, buf, p()));
        assert!(out.contains("S1,Doe, Jane,4.00"));

        let err = read_summary(out.as_bytes(), p()).unwrap_err();
        assert!(matches!(err, PersistError::Format { .. }));
    }

    #[test]
    fn test_write_results() {
        let m = sample();
        let out = written(|buf| write_results(&m, buf, p()));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec!["ID,CourseCode,Score", "S1,CS101,90.00", "S1,MA201,72.50"]
        );
    }

    #[test]
    fn test_read_results_applies_five_field_rows() {
        let mut m = sample();
        let input = "ID,CourseCode,Score\n\
                     S2,CS101,Programming,3,70\n\
                     S2,PH110\n\
                     S1,CS101,Programming,3,80\n";
        let applied = read_results(&mut m, input.as_bytes(), p()).unwrap();
        assert_eq!(applied, 2);
        assert_eq!(m.get("S2").unwrap().grade("CS101"), Some(70.0));
        assert_eq!(m.get("S1").unwrap().grade("CS101"), Some(80.0));
        assert_eq!(m.class_average("CS101"), Ok(75.0));
    }

    #[test]
    fn test_read_results_ignores_trailing_empty_fields() {
        let mut m = sample();
        let input = "ID,CourseCode,Score\n\
                     S1,CS101,Prog,3,\n\
                     S2,PH110,Physics,2,,\n\
                     S2,CS101,Programming,3,55,\n";
        let applied = read_results(&mut m, input.as_bytes(), p()).unwrap();
        assert_eq!(applied, 1);
        assert_eq!(m.get("S1").unwrap().grade("CS101"), Some(90.0));
        assert_eq!(m.get("S2").unwrap().grade("PH110"), None);
        assert_eq!(m.get("S2").unwrap().grade("CS101"), Some(55.0));
    }

    #[test]
    fn test_saved_results_are_not_loadable() {
        let mut m = sample();
        let out = written(|buf| write_results(&m, buf, p()));

        let mut fresh = StudentManager::new();
        fresh.add_new_student("S1", "Alice", 4.5).unwrap();
        let applied = read_results(&mut fresh, out.as_bytes(), p()).unwrap();
        assert_eq!(applied, 0, "three-field rows are skipped by the loader");
        assert!(fresh.get("S1").unwrap().grades().is_empty());

        // Loading back into the source roster changes nothing either.
        let before = m.students().to_vec();
        read_results(&mut m, out.as_bytes(), p()).unwrap();
        assert_eq!(m.students(), before.as_slice());
    }

    #[test]
    fn test_read_results_propagates_roster_errors() {
        let mut m = sample();
        let unknown = "ID,CourseCode,Score\nS9,CS101,Programming,3,70\n";
        let err = read_results(&mut m, unknown.as_bytes(), p()).unwrap_err();
        assert!(matches!(
            err,
            PersistError::Record {
                source: RecordError::NotFound { .. },
                ..
            }
        ));

        let range = "ID,CourseCode,Score\nS1,PH110,Physics,3,101\n";
        let err = read_results(&mut m, range.as_bytes(), p()).unwrap_err();
        assert!(matches!(
            err,
            PersistError::Record {
                source: RecordError::OutOfRange { .. },
                ..
            }
        ));

        let credits = "ID,CourseCode,Score\nS1,PH110,Physics,three,50\n";
        let err = read_results(&mut m, credits.as_bytes(), p()).unwrap_err();
        assert!(matches!(
            err,
            PersistError::Format {
                source: FormatError::InvalidNumber {
                    field: "credits",
                    ..
                },
                ..
            }
        ));
    }
}
