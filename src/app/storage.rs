// RosterSleuth - app/storage.rs
//
// Path-based save/load entry points for the three roster file dialects.
// Wires the core codecs to scoped files from the platform layer.
//
// Student loads replace the roster, but only once the whole file has
// decoded: a file that fails part-way leaves the current roster as it was.
// Results loads merge into the current roster row by row.

use crate::core::manager::StudentManager;
use crate::core::persist;
use crate::platform::fs;
use crate::util::error::PersistError;
use std::path::Path;

/// Save id, name, and CGPA of every student.
pub fn save_students(manager: &StudentManager, path: &Path) -> Result<usize, PersistError> {
    let count = fs::write_atomic(path, |w| persist::write_summary(manager, w, path))?;
    tracing::info!(path = %path.display(), students = count, "Saved student summary");
    Ok(count)
}

/// Replace the roster with the contents of a summary file.
pub fn load_students(manager: &mut StudentManager, path: &Path) -> Result<usize, PersistError> {
    let reader = fs::open_reader(path)?;
    let loaded = persist::read_summary(reader, path)?;
    let count = loaded.len();
    manager.replace_with(loaded);
    tracing::info!(path = %path.display(), students = count, "Loaded student summary");
    Ok(count)
}

/// Save every student with their grades.
pub fn save_students_full(manager: &StudentManager, path: &Path) -> Result<usize, PersistError> {
    let count = fs::write_atomic(path, |w| persist::write_full(manager, w, path))?;
    tracing::info!(path = %path.display(), students = count, "Saved full roster");
    Ok(count)
}

/// Replace the roster with the contents of a full file.
pub fn load_students_full(
    manager: &mut StudentManager,
    path: &Path,
) -> Result<usize, PersistError> {
    let reader = fs::open_reader(path)?;
    let loaded = persist::read_full(reader, path)?;
    let count = loaded.len();
    manager.replace_with(loaded);
    tracing::info!(path = %path.display(), students = count, "Loaded full roster");
    Ok(count)
}

/// Save every recorded score as `id,code,score`.
pub fn save_results(manager: &StudentManager, path: &Path) -> Result<usize, PersistError> {
    let count = fs::write_atomic(path, |w| persist::write_results(manager, w, path))?;
    tracing::info!(path = %path.display(), results = count, "Saved results");
    Ok(count)
}

/// Apply a five-field results file to the roster.
pub fn load_results(manager: &mut StudentManager, path: &Path) -> Result<usize, PersistError> {
    let reader = fs::open_reader(path)?;
    let count = persist::read_results(manager, reader, path)?;
    tracing::info!(path = %path.display(), results = count, "Loaded results");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Course;
    use tempfile::TempDir;

    fn sample() -> StudentManager {
        let mut m = StudentManager::new();
        m.add_new_student("S1", "Alice", 4.5).unwrap();
        m.add_new_student("S2", "bob", 3.0).unwrap();
        m.add_result("S2", &Course::new("CS101", "Programming", 3), 66.0)
            .unwrap();
        m
    }

    #[test]
    fn test_summary_save_load_replaces_roster() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("students.csv");
        assert_eq!(save_students(&sample(), &path).unwrap(), 2);

        let mut m = StudentManager::new();
        m.add_new_student("OLD", "Stale", 1.0).unwrap();
        assert_eq!(load_students(&mut m, &path).unwrap(), 2);
        assert!(m.get("OLD").is_none());
        assert_eq!(m.get("S1").unwrap().cgpa(), 4.5);
        assert!(
            m.get("S2").unwrap().grades().is_empty(),
            "summary format carries no grades"
        );
    }

    #[test]
    fn test_failed_load_keeps_current_roster() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.csv");
        std::fs::write(&path, "ID,Name,CGPA,Grades\nS1,Alice,4.5\nS2,Bob,oops\n").unwrap();

        let mut m = sample();
        assert!(load_students_full(&mut m, &path).is_err());
        assert_eq!(m.len(), 2);
        assert_eq!(m.get("S2").unwrap().grade("CS101"), Some(66.0));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let mut m = StudentManager::new();
        let err = load_results(&mut m, &dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }
}
