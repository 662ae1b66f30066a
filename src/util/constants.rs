// RosterSleuth - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "RosterSleuth";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "RosterSleuth";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Record model
// =============================================================================

/// Display name reported for a course code with no recorded name.
pub const UNKNOWN_COURSE_NAME: &str = "Unknown Course";

/// Lowest valid course score (inclusive).
pub const MIN_SCORE: f64 = 0.0;

/// Highest valid course score (inclusive).
pub const MAX_SCORE: f64 = 100.0;

/// Lowest valid CGPA (inclusive). Enforced by callers, not by the manager.
pub const MIN_CGPA: f64 = 0.0;

/// Default upper CGPA bound (inclusive) when config does not override it.
pub const DEFAULT_MAX_CGPA: f64 = 5.0;

/// Hard upper bound on a configured CGPA scale.
pub const ABSOLUTE_MAX_CGPA: f64 = 10.0;

/// Average score assigned to students with no grades when ranking by
/// average. Lower than any real average, so such students only win when
/// nobody else is a candidate.
pub const NO_GRADES_SENTINEL: f64 = -1.0;

// =============================================================================
// CSV dialects
// =============================================================================

/// Header of the students-summary file.
pub const SUMMARY_HEADER: [&str; 3] = ["ID", "Name", "CGPA"];

/// Header of the students-full file.
pub const FULL_HEADER: [&str; 4] = ["ID", "Name", "CGPA", "Grades"];

/// Header written by the results saver.
pub const RESULTS_HEADER: [&str; 3] = ["ID", "CourseCode", "Score"];

/// Minimum fields in a summary row (id, name, cgpa).
pub const SUMMARY_MIN_FIELDS: usize = 3;

/// Minimum fields in a full row; the grades field is optional.
pub const FULL_MIN_FIELDS: usize = 3;

/// Fields the results loader expects: id, code, name, credits, score.
pub const RESULTS_LOAD_FIELDS: usize = 5;

/// Separator between grade triples in the full format's grades field.
pub const GRADE_SEPARATOR: char = ';';

/// Separator between code, score, and name inside a grade triple.
pub const GRADE_PART_SEPARATOR: char = ':';

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Extension appended to a save target while it is being written.
pub const TEMP_FILE_SUFFIX: &str = "tmp";
