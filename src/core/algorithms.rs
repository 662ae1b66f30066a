// RosterSleuth - core/algorithms.rs
//
// Classic search and sort routines over a slice of students.
// Pure functions: they reorder or inspect the slice they are given and know
// nothing about the roster's id index. Id and name keys compare
// case-insensitively.

use crate::core::model::Student;
use std::cmp::Ordering;

/// Compare two strings ignoring case, character by character.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

// =============================================================================
// Searching
// =============================================================================

/// Position of the first student whose id equals `id` ignoring case.
///
/// O(n); works on any ordering.
pub fn linear_search_by_id(students: &[Student], id: &str) -> Option<usize> {
    students
        .iter()
        .position(|s| cmp_ignore_case(s.id(), id) == Ordering::Equal)
}

/// Position of a student whose id equals `id` ignoring case.
///
/// O(log n). The slice must already be sorted ascending by id (see
/// [`insertion_sort_by_id`]); on an unsorted slice the result is meaningless.
pub fn binary_search_by_id(students: &[Student], id: &str) -> Option<usize> {
    let mut lo = 0usize;
    let mut hi = students.len();
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match cmp_ignore_case(students[mid].id(), id) {
            Ordering::Equal => return Some(mid),
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }
    None
}

// =============================================================================
// Sorting
// =============================================================================

/// Sort ascending by id, ignoring case. Stable, in place, O(n^2) worst case.
pub fn insertion_sort_by_id(students: &mut [Student]) {
    for i in 1..students.len() {
        let mut j = i;
        while j > 0 && cmp_ignore_case(students[j - 1].id(), students[j].id()) == Ordering::Greater
        {
            students.swap(j - 1, j);
            j -= 1;
        }
    }
}

/// Sort descending by CGPA, in place.
///
/// Stops after the first pass that performs no swap, so already-sorted input
/// costs a single pass. Returns the number of passes made.
pub fn bubble_sort_by_cgpa_desc(students: &mut [Student]) -> usize {
    let n = students.len();
    let mut passes = 0;
    for i in 0..n.saturating_sub(1) {
        passes += 1;
        let mut swapped = false;
        for j in 0..n - i - 1 {
            if students[j].cgpa() < students[j + 1].cgpa() {
                students.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
    passes
}

/// Sort ascending by name, ignoring case, in place.
///
/// Quicksort with a Lomuto partition around the last element. Not stable;
/// degrades to O(n^2) time on sorted or duplicate-heavy input. Recursion
/// only descends into the smaller partition, so stack depth stays O(log n).
pub fn quick_sort_by_name(mut students: &mut [Student]) {
    while students.len() > 1 {
        let p = partition_by_name(students);
        let (left, right) = std::mem::take(&mut students).split_at_mut(p);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quick_sort_by_name(left);
            students = right;
        } else {
            quick_sort_by_name(right);
            students = left;
        }
    }
}

/// Lomuto partition: moves every name <= the pivot (last element) to the
/// front and returns the pivot's final position.
fn partition_by_name(students: &mut [Student]) -> usize {
    let hi = students.len() - 1;
    let mut store = 0;
    for j in 0..hi {
        if cmp_ignore_case(students[j].name(), students[hi].name()) != Ordering::Greater {
            students.swap(store, j);
            store += 1;
        }
    }
    students.swap(store, hi);
    store
}
