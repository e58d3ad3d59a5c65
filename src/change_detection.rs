//! Variable list comparison between a processed and a raw dataset

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result of comparing two varlists.
///
/// Each list is sorted ascending by byte-wise string order. Names are
/// compared case-sensitively and duplicates within one input collapse to a
/// single entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableListComparison {
    pub common: Vec<String>,
    pub left_only: Vec<String>,
    pub right_only: Vec<String>,
}

impl VariableListComparison {
    /// Compare two varlists
    pub fn new(left: &[String], right: &[String]) -> Self {
        let left: BTreeSet<&str> = left.iter().map(String::as_str).collect();
        let right: BTreeSet<&str> = right.iter().map(String::as_str).collect();

        Self {
            common: left.intersection(&right).map(|s| s.to_string()).collect(),
            left_only: left.difference(&right).map(|s| s.to_string()).collect(),
            right_only: right.difference(&left).map(|s| s.to_string()).collect(),
        }
    }

    pub fn common_count(&self) -> usize {
        self.common.len()
    }

    pub fn left_only_count(&self) -> usize {
        self.left_only.len()
    }

    pub fn right_only_count(&self) -> usize {
        self.right_only.len()
    }

    /// The same comparison seen from the other side
    pub fn swapped(&self) -> Self {
        Self {
            common: self.common.clone(),
            left_only: self.right_only.clone(),
            right_only: self.left_only.clone(),
        }
    }

    /// Both sides hold the same set of names
    pub fn is_identical(&self) -> bool {
        self.left_only.is_empty() && self.right_only.is_empty()
    }
}

/// Compare two optional varlists; no comparison is possible unless both exist
pub fn compare_varlists(
    left: Option<&[String]>,
    right: Option<&[String]>,
) -> Option<VariableListComparison> {
    match (left, right) {
        (Some(left), Some(right)) => Some(VariableListComparison::new(left, right)),
        _ => None,
    }
}
