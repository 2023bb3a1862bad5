// Status and search filtering for the task view

use crate::models::Task;
use eyre::eyre;
use std::str::FromStr;

/// Restricts the view by completion state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Complete,
    Incomplete,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Complete => task.completed,
            StatusFilter::Incomplete => !task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Complete => "complete",
            StatusFilter::Incomplete => "incomplete",
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "complete" => Ok(StatusFilter::Complete),
            "incomplete" => Ok(StatusFilter::Incomplete),
            other => Err(eyre!(
                "Invalid status filter: {} (expected all, complete or incomplete)",
                other
            )),
        }
    }
}

/// Combined status + search predicate
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Lowercased search needle; empty matches everything
    needle: String,
    pub status: StatusFilter,
}

impl TaskFilter {
    pub fn new(search: &str, status: StatusFilter) -> Self {
        Self {
            needle: search.to_lowercase(),
            status,
        }
    }

    pub fn search(&self) -> &str {
        &self.needle
    }

    /// Case-insensitive substring match on text, then status
    pub fn matches(&self, task: &Task) -> bool {
        self.status.matches(task) && task.text.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(text: &str, completed: bool) -> Task {
        Task {
            id: 1,
            text: text.to_string(),
            completed,
        }
    }

    #[test]
    fn test_status_filter_matches() {
        let done = task("a", true);
        let open = task("b", false);

        assert!(StatusFilter::All.matches(&done));
        assert!(StatusFilter::All.matches(&open));
        assert!(StatusFilter::Complete.matches(&done));
        assert!(!StatusFilter::Complete.matches(&open));
        assert!(StatusFilter::Incomplete.matches(&open));
        assert!(!StatusFilter::Incomplete.matches(&done));
    }

    #[test]
    fn test_status_filter_parse() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("Complete".parse::<StatusFilter>().unwrap(), StatusFilter::Complete);
        assert_eq!(" incomplete ".parse::<StatusFilter>().unwrap(), StatusFilter::Incomplete);
        assert!("done".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn test_status_filter_display() {
        assert_eq!(StatusFilter::All.to_string(), "all");
        assert_eq!(StatusFilter::Incomplete.to_string(), "incomplete");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let filter = TaskFilter::new("milk", StatusFilter::All);
        assert!(filter.matches(&task("Buy Milk", false)));
        assert!(!filter.matches(&task("Buy bread", false)));

        let filter = TaskFilter::new("MILK", StatusFilter::All);
        assert!(filter.matches(&task("buy milk", false)));
    }

    #[test]
    fn test_empty_search_matches_everything() {
        let filter = TaskFilter::default();
        assert_eq!(filter.search(), "");
        assert!(filter.matches(&task("", false)));
        assert!(filter.matches(&task("anything", true)));
    }

    #[test]
    fn test_search_and_status_combine() {
        let filter = TaskFilter::new("report", StatusFilter::Complete);
        assert!(filter.matches(&task("Write report", true)));
        assert!(!filter.matches(&task("Write report", false)));
        assert!(!filter.matches(&task("Email boss", true)));
    }
}
