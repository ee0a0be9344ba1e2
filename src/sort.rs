//! Column ordering for a materialized result set.
//!
//! Directions are fixed per column: size sorts by raw byte count, largest
//! first; every other column sorts its displayed text ascending. All sorts
//! are stable.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::entry::ResultRecord;

/// A sortable column of the result table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Path,
    Size,
    Modified,
}

impl Column {
    pub fn title(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Path => "Path",
            Self::Size => "Size",
            Self::Modified => "Modified",
        }
    }

    /// Compare two records the way this column orders them.
    pub fn compare(self, a: &ResultRecord, b: &ResultRecord) -> Ordering {
        match self {
            Self::Size => b.size_bytes.cmp(&a.size_bytes),
            Self::Name => a.name.cmp(&b.name),
            Self::Path => a.parent_display().cmp(&b.parent_display()),
            Self::Modified => a.modified_display.cmp(&b.modified_display),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "path" => Ok(Self::Path),
            "size" => Ok(Self::Size),
            "modified" | "date" => Ok(Self::Modified),
            other => Err(format!("unknown column: {other}")),
        }
    }
}

/// Stable-sort `order` (indices into `records`) by `column`.
pub fn sort_indices(records: &[ResultRecord], order: &mut [usize], column: Column) {
    order.sort_by(|&a, &b| column.compare(&records[a], &records[b]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rec(name: &str, parent: &str, size: u64, display: &str) -> ResultRecord {
        ResultRecord {
            name: name.into(),
            parent_path: PathBuf::from(parent),
            size_bytes: size,
            size_display: display.into(),
            modified_display: String::new(),
            full_path: PathBuf::from(parent).join(name),
            is_directory: false,
        }
    }

    #[test]
    fn size_sorts_by_bytes_not_display() {
        let records = vec![
            rec("a", "/", 900, "900.0 B"),
            rec("b", "/", 2048, "2.0 KB"),
            rec("c", "/", 1_048_576, "1.0 MB"),
        ];
        let mut order = vec![0, 1, 2];
        sort_indices(&records, &mut order, Column::Size);
        assert_eq!(order, vec![2, 1, 0]);
    }

    #[test]
    fn name_sort_is_ascending_and_stable() {
        let records = vec![
            rec("beta", "/one", 0, ""),
            rec("alpha", "/two", 0, ""),
            rec("beta", "/three", 0, ""),
            rec("Zulu", "/four", 0, ""),
        ];
        let mut order = vec![0, 1, 2, 3];
        sort_indices(&records, &mut order, Column::Name);
        // Plain byte order: upper case first.
        assert_eq!(order, vec![3, 1, 0, 2]);
    }

    #[test]
    fn path_sort_uses_parent() {
        let records = vec![rec("x", "/b", 0, ""), rec("y", "/a", 0, "")];
        let mut order = vec![0, 1];
        sort_indices(&records, &mut order, Column::Path);
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn columns_parse() {
        assert_eq!("Size".parse(), Ok(Column::Size));
        assert_eq!(" modified ".parse(), Ok(Column::Modified));
        assert!("owner".parse::<Column>().is_err());
    }
}
