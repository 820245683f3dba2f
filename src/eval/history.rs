use crate::common::Priority;
use std::fmt;

/// One intermediate step: the operation's code and what it produced.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HistoryEntry {
    pub priority: Priority,
    pub text: String,
}

impl HistoryEntry {
    pub fn new(priority: Priority, text: impl Into<String>) -> Self {
        Self {
            priority,
            text: text.into(),
        }
    }
}

/// The intermediate steps of one evaluation, in completion order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct FunctionHistory {
    entries: Vec<HistoryEntry>,
}

impl FunctionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    /// Entries grouped by priority, highest first. Each group keeps the
    /// order in which its entries were recorded.
    pub fn by_level(&self) -> Vec<(Priority, Vec<&str>)> {
        let mut levels: Vec<(Priority, Vec<&str>)> = Vec::new();
        for entry in &self.entries {
            match levels.iter_mut().find(|(p, _)| *p == entry.priority) {
                Some((_, texts)) => texts.push(&entry.text),
                None => levels.push((entry.priority, vec![&entry.text])),
            }
        }
        levels.sort_by(|(a, _), (b, _)| b.cmp(a));
        levels
    }
}

impl<'a> IntoIterator for &'a FunctionHistory {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for FunctionHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry.text)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_level() {
        let mut history = FunctionHistory::new();
        history.push(HistoryEntry::new(Priority::Dice, "(3d6) => 11 [3, 1, 7]"));
        history.push(HistoryEntry::new(Priority::Join, "((3d6)+4) => 15"));
        history.push(HistoryEntry::new(Priority::Dice, "(1d4) => 2 [2]"));

        assert_eq!(
            history.by_level(),
            vec![
                (Priority::Dice, vec!["(3d6) => 11 [3, 1, 7]", "(1d4) => 2 [2]"]),
                (Priority::Join, vec!["((3d6)+4) => 15"]),
            ]
        );
        assert_eq!(history.len(), 3);
        assert_eq!(history.to_string().lines().count(), 3);
    }

    #[test]
    fn test_empty() {
        let history = FunctionHistory::default();
        assert!(history.is_empty());
        assert!(history.by_level().is_empty());
        assert_eq!(history.to_string(), "");
    }
}
