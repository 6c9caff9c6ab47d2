use crate::github::issues::Issue;
use std::collections::HashMap;

/// Occurrence count per label name, remembering first-seen order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LabelTally {
    counts: Vec<(String, usize)>,
    positions: HashMap<String, usize>,
}

impl LabelTally {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut tally = LabelTally::default();
        for issue in issues {
            for (index, label) in issue.labels.iter().enumerate() {
                // an issue counts once per label
                if !issue.labels[..index].contains(label) {
                    tally.record(label);
                }
            }
        }
        tally
    }

    pub fn record(&mut self, label: &str) {
        match self.positions.get(label).copied() {
            Some(position) => self.counts[position].1 += 1,
            None => {
                self.positions.insert(label.to_string(), self.counts.len());
                self.counts.push((label.to_string(), 1));
            }
        }
    }

    /// Returns the `n` most frequent labels, highest count first.
    ///
    /// Equal counts keep the order in which the labels were first recorded.
    pub fn most_common(&self, n: usize) -> Vec<(String, usize)> {
        let mut ranked = self.counts.clone();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
impl LabelTally {
    fn count(&self, label: &str) -> usize {
        self.positions
            .get(label)
            .map_or(0, |&position| self.counts[position].1)
    }

    fn len(&self) -> usize {
        self.counts.len()
    }

    fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Counts every label across `issues` and returns the `n` most frequent.
pub fn top_labels(issues: &[Issue], n: usize) -> Vec<(String, usize)> {
    LabelTally::from_issues(issues).most_common(n)
}

/// Returns the issues carrying exactly `label`, in their original order.
pub fn filter_by_label<'a>(issues: &'a [Issue], label: &str) -> Vec<&'a Issue> {
    issues.iter().filter(|issue| issue.has_label(label)).collect()
}
