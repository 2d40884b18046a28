use crate::domain::model::{AnalysisRecord, Finding};

/// Concatenates finding sequences for one document in the order given.
/// No deduplication or sorting; an empty result becomes the sentinel.
pub fn aggregate<I>(filename: &str, sequences: I) -> AnalysisRecord
where
    I: IntoIterator<Item = Vec<Finding>>,
{
    let findings: Vec<Finding> = sequences.into_iter().flatten().collect();
    AnalysisRecord::new(filename, findings)
}
