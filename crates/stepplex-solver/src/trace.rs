use crate::tableau::Tableau;

/// A single executed pivot.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotInfo {
    /// Column that entered the basis.
    pub entering: usize,
    /// Column that left the basis.
    pub leaving: usize,
    /// Constraint row the pivot happened on.
    pub row: usize,
    /// Pivot element before the row was normalized.
    pub element: f64,
}

/// The tableau as it stood after `iteration` pivots.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub iteration: usize,
    pub tableau: Tableau,
    /// The pivot that produced this tableau; `None` only for the initial tableau.
    pub pivot: Option<PivotInfo>,
}

/// Append-only history of a solve: record 0 is the freshly built canonical
/// tableau, record k the tableau after the k-th pivot. Records are deep
/// copies and never mutated once pushed.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trace {
    steps: Vec<StepRecord>,
}

impl Trace {
    pub fn new() -> Trace {
        Trace { steps: Vec::new() }
    }

    /// Snapshot `tableau` as the next record.
    pub(crate) fn push(&mut self, tableau: &Tableau, pivot: Option<PivotInfo>) {
        let iteration = self.steps.len();
        self.steps.push(StepRecord {
            iteration,
            tableau: tableau.clone(),
            pivot,
        });
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, iteration: usize) -> Option<&StepRecord> {
        self.steps.get(iteration)
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.steps.last()
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepRecord> {
        self.steps.iter()
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a StepRecord;
    type IntoIter = std::slice::Iter<'a, StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
