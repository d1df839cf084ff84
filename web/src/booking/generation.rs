/// Sequence numbers for one kind of query. Only a response carrying the
/// latest issued number may be applied; anything older is stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryGeneration {
    latest: u64,
}

impl QueryGeneration {
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Makes every outstanding response stale without issuing a new query.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }
}
