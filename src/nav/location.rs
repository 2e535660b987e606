use super::query::QueryParams;

/// The addressable location of the current view
pub trait Location {
    fn read_query_params(&self) -> QueryParams;
    /// Apply updates to the current parameters (`None` removes a key) and
    /// make the result the current location.
    fn write_query_params(&mut self, updates: &[(&str, Option<String>)]);
}

/// Navigation history with push-state semantics.
///
/// Writing pushes a new entry and discards anything forward of the cursor.
/// Writing a location identical to the current one adds no entry.
#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<QueryParams>,
    cursor: usize,
}

impl History {
    pub fn new(initial: QueryParams) -> Self {
        History {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &QueryParams {
        &self.entries[self.cursor]
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Step back one entry. Returns false at the start of history.
    pub fn back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward one entry. Returns false at the end of history.
    pub fn forward(&mut self) -> bool {
        if !self.can_go_forward() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for History {
    fn default() -> Self {
        History::new(QueryParams::new())
    }
}

impl Location for History {
    fn read_query_params(&self) -> QueryParams {
        self.current().clone()
    }

    fn write_query_params(&mut self, updates: &[(&str, Option<String>)]) {
        let mut next = self.current().clone();
        next.apply(updates.iter().map(|(k, v)| (*k, v.clone())));
        if &next == self.current() {
            return;
        }
        self.entries.truncate(self.cursor + 1);
        self.entries.push(next);
        self.cursor += 1;
        tracing::trace!(location = %self.current(), "pushed location");
    }
}
