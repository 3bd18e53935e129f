use arena_api::{EntityKind, Record};

/// One table of backend records. Holds a copy of the last fetch only; the
/// records themselves are never edited locally.
#[derive(Debug, Default)]
pub struct ListPage {
    pub kind: EntityKind,
    pub records: Vec<Record>,
    pub selected: usize,
    pub loaded: bool,
    pub last_error: Option<String>,
}

impl ListPage {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind, ..Self::default() }
    }

    /// Replace the records, keeping the cursor on the same id when it survived.
    pub fn load(&mut self, records: Vec<Record>) {
        let previous = self.selected_record().map(|r| r.id().to_owned());
        self.records = records;
        self.loaded = true;
        self.last_error = None;
        self.selected = previous
            .and_then(|id| self.records.iter().position(|r| r.id() == id))
            .unwrap_or(self.selected)
            .min(self.records.len().saturating_sub(1));
    }

    pub fn fail(&mut self, message: String) {
        self.last_error = Some(message);
    }

    pub fn select_next(&mut self) {
        let max = self.records.len().saturating_sub(1);
        if self.selected < max {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_record(&self) -> Option<&Record> {
        self.records.get(self.selected)
    }

    pub fn live_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, Record::Match(m) if m.is_live()))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_api::{Match, MatchStatus, Team};

    fn team(id: &str) -> Record {
        Record::Team(Team { id: id.into(), name: format!("Time {id}"), ..Default::default() })
    }

    #[test]
    fn selection_is_clamped() {
        let mut page = ListPage::new(EntityKind::Team);
        page.select_next();
        assert_eq!(page.selected, 0);
        page.load(vec![team("a"), team("b")]);
        page.select_next();
        page.select_next();
        assert_eq!(page.selected, 1);
        page.select_prev();
        page.select_prev();
        assert_eq!(page.selected, 0);
    }

    #[test]
    fn reload_follows_the_selected_id() {
        let mut page = ListPage::new(EntityKind::Team);
        page.load(vec![team("a"), team("b"), team("c")]);
        page.select_next();
        page.load(vec![team("x"), team("a"), team("b")]);
        assert_eq!(page.selected_record().map(Record::id), Some("b"));
    }

    #[test]
    fn deleted_selection_stays_in_bounds() {
        let mut page = ListPage::new(EntityKind::Team);
        page.load(vec![team("a"), team("b")]);
        page.select_next();
        page.load(vec![team("a")]);
        assert_eq!(page.selected, 0);
        page.load(vec![]);
        assert_eq!(page.selected, 0);
        assert!(page.selected_record().is_none());
    }

    #[test]
    fn load_clears_errors() {
        let mut page = ListPage::new(EntityKind::Team);
        page.fail("Network error".into());
        page.load(vec![team("a")]);
        assert!(page.last_error.is_none());
        assert!(page.loaded);
    }

    #[test]
    fn counts_live_matches() {
        let mut page = ListPage::new(EntityKind::Match);
        page.load(vec![
            Record::Match(Match { id: "1".into(), status: MatchStatus::Live, ..Default::default() }),
            Record::Match(Match { id: "2".into(), status: MatchStatus::Finished, ..Default::default() }),
        ]);
        assert_eq!(page.live_count(), 1);
    }
}
