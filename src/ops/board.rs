use chrono::{Local, NaiveDate};

use crate::model::record::{Classification, RecordId, Stage, TaskRecord};

/// Error type for board operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("record not found: {0}")]
    NotFound(RecordId),
    #[error("title cannot be empty")]
    EmptyTitle,
}

/// The in-memory kanban board. Edits never reach the source document and
/// are discarded when the board is reloaded.
#[derive(Debug, Clone, Default)]
pub struct Board {
    records: Vec<TaskRecord>,
    next_id: usize,
}

impl Board {
    pub fn new(records: Vec<TaskRecord>) -> Self {
        let next_id = records.iter().map(|r| r.id.0 + 1).max().unwrap_or(0);
        Board { records, next_id }
    }

    pub fn records(&self) -> &[TaskRecord] {
        &self.records
    }

    /// Swap in a freshly parsed record list, dropping local edits.
    pub fn replace(&mut self, records: Vec<TaskRecord>) {
        *self = Board::new(records);
    }

    pub fn get(&self, id: RecordId) -> Option<&TaskRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: RecordId) -> Result<&mut TaskRecord, BoardError> {
        self.records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(BoardError::NotFound(id))
    }

    /// Move a card to another column. Moving to its current stage is a no-op.
    pub fn move_record(&mut self, id: RecordId, stage: Stage) -> Result<(), BoardError> {
        self.get_mut(id)?.stage = stage;
        Ok(())
    }

    /// Remove a card, returning it.
    pub fn delete_record(&mut self, id: RecordId) -> Result<TaskRecord, BoardError> {
        let pos = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(BoardError::NotFound(id))?;
        Ok(self.records.remove(pos))
    }

    /// Append a card dated today. Returns its id.
    pub fn add_record(
        &mut self,
        title: &str,
        description: Option<&str>,
        classification: Classification,
        stage: Stage,
    ) -> Result<RecordId, BoardError> {
        self.add_record_on(title, description, classification, stage, today())
    }

    fn add_record_on(
        &mut self,
        title: &str,
        description: Option<&str>,
        classification: Classification,
        stage: Stage,
        date: NaiveDate,
    ) -> Result<RecordId, BoardError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoardError::EmptyTitle);
        }
        let id = RecordId(self.next_id);
        self.next_id += 1;

        let mut record = TaskRecord::new(id, title, classification, stage);
        record.description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        record.occurred_on = Some(date);
        self.records.push(record);
        Ok(id)
    }

    /// Cards grouped into columns, in `Stage::ALL` order.
    pub fn columns(&self) -> Vec<(Stage, Vec<&TaskRecord>)> {
        let refs: Vec<&TaskRecord> = self.records.iter().collect();
        columns(&refs)
    }
}

/// Group records into board columns, keeping input order inside each.
pub fn columns<'a>(records: &[&'a TaskRecord]) -> Vec<(Stage, Vec<&'a TaskRecord>)> {
    Stage::ALL
        .iter()
        .map(|&stage| {
            let cards = records
                .iter()
                .copied()
                .filter(|r| r.stage == stage)
                .collect();
            (stage, cards)
        })
        .collect()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
