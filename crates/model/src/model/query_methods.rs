//! Query Methods - reads honouring pending clauses and soft-delete scope

use std::ops::ControlFlow;

use crate::entity::Entity;
use crate::error::{ModelError, ModelResult};
use crate::events::{EventData, ModelEvent};
use crate::query::{count_sql, OrderDirection, SelectStatement, WhereCondition};
use crate::store::{Row, Store};

use super::primary_key::Keys;
use super::record::{Found, Record};
use super::state::QueryState;
use super::Model;

impl<S: Store> Model<S> {
    /// Find by primary key.
    ///
    /// No id reads every row, a scalar id one row, a list of ids every
    /// matching row in store order.
    pub fn find(&mut self, id: impl Into<Keys>) -> ModelResult<Found> {
        let state = self.begin()?;
        let id = id.into();
        let single = id.is_one();

        let mut extra = Vec::new();
        if !id.is_none() {
            extra.extend(id.condition(self.primary_key()?));
        }

        let mut statement = self.select_statement(&state, extra);
        if single {
            statement = statement.paginate(1, 0);
        }

        let records = self.load(statement, &state, id)?;
        Ok(if single {
            Found::Single(records.into_iter().next())
        } else {
            Found::List(records)
        })
    }

    /// Up to `limit` rows (0 for all) starting at `offset`
    pub fn find_all(&mut self, limit: usize, offset: usize) -> ModelResult<Vec<Record>> {
        let state = self.begin()?;
        let statement = self.select_statement(&state, Vec::new()).paginate(limit, offset);
        self.load(statement, &state, Keys::None)
    }

    /// The first matching row, by primary key unless an order was given
    pub fn first(&mut self) -> ModelResult<Option<Record>> {
        let state = self.begin()?;
        let mut statement = self.select_statement(&state, Vec::new()).paginate(1, 0);

        if statement.order_by.is_empty() && !self.config.primary_key.is_empty() {
            statement.order_by = vec![(self.config.primary_key.clone(), OrderDirection::Asc)];
        }

        Ok(self.load(statement, &state, Keys::None)?.into_iter().next())
    }

    /// Number of rows matching the pending clauses
    pub fn count_all_results(&mut self) -> ModelResult<u64> {
        let state = self.begin()?;
        let conditions = self.read_conditions(&state, Vec::new());

        self.record_query(count_sql(&self.config.table, &conditions));
        self.store.count(&self.config.table, &conditions)
    }

    /// Visit every matching row, reading `size` rows at a time.
    ///
    /// The callback may return `ControlFlow::Break` to stop early.
    pub fn chunk<F>(&mut self, size: usize, mut callback: F) -> ModelResult<()>
    where
        F: FnMut(Record) -> ControlFlow<()>,
    {
        let state = self.begin()?;
        if size == 0 {
            return Err(ModelError::Query("chunk size must be greater than zero".to_string()));
        }

        let mut offset = 0;
        loop {
            let statement = self.select_statement(&state, Vec::new()).paginate(size, offset);
            let records = self.load(statement, &state, Keys::None)?;
            let fetched = records.len();

            for record in records {
                if callback(record).is_break() {
                    return Ok(());
                }
            }

            if fetched < size {
                return Ok(());
            }
            offset += size;
        }
    }

    /// Filters for a read: pending clauses, `extra`, then the deleted scope
    fn read_conditions(&self, state: &QueryState, extra: Vec<WhereCondition>) -> Vec<WhereCondition> {
        let mut conditions = state.builder.where_conditions().to_vec();
        conditions.extend(extra);
        conditions.extend(self.deleted_scope(state.deleted));
        conditions
    }

    fn select_statement(&self, state: &QueryState, extra: Vec<WhereCondition>) -> SelectStatement {
        SelectStatement::new(&self.config.table)
            .columns(state.builder.select_fields().to_vec())
            .conditions(self.read_conditions(state, extra))
            .order_by(state.builder.order().to_vec())
    }

    /// Run a select, pass the rows through afterFind and shape them
    fn load(&mut self, statement: SelectStatement, state: &QueryState, id: Keys) -> ModelResult<Vec<Record>> {
        self.record_query(statement.to_sql());
        let rows = self.store.select(&statement)?;

        let event = self.trigger(EventData::new(ModelEvent::AfterFind).id(id).rows(rows))?;
        let return_type = state.return_type.unwrap_or(self.config.return_type);

        Ok(event
            .rows
            .into_iter()
            .map(|row| Record::shape(row, return_type, |row| self.hydrate(row)))
            .collect())
    }

    /// Unsaved entity that knows this model's date columns
    pub fn new_entity(&self) -> Entity {
        Entity::new().with_dates(self.config.date_fields(), self.config.date_format)
    }

    /// Entity for a loaded row, with the model's date columns
    pub(crate) fn hydrate(&self, row: Row) -> Entity {
        Entity::from_row(row).with_dates(self.config.date_fields(), self.config.date_format)
    }
}
