//! Database testing utilities
//!
//! Provides a seeded in-memory database for model tests:
//! - `job`, `user` and `secondary` tables with the standard seed rows
//! - Direct table access that bypasses any model
//! - `see_in_database` style assertions

use elif_model::{MemoryStore, Model, ModelConfig, Row, Store, WhereCondition};
use serde_json::Value as JsonValue;

use crate::assertions::json_contains;
use crate::{row, TestError, TestResult};

const USER_COLUMNS: &[&str] = &["id", "name", "email", "country", "deleted", "created_at", "updated_at"];
const JOB_COLUMNS: &[&str] = &["id", "name", "description", "created_at", "updated_at", "deleted"];
const SECONDARY_COLUMNS: &[&str] = &["id", "key", "value"];

/// Test database manager with the standard tables created and seeded
#[derive(Debug, Clone)]
pub struct TestDatabase {
    store: MemoryStore,
}

impl TestDatabase {
    /// Create and seed a fresh database
    pub fn new() -> TestResult<Self> {
        let db = Self::empty()?;
        db.seed()?;
        Ok(db)
    }

    /// Create the tables without any rows
    pub fn empty() -> TestResult<Self> {
        crate::logging::init_test_logging();
        let store = MemoryStore::new();
        store.create_table("user", USER_COLUMNS, Some("id"))?;
        store.create_table("job", JOB_COLUMNS, Some("id"))?;
        store.create_table("secondary", SECONDARY_COLUMNS, Some("id"))?;
        Ok(Self { store })
    }

    fn seed(&self) -> TestResult<()> {
        let users = [
            ("Derek Jones", "derek@world.com", "US"),
            ("Ahmadinejad", "ahmadinejad@world.com", "Iran"),
            ("Richard A Causey", "richard@world.com", "US"),
            ("Chris Martin", "chris@world.com", "UK"),
        ];
        let users = users
            .iter()
            .map(|(name, email, country)| {
                row(serde_json::json!({
                    "name": name,
                    "email": email,
                    "country": country,
                    "deleted": 0,
                }))
            })
            .collect::<TestResult<Vec<Row>>>()?;
        self.store.seed("user", users)?;

        let jobs = [
            ("Developer", "Awesome job, but sometimes makes you bored"),
            ("Politician", "This is not really a job"),
            ("Accountant", "Boring job, but you will get free snack at lunch"),
            ("Musician", "Only Coldplay can actually called Musician"),
        ];
        let jobs = jobs
            .iter()
            .map(|(name, description)| {
                row(serde_json::json!({
                    "name": name,
                    "description": description,
                    "deleted": 0,
                }))
            })
            .collect::<TestResult<Vec<Row>>>()?;
        self.store.seed("job", jobs)?;

        tracing::debug!("seeded test database");
        Ok(())
    }

    /// Get the underlying store
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// A model over this database; every model shares the same tables
    pub fn model(&self, config: ModelConfig) -> Model<MemoryStore> {
        Model::new(self.store.clone(), config)
    }

    /// Every row of a table, soft-deleted ones included
    pub fn rows(&self, table: &str) -> TestResult<Vec<Row>> {
        Ok(self.store.rows(table)?)
    }

    /// Rows whose columns include every key/value of `criteria`
    pub fn matching(&self, table: &str, criteria: &JsonValue) -> TestResult<Vec<Row>> {
        Ok(self
            .rows(table)?
            .into_iter()
            .filter(|stored| json_contains(&JsonValue::Object(stored.clone()), criteria))
            .collect())
    }

    /// Count records in a table matching `criteria`
    pub fn count_records(&self, table: &str, criteria: JsonValue) -> TestResult<usize> {
        Ok(self.matching(table, &criteria)?.len())
    }

    /// Insert a row directly, returning its key
    pub fn has_in_database(&self, table: &str, data: JsonValue) -> TestResult<JsonValue> {
        let data = row(data)?;
        let id = self.store.insert(table, &data)?;
        Ok(id.unwrap_or(JsonValue::Null))
    }

    /// Update rows matching `criteria` directly, bypassing any model
    pub fn update_where(&self, table: &str, criteria: JsonValue, set: JsonValue) -> TestResult<u64> {
        let conditions: Vec<WhereCondition> = row(criteria)?
            .into_iter()
            .map(|(column, value)| WhereCondition::eq(&column, value))
            .collect();
        Ok(self.store.update(table, &row(set)?, &conditions)?)
    }

    /// Assert that at least one row matches `criteria`
    pub fn see_in_database(&self, table: &str, criteria: JsonValue) -> TestResult<()> {
        if self.matching(table, &criteria)?.is_empty() {
            return Err(TestError::Assertion {
                message: format!("Expected a row in `{}` matching {}", table, criteria),
            });
        }
        Ok(())
    }

    /// Assert that no row matches `criteria`
    pub fn dont_see_in_database(&self, table: &str, criteria: JsonValue) -> TestResult<()> {
        let found = self.matching(table, &criteria)?;
        if !found.is_empty() {
            return Err(TestError::Assertion {
                message: format!(
                    "Expected no row in `{}` matching {}, found {}",
                    table,
                    criteria,
                    found.len()
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seeded_tables() {
        let db = TestDatabase::new().unwrap();
        assert_eq!(db.rows("user").unwrap().len(), 4);
        assert_eq!(db.rows("job").unwrap().len(), 4);
        assert!(db.rows("secondary").unwrap().is_empty());
    }

    #[test]
    fn test_see_and_dont_see() {
        let db = TestDatabase::new().unwrap();
        db.see_in_database("user", json!({ "name": "Derek Jones", "deleted": 0 })).unwrap();
        assert!(db.see_in_database("user", json!({ "name": "Nobody" })).is_err());
        db.dont_see_in_database("job", json!({ "name": "Pilot" })).unwrap();
    }

    #[test]
    fn test_has_in_database_and_update_where() {
        let db = TestDatabase::new().unwrap();
        let id = db
            .has_in_database("job", json!({ "name": "Rocket Scientist" }))
            .unwrap();
        assert_eq!(id, json!(5));

        let affected = db
            .update_where("user", json!({ "id": 4 }), json!({ "deleted": 1 }))
            .unwrap();
        assert_eq!(affected, 1);
        assert_eq!(db.count_records("user", json!({ "deleted": 1 })).unwrap(), 1);
    }
}
