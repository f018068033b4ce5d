//! Insert, update, save, delete and batch writes

use elif_model::{Keys, ModelError};
use elif_testing::prelude::*;
use elif_testing::row;

#[test]
fn test_save_new_record_object() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::job());

    let data = row(json!({
        "name": "Magician",
        "description": "Makes peoples things dissappear.",
    }))?;
    assert!(model.protect(false).save(data)?);

    db.see_in_database("job", json!({ "name": "Magician" }))
}

#[test]
fn test_save_update_record() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::job());

    let data = row(json!({
        "id": 1,
        "name": "Engineer",
        "description": "A fancier term for Developer.",
    }))?;
    assert!(model.protect(false).save(data)?);

    db.see_in_database("job", json!({ "id": 1, "name": "Engineer" }))?;
    assert_eq!(db.count_records("job", json!({}))?, 4);
    Ok(())
}

#[test]
fn test_save_protected() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::job());

    let data = row(json!({
        "id": 1,
        "name": "Engineer",
        "description": "A fancier term for Developer.",
        "random_thing": "Something wicked",
    }))?;
    assert!(model.protect(true).save(data)?);

    db.see_in_database("job", json!({ "id": 1, "name": "Engineer" }))
}

#[test]
fn test_unprotected_unknown_column_is_a_storage_error() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::job());

    let data = row(json!({ "name": "Engineer", "random_thing": "Something wicked" }))?;
    let result = model.protect(false).insert(data);
    assert!(matches!(result, Err(ref err) if err.is_database()));

    db.dont_see_in_database("job", json!({ "name": "Engineer" }))
}

#[test]
fn test_protection_without_allowed_fields() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(ModelConfig::new("job"));

    let result = model.insert(row(json!({ "name": "Engineer" }))?);
    assert!(matches!(result, Err(ModelError::Protection(_))));

    let result = model.protect(false).insert(row(json!({ "name": "Engineer" }))?);
    assert!(result?.is_some());
    Ok(())
}

#[test]
fn test_delete_basics() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::job());

    db.see_in_database("job", json!({ "name": "Developer" }))?;
    assert_eq!(model.delete(1, false)?, 1);
    db.dont_see_in_database("job", json!({ "name": "Developer" }))
}

#[test]
fn test_delete_with_soft_deletes() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::user());

    db.see_in_database("user", json!({ "name": "Derek Jones", "deleted": 0 }))?;
    model.delete(1, false)?;
    db.see_in_database("user", json!({ "name": "Derek Jones", "deleted": 1 }))?;

    assert!(model.find(1)?.is_empty());
    assert_eq!(model.with_deleted().find(1)?.len(), 1);
    Ok(())
}

#[test]
fn test_delete_with_soft_deletes_purge() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::user());

    db.see_in_database("user", json!({ "name": "Derek Jones", "deleted": 0 }))?;
    model.delete(1, true)?;
    db.dont_see_in_database("user", json!({ "name": "Derek Jones" }))?;

    assert!(model.with_deleted().find(1)?.is_empty());
    Ok(())
}

#[test]
fn test_delete_multiple() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::job());

    assert_eq!(model.delete(vec![1, 2], false)?, 2);

    db.dont_see_in_database("job", json!({ "name": "Developer" }))?;
    db.dont_see_in_database("job", json!({ "name": "Politician" }))?;
    db.see_in_database("job", json!({ "name": "Accountant" }))
}

#[test]
fn test_delete_no_params() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::job());

    model.where_eq("id", 1).delete(Keys::None, false)?;
    db.dont_see_in_database("job", json!({ "name": "Developer" }))
}

#[test]
fn test_delete_without_filter_is_refused() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::job());

    assert!(matches!(model.delete(Keys::None, false), Err(ModelError::Query(_))));
    assert_eq!(db.count_records("job", json!({}))?, 4);
    Ok(())
}

#[test]
fn test_purge_deleted() -> TestResult<()> {
    let db = TestDatabase::new()?;
    db.update_where("user", json!({ "id": 1 }), json!({ "deleted": 1 }))?;
    let mut model = db.model(fixtures::user());

    assert_eq!(model.purge_deleted()?, 1);
    assert_eq!(model.with_deleted().find_all(0, 0)?.len(), 3);

    let mut jobs = db.model(fixtures::job());
    assert_eq!(jobs.purge_deleted()?, 0);
    Ok(())
}

#[test]
fn test_purge_deleted_honours_pending_filters() -> TestResult<()> {
    let db = TestDatabase::new()?;
    db.update_where("user", json!({ "country": "US" }), json!({ "deleted": 1 }))?;
    let mut model = db.model(fixtures::user());

    assert_eq!(model.where_eq("id", 1).purge_deleted()?, 1);
    db.dont_see_in_database("user", json!({ "name": "Derek Jones" }))?;
    db.see_in_database("user", json!({ "name": "Richard A Causey", "deleted": 1 }))?;
    assert_eq!(model.only_deleted().count_all_results()?, 1);
    Ok(())
}

#[test]
fn test_insert_into_soft_delete_model_is_readable() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::user());

    let id = model
        .insert(row(json!({ "name": "Fred", "email": "fred@world.com", "country": "NZ" }))?)?
        .expect("inserted");
    db.see_in_database("user", json!({ "name": "Fred", "deleted": 0 }))?;

    assert_eq!(model.find(id)?.len(), 1);
    assert_eq!(model.count_all_results()?, 5);
    assert!(model.only_deleted().find_all(0, 0)?.is_empty());
    Ok(())
}

#[test]
fn test_insert_batch_into_soft_delete_model_is_readable() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::user());

    model.insert_batch(vec![
        row(json!({ "name": "Fred", "country": "NZ" }))?,
        row(json!({ "name": "Wilma", "country": "NZ", "deleted": 1 }))?,
    ])?;

    let live = model.where_eq("country", "NZ").find_all(0, 0)?;
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].get("name"), Some(&json!("Fred")));
    assert_eq!(model.where_eq("country", "NZ").only_deleted().count_all_results()?, 1);
    Ok(())
}

#[test]
fn test_passwords_store_correctly() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::user());

    let data = json!({
        "name": "$2y$10$kW0sEQ3tdGUFfYVxVNmY5eEFJ2/wVVCNPkQ3zW8Yv4N9qDHWQ0Kqe",
        "email": "foo@example.com",
        "country": "US",
        "deleted": 0,
    });
    model.insert(row(data.clone())?)?;

    db.see_in_database("user", data)
}

#[test]
fn test_set_works_with_insert() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let (config, _) = fixtures::event();
    let mut model = db.model(config);

    db.dont_see_in_database("user", json!({ "email": "foo@example.com" }))?;

    model
        .set(row(json!({
            "email": "foo@example.com",
            "name": "Foo Bar",
            "country": "US",
        }))?)
        .insert(())?;

    db.see_in_database("user", json!({ "email": "foo@example.com" }))?;
    assert!(model.builder().is_empty());
    Ok(())
}

#[test]
fn test_set_works_with_update() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let (config, _) = fixtures::event();
    let mut model = db.model(config);

    let user_id = model
        .insert(row(json!({
            "email": "foo@example.com",
            "name": "Foo Bar",
            "country": "US",
        }))?)?
        .expect("inserted");

    model
        .set(row(json!({ "name": "Fred Flintstone" }))?)
        .update(user_id.clone(), ())?;

    db.see_in_database(
        "user",
        json!({ "id": user_id, "email": "foo@example.com", "name": "Fred Flintstone" }),
    )
}

#[test]
fn test_set_works_with_update_no_id() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let (config, _) = fixtures::event();
    let mut model = db.model(config);

    let user_id = model
        .insert(row(json!({
            "email": "foo@example.com",
            "name": "Foo Bar",
            "country": "US",
        }))?)?
        .expect("inserted");

    model
        .where_eq("id", user_id.clone())
        .set(row(json!({ "name": "Fred Flintstone" }))?)
        .update(Keys::None, ())?;

    db.see_in_database(
        "user",
        json!({ "id": user_id, "email": "foo@example.com", "name": "Fred Flintstone" }),
    )?;
    db.see_in_database("user", json!({ "id": 1, "name": "Derek Jones" }))
}

#[test]
fn test_update_array() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let (config, _) = fixtures::event();
    let mut model = db.model(config);

    assert!(model.update(vec![1, 2], row(json!({ "name": "Foo Bar" }))?)?);

    db.see_in_database("user", json!({ "id": 1, "name": "Foo Bar" }))?;
    db.see_in_database("user", json!({ "id": 2, "name": "Foo Bar" }))?;
    db.see_in_database("user", json!({ "id": 3, "name": "Richard A Causey" }))
}

#[test]
fn test_update_without_filter_is_refused() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::job());

    let result = model.update(Keys::None, row(json!({ "name": "Everyone" }))?);
    assert!(matches!(result, Err(ModelError::Query(_))));
    db.dont_see_in_database("job", json!({ "name": "Everyone" }))
}

#[test]
fn test_insert_batch_success() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::job());

    let written = model.insert_batch(vec![
        row(json!({ "name": "Comedian", "description": "Theres something in your teeth" }))?,
        row(json!({ "name": "Cab Driver", "description": "Iam yellow" }))?,
    ])?;
    assert_eq!(written, Some(2));

    db.see_in_database("job", json!({ "name": "Comedian" }))?;
    db.see_in_database("job", json!({ "name": "Cab Driver" }))
}

#[test]
fn test_insert_batch_validation_fail() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::job());
    model.set_validation_rules(elif_validation::RuleSet::new().parse_field("description", "required")?);

    let result = model.insert_batch(vec![
        row(json!({ "name": "Comedian", "description": "Theres something in your teeth" }))?,
        row(json!({ "name": "Cab Driver", "description": null }))?,
    ])?;

    assert_eq!(result, None);
    assert!(model.errors().has_field_errors("description"));
    db.dont_see_in_database("job", json!({ "name": "Comedian" }))?;
    assert_eq!(db.count_records("job", json!({}))?, 4);
    Ok(())
}

#[test]
fn test_update_batch_success() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let (config, tokens) = fixtures::event();
    let mut model = db.model(config);

    let affected = model.update_batch(
        vec![
            row(json!({ "name": "Derek Jones", "country": "Greece" }))?,
            row(json!({ "name": "Ahmadinejad", "country": "Greece" }))?,
        ],
        "name",
    )?;
    assert_eq!(affected, Some(2));

    db.see_in_database("user", json!({ "name": "Derek Jones", "country": "Greece" }))?;
    db.see_in_database("user", json!({ "name": "Ahmadinejad", "country": "Greece" }))?;
    assert!(tokens.tokens().is_empty());
    Ok(())
}

#[test]
fn test_update_batch_validation_fail() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let (config, _) = fixtures::event();
    let mut model = db.model(config);
    model.set_validation_rules(elif_validation::RuleSet::new().parse_field("country", "required")?);

    let result = model.update_batch(
        vec![row(json!({ "name": "Derek Jones", "country": null }))?],
        "name",
    )?;

    assert_eq!(result, None);
    assert!(model.errors().has_field_errors("country"));
    db.see_in_database("user", json!({ "name": "Derek Jones", "country": "US" }))
}

#[test]
fn test_update_batch_requires_index_in_every_row() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let (config, _) = fixtures::event();
    let mut model = db.model(config);

    let result = model.update_batch(vec![row(json!({ "country": "Greece" }))?], "name");
    assert!(matches!(result, Err(ModelError::Query(_))));
    Ok(())
}

#[test]
fn test_update_no_primary_key() -> TestResult<()> {
    let db = TestDatabase::new()?;
    db.has_in_database("secondary", json!({ "id": 1, "key": "foo", "value": "bar" }))?;
    let mut model = db.model(fixtures::secondary());

    db.dont_see_in_database("secondary", json!({ "key": "bar", "value": "baz" }))?;

    model
        .where_eq("key", "foo")
        .update(Keys::None, row(json!({ "key": "bar", "value": "baz" }))?)?;

    db.see_in_database("secondary", json!({ "key": "bar", "value": "baz" }))
}

#[test]
fn test_storage_failure_leaves_no_state_behind() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::user());

    db.store().fail_next("server has gone away")?;
    let result = model.with_deleted().where_eq("country", "US").find_all(0, 0);
    assert!(matches!(result, Err(ModelError::Database(_))));

    assert!(model.builder().binds().is_empty());
    assert_eq!(model.find_all(0, 0)?.len(), 4);
    Ok(())
}

#[test]
fn test_timestamps_are_stamped() -> TestResult<()> {
    let db = TestDatabase::new()?;
    let mut model = db.model(fixtures::entity());

    let id = model
        .insert(row(json!({ "name": "Pilot", "description": "Flies" }))?)?
        .expect("inserted");

    let stored = db.matching("job", &json!({ "id": id }))?;
    let created = stored[0].get("created_at").cloned().unwrap_or_default();
    TestAssertions::assert_recent(&created, 60)?;
    assert_eq!(stored[0].get("updated_at"), Some(&created));
    Ok(())
}
