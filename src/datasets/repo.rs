use serde_json::{Map, Value};
use sqlx::{PgPool, Row};

use crate::datasets::schema::{DatasetKind, DatasetSchema};

/// All rows of a dataset, newest insert first, as wire-shaped JSON objects.
/// An empty dataset yields an empty vec.
pub async fn fetch_all(db: &PgPool, kind: DatasetKind) -> anyhow::Result<Vec<Value>> {
    let schema = kind.schema();
    let sql = select_statement(schema);

    let rows = sqlx::query(&sql).fetch_all(db).await?;
    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        let mut map = Map::new();
        map.insert("id".into(), Value::from(row.try_get::<i32, _>("id")?));
        for field in schema.fields {
            let value: Option<String> = row.try_get(field.column)?;
            map.insert(field.wire.into(), value.map_or(Value::Null, Value::String));
        }
        records.push(Value::Object(map));
    }
    Ok(records)
}

/// Replace the whole dataset with `records`, stamped with the acting user.
/// Delete and inserts run in one transaction; any failure rolls the dataset
/// back to its prior state.
pub async fn replace_all(
    db: &PgPool,
    kind: DatasetKind,
    records: &[Value],
    acting_user_id: i32,
) -> anyhow::Result<()> {
    let schema = kind.schema();
    let sql = insert_statement(schema);

    let mut tx = db.begin().await?;
    sqlx::query(&format!("DELETE FROM {}", schema.table))
        .execute(&mut *tx)
        .await?;
    for record in records {
        let mut query = sqlx::query(&sql);
        for field in schema.fields {
            query = query.bind(text_value(record.get(field.wire)));
        }
        query = query.bind(acting_user_id);
        query.execute(&mut *tx).await?;
    }
    tx.commit().await?;
    Ok(())
}

fn select_statement(schema: &DatasetSchema) -> String {
    let columns: Vec<&str> = schema.fields.iter().map(|f| f.column).collect();
    format!(
        "SELECT id, {} FROM {} ORDER BY id DESC",
        columns.join(", "),
        schema.table
    )
}

fn insert_statement(schema: &DatasetSchema) -> String {
    let mut columns: Vec<&str> = schema.fields.iter().map(|f| f.column).collect();
    columns.push("created_by");
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        schema.table,
        columns.join(", "),
        placeholders.join(", ")
    )
}

/// Stored textual form of a wire field. Missing fields and explicit nulls
/// become NULL; numbers keep their JSON rendering.
fn text_value(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn select_orders_by_descending_id() {
        let sql = select_statement(DatasetKind::Epbg.schema());
        assert!(sql.starts_with("SELECT id, sno, contractor, po_no"));
        assert!(sql.ends_with("FROM epbg ORDER BY id DESC"));
    }

    #[test]
    fn insert_binds_every_field_plus_created_by() {
        let schema = DatasetKind::ContractorList.schema();
        let sql = insert_statement(schema);
        assert!(sql.starts_with("INSERT INTO contractor_list (sno, efile"));
        assert!(sql.contains("created_by"));
        // 11 business columns + created_by
        assert!(sql.contains("$12"));
        assert!(!sql.contains("$13"));
    }

    #[test]
    fn text_value_coerces_json_shapes() {
        assert_eq!(text_value(None), None);
        assert_eq!(text_value(Some(&Value::Null)), None);
        assert_eq!(
            text_value(Some(&json!("Acme Corp"))),
            Some("Acme Corp".into())
        );
        assert_eq!(text_value(Some(&json!(125000))), Some("125000".into()));
        assert_eq!(text_value(Some(&json!(12.5))), Some("12.5".into()));
        assert_eq!(text_value(Some(&json!(true))), Some("true".into()));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn fetch_all_on_untouched_dataset_is_empty(pool: PgPool) -> anyhow::Result<()> {
        let fetched = fetch_all(&pool, DatasetKind::BillTracker).await?;
        assert!(fetched.is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn replace_then_fetch_returns_exactly_the_records(pool: PgPool) -> anyhow::Result<()> {
        let records = vec![
            json!({"sno": "1", "contractor": "Acme", "poNo": "PO-77", "unknownField": "dropped"}),
            json!({"sno": "2", "contractor": "Globex", "bgAmount": 125000}),
        ];
        replace_all(&pool, DatasetKind::Epbg, &records, 42).await?;

        let fetched = fetch_all(&pool, DatasetKind::Epbg).await?;
        assert_eq!(fetched.len(), 2);
        // id DESC: the last insert comes back first.
        assert_eq!(fetched[0]["contractor"], "Globex");
        assert_eq!(fetched[0]["bgAmount"], "125000");
        assert_eq!(fetched[1]["contractor"], "Acme");
        assert_eq!(fetched[1]["poNo"], "PO-77");
        // Unmapped input fields vanish; unsupplied schema fields are null.
        assert!(fetched[1].get("unknownField").is_none());
        assert_eq!(fetched[1]["bgNo"], Value::Null);
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn replace_discards_all_prior_rows(pool: PgPool) -> anyhow::Result<()> {
        let first = vec![json!({"sno": "1"}), json!({"sno": "2"}), json!({"sno": "3"})];
        replace_all(&pool, DatasetKind::ContractorList, &first, 1).await?;

        let second = vec![json!({"sno": "9", "contractor": "Initech"})];
        replace_all(&pool, DatasetKind::ContractorList, &second, 1).await?;

        let fetched = fetch_all(&pool, DatasetKind::ContractorList).await?;
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0]["sno"], "9");
        assert_eq!(fetched[0]["contractor"], "Initech");
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn replace_with_empty_set_clears_the_dataset(pool: PgPool) -> anyhow::Result<()> {
        replace_all(&pool, DatasetKind::Epbg, &[json!({"sno": "1"})], 1).await?;
        replace_all(&pool, DatasetKind::Epbg, &[], 1).await?;

        let fetched = fetch_all(&pool, DatasetKind::Epbg).await?;
        assert!(fetched.is_empty());
        Ok(())
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn replace_stamps_acting_user_on_every_row(pool: PgPool) -> anyhow::Result<()> {
        let records = vec![json!({"sno": "1"}), json!({"sno": "2"})];
        replace_all(&pool, DatasetKind::BillTracker, &records, 7).await?;

        let stamps: Vec<(Option<i32>,)> =
            sqlx::query_as("SELECT created_by FROM bill_tracker")
                .fetch_all(&pool)
                .await?;
        assert_eq!(stamps.len(), 2);
        assert!(stamps.iter().all(|(by,)| *by == Some(7)));
        Ok(())
    }
}
