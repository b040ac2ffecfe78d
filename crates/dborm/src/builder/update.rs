use super::BuiltQuery;
use super::where_in::{expand_in, joint_fields_in};
use crate::error::{OrmError, OrmResult};
use crate::ident::{self, write_quoted};
use crate::value::{Value, ValueMap};

/// Single-row update.
///
/// Every map entry that is not a key field goes into `SET`; every key field
/// becomes `` AND `k` = ? `` in the given order. Arguments are the SET values
/// followed by the key values.
pub fn build_update_query(table: &str, map: &ValueMap, keys: &[&str]) -> OrmResult<BuiltQuery> {
    ident::validate(table)?;
    if map.is_empty() {
        return Err(OrmError::EmptyUpdateMap {
            table: table.to_string(),
        });
    }

    let mut sql = String::from("UPDATE ");
    write_quoted(&mut sql, table);
    sql.push_str(" SET ");

    let mut args = Vec::with_capacity(map.len());
    let mut sets = 0;
    for (column, value) in map.iter() {
        if keys.contains(&column) {
            continue;
        }
        if sets > 0 {
            sql.push_str(", ");
        }
        write_quoted(&mut sql, column);
        sql.push_str(" = ?");
        args.push(value.clone());
        sets += 1;
    }

    sql.push_str(" WHERE true");
    for key in keys {
        let value = map.get(key).ok_or_else(|| OrmError::MissingKeyField {
            field: key.to_string(),
        })?;
        sql.push_str(" AND ");
        write_quoted(&mut sql, key);
        sql.push_str(" = ?");
        args.push(value.clone());
    }

    if sets == 0 {
        return Err(OrmError::EmptyUpdateMap {
            table: table.to_string(),
        });
    }

    Ok(BuiltQuery { sql, args })
}

/// Multi-row update in one statement.
///
/// ```text
/// UPDATE `t` SET `c` = CASE WHEN `k` = ? THEN ? WHEN `k` = ? THEN ? END, ...
/// WHERE (`k`) IN ((?),(?))
/// ```
///
/// The update columns are the non-key columns of the first record; every
/// record must carry all of them plus every key field. Arguments follow the
/// statement: per column, per record, the key values then the new value; then
/// the key tuples of the IN clause in record order.
pub fn build_update_batch_query(
    table: &str,
    records: &[ValueMap],
    keys: &[&str],
) -> OrmResult<BuiltQuery> {
    ident::validate(table)?;
    let first = records.first().ok_or(OrmError::RecordsEmpty)?;
    if keys.is_empty() {
        return Err(OrmError::FieldsEmpty);
    }

    let columns: Vec<&str> = first.keys().filter(|c| !keys.contains(c)).collect();
    if columns.is_empty() {
        return Err(OrmError::EmptyUpdateMap {
            table: table.to_string(),
        });
    }

    for (index, record) in records.iter().enumerate() {
        if let Some(missing) = keys
            .iter()
            .copied()
            .chain(columns.iter().copied())
            .find(|field| !record.contains_key(field))
        {
            return Err(OrmError::FieldNotFound {
                field: missing.to_string(),
                record: index,
            });
        }
    }

    let mut when = String::from(" WHEN ");
    for (i, key) in keys.iter().enumerate() {
        if i > 0 {
            when.push_str(" AND ");
        }
        write_quoted(&mut when, key);
        when.push_str(" = ?");
    }
    when.push_str(" THEN ?");

    let mut sql = String::from("UPDATE ");
    write_quoted(&mut sql, table);
    sql.push_str(" SET ");

    let n = records.len();
    let mut args = Vec::with_capacity(columns.len() * n * (keys.len() + 1) + n * keys.len());
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        write_quoted(&mut sql, column);
        sql.push_str(" = CASE");
        for record in records {
            sql.push_str(&when);
            args.extend(keys.iter().map(|key| field(record, key)));
            args.push(field(record, column));
        }
        sql.push_str(" END");
    }

    let tuples: Vec<Vec<Value>> = records
        .iter()
        .map(|record| keys.iter().map(|key| field(record, key)).collect())
        .collect();
    let filter = joint_fields_in(keys, &tuples)?;
    let filter = expand_in(&filter.sql, filter.args)?;

    sql.push(' ');
    sql.push_str(&filter.sql);
    args.extend(filter.args);

    Ok(BuiltQuery { sql, args })
}

// Presence was checked up front.
fn field(record: &ValueMap, name: &str) -> Value {
    record.get(name).cloned().unwrap_or(Value::Null)
}
