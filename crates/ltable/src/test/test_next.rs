// Tests for the enumeration protocol
use crate::*;

fn traverse(table: &LuaTable) -> LuaResult<Vec<(LuaValue, LuaValue)>> {
    let mut entries = Vec::new();
    let mut key = LuaValue::Nil;
    while let Some((k, v)) = table.next(&key)? {
        entries.push((k.clone(), v));
        key = k;
    }
    Ok(entries)
}

#[test]
fn test_next_deleted_key_is_skipped() {
    let mut table = LuaTable::new();
    table.set_str("a", LuaValue::string("a"));
    table.set_str("b", LuaValue::string("b"));
    table.set_str("a", LuaValue::Nil);

    assert_eq!(
        traverse(&table).unwrap(),
        vec![(LuaValue::string("b"), LuaValue::string("b"))]
    );
}

#[test]
fn test_next_hash_key_after_array() {
    let mut table = LuaTable::new();
    table.set_str("first", LuaValue::integer(0));
    for i in 1..=4 {
        table.append(LuaValue::integer(i));
    }
    let key = LuaValue::number(0.5);
    table.raw_set(key.clone(), LuaValue::string("half")).unwrap();

    let entries = traverse(&table).unwrap();
    assert_eq!(entries.len(), 6);
    assert!(entries[..4].iter().all(|(k, _)| k.as_integer().is_some()));
    let hits: Vec<_> = entries.iter().filter(|(k, _)| *k == key).collect();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].1, LuaValue::string("half"));
    assert_eq!(entries[4].0, LuaValue::string("first"));
}

#[test]
fn test_next_far_integer_keys() {
    let mut table = LuaTable::new();
    let row = |name: &str| {
        let mut t = LuaTable::new();
        t.set_str("servername", LuaValue::string(name));
        LuaValue::table(t)
    };
    table.set_int(1, row("one"));
    table.set_int(1001, row(""));
    table.set_int(1002, row(""));

    let keys: Vec<_> = traverse(&table)
        .unwrap()
        .into_iter()
        .map(|(k, _)| k)
        .collect();
    assert_eq!(
        keys,
        vec![
            LuaValue::integer(1),
            LuaValue::integer(1001),
            LuaValue::integer(1002)
        ]
    );
    assert_eq!(table.len(), 1);
}

#[test]
fn test_next_restarts_with_nil() {
    let mut table = LuaTable::new();
    table.append(LuaValue::TRUE);
    table.set_str("x", LuaValue::FALSE);

    let first = traverse(&table).unwrap();
    let second = traverse(&table).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        table.next(&LuaValue::Nil).unwrap(),
        Some((LuaValue::integer(1), LuaValue::TRUE))
    );
}

#[test]
fn test_next_value_set_to_nil_mid_traversal() {
    let mut table = LuaTable::new();
    for key in ["a", "b", "c"] {
        table.set_str(key, LuaValue::TRUE);
    }
    let (k, _) = table.next(&LuaValue::Nil).unwrap().unwrap();
    assert_eq!(k, LuaValue::string("a"));

    // clearing the current key's successor is allowed while traversing
    table.set_str("b", LuaValue::Nil);
    let (k, _) = table.next(&k).unwrap().unwrap();
    assert_eq!(k, LuaValue::string("c"));
    assert_eq!(table.next(&k).unwrap(), None);
}

#[test]
fn test_next_invalid_key() {
    let mut table = LuaTable::new();
    table.set_str("present", LuaValue::TRUE);
    let stranger = LuaValue::table(LuaTable::new());
    assert_eq!(table.next(&stranger), Err(LuaError::InvalidNextKey));
    assert_eq!(
        table.next(&LuaValue::string("absent")),
        Err(LuaError::InvalidNextKey)
    );
}

#[test]
fn test_iter_borrows_values() {
    let mut table = LuaTable::new();
    table.append(LuaValue::string("v1"));
    table.set_str("k", LuaValue::string("v2"));

    let values: Vec<&LuaValue> = table.iter().map(|(_, v)| v).collect();
    assert_eq!(values, vec![&LuaValue::string("v1"), &LuaValue::string("v2")]);
}
