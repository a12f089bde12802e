mod common;

use common::{fixture_store, row_count, stored_names};
use coursebook_core::{
    open_db_in_memory, Category, DbError, DomainObject, FailureReason, FieldValue, PersistError,
    Store, Student, CATEGORY_TABLE,
};

#[test]
fn all_on_empty_table_returns_empty_vec() {
    let store = fixture_store();
    let mapper = store.mapper::<Category>().unwrap();
    assert!(mapper.all().unwrap().is_empty());
}

#[test]
fn mapper_exposes_its_table_mapping() {
    let store = fixture_store();
    let mapper = store.mapper::<Category>().unwrap();

    assert_eq!(mapper.mapping(), CATEGORY_TABLE);
    assert_eq!(mapper.mapping().table, "categories");
}

#[test]
fn insert_assigns_backend_id_and_all_reads_it_back() {
    let store = fixture_store();
    let mapper = store.mapper::<Student>().unwrap();

    let mut ada = Student::new("Ada");
    let mut alan = Student::new("Alan");
    let ada_id = mapper.insert(&mut ada).unwrap();
    let alan_id = mapper.insert(&mut alan).unwrap();

    assert_eq!(ada.id(), Some(ada_id));
    assert_eq!(alan.id(), Some(alan_id));
    assert_ne!(ada_id, alan_id);

    let mut loaded = mapper.all().unwrap();
    loaded.sort_by_key(|student| student.id());
    assert_eq!(loaded, vec![ada, alan]);
}

#[test]
fn insert_rejects_object_with_id() {
    let store = fixture_store();
    let mapper = store.mapper::<Category>().unwrap();

    let mut category = Category::with_id(7, "Physics");
    let err = mapper.insert(&mut category).unwrap_err();
    assert!(matches!(
        err,
        PersistError::Commit {
            table: "categories",
            reason: FailureReason::IdAlreadySet(7)
        }
    ));
    assert_eq!(row_count(&store, "categories"), 0);
}

#[test]
fn update_rewrites_mapped_fields() {
    let store = fixture_store();
    let mapper = store.mapper::<Category>().unwrap();

    let mut category = Category::new("Math");
    mapper.insert(&mut category).unwrap();
    category.name = "Mathematics".to_string();
    mapper.update(&category).unwrap();

    let id = category.id().unwrap();
    assert_eq!(stored_names(&store, "categories"), vec![(id, "Mathematics".to_string())]);
}

#[test]
fn update_of_missing_row_is_update_error() {
    let store = fixture_store();
    let mapper = store.mapper::<Category>().unwrap();

    let stale = Category::with_id(42, "Ghost");
    let err = mapper.update(&stale).unwrap_err();
    assert!(matches!(
        err,
        PersistError::Update {
            table: "categories",
            id: Some(42),
            reason: FailureReason::NoRowsAffected
        }
    ));
}

#[test]
fn update_without_id_is_update_error() {
    let store = fixture_store();
    let mapper = store.mapper::<Student>().unwrap();

    let err = mapper.update(&Student::new("Nobody")).unwrap_err();
    assert!(matches!(
        err,
        PersistError::Update {
            id: None,
            reason: FailureReason::MissingId,
            ..
        }
    ));
}

#[test]
fn delete_removes_row_and_retires_identity() {
    let store = fixture_store();
    let mapper = store.mapper::<Student>().unwrap();

    let mut student = Student::new("Grace");
    mapper.insert(&mut student).unwrap();
    mapper.delete(&mut student).unwrap();

    assert_eq!(row_count(&store, "student"), 0);
    assert!(student.identity().is_retired());

    let err = mapper.delete(&mut student).unwrap_err();
    assert!(matches!(
        err,
        PersistError::Delete {
            reason: FailureReason::Retired,
            ..
        }
    ));
}

#[test]
fn delete_of_missing_row_is_delete_error() {
    let store = fixture_store();
    let mapper = store.mapper::<Student>().unwrap();

    let mut stale = Student::with_id(99, "Stale");
    let err = mapper.delete(&mut stale).unwrap_err();
    assert!(matches!(
        err,
        PersistError::Delete {
            table: "student",
            id: Some(99),
            reason: FailureReason::NoRowsAffected
        }
    ));
    assert!(!stale.identity().is_retired());
}

#[test]
fn find_returns_row_or_not_found() {
    let store = fixture_store();
    let mapper = store.mapper::<Category>().unwrap();

    let mut category = Category::new("History");
    let id = mapper.insert(&mut category).unwrap();

    assert_eq!(mapper.find(id).unwrap(), category);
    let err = mapper.find(id + 100).unwrap_err();
    assert!(matches!(
        err,
        PersistError::NotFound { table: "categories", id: missing } if missing == id + 100
    ));
}

#[test]
fn null_text_column_fails_loudly() {
    let store = fixture_store();
    store
        .connection()
        .execute("INSERT INTO student (name) VALUES (NULL);", [])
        .unwrap();

    let err = store.mapper::<Student>().unwrap().all().unwrap_err();
    match err {
        PersistError::MalformedRow { table, message } => {
            assert_eq!(table, "student");
            assert!(message.contains("`name` holds null"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn blob_value_in_text_column_fails_loudly() {
    let store = fixture_store();
    store
        .connection()
        .execute("INSERT INTO categories (name) VALUES (X'00FF');", [])
        .unwrap();

    let err = store.mapper::<Category>().unwrap().all().unwrap_err();
    assert!(matches!(err, PersistError::MalformedRow { table: "categories", .. }));
}

#[test]
fn erased_mapper_rejects_foreign_type() {
    let store = fixture_store();
    let mapper = store.registry().mapper_by_tag("student").unwrap();

    let mut category = Category::new("Art");
    let err = mapper.insert_object(&mut category).unwrap_err();
    assert!(matches!(
        err,
        PersistError::WrongType {
            expected: "student",
            found: "category"
        }
    ));
}

#[test]
fn erased_mapper_lists_domain_objects() {
    let store = fixture_store();
    let mapper = store.registry().mapper_by_tag("category").unwrap();

    let mut category = Category::new("Music");
    mapper.insert_object(&mut category).unwrap();

    let objects = mapper.all_objects().unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].type_tag(), "category");
    assert_eq!(objects[0].id(), category.id());
    assert_eq!(objects[0].field("name"), Some(FieldValue::from("Music")));
}

#[test]
fn store_rejects_schema_without_mapped_table() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE student (id INTEGER PRIMARY KEY, name TEXT);")
        .unwrap();

    let err = Store::from_connection(conn).err().unwrap();
    assert!(matches!(
        err,
        PersistError::Db(DbError::MissingRequiredTable("categories"))
    ));
}

#[test]
fn store_rejects_table_missing_mapped_column() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE student (id INTEGER PRIMARY KEY, name TEXT);
         CREATE TABLE categories (id INTEGER PRIMARY KEY, title TEXT);",
    )
    .unwrap();

    let err = Store::from_connection(conn).err().unwrap();
    assert!(matches!(
        err,
        PersistError::Db(DbError::MissingRequiredColumn {
            table: "categories",
            column: "name"
        })
    ));
}

#[test]
fn file_backed_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("project.sqlite");
    {
        let conn = coursebook_core::open_db(&path).unwrap();
        conn.execute_batch(common::SCHEMA_SQL).unwrap();
    }

    let config = coursebook_core::DatabaseConfig { path: path.clone() };
    let id = {
        let store = Store::open(&config).unwrap();
        let mut category = Category::new("Chemistry");
        store.mapper::<Category>().unwrap().insert(&mut category).unwrap()
    };

    let store = Store::open(&config).unwrap();
    let loaded = store.mapper::<Category>().unwrap().find(id).unwrap();
    assert_eq!(loaded.name, "Chemistry");
}
