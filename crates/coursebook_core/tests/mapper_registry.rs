mod common;

use common::{fixture_store, schema_connection};
use coursebook_core::{
    Category, ColumnMapping, DomainObject, FieldValue, Identity, MapperRegistry, PersistError,
    Persistable, Record, RecordError, Store, Student, TableMapping, CATEGORY_TABLE,
};
use std::rc::Rc;

/// Domain type that the standard registry does not know about.
struct Grade {
    identity: Identity,
    label: String,
}

impl DomainObject for Grade {
    fn type_tag(&self) -> &'static str {
        Self::TAG
    }

    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn identity_mut(&mut self) -> &mut Identity {
        &mut self.identity
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        (name == "label").then(|| FieldValue::from(self.label.as_str()))
    }
}

impl Persistable for Grade {
    const TAG: &'static str = "grade";
    const FIELDS: &'static [&'static str] = &["label"];

    fn from_record(mut record: Record) -> Result<Self, RecordError> {
        Ok(Self {
            identity: Identity::persisted(record.id()),
            label: record.take_text("label")?,
        })
    }
}

const GRADE_TABLE: TableMapping = TableMapping {
    table: "grades",
    columns: &[ColumnMapping::new("grade_label", "label")],
};

#[test]
fn mappers_are_built_lazily_and_reused() {
    let store = fixture_store();
    let registry = store.registry();
    assert!(registry.cached_tags().is_empty());

    let first = registry.mapper_by_tag("category").unwrap();
    let second = registry.mapper_for(&Category::new("Math")).unwrap();

    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(first.table(), "categories");
    assert_eq!(registry.cached_tags(), vec!["category"]);
    assert!(!registry.is_cached("student"));
}

#[test]
fn typed_and_erased_lookup_share_one_instance() {
    let store = fixture_store();
    let typed = store.mapper::<Student>().unwrap();
    let again = store.mapper::<Student>().unwrap();
    assert!(Rc::ptr_eq(&typed, &again));

    let erased = store.registry().mapper_by_tag("student").unwrap();
    assert_eq!(erased.tag(), "student");
    assert_eq!(store.registry().cached_tags(), vec!["student"]);
}

#[test]
fn unknown_object_type_is_rejected_without_touching_cache() {
    let store = fixture_store();
    let registry = store.registry();
    registry.mapper_by_tag("student").unwrap();
    let before = registry.cached_tags();

    let grade = Grade {
        identity: Identity::transient(),
        label: "A".to_string(),
    };
    let err = registry.mapper_for(&grade).err().unwrap();

    assert!(matches!(err, PersistError::UnknownMapper(ref tag) if tag == "grade"));
    assert_eq!(registry.cached_tags(), before);
    assert!(!registry.is_registered("grade"));
}

#[test]
fn unknown_tag_is_rejected() {
    let store = fixture_store();
    let err = store.registry().mapper_by_tag("teacher").err().unwrap();
    assert_eq!(err.to_string(), "no mapper registered for type `teacher`");
    assert!(store.registry().cached_tags().is_empty());
}

#[test]
fn custom_registration_resolves_custom_type() {
    let conn = schema_connection();
    conn.execute_batch("CREATE TABLE grades (id INTEGER PRIMARY KEY, grade_label TEXT);")
        .unwrap();
    let store = Store::with_mappings(
        conn,
        MapperRegistry::builder()
            .register::<Category>(CATEGORY_TABLE)
            .register::<Grade>(GRADE_TABLE),
    )
    .unwrap();

    let mapper = store.mapper::<Grade>().unwrap();
    let mut grade = Grade {
        identity: Identity::transient(),
        label: "B+".to_string(),
    };
    let id = mapper.insert(&mut grade).unwrap();

    let loaded = mapper.find(id).unwrap();
    assert_eq!(loaded.label, "B+");
    assert!(!store.registry().is_registered("student"));
}

#[test]
fn duplicate_registration_is_rejected() {
    let result = MapperRegistry::standard()
        .register::<Category>(CATEGORY_TABLE)
        .build(Rc::new(schema_connection()));
    assert!(matches!(
        result.err().unwrap(),
        PersistError::DuplicateMapping("category")
    ));
}

#[test]
fn invalid_mapping_fails_on_first_use_and_is_not_cached() {
    const BROKEN: TableMapping = TableMapping {
        table: "categories",
        columns: &[ColumnMapping::new("name", "title")],
    };
    let store = Store::with_mappings(
        schema_connection(),
        MapperRegistry::builder().register::<Category>(BROKEN),
    )
    .unwrap();

    let err = store.registry().mapper_by_tag("category").err().unwrap();
    assert!(matches!(err, PersistError::InvalidMapping { tag: "category", .. }));
    assert!(!store.registry().is_cached("category"));
}
