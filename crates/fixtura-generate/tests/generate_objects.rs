use fixtura_core::{
    Constructor, Parameter, Record, ScalarKind, TypeCatalog, TypeDescriptor, TypeRef, Value,
};
use fixtura_generate::{Faker, GenerateConfig, GenerationError};

fn node_catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with(
            TypeDescriptor::composite("Node")
                .member("Value", ScalarKind::I32)
                .member("Child", "Node")
                .member("Children", TypeRef::list("Node"))
                .with_default_constructor(),
        )
        .expect("catalog")
}

fn child(value: &Value) -> &Value {
    value.as_object().expect("node object").field("Child")
}

#[test]
fn recursion_stops_at_the_configured_depth() {
    let faker = Faker::new(node_catalog()).with_config(GenerateConfig::new().with_seed(1));
    let root = faker.generate(&TypeRef::named("Node")).expect("generate");

    let first = child(&root);
    let second = child(first);
    assert!(!first.is_null());
    assert!(!second.is_null());
    assert!(child(second).is_null());
    assert!(!second.as_object().expect("object").field("Value").is_null());
}

#[test]
fn list_members_hold_expanded_elements() {
    let faker = Faker::new(node_catalog()).with_config(GenerateConfig::new().with_seed(4));
    let root = faker.generate(&TypeRef::named("Node")).expect("generate");

    let children = root
        .as_object()
        .and_then(|root| root.field("Children").items())
        .expect("children");
    assert_eq!(children.len(), 3);
    for node in children {
        let node = node.as_object().expect("child node");
        assert!(matches!(node.field("Value"), Value::I32(_)));
        assert!(!node.field("Child").is_null());
    }
}

#[test]
fn zero_recursion_depth_leaves_self_references_unset() {
    let faker = Faker::new(node_catalog())
        .with_config(GenerateConfig::new().with_seed(1).with_recursive_depth(0));
    let root = faker.generate(&TypeRef::named("Node")).expect("generate");
    assert!(child(&root).is_null());
}

#[test]
fn tree_depth_limits_nesting() {
    let faker = Faker::new(node_catalog()).with_config(
        GenerateConfig::new()
            .with_seed(2)
            .with_recursive_depth(5)
            .with_tree_depth(Some(1)),
    );
    let root = faker.generate(&TypeRef::named("Node")).expect("generate");

    let first = child(&root).as_object().expect("child populated");
    assert!(first.field("Value").is_null());
    assert!(first.field("Child").is_null());
}

#[test]
fn skipped_types_and_paths_stay_unset() {
    let faker = Faker::new(node_catalog()).with_config(GenerateConfig::new().with_seed(3));

    let root = faker
        .generate_with(&TypeRef::named("Node"), |config| {
            config.with_skip_type(ScalarKind::I32)
        })
        .expect("generate");
    assert!(root.as_object().expect("object").field("Value").is_null());
    assert!(!child(&root).is_null());

    let root = faker
        .generate_with(&TypeRef::named("Node"), |config| {
            config.with_skip_member("Node", "Child")
        })
        .expect("generate");
    assert!(child(&root).is_null());
    assert!(!root.as_object().expect("object").field("Value").is_null());
}

#[test]
fn construction_depends_on_type_kind() {
    let catalog = TypeCatalog::new()
        .with(TypeDescriptor::composite("Orphan").member("Id", ScalarKind::I32))
        .and_then(|catalog| catalog.with(TypeDescriptor::interface("Shape")))
        .and_then(|catalog| {
            catalog.with(TypeDescriptor::structure("Point").member("X", ScalarKind::I32))
        })
        .expect("catalog");
    let faker = Faker::new(catalog);

    let err = faker.generate(&TypeRef::named("Orphan")).unwrap_err();
    assert!(matches!(
        err,
        GenerationError::ConstructorNotFound { type_name } if type_name == "Orphan"
    ));

    assert_eq!(
        faker.generate(&TypeRef::named("Shape")).expect("generate"),
        Value::Null
    );

    let point = faker.generate(&TypeRef::named("Point")).expect("generate");
    let point = point.as_object().expect("default object");
    assert_eq!(point.type_name, "Point");
    assert!(matches!(point.field("X"), Value::I32(_)));
}

#[test]
fn constructor_parameters_are_generated() {
    let catalog = TypeCatalog::new()
        .with(
            TypeDescriptor::composite("Customer")
                .member("Tags", TypeRef::list(ScalarKind::String))
                .constructor(Constructor::new(
                    vec![
                        Parameter::new("name", ScalarKind::String),
                        Parameter::new("age", ScalarKind::U8),
                    ],
                    |args| {
                        let mut args = args.into_iter();
                        let name = args.next().unwrap_or(Value::Null);
                        let age = args.next().unwrap_or(Value::Null);
                        Ok(fixtura_core::Object::new("Customer")
                            .with_field("Name", name)
                            .with_field("Age", age)
                            .into())
                    },
                )),
        )
        .expect("catalog");
    let faker = Faker::new(catalog).with_config(GenerateConfig::new().with_repeat_count(2));

    let customer = faker.generate(&TypeRef::named("Customer")).expect("generate");
    let customer = customer.as_object().expect("object");
    assert!(matches!(customer.field("Name"), Value::Text(_)));
    assert!(matches!(customer.field("Age"), Value::U8(_)));
    assert_eq!(customer.field("Tags").items().map(<[Value]>::len), Some(2));
}

#[test]
fn self_referencing_constructor_parameters_stop_at_the_depth() {
    let catalog = TypeCatalog::new()
        .with(
            TypeDescriptor::composite("Link").constructor(Constructor::new(
                vec![Parameter::new("next", TypeRef::nullable("Link"))],
                |args| {
                    let next = args.into_iter().next().unwrap_or(Value::Null);
                    Ok(fixtura_core::Object::new("Link")
                        .with_field("Next", next)
                        .into())
                },
            )),
        )
        .expect("catalog");
    let next = |value: &Value| value.as_object().expect("link").field("Next").clone();

    let faker = Faker::new(catalog);
    let root = faker.generate(&TypeRef::named("Link")).expect("generate");
    let first = next(&root);
    let second = next(&first);
    assert!(!first.is_null());
    assert!(!second.is_null());
    assert!(next(&second).is_null());

    let shallow = faker
        .generate_with(&TypeRef::named("Link"), |config| {
            config.with_recursive_depth(0)
        })
        .expect("generate");
    assert!(next(&shallow).is_null());
}

#[test]
fn by_ref_and_nullable_generate_the_inner_type() {
    let faker = Faker::new(TypeCatalog::new());

    let value = faker
        .generate(&TypeRef::by_ref(ScalarKind::Uuid))
        .expect("generate");
    assert!(matches!(value, Value::Uuid(_)));

    let value = faker
        .generate(&TypeRef::nullable(ScalarKind::DateTime))
        .expect("generate");
    assert!(matches!(value, Value::DateTime(_)));
}

#[test]
fn enums_pick_a_declared_variant() {
    let catalog = TypeCatalog::new()
        .with(TypeDescriptor::enumeration("Status", ["Open", "Closed"]))
        .expect("catalog");
    let faker = Faker::new(catalog);

    for value in faker
        .generate_many(&TypeRef::named("Status"), 10)
        .expect("generate")
    {
        match value {
            Value::Enum { type_name, variant } => {
                assert_eq!(type_name, "Status");
                assert!(variant == "Open" || variant == "Closed");
            }
            other => panic!("unexpected value: {other:?}"),
        }
    }
}

#[test]
fn populate_fills_only_the_named_members() {
    let catalog = TypeCatalog::new()
        .with(
            TypeDescriptor::composite("Account")
                .member("Name", ScalarKind::String)
                .member("Balance", ScalarKind::Decimal)
                .with_default_constructor(),
        )
        .expect("catalog");
    let faker = Faker::new(catalog);
    let ty = TypeRef::named("Account");

    let mut account = Value::Object(
        fixtura_core::Object::new("Account")
            .with_field("Name", Value::Null)
            .with_field("Balance", Value::Null),
    );
    faker
        .populate(&mut account, &ty, Some(&["Name"][..]))
        .expect("populate");
    let object = account.as_object().expect("object");
    assert!(matches!(object.field("Name"), Value::Text(_)));
    assert!(object.field("Balance").is_null());

    let err = faker
        .populate(&mut account, &ty, Some(&["Missing"][..]))
        .unwrap_err();
    assert!(matches!(err, GenerationError::UnknownMember { member, .. } if member == "Missing"));
}

#[test]
fn populate_regenerates_record_entries_by_runtime_type() {
    let faker = Faker::new(TypeCatalog::new()).with_config(GenerateConfig::new().with_seed(9));
    let mut record = Value::Record(
        Record::new()
            .with("name", Value::Text(String::new()))
            .with("count", Value::I64(0))
            .with("missing", Value::Null)
            .with("nested", Value::Record(Record::new().with("flag", Value::Bool(false)))),
    );

    faker
        .populate(&mut record, &TypeRef::Record, None)
        .expect("populate");

    let record = record.as_record().expect("record");
    assert!(matches!(record.get("name"), Some(Value::Text(_))));
    assert!(matches!(record.get("count"), Some(Value::I64(_))));
    assert_eq!(record.get("missing"), Some(&Value::Null));
    let nested = record
        .get("nested")
        .and_then(Value::as_record)
        .expect("nested record");
    assert!(matches!(nested.get("flag"), Some(Value::Bool(_))));
}

#[test]
fn populate_rejects_scalars() {
    let faker = Faker::new(TypeCatalog::new());
    let mut value = Value::I32(1);
    let err = faker
        .populate(&mut value, &TypeRef::Scalar(ScalarKind::I32), None)
        .unwrap_err();
    assert!(matches!(err, GenerationError::InvalidInstance { .. }));
    assert_eq!(value, Value::I32(1));
}

#[test]
fn unknown_types_are_reported() {
    let faker = Faker::new(TypeCatalog::new());
    let err = faker.generate(&TypeRef::named("Ghost")).unwrap_err();
    assert!(matches!(
        err,
        GenerationError::Core(fixtura_core::Error::UnknownType(name)) if name == "Ghost"
    ));
}
