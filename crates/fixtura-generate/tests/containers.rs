use fixtura_core::{
    Constructor, Object, Parameter, Protocol, ScalarKind, TypeCatalog, TypeDescriptor, TypeRef,
    Value,
};
use fixtura_generate::{Faker, GenerateConfig};

#[test]
fn maps_hold_up_to_repeat_count_distinct_keys() {
    let faker = Faker::new(TypeCatalog::new()).with_config(GenerateConfig::new().with_seed(4));
    let map = faker
        .generate(&TypeRef::map(ScalarKind::String, ScalarKind::I32))
        .expect("generate");

    let entries = map.entries().expect("map");
    assert!((1..=3).contains(&entries.len()));
    for (index, (key, value)) in entries.iter().enumerate() {
        assert!(matches!(key, Value::Text(_)));
        assert!(matches!(value, Value::I32(_)));
        assert!(entries[..index].iter().all(|(other, _)| other != key));
    }
}

#[test]
fn small_key_domains_bound_the_map_size() {
    let faker = Faker::new(TypeCatalog::new())
        .with_config(GenerateConfig::new().with_seed(8).with_repeat_count(5));
    let map = faker
        .generate(&TypeRef::map(ScalarKind::Bool, ScalarKind::U16))
        .expect("generate");

    let entries = map.entries().expect("map");
    assert!(!entries.is_empty());
    assert!(entries.len() <= 2);
}

#[test]
fn lists_arrays_and_sequences_use_the_repeat_count() {
    let faker = Faker::new(TypeCatalog::new())
        .with_config(GenerateConfig::new().with_repeat_count(4));

    for ty in [
        TypeRef::list(ScalarKind::I64),
        TypeRef::array(ScalarKind::I64),
        TypeRef::sequence(ScalarKind::I64),
        TypeRef::collection(ScalarKind::I64),
    ] {
        let value = faker.generate(&ty).expect("generate");
        let items = value.items().expect("items");
        assert_eq!(items.len(), 4, "{ty}");
        assert!(items.iter().all(|item| matches!(item, Value::I64(_))));
    }

    assert!(matches!(
        faker.generate(&TypeRef::array(ScalarKind::I64)),
        Ok(Value::Array(_))
    ));
}

#[test]
fn sets_never_hold_duplicates() {
    let faker = Faker::new(TypeCatalog::new())
        .with_config(GenerateConfig::new().with_seed(2).with_repeat_count(6));
    let set = faker
        .generate(&TypeRef::set(ScalarKind::Bool))
        .expect("generate");

    let Value::Set(items) = set else {
        panic!("expected a set");
    };
    assert!(!items.is_empty() && items.len() <= 2);
}

#[test]
fn repeat_count_function_sees_the_request() {
    let faker = Faker::new(TypeCatalog::new()).with_config(
        GenerateConfig::new().with_repeat_count_fn(|ctx| match ctx.generate_type() {
            TypeRef::List(_) => 1,
            _ => 5,
        }),
    );

    let list = faker
        .generate(&TypeRef::list(ScalarKind::U8))
        .expect("generate");
    assert_eq!(list.items().map(<[Value]>::len), Some(1));

    let array = faker
        .generate(&TypeRef::array(ScalarKind::U8))
        .expect("generate");
    assert_eq!(array.items().map(<[Value]>::len), Some(5));
}

#[test]
fn read_only_members_are_appended_to() {
    let catalog = TypeCatalog::new()
        .with(
            TypeDescriptor::composite("Cart")
                .read_only_member("Items", TypeRef::list(ScalarKind::I32))
                .read_only_member("Totals", TypeRef::map(ScalarKind::String, ScalarKind::F64))
                .read_only_member("Owner", ScalarKind::String)
                .constructor(Constructor::new(Vec::new(), |_| {
                    Ok(Object::new("Cart")
                        .with_field("Items", Value::List(vec![Value::I32(7)]))
                        .with_field("Totals", Value::Map(Vec::new()))
                        .with_field("Owner", Value::Text("fixed".to_string()))
                        .into())
                })),
        )
        .expect("catalog");
    let faker = Faker::new(catalog).with_config(GenerateConfig::new().with_repeat_count(3));

    let cart = faker.generate(&TypeRef::named("Cart")).expect("generate");
    let cart = cart.as_object().expect("object");

    let items = cart.field("Items").items().expect("items");
    assert_eq!(items.len(), 4);
    assert_eq!(items[0], Value::I32(7));
    assert!(!cart.field("Totals").entries().expect("totals").is_empty());
    assert_eq!(cart.field("Owner"), &Value::Text("fixed".to_string()));
}

#[test]
fn read_only_map_types_use_their_map_constructor() {
    let catalog = TypeCatalog::new()
        .with(
            TypeDescriptor::composite("Lookup")
                .protocol(Protocol::ReadOnlyMap {
                    key: ScalarKind::U32.into(),
                    value: ScalarKind::String.into(),
                })
                .constructor(Constructor::new(
                    vec![Parameter::new(
                        "entries",
                        TypeRef::read_only_map(ScalarKind::U32, ScalarKind::String),
                    )],
                    |args| {
                        let entries = args.into_iter().next().unwrap_or(Value::Null);
                        Ok(Object::new("Lookup").with_field("Entries", entries).into())
                    },
                )),
        )
        .expect("catalog");
    let faker = Faker::new(catalog);

    let lookup = faker.generate(&TypeRef::named("Lookup")).expect("generate");
    let entries = lookup
        .as_object()
        .and_then(|lookup| lookup.field("Entries").entries())
        .expect("entries");
    assert!((1..=3).contains(&entries.len()));
}

#[test]
fn nested_containers_are_generated_recursively() {
    let faker = Faker::new(TypeCatalog::new())
        .with_config(GenerateConfig::new().with_seed(12).with_repeat_count(2));
    let value = faker
        .generate(&TypeRef::list(TypeRef::map(ScalarKind::Uuid, TypeRef::list(ScalarKind::Char))))
        .expect("generate");

    let maps = value.items().expect("outer list");
    assert_eq!(maps.len(), 2);
    for map in maps {
        let entries = map.entries().expect("map");
        assert_eq!(entries.len(), 2);
        for (_, chars) in entries {
            assert_eq!(chars.items().map(<[Value]>::len), Some(2));
        }
    }
}
