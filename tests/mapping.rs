//! Backward mapping over the demo tree.

use std::collections::BTreeMap;
use std::sync::Arc;

use urlmap::mapping::{Conversion, Mapper, MapperOptions, MappingError, Params, RenderError, TableOrder, Value};
use urlmap::resource::{Folder, Leaf, TreeBuilder};

mod common;

#[test]
fn test_demo_scenarios() {
    let m = common::demo_mapper(None);

    assert_eq!(m.render("@@Home", Params::new()).unwrap(), "/home");
    assert!(matches!(
        m.render("@@Home", Params::new().arg("extra")),
        Err(RenderError::TooManyArguments { .. })
    ));

    assert_eq!(
        m.render("@@PrintName", Params::new().arg("martin")).unwrap(),
        "/users/martin/name"
    );
    let matched = m.match_url("@@PrintName", "/users/martin/name").unwrap().unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched["username"], Value::from("martin"));

    assert_eq!(
        m.render("@@IntegerComponent", Params::new().arg(1042)).unwrap(),
        "/formatted/00001042"
    );
    assert_eq!(m.render("@@DemoFolderWithMenu", Params::new()).unwrap(), "/fold/");
    assert_eq!(m.render("@@ExternalExample", Params::new()).unwrap(), "http://example.com/x");
    assert_eq!(
        m.render("@@UserData", Params::new().args(["martin", "something"])).unwrap(),
        "/users/martin/data/something"
    );
    assert_eq!(
        m.render("@@LeafPlusOneComponent", Params::new().named("comp", "president")).unwrap(),
        "/lcomp/president"
    );
    assert_eq!(m.render("@@AliasExample", Params::new()).unwrap(), "/fold/think");
    assert_eq!(m.render("@@Root", Params::new()).unwrap(), "/");
}

#[test]
fn test_root_location() {
    let m = common::demo_mapper(Some("/app"));
    assert_eq!(m.render("@@Home", Params::new()).unwrap(), "/app/home");
    assert_eq!(m.render("@@Root", Params::new()).unwrap(), "/app/");
    assert_eq!(m.render("@@Stylesheet", Params::new()).unwrap(), "/app/style.css");
    assert_eq!(m.render("@@Atocha", Params::new()).unwrap(), "/atocha/index.html");
    assert_eq!(m.render("@@ExternalExample", Params::new()).unwrap(), "http://example.com/x");
    assert_eq!(m.render_pattern("@@UserData").unwrap(), "/app/users/(username)/data/(userdata)");
}

#[test]
fn test_optional_parameters() {
    let m = common::demo_mapper(None);
    assert_eq!(m.render("@@OptionalParams", Params::new()).unwrap(), "/wopts");
    assert_eq!(
        m.render("@@OptionalParams", Params::new().named("cat", "Miou-Miou")).unwrap(),
        "/wopts?cat=Miou-Miou"
    );
    assert_eq!(
        m.render("@@OptionalParams", Params::new().named("nbanimals", 42)).unwrap(),
        "/wopts?nbanimals=00042"
    );
    assert!(matches!(
        m.render("@@OptionalParams", Params::new().named("horse", 1)),
        Err(RenderError::UnknownParameter { .. })
    ));
}

#[test]
fn test_missing_arguments_are_listed() {
    let m = common::demo_mapper(None);
    match m.render("@@UserData", Params::new()) {
        Err(RenderError::Missing { names, .. }) => assert_eq!(names, vec!["username", "userdata"]),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn test_source_objects() {
    let m = common::demo_mapper(None);
    let user = serde_json::json!({ "username": "martin", "userdata": "photos", "age": 30 });
    assert_eq!(
        m.render("@@UserData", Params::from_source(&user)).unwrap(),
        "/users/martin/data/photos"
    );

    #[derive(serde::Serialize)]
    struct User {
        username: String,
    }
    let params = Params::from_serialize(&User {
        username: "rachel".to_string(),
    })
    .unwrap();
    assert_eq!(m.render("@@PrintName", params).unwrap(), "/users/rachel/name");
}

#[test]
fn test_round_trip_for_every_mapping() {
    for root in [None, Some("/app")] {
        let m = common::demo_mapper(root);
        for mapping in m.mappings() {
            let mut params = Params::new();
            let mut expected = BTreeMap::new();
            for segment in mapping.segments() {
                if let Some(variable) = segment.variable() {
                    let value = match variable.format().map(|f| f.conversion()) {
                        Some(Conversion::Integer) => Value::Int(7),
                        Some(Conversion::Float) => Value::Float(2.5),
                        _ => Value::from("value"),
                    };
                    params = params.arg(value.clone());
                    expected.insert(variable.name().to_string(), value);
                }
            }
            let url = m.render(mapping.id(), params).unwrap();
            assert_eq!(
                m.match_url(mapping.id(), &url).unwrap(),
                Some(expected),
                "round trip of {} via {url}",
                mapping.id()
            );
        }
    }
}

#[test]
fn test_trailing_slash_canonicalization() {
    let m = common::demo_mapper(None);
    for mapping in m.mappings() {
        if !mapping.positional().is_empty() || mapping.id() == "@@ExternalExample" {
            continue;
        }
        let url = m.render(mapping.id(), Params::new()).unwrap();
        assert_eq!(url.ends_with('/'), mapping.is_non_terminal(), "{}: {url}", mapping.id());
    }
}

#[test]
fn test_format_aware_matching() {
    let m = common::demo_mapper(None);
    let got = m.match_url("@@IntegerComponent", "/formatted/00001042").unwrap().unwrap();
    assert_eq!(got["uid"], Value::Int(1042));
    assert_eq!(m.match_url("@@IntegerComponent", "/formatted/10a42").unwrap(), None);
    assert!(m.matching_pattern("@@IntegerComponent").unwrap().is_match("/formatted/12/"));
}

#[test]
fn test_table_reload_is_idempotent() {
    let original = common::demo_mapper(Some("/app"));
    for order in [TableOrder::ById, TableOrder::ByUrl] {
        let lines = original.serialize_table(order);
        assert_eq!(lines.len(), original.len());
        let reloaded = Mapper::deserialize_table(&lines, original.options().clone()).unwrap();
        for mapping in original.mappings() {
            assert_eq!(
                reloaded.render_pattern(mapping.id()).unwrap(),
                original.render_pattern(mapping.id()).unwrap()
            );
        }
    }
}

#[test]
fn test_resource_ids_of_nodes() {
    let demo = common::demo_tree();
    let m = common::mapper_for(&demo, None);
    assert_eq!(m.resource_id(demo.home), Some("@@Home"));
    assert_eq!(m.resource_id(demo.root), Some("@@Root"));
    assert_eq!(m.resource_id(demo.fold), Some("@@DemoFolderWithMenu"));
    assert_eq!(m.get("@@PrintName").unwrap().node(), Some(demo.print_name));
    assert_eq!(m.url_variables("@@UserData").unwrap(), vec!["username", "userdata"]);
}

#[test]
fn test_duplicate_derived_ids_fail() {
    let mut b = TreeBuilder::new();
    let a = b.add(Leaf::new("Twin"));
    let c = b.add(Leaf::new("Twin"));
    let root = b.add(Folder::new().child("a", a).child("c", c));
    let tree = Arc::new(b.build(root).unwrap());

    let err = Mapper::default().initialize(tree).unwrap_err();
    match err {
        MappingError::DuplicateId { id, existing, attempted } => {
            assert_eq!(id, "@@Twin");
            assert_eq!(existing, "/a");
            assert_eq!(attempted, "/c");
        }
        other => panic!("unexpected: {other}"),
    }
}

#[test]
fn test_custom_naming_transform() {
    let demo = common::demo_tree();
    let mut m = Mapper::new(MapperOptions {
        naming: urlmap::mapping::NamingTransform::custom(|name| format!("res:{name}")),
        ..MapperOptions::default()
    });
    m.initialize(demo.tree.clone()).unwrap();
    assert_eq!(m.render("res:Home", Params::new()).unwrap(), "/home");
    assert_eq!(m.render("@@SimpleGreed", Params::new()).unwrap(), "/fold/greed");
}
