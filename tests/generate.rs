use schemadoc::{generate, parser, Generator, SymbolIndex, TypeLinkResolver};
use serde_json::{json, Value};

fn widget_schema() -> Value {
    json!({
        "namespace": "demo",
        "types": [{
            "id": "Widget",
            "type": "object",
            "properties": {
                "count": { "type": "integer", "value": 1000000 }
            }
        }],
        "functions": [{
            "name": "make",
            "parameters": [{ "name": "w", "$ref": "Widget" }]
        }]
    })
}

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(path).unwrap()
}

/// Every list entry tagged `last` must be the final entry of its list.
fn assert_last_only_at_end(value: &Value) {
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if item.get("last").is_some() {
                    assert_eq!(i, items.len() - 1, "`last` on non-final entry: {}", item);
                }
                assert_last_only_at_end(item);
            }
        }
        Value::Object(map) => map.values().for_each(assert_last_only_at_end),
        _ => {}
    }
}

#[test]
fn widget_scenario() {
    let tree = generate(&widget_schema(), &TypeLinkResolver).unwrap();

    assert_eq!(tree["name"], json!("demo"));
    assert_eq!(tree["types"][0]["id"], json!("type-Widget"));
    assert_eq!(tree["types"][0]["properties"][0]["value"], json!("1,000,000"));
    assert_eq!(tree["types"][0]["properties"][0]["id"], json!("property-Widget-count"));
    assert_eq!(tree["types"][0]["properties"][0]["parent_name"], json!("Widget"));

    let make = &tree["functions"][0];
    assert_eq!(make["id"], json!("method-make"));
    assert_eq!(make["returns"], Value::Null);
    assert_eq!(make["parameters"][0]["last"], json!(true));
    assert_eq!(
        make["parameters"][0]["link"],
        json!({ "href": "#type-Widget", "text": "Widget" })
    );
}

#[test]
fn nodoc_root_generates_empty_container() {
    let raw = json!({ "namespace": "demo", "nodoc": true, "types": [] });
    assert_eq!(generate(&raw, &TypeLinkResolver).unwrap(), json!({}));
}

#[test]
fn missing_namespace_is_configuration_error() {
    let raw = json!({ "types": [] });
    let err = generate(&raw, &TypeLinkResolver).unwrap_err();
    assert!(matches!(err, schemadoc::Error::Configuration { .. }));
}

#[test]
fn generation_is_repeatable() {
    let raw = widget_schema();
    let first = generate(&raw, &TypeLinkResolver).unwrap();
    let second = generate(&raw, &TypeLinkResolver).unwrap();
    assert_eq!(first, second);
}

#[test]
fn fixture_with_symbol_index() {
    let mut namespaces = Vec::new();
    for file in ["demo.json", "tabs.json"] {
        for raw in parser::read_document(&fixture(file)).unwrap() {
            namespaces.push(parser::load_namespace(&raw).unwrap().unwrap());
        }
    }
    let index = SymbolIndex::from_namespaces(&namespaces);
    let tree = Generator::new(Some(&namespaces[0]), &index).generate();

    // nodoc type and property are gone
    let types = tree["types"].as_array().unwrap();
    assert_eq!(types.len(), 1);
    let props: Vec<&str> = types[0]["properties"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(props, ["count", "label"]);

    assert_eq!(
        types[0]["description"],
        json!("A widget. Created by <a href=\"#method-make\">make</a>, shown in a <a href=\"tabs.html#type-Tab\">tabs.Tab</a>.")
    );
    assert_eq!(
        tree["functions"][0]["description"],
        json!("Makes a widget. See <a href=\"#method-Widget-resize\">Widget.resize</a>, too.")
    );

    let fetch = &tree["functions"][1];
    assert_eq!(fetch["parameters"][1]["name"], json!("callback"));
    assert_eq!(fetch["parameters"][1]["last"], json!(true));
    assert_eq!(fetch["parameters"][0]["choices"][1]["last"], json!(true));
    assert_eq!(
        fetch["callback"]["parameters"][0]["enum_values"],
        json!([{ "name": "ok" }, { "name": "missing", "last": true }])
    );

    let event = &tree["events"][0];
    assert_eq!(event["supportsRules"], json!(true));
    assert_eq!(
        event["conditions"],
        json!([{ "href": "#type-Widget", "text": "Widget" }])
    );

    assert_eq!(tree["properties"][0]["value"], json!("4,096"));
    assert_last_only_at_end(&tree);
}

#[test]
fn additional_properties_member_never_listed() {
    let raw = json!({
        "namespace": "demo",
        "types": [{
            "id": "Bag",
            "type": "object",
            "additionalProperties": { "type": "string" }
        }]
    });
    let tree = generate(&raw, &TypeLinkResolver).unwrap();
    assert_eq!(tree["types"][0]["properties"], json!([]));
}
