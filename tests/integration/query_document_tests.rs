//! Request document tests
//!
//! These tests build queries against a client with configured defaults and check
//! the exact shape of the `Query` document sent to the service.

mod common;

use common::{create_test_client, root_children};
use endeca_client_rs::{QueryOptions, query::render};
use rstest::rstest;
use serde_json::{Value, json};

const API: &str = "http://localhost:9999/api";

#[test]
fn test_end_to_end_document() {
    let client = create_test_client(API, Value::Null);
    let query = client.query(json!({
        "flags": { "navigationOnly": true },
        "category": "42",
        "sorts": { "price": "asc" },
        "paging": { "page": 0, "perPage": 20 }
    }));

    let expected = "<Query>\n\
                    \x20 <NavigationOnly>true</NavigationOnly>\n\
                    \x20 <Category>\n\
                    \x20   <CategoryId>42</CategoryId>\n\
                    \x20 </Category>\n\
                    \x20 <Sorts>\n\
                    \x20   <Sort>\n\
                    \x20     <sort-key>price</sort-key>\n\
                    \x20     <sort-direction>Asc</sort-direction>\n\
                    \x20   </Sort>\n\
                    \x20 </Sorts>\n\
                    \x20 <RecordOffset>0</RecordOffset>\n\
                    \x20 <RecordsPerPage>20</RecordsPerPage>\n\
                    </Query>";

    assert_eq!(query.body().unwrap(), expected);
}

#[test]
fn test_sections_follow_wire_order() {
    let client = create_test_client(API, Value::Null);
    let query = client.query(json!({
        "paging": { "page": 1, "perPage": 10 },
        "sorts": { "name": "desc" },
        "category": 7,
        "dimensions": [100, 200],
        "searches": { "All": "boots" },
        "flags": { "aggrRecords": 1 },
        "advanced": { "ignored": true }
    }));

    assert_eq!(
        root_children(query.body().unwrap()),
        vec![
            "AggrRecords",
            "Searches",
            "SelectedDimensionValueIds",
            "Category",
            "Sorts",
            "RecordOffset",
            "RecordsPerPage",
        ]
    );
}

#[test]
fn test_defaults_are_merged_into_document() {
    let client = create_test_client(
        API,
        json!({
            "flags": { "aggrRecords": 1 },
            "dimensions": [1, 2],
            "paging": { "perPage": 25 }
        }),
    );
    let query = client.query(json!({
        "flags": { "navigationOnly": true },
        "dimensions": [3],
        "paging": { "page": 2 }
    }));

    let xml = query.xml().unwrap();
    let root = xml.root();

    assert_eq!(root.child("AggrRecords").unwrap().text(), "1");
    assert_eq!(root.child("NavigationOnly").unwrap().text(), "true");

    let dimensions: Vec<String> = root
        .child("SelectedDimensionValueIds")
        .unwrap()
        .children_named("DimensionValueId")
        .map(|id| id.text())
        .collect();
    assert_eq!(dimensions, vec!["1", "2", "3"]);

    assert_eq!(root.child("RecordOffset").unwrap().text(), "50");
    assert_eq!(root.child("RecordsPerPage").unwrap().text(), "25");
}

#[rstest]
#[case(json!({ "searches": {} }), "Searches")]
#[case(json!({ "sorts": {} }), "Sorts")]
#[case(json!({ "dimensions": [] }), "SelectedDimensionValueIds")]
#[case(json!({ "category": "" }), "Category")]
#[case(json!({ "paging": {} }), "RecordsPerPage")]
fn test_empty_categories_are_omitted(#[case] options: Value, #[case] element: &str) {
    let client = create_test_client(API, Value::Null);
    let query = client.query(options);
    let body = query.body().unwrap();

    assert!(
        !body.contains(&format!("<{element}>")),
        "unexpected <{element}> in {body}"
    );
    assert!(root_children(body).is_empty());
}

#[test]
fn test_identical_options_render_identical_documents() {
    let options = json!({
        "flags": { "navigationOnly": true },
        "searches": { "All": "boots", "Brand": "acme" },
        "dimensions": [4, 5],
        "sorts": { "price": "asc", "name": "desc" }
    });

    let first_client = create_test_client(API, Value::Null);
    let second_client = create_test_client(API, Value::Null);
    let first = first_client.query(options.clone());
    let second = second_client.query(options);

    assert_eq!(first.body().unwrap(), second.body().unwrap());
    assert_eq!(
        render(first.options()).unwrap(),
        render(&QueryOptions::from_value(&first.options().to_value())).unwrap()
    );
}

#[test]
fn test_searches_keep_caller_order() {
    let client = create_test_client(API, Value::Null);
    let query = client.query(json!({ "searches": { "zeta": "z", "alpha": "a" } }));

    let xml = query.xml().unwrap();
    let keys: Vec<String> = xml
        .root()
        .descendants_named("search-key")
        .into_iter()
        .map(|key| key.text())
        .collect();
    assert_eq!(keys, vec!["zeta", "alpha"]);
}

#[test]
fn test_malformed_paging_does_not_fail() {
    let client = create_test_client(API, Value::Null);
    let query = client.query(json!({ "paging": { "page": "x", "perPage": 10 } }));

    let xml = query.xml().unwrap();
    assert_eq!(xml.root().child("RecordOffset").unwrap().text(), "0");
    assert_eq!(xml.root().child("RecordsPerPage").unwrap().text(), "10");
}
