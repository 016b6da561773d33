//! Unit tests for element shaping.

use super::*;
use proptest::prelude::*;
use rstest::{fixture, rstest};

fn tag(k: &str, v: &str) -> Element {
    Element::new("tag").with_attribute("k", k).with_attribute("v", v)
}

fn nd(reference: &str) -> Element {
    Element::new("nd").with_attribute("ref", reference)
}

fn node_with(id: &str) -> Element {
    Element::new("node")
        .with_attribute("id", id)
        .with_attribute("lat", "33.4483771")
        .with_attribute("lon", "-112.0740373")
        .with_attribute("user", "Jürgen")
        .with_attribute("uid", "1219059")
        .with_attribute("version", "2")
        .with_attribute("changeset", "8608066")
        .with_attribute("timestamp", "2011-06-24T19:51:07Z")
}

fn way_with(id: &str) -> Element {
    Element::new("way")
        .with_attribute("id", id)
        .with_attribute("user", "mapper")
        .with_attribute("uid", "42")
        .with_attribute("version", "5")
        .with_attribute("changeset", "123")
        .with_attribute("timestamp", "2014-03-01T12:00:00Z")
}

#[fixture]
fn fast_food_node() -> Element {
    node_with("757860928")
        .with_child(tag("amenity", "fast_food"))
        .with_child(tag("cuisine", "sausage"))
}

#[fixture]
fn residential_way() -> Element {
    way_with("209809850")
        .with_child(nd("2199822281"))
        .with_child(nd("2199822390"))
        .with_child(nd("2199822392"))
        .with_child(tag("highway", "residential"))
        .with_child(tag("addr:street:name", "Lincoln"))
}

fn expect_node(element: &Element) -> NodeBundle {
    match shape(element) {
        Ok(Some(Bundle::Node(bundle))) => bundle,
        other => panic!("expected a node bundle, got {other:?}"),
    }
}

fn expect_way(element: &Element) -> WayBundle {
    match shape(element) {
        Ok(Some(Bundle::Way(bundle))) => bundle,
        other => panic!("expected a way bundle, got {other:?}"),
    }
}

#[rstest]
fn copies_node_attributes_verbatim(fast_food_node: Element) {
    let bundle = expect_node(&fast_food_node);
    assert_eq!(
        bundle.node,
        NodeRecord {
            id: "757860928".into(),
            lat: "33.4483771".into(),
            lon: "-112.0740373".into(),
            user: "Jürgen".into(),
            uid: "1219059".into(),
            version: "2".into(),
            changeset: "8608066".into(),
            timestamp: "2011-06-24T19:51:07Z".into(),
        }
    );
}

#[rstest]
fn regular_node_tags_are_owned_by_the_node(fast_food_node: Element) {
    let bundle = expect_node(&fast_food_node);
    assert_eq!(
        bundle.tags,
        vec![
            TagRecord {
                owner_id: "757860928".into(),
                key: "amenity".into(),
                value: "fast_food".into(),
                tag_type: "regular".into(),
            },
            TagRecord {
                owner_id: "757860928".into(),
                key: "cuisine".into(),
                value: "sausage".into(),
                tag_type: "regular".into(),
            },
        ]
    );
}

#[rstest]
fn namespaced_key_splits_on_first_colon_only() {
    let element = node_with("12345").with_child(tag("addr:street:name", "Lincoln"));
    let bundle = expect_node(&element);
    assert_eq!(
        bundle.tags,
        vec![TagRecord {
            owner_id: "12345".into(),
            key: "street:name".into(),
            value: "Lincoln".into(),
            tag_type: "addr".into(),
        }]
    );
}

#[rstest]
fn problem_keys_are_dropped_and_counted() {
    let element = node_with("1")
        .with_child(tag("name.en", "Phoenix"))
        .with_child(tag("name", "Phoenix"))
        .with_child(tag("fixme?", "yes"));
    let mut shaper = Shaper::new();
    let Ok(Some(Bundle::Node(bundle))) = shaper.shape(&element) else {
        panic!("expected a node bundle");
    };
    assert_eq!(bundle.tags.len(), 1);
    assert_eq!(bundle.tags.first().map(|t| t.key.as_str()), Some("name"));
    assert_eq!(shaper.dropped_tags(), 2);
}

#[rstest]
fn way_nodes_are_positioned_in_document_order(residential_way: Element) {
    let bundle = expect_way(&residential_way);
    let positions: Vec<usize> = bundle.way_nodes.iter().map(|wn| wn.position).collect();
    let refs: Vec<&str> = bundle.way_nodes.iter().map(|wn| wn.node_id.as_str()).collect();
    assert_eq!(positions, vec![0, 1, 2]);
    assert_eq!(refs, vec!["2199822281", "2199822390", "2199822392"]);
    assert!(bundle.way_nodes.iter().all(|wn| wn.way_id == "209809850"));
}

proptest! {
    #[test]
    fn way_node_positions_count_up_from_zero(
        way_id in 1_u64..u64::MAX,
        refs in prop::collection::vec(1_u64..u64::MAX, 0..64),
    ) {
        let id = way_id.to_string();
        let element = refs
            .iter()
            .fold(way_with(&id), |way, reference| way.with_child(nd(&reference.to_string())));
        let bundle = expect_way(&element);

        let positions: Vec<usize> = bundle.way_nodes.iter().map(|wn| wn.position).collect();
        prop_assert_eq!(positions, (0..refs.len()).collect::<Vec<_>>());
        let node_ids: Vec<String> = bundle.way_nodes.iter().map(|wn| wn.node_id.clone()).collect();
        let expected: Vec<String> = refs.iter().map(ToString::to_string).collect();
        prop_assert_eq!(node_ids, expected);
        prop_assert!(bundle.way_nodes.iter().all(|wn| wn.way_id == id));
    }
}

#[rstest]
fn way_tags_use_the_way_id(residential_way: Element) {
    let bundle = expect_way(&residential_way);
    let tags: Vec<(&str, &str, &str)> = bundle
        .tags
        .iter()
        .map(|t| (t.owner_id.as_str(), t.tag_type.as_str(), t.key.as_str()))
        .collect();
    assert_eq!(
        tags,
        vec![
            ("209809850", "regular", "highway"),
            ("209809850", "addr", "street:name"),
        ]
    );
}

#[rstest]
fn interleaved_children_keep_separate_orders() {
    let element = way_with("3")
        .with_child(tag("a", "1"))
        .with_child(nd("10"))
        .with_child(tag("b", "2"))
        .with_child(nd("11"));
    let bundle = expect_way(&element);
    assert_eq!(bundle.tags.len(), 2);
    assert_eq!(
        bundle
            .way_nodes
            .iter()
            .map(|wn| (wn.node_id.as_str(), wn.position))
            .collect::<Vec<_>>(),
        vec![("10", 0), ("11", 1)]
    );
}

#[rstest]
fn nested_tags_are_not_direct_children() {
    let wrapper = Element::new("extra").with_child(tag("hidden", "yes"));
    let element = node_with("5").with_child(wrapper);
    let bundle = expect_node(&element);
    assert!(bundle.tags.is_empty());
}

#[rstest]
fn relations_and_unknown_elements_shape_to_nothing() {
    let relation = Element::new("relation")
        .with_attribute("id", "1")
        .with_child(tag("type", "multipolygon"));
    assert_eq!(shape(&relation), Ok(None));
    assert_eq!(shape(&Element::new("bounds")), Ok(None));
}

#[rstest]
#[case("uid")]
#[case("lat")]
#[case("timestamp")]
fn missing_node_attribute_names_the_element(#[case] missing: &'static str) {
    let mut element = Element::new("node");
    for (key, value) in node_with("99").attributes() {
        if key != missing {
            element.push_attribute(key, value);
        }
    }
    let err = shape(&element).expect_err("shaping should fail");
    assert_eq!(
        err,
        ShapeError::MissingAttribute {
            element: ElementRef::new(ElementKind::Node, "99"),
            attribute: missing,
        }
    );
    assert_eq!(
        err.to_string(),
        format!("node 99 is missing required attribute `{missing}`")
    );
}

#[rstest]
fn missing_id_is_reported_without_an_id() {
    let element = Element::new("way").with_attribute("user", "x");
    let err = shape(&element).expect_err("shaping should fail");
    assert_eq!(err.element(), &ElementRef { kind: ElementKind::Way, id: None });
    assert_eq!(
        err.to_string(),
        "way with missing id is missing required attribute `id`"
    );
}

#[rstest]
fn nd_without_ref_fails_the_way() {
    let element = way_with("8").with_child(Element::new("nd"));
    let err = shape(&element).expect_err("shaping should fail");
    assert_eq!(
        err,
        ShapeError::MissingChildAttribute {
            element: ElementRef::new(ElementKind::Way, "8"),
            child: "nd",
            attribute: "ref",
        }
    );
}

#[rstest]
fn shaping_is_deterministic(residential_way: Element) {
    let first = shape(&residential_way);
    let second = shape(&residential_way);
    assert_eq!(first, second);
}
