use std::cell::OnceCell;
use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use objtree_core::{
    extract, DocIndex, EdgeFlags, EmbeddedDocs, ExtractOptions, Inspect, Kind, NoDocs, Object, Tree, ValueNode,
    ValueNodeId,
};
use proptest::prelude::*;

/// A node in a linked structure.
#[derive(Inspect)]
pub struct Link {
    /// Payload.
    pub value: i32,
    pub next: OnceCell<Rc<Link>>,
}

impl Link {
    fn new(value: i32) -> Rc<Link> {
        Rc::new(Link {
            value,
            next: OnceCell::new(),
        })
    }
}

#[derive(Inspect)]
pub struct Payload {
    pub bytes: Vec<u8>,
}

#[derive(Inspect)]
pub struct Holder {
    pub shared: Rc<Payload>,
    pub own: Box<Payload>,
}

#[derive(Inspect)]
pub struct Pair {
    pub left: Holder,
    pub right: Holder,
}

#[derive(Inspect)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Inspect)]
pub struct Secretive {
    pub name: String,
    items: Vec<u8>,
    pub maybe: Option<Box<Point>>,
}

#[derive(Inspect)]
pub struct Wrapped(pub Point, u8);

#[derive(Inspect)]
pub struct Marker;

#[derive(Inspect)]
pub struct Twins {
    pub a: Marker,
    pub b: Marker,
}

mod app {
    use objtree_core::Inspect;

    #[derive(Inspect)]
    pub struct Service {
        pub client: crate::external::Client,
        pub retries: u8,
    }
}

mod external {
    use objtree_core::Inspect;

    /// Owned by another team.
    #[derive(Inspect)]
    pub struct Client {
        pub pool: Vec<u8>,
        pub name: String,
    }
}

fn service() -> app::Service {
    app::Service {
        client: external::Client {
            pool: vec![1, 2, 3],
            name: "db".into(),
        },
        retries: 3,
    }
}

fn child<'t>(tree: &'t Tree, value: &ValueNode, key: &str) -> &'t ValueNode {
    let id = value.elements[key];
    tree.value(id).unwrap()
}

fn type_name<'t>(tree: &'t Tree, value: &ValueNode) -> &'t str {
    &tree.type_of(value).unwrap().name
}

#[test]
fn extraction_is_idempotent() {
    let shared = Rc::new(Payload { bytes: vec![1, 2] });
    let root = Pair {
        left: Holder {
            shared: Rc::clone(&shared),
            own: Box::new(Payload { bytes: vec![3] }),
        },
        right: Holder {
            shared,
            own: Box::new(Payload { bytes: vec![] }),
        },
    };
    let options = ExtractOptions::default();

    let first = extract(&root, &options);
    let second = extract(&root, &options);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert!(first.validate().is_ok());
}

#[test]
fn self_cycle_terminates() {
    let a = Link::new(1);
    let _ = a.next.set(Rc::clone(&a));

    let tree = extract(&a, &ExtractOptions::default());
    let links: Vec<_> = tree.values.iter().filter(|v| type_name(&tree, v) == "Link").collect();
    assert_eq!(links.len(), 1);
    assert!(links[0].referred >= 2);
    assert_eq!(links[0].elements["next"], links[0].id);
    assert!(links[0].flags("next").contains(EdgeFlags::POINTER));
}

#[test]
fn two_step_cycle_terminates() {
    let a = Link::new(1);
    let b = Link::new(2);
    let _ = a.next.set(Rc::clone(&b));
    let _ = b.next.set(Rc::clone(&a));

    let tree = extract(&a, &ExtractOptions::default());
    let root = tree.root().unwrap();
    let second = child(&tree, root, "next");
    assert_ne!(root.id, second.id);
    assert_eq!(second.elements["next"], root.id);
    assert_eq!(root.referred, 2);

    let stats = tree.stats();
    assert!(stats.cyclic);
    assert_eq!(stats.cycles, 1);
}

#[test]
fn shared_storage_is_one_node() {
    let shared = Rc::new(Payload { bytes: vec![9] });
    let root = Pair {
        left: Holder {
            shared: Rc::clone(&shared),
            own: Box::new(Payload { bytes: vec![9] }),
        },
        right: Holder {
            shared: Rc::clone(&shared),
            own: Box::new(Payload { bytes: vec![9] }),
        },
    };

    let tree = extract(&root, &ExtractOptions::default());
    let root_node = tree.root().unwrap();
    let left = child(&tree, root_node, "left");
    let right = child(&tree, root_node, "right");

    assert_eq!(left.elements["shared"], right.elements["shared"]);
    assert_eq!(child(&tree, left, "shared").referred, 2);

    // equal contents in distinct allocations stay distinct
    assert_ne!(left.elements["own"], right.elements["own"]);
    assert_eq!(child(&tree, left, "own").referred, 1);

    let payloads = tree.values.iter().filter(|v| type_name(&tree, v) == "Payload").count();
    assert_eq!(payloads, 3);
}

#[test]
fn identical_types_are_cataloged_once() {
    let points: Vec<Point> = (0..25).map(|i| Point { x: i, y: -i }).collect();
    let options = ExtractOptions::new().expand_type::<Point>();

    let tree = extract(&points, &options);
    assert_eq!(tree.types.iter().filter(|t| t.name == "Point").count(), 1);
    assert_eq!(tree.types.iter().filter(|t| t.display == "i32").count(), 1);
    assert_eq!(tree.values.len(), 1 + 25 * 3);
    assert_eq!(tree.root().unwrap().referred, 26);
}

fn tagged_map(order: &[&'static str]) -> IndexMap<&'static str, Box<dyn Object>> {
    let mut map: IndexMap<&'static str, Box<dyn Object>> = IndexMap::new();
    for &key in order {
        let value: Box<dyn Object> = match key {
            "a" => Box::new(1u8),
            "b" => Box::new(String::from("two")),
            _ => Box::new(true),
        };
        map.insert(key, value);
    }
    map
}

fn held_types(tree: &Tree) -> Vec<String> {
    let root = tree.root().unwrap();
    root.elements
        .iter()
        .map(|(_, &slot)| {
            let slot = tree.value(slot).unwrap();
            let held = child(tree, slot, "");
            tree.type_of(held).unwrap().display.clone()
        })
        .collect()
}

#[test]
fn map_children_follow_sorted_key_text() {
    let options = ExtractOptions::default();
    let first = extract(&tagged_map(&["b", "c", "a"]), &options);
    let second = extract(&tagged_map(&["c", "a", "b"]), &options);

    let keys: Vec<_> = first.root().unwrap().elements.keys().map(String::as_str).collect();
    assert_eq!(keys, ["0", "1", "2"]);
    assert_eq!(held_types(&first), ["u8", "String", "bool"]);
    assert_eq!(held_types(&second), held_types(&first));
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn maps_bulk_add_their_size() {
    let map: HashMap<u32, Point> = (0..4).map(|i| (i, Point { x: 0, y: 0 })).collect();
    let tree = extract(&map, &ExtractOptions::default());
    assert_eq!(tree.root().unwrap().referred, 5);
    assert_eq!(tree.type_of(tree.root().unwrap()).unwrap().kind, Kind::Map);
}

#[test]
fn types_outside_the_whitelist_are_opaque() {
    let root = service();

    let tree = extract(&root, &ExtractOptions::default());
    let client = child(&tree, tree.root().unwrap(), "client");
    assert_eq!(type_name(&tree, client), "Client");
    assert!(client.elements.is_empty());

    let by_package = extract(&root, &ExtractOptions::new().expand_package("extract::external"));
    let client = child(&by_package, by_package.root().unwrap(), "client");
    assert_eq!(client.elements.len(), 2);
    assert_eq!(child(&by_package, client, "pool").elements.len(), 3);

    let by_type = extract(&root, &ExtractOptions::new().expand_type::<external::Client>());
    let client = child(&by_type, by_type.root().unwrap(), "client");
    assert_eq!(client.elements.len(), 2);
}

#[test]
fn unexported_fields_are_flagged_and_opaque() {
    let root = Secretive {
        name: "s".into(),
        items: vec![1, 2],
        maybe: None,
    };

    let tree = extract(&root, &ExtractOptions::default());
    let node = tree.root().unwrap();
    assert!(node.flags("items").contains(EdgeFlags::UNEXPORTED));
    assert!(!node.flags("name").contains(EdgeFlags::UNEXPORTED));
    assert!(child(&tree, node, "items").elements.is_empty());

    let deep = extract(&root, &ExtractOptions::new().include_unexported(true));
    let node = deep.root().unwrap();
    assert!(node.flags("items").contains(EdgeFlags::UNEXPORTED));
    assert_eq!(child(&deep, node, "items").elements.len(), 2);
}

#[test]
fn nil_pointers_leave_no_edge() {
    let root = Secretive {
        name: "s".into(),
        items: vec![],
        maybe: None,
    };
    let tree = extract(&root, &ExtractOptions::default());
    let node = tree.root().unwrap();
    assert!(!node.elements.contains_key("maybe"));
    assert!(!node.flags.contains_key("maybe"));
    assert!(tree.values.iter().all(|v| type_name(&tree, v) != "Point"));

    let root = Secretive {
        maybe: Some(Box::new(Point { x: 1, y: 1 })),
        ..root
    };
    let tree = extract(&root, &ExtractOptions::default());
    let node = tree.root().unwrap();
    assert!(node.flags("maybe").contains(EdgeFlags::POINTER));
}

#[test]
fn struct_and_first_field_are_distinct() {
    let root = Wrapped(Point { x: 1, y: 2 }, 7);
    let tree = extract(&root, &ExtractOptions::default());
    let node = tree.root().unwrap();
    let point = child(&tree, node, "0");

    assert_ne!(node.id, point.id);
    assert_ne!(point.id, point.elements["x"]);
    assert!(node.flags("0").contains(EdgeFlags::ANONYMOUS));
    assert!(node.flags("1").contains(EdgeFlags::UNEXPORTED | EdgeFlags::ANONYMOUS));

    let wrapped = tree.type_of(node).unwrap();
    assert!(wrapped.is_anonymous("0"));
}

#[test]
fn zero_sized_values_stay_distinct() {
    let markers = vec![Marker, Marker, Marker];
    let tree = extract(&markers, &ExtractOptions::default());
    assert_eq!(tree.values.len(), 4);
    let ids: Vec<_> = tree.root().unwrap().elements.values().copied().collect();
    assert_eq!(ids, [ValueNodeId(1), ValueNodeId(2), ValueNodeId(3)]);
    assert!(tree.values[1..].iter().all(|v| v.referred == 1));
    assert_eq!(tree.types.iter().filter(|t| t.name == "Marker").count(), 1);

    let twins = Twins { a: Marker, b: Marker };
    let tree = extract(&twins, &ExtractOptions::default());
    let node = tree.root().unwrap();
    assert_ne!(node.elements["a"], node.elements["b"]);
    assert_eq!(tree.values.len(), 3);

    let units: Vec<Box<dyn Object>> = vec![Box::new(()), Box::new(())];
    let tree = extract(&units, &ExtractOptions::default());
    let root = tree.root().unwrap();
    let first = child(&tree, root, "0");
    let second = child(&tree, root, "1");
    assert_ne!(first.elements[""], second.elements[""]);
    assert_eq!(child(&tree, first, "").referred, 1);
    assert_eq!(tree.values.len(), 5);
}

#[test]
fn nil_root_is_empty() {
    let root: Option<Rc<Point>> = None;
    let tree = extract(&root, &ExtractOptions::default());
    assert!(tree.is_empty());
    assert!(tree.validate().is_ok());
}

#[test]
fn docs_come_from_the_configured_lookup() {
    let root = service();

    let tree = extract(&root, &ExtractOptions::new().expand_package("extract"));
    let client = tree.types.iter().find(|t| t.name == "Client").unwrap();
    assert_eq!(client.doc(""), "Owned by another team.");
    assert_eq!(client.doc("pool"), "");

    let mut index = DocIndex::new();
    index.insert::<external::Client>("pool", "Connection pool.");
    index.insert::<app::Service>("", "Entry point.");
    let tree = extract(&root, &ExtractOptions::new().with_docs((index, EmbeddedDocs)));
    let client = tree.types.iter().find(|t| t.name == "Client").unwrap();
    let service = tree.types.iter().find(|t| t.name == "Service").unwrap();
    assert_eq!(client.doc("pool"), "Connection pool.");
    assert_eq!(client.doc(""), "Owned by another team.");
    assert_eq!(service.doc(""), "Entry point.");

    let tree = extract(&root, &ExtractOptions::new().with_docs(NoDocs));
    assert!(tree.types.iter().all(|t| t.docs.values().all(String::is_empty)));
}

#[test]
fn type_catalog_never_holds_pointers() {
    let a = Link::new(1);
    let _ = a.next.set(Link::new(2));
    let tree = extract(&Some(Box::new(a)), &ExtractOptions::default());
    assert!(tree.types.iter().all(|t| t.kind != Kind::Pointer));
    let link = tree.types.iter().find(|t| t.name == "Link").unwrap();
    assert_eq!(link.elements["next"], link.id);
    assert_eq!(tree.root().map(|v| v.id), Some(ValueNodeId(0)));
}

#[test]
fn json_roundtrip_preserves_tree() {
    let a = Link::new(1);
    let _ = a.next.set(Rc::clone(&a));
    let tree = extract(&a, &ExtractOptions::default());
    let back = Tree::from_json(&tree.to_json_pretty().unwrap()).unwrap();
    assert_eq!(back, tree);
}

fn parity_map<'a>(keys: impl Iterator<Item = &'a String>) -> IndexMap<String, Box<dyn Object>> {
    keys.map(|key| {
        let value: Box<dyn Object> = if key.len() % 2 == 0 {
            Box::new(0u8)
        } else {
            Box::new(String::new())
        };
        (key.clone(), value)
    })
    .collect()
}

proptest! {
    #[test]
    fn map_order_ignores_insertion_order(keys in prop::collection::hash_set("[a-z]{1,4}", 1..12)) {
        let keys: Vec<String> = keys.into_iter().collect();
        let forward = parity_map(keys.iter());
        let backward = parity_map(keys.iter().rev());

        let options = ExtractOptions::default();
        let a = extract(&forward, &options);
        let b = extract(&backward, &options);
        prop_assert_eq!(a.fingerprint(), b.fingerprint());
    }
}
