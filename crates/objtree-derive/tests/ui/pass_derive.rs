use std::collections::BTreeMap;
use std::rc::Rc;

use objtree_core::{Describe, Inspect, Kind, TypeRef, View};

/// A ledger account.
#[derive(Inspect)]
pub struct Account {
    /// Holder's name.
    pub owner: String,
    balance: i64,
    #[inspect(skip)]
    _scratch: std::cell::Cell<u8>,
}

#[derive(Inspect)]
pub struct Pair(pub u8, u16);

#[derive(Inspect)]
pub struct Marker;

#[derive(Inspect)]
pub struct Slot<T, const N: usize> {
    pub items: [T; N],
    pub shared: Option<Rc<Account>>,
    pub by_name: BTreeMap<String, Vec<T>>,
}

#[derive(Inspect)]
pub enum Currency {
    Eur,
    Usd,
}

#[derive(Inspect)]
#[inspect(opaque)]
pub enum Amount {
    Cents(i64),
    Unknown,
}

fn main() {
    let desc = Account::describe();
    assert_eq!(desc.kind, Kind::Struct);
    assert_eq!(desc.doc, "A ledger account.");
    assert_eq!(desc.members.len(), 2);
    assert!(desc.members[0].exported);
    assert!(!desc.members[1].exported);
    assert_eq!(desc.members[0].doc, "Holder's name.");

    let pair = Pair::describe();
    assert!(pair.members.iter().all(|m| m.anonymous));
    assert_eq!(pair.members[1].name, "1");

    assert!(Marker::describe().members.is_empty());
    assert_eq!(Currency::describe().kind, Kind::Other);
    assert_eq!(Amount::describe().kind, Kind::Other);
    assert!(matches!(Amount::Cents(3).view(), View::Opaque));

    let slot = Slot::<u8, 2>::describe();
    assert!(slot.display.ends_with("Slot<u8, 2>"));
    assert_eq!(slot.member("shared").map(|m| m.ty), Some(TypeRef::of::<Option<Rc<Account>>>()));

    let account = Account {
        owner: "ada".into(),
        balance: 10,
        _scratch: Default::default(),
    };
    match account.view() {
        View::Struct(fields) => assert_eq!(fields.len(), 2),
        _ => panic!("expected struct view"),
    }
}
