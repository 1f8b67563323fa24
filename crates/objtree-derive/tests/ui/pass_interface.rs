use std::rc::Rc;

use objtree_core::{interface, Describe, Inspect, Kind, TypeRef, View};

/// Something that moves money.
#[interface]
pub trait Event {
    /// Amount moved, in cents.
    fn amount(&self) -> i64;
    fn memo(&self, prefix: &str) -> String;
    fn boxed(&self) -> Box<Self>
    where
        Self: Sized;
}

#[derive(Inspect)]
pub struct Deposit {
    pub cents: i64,
}

impl Event for Deposit {
    fn amount(&self) -> i64 {
        self.cents
    }

    fn memo(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.cents)
    }

    fn boxed(&self) -> Box<Self> {
        Box::new(Deposit { cents: self.cents })
    }
}

fn main() {
    let desc = <dyn Event>::describe();
    assert_eq!(desc.kind, Kind::Interface);
    assert_eq!(desc.doc, "Something that moves money.");
    assert_eq!(desc.members.len(), 2);
    assert_eq!(desc.members[0].name, "amount");
    assert_eq!(desc.members[0].doc, "Amount moved, in cents.");
    assert_eq!(desc.members[0].ty.describe().display, "fn() -> i64");
    assert_eq!(desc.members[1].ty.describe().display, "fn(&str) -> String");

    let event: Rc<dyn Event> = Rc::new(Deposit { cents: 5 });
    assert_eq!(event.amount(), 5);
    assert_eq!(event.type_ref(), TypeRef::of::<dyn Event>());
    match event.view() {
        View::Interface(Some(held)) => assert_eq!(held.type_ref(), TypeRef::of::<Deposit>()),
        _ => panic!("expected interface view"),
    }
}
