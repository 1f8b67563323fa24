//! Built-in sample object graph: a small ledger with shared owners,
//! accounts referenced from several places and a trait-object event log.

use std::collections::BTreeMap;
use std::rc::Rc;

use objtree_core::{extract, interface, ExtractOptions, Inspect, Tree};

/// Someone who owns or audits accounts.
#[derive(Inspect)]
pub struct Person {
    pub name: String,
    pub age: u8,
}

/// A ledger account.
#[derive(Inspect)]
pub struct Account {
    pub id: u64,
    /// Shared with every other account of the same person.
    pub owner: Rc<Person>,
    /// Balance in cents.
    pub balance: i64,
    pub tags: Vec<String>,
    pin: u16,
}

/// Something that moved money.
#[interface]
pub trait Event {
    /// Signed amount in cents.
    fn amount(&self) -> i64;
    /// Human readable description.
    fn memo(&self, prefix: &str) -> String;
}

#[derive(Inspect)]
pub struct Deposit {
    pub account: Rc<Account>,
    pub cents: i64,
}

impl Event for Deposit {
    fn amount(&self) -> i64 {
        self.cents
    }

    fn memo(&self, prefix: &str) -> String {
        format!("{}deposit of {} into {}", prefix, self.cents, self.account.id)
    }
}

#[derive(Inspect)]
pub struct Transfer {
    pub from: Rc<Account>,
    pub to: Rc<Account>,
    pub cents: i64,
}

impl Event for Transfer {
    fn amount(&self) -> i64 {
        -self.cents
    }

    fn memo(&self, prefix: &str) -> String {
        format!("{}transfer of {} from {} to {}", prefix, self.cents, self.from.id, self.to.id)
    }
}

/// The root of the demo graph.
#[derive(Inspect)]
pub struct Ledger {
    pub accounts: BTreeMap<String, Rc<Account>>,
    pub events: Vec<Box<dyn Event>>,
    pub auditor: Rc<Person>,
    /// Fee charged for a transfer of the given amount.
    pub fee: fn(i64) -> i64,
}

fn flat_fee(_cents: i64) -> i64 {
    25
}

pub fn build() -> Ledger {
    let ada = Rc::new(Person {
        name: "Ada".into(),
        age: 36,
    });
    let grace = Rc::new(Person {
        name: "Grace".into(),
        age: 45,
    });

    let checking = Rc::new(Account {
        id: 1,
        owner: Rc::clone(&ada),
        balance: 12_500,
        tags: vec!["primary".into()],
        pin: 1234,
    });
    let savings = Rc::new(Account {
        id: 2,
        owner: Rc::clone(&ada),
        balance: 480_000,
        tags: vec!["savings".into(), "locked".into()],
        pin: 4321,
    });

    let events: Vec<Box<dyn Event>> = vec![
        Box::new(Deposit {
            account: Rc::clone(&checking),
            cents: 10_000,
        }),
        Box::new(Transfer {
            from: Rc::clone(&checking),
            to: Rc::clone(&savings),
            cents: 2_500,
        }),
    ];

    let mut accounts = BTreeMap::new();
    accounts.insert("savings".to_string(), savings);
    accounts.insert("checking".to_string(), checking);

    Ledger {
        accounts,
        events,
        auditor: grace,
        fee: flat_fee,
    }
}

/// Extracts the demo ledger with default options.
pub fn extract_demo() -> Tree {
    let ledger = build();
    extract(&ledger, &ExtractOptions::default())
}
