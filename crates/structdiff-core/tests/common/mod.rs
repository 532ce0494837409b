//! Reflected fixture types shared by the integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;

use structdiff_core::reflect::{DynamicMembers, TypeDesc, Value};
use structdiff_core::{reflect_record, reflect_struct, Difference, DifferenceKind};

reflect_struct! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Primitives {
        pub int_property: i32,
        pub string_property: String,
        pub flag: bool,
        pub ratio: f64,
        pub nickname: Option<String>,
    }
}

reflect_struct! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Line {
        pub id: u32,
        pub sku: String,
        pub qty: u32,
    }
}

reflect_struct! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Customer {
        pub name: String,
        pub email: String,
    }
}

reflect_struct! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Order {
        pub id: u32,
        pub customer: Option<Customer>,
        pub lines: Vec<Line>,
        pub tags: BTreeSet<String>,
        pub total: f64,
    }
}

reflect_struct! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Inventory {
        pub codes: [u8; 3],
        pub counts: Vec<i64>,
    }
}

reflect_struct! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Node {
        pub label: String,
        pub children: Vec<Node>,
    }
}

reflect_struct! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Envelope {
        pub payload: serde_json::Value,
    }
}

reflect_record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Point {
        pub x: i32,
        pub y: i32,
    }
}

pub fn line(id: u32, sku: &str, qty: u32) -> Line {
    Line {
        id,
        sku: sku.to_string(),
        qty,
    }
}

pub fn customer(name: &str, email: &str) -> Customer {
    Customer {
        name: name.to_string(),
        email: email.to_string(),
    }
}

pub fn order(id: u32, lines: Vec<Line>) -> Order {
    Order {
        id,
        customer: Some(customer("Ada", "ada@example.com")),
        lines,
        tags: ["priority".to_string()].into_iter().collect(),
        total: 10.0,
    }
}

pub fn node(label: &str, children: Vec<Node>) -> Node {
    Node {
        label: label.to_string(),
        children,
    }
}

/// A dynamic object backed by a fixed member list
#[derive(Debug, Clone)]
pub struct Bag {
    pub type_name: &'static str,
    pub members: Vec<(String, Value)>,
}

impl DynamicMembers for Bag {
    fn type_desc(&self) -> TypeDesc {
        TypeDesc::new(self.type_name, structdiff_core::reflect::Shape::Dynamic)
    }

    fn member_names(&self) -> Vec<String> {
        self.members.iter().map(|(k, _)| k.clone()).collect()
    }

    fn member(&self, name: &str) -> Option<Value> {
        self.members
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}

pub fn bag(members: &[(&str, Value)]) -> Value {
    Value::dynamic(Bag {
        type_name: "Bag",
        members: members
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect(),
    })
}

pub fn bag_type() -> TypeDesc {
    TypeDesc::new("Bag", structdiff_core::reflect::Shape::Dynamic)
}

/// `(path, kind)` of each difference, for compact assertions
pub fn summary(differences: &[Difference]) -> Vec<(String, DifferenceKind)> {
    differences
        .iter()
        .map(|d| (d.path.clone(), d.kind))
        .collect()
}

pub fn s(text: &str) -> Value {
    Value::Str(text.to_string())
}
