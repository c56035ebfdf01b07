#![no_main]
use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde::Serialize;

#[derive(Debug, Serialize, Arbitrary)]
#[serde(untagged)]
enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

fuzz_target!(|data: (&str, BTreeMap<String, Value>)| {
    let (source, ctx) = data;

    let mut env = mailmerge::Environment::new();
    if env.add_template("fuzz", source).is_err() {
        return;
    }

    if let Ok(tmpl) = env.get_template("fuzz") {
        tmpl.render(&ctx).ok();
    }
});
