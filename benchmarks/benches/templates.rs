use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mailmerge::machinery::{parse, tokenize};
use mailmerge::{context, render_markdown, Environment, Value};
use serde::Serialize;

#[derive(Serialize)]
struct Order {
    item: String,
    amount: u32,
    price: f64,
    shipped: bool,
}

fn do_tokenize() {
    tokenize(black_box(include_str!("../inputs/newsletter.txt"))).count();
}

fn do_parse() {
    parse(
        black_box(include_str!("../inputs/newsletter.txt")),
        "newsletter.txt",
    )
    .unwrap();
}

fn do_parse_and_compile() {
    let mut env = Environment::new();
    env.add_template("newsletter.txt", include_str!("../inputs/newsletter.txt"))
        .unwrap();
}

fn make_context() -> Value {
    let orders: Vec<Order> = (0..50)
        .map(|idx| Order {
            item: format!("Item #{idx}"),
            amount: idx % 4 + 1,
            price: 9.5 + idx as f64,
            shipped: idx % 3 == 0,
        })
        .collect();
    context! {
        recipient => context! {
            name => "Ada",
            premium => true,
            since => 2019,
        },
        orders => Value::from_serializable(&orders).unwrap(),
        announcement => "# News\nWe moved.\nOur new address is below.\n\n* Faster shipping\n* New store",
        sections => vec![
            context! { title => "Docs", links => vec!["/doc", "/faq"] },
            context! { title => "Help", links => vec!["/help"] },
        ],
        sender => "The Team",
    }
}

fn do_render(env: &Environment, ctx: &Value) {
    let tmpl = env.get_template("newsletter.txt").unwrap();
    tmpl.render(ctx).unwrap();
}

fn create_env() -> Environment<'static> {
    let mut env = Environment::new();
    env.add_template("newsletter.txt", include_str!("../inputs/newsletter.txt"))
        .unwrap();
    env
}

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("tokenize", |b| b.iter(do_tokenize));
    c.bench_function("parse", |b| b.iter(do_parse));
    c.bench_function("compile", |b| b.iter(do_parse_and_compile));
    c.bench_function("render", |b| {
        let env = create_env();
        let ctx = make_context();
        b.iter(|| do_render(&env, &ctx));
    });
    c.bench_function("render_markdown", |b| {
        b.iter(|| render_markdown(black_box("# Title\nSome text\nthat wraps.\n\n* one\n* two\n")))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
