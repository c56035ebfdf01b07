use std::collections::BTreeMap;

use similar_asserts::assert_eq;

use mailmerge::value::Value;
use mailmerge::{context, Environment, ErrorKind};

#[test]
fn test_basic() {
    let mut env = Environment::new();
    env.add_template("test", "{{#each seq}}[{{ this }}]{{/each}}")
        .unwrap();
    let t = env.get_template("test").unwrap();
    let mut ctx = BTreeMap::new();
    ctx.insert("seq", Value::from((0..3).collect::<Vec<_>>()));
    let rv = t.render(ctx).unwrap();
    assert_eq!(rv, "[0][1][2]");
    assert_eq!(t.name(), "test");
    assert_eq!(t.source(), "{{#each seq}}[{{ this }}]{{/each}}");
    assert_eq!(t.ast().blocks.len(), 1);
}

#[test]
fn test_clone() {
    let mut env = Environment::new();
    env.add_template("test", "a").unwrap();
    let mut env2 = env.clone();
    assert_eq!(env2.get_template("test").unwrap().render(()).unwrap(), "a");
    env2.add_template("test", "b").unwrap();
    assert_eq!(env2.get_template("test").unwrap().render(()).unwrap(), "b");
    assert_eq!(env.get_template("test").unwrap().render(()).unwrap(), "a");
}

#[test]
fn test_template_removal() {
    let mut env = Environment::new();
    env.add_template("test", "{{ a }}").unwrap();
    env.remove_template("test");
    let err = env.get_template("test").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TemplateNotFound);
    insta::assert_snapshot!(
        err.to_string(),
        @r###"template not found: template "test" does not exist"###
    );
}

#[test]
fn test_add_template_reports_syntax_errors() {
    let mut env = Environment::new();
    let err = env
        .add_template("broken.txt", "Hi\n{{#loop x}}{{/loop}}")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownDirective);
    assert_eq!(err.name(), Some("broken.txt"));
    assert_eq!(err.line(), Some(2));
    assert!(env.get_template("broken.txt").is_err());
}

#[test]
fn test_render_str() {
    let env = Environment::new();
    let rv = env
        .render_str("{{#if vip}}Dear {{name}}{{else}}Hello{{/if}}", context! { vip => true, name => "Ada" })
        .unwrap();
    assert_eq!(rv, "Dear Ada");
    let err = env.render_str("{{ missing }}", ()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingParameter);
    assert_eq!(err.name(), Some("<string>"));
}

#[test]
fn test_markdown_renderer() {
    let mut env = Environment::new();
    env.add_template("md", "{{{ body }}}").unwrap();
    let ctx = context! { body => "* A\n* B" };
    assert_eq!(
        env.get_template("md").unwrap().render(&ctx).unwrap(),
        "<ul><li>A</li><li>B</li></ul>"
    );

    env.set_markdown_renderer(|text| text.to_uppercase());
    assert_eq!(env.get_template("md").unwrap().render(&ctx).unwrap(), "* A\n* B".to_uppercase());
}

#[test]
fn test_bad_serialization() {
    let env = Environment::new();
    let mut ctx = BTreeMap::new();
    ctx.insert("big", u64::MAX);
    let err = env.render_str("{{ big }}", ctx).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadSerialization);
}

#[cfg(feature = "debug")]
#[test]
fn test_debug_source_excerpt() {
    let mut env = Environment::new();
    env.set_debug(true);
    assert!(env.debug());
    let err = env
        .add_template("letter", "line one\nline two\n{{#if x}}\nline four")
        .unwrap_err();
    assert_eq!(err.template_source(), Some("line one\nline two\n{{#if x}}\nline four"));
    let rendered = format!("{err:#}");
    assert!(rendered.contains(" Template Source "));
    assert!(rendered.contains("   4 > line four"));
    assert!(rendered.contains("   3 | {{#if x}}"));

    env.set_debug(false);
    let err = env.add_template("letter", "{{#if x}}").unwrap_err();
    assert_eq!(err.template_source(), None);
    assert_eq!(format!("{err:#}"), err.to_string());
}

#[test]
fn test_environment_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Environment<'static>>();
    assert_send_sync::<mailmerge::Template<'static, 'static>>();
    assert_send_sync::<mailmerge::Ast<'static>>();

    let mut env = Environment::new();
    env.add_template("t", "{{n}}").unwrap();
    let env = &env;
    std::thread::scope(|scope| {
        for n in 0..4 {
            scope.spawn(move || {
                let rv = env.get_template("t").unwrap().render(context! { n }).unwrap();
                assert_eq!(rv, n.to_string());
            });
        }
    });
}
