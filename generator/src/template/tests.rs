// Licensed under the Apache-2.0 license

use super::*;

fn context() -> Record {
    let mut ctx = Record::new();
    ctx.set("name", "ctrl");
    ctx.set("absaddr", 0x40i64);
    ctx.set("n", 0i64);
    ctx
}

#[test]
fn test_literal_text_passes_through() {
    let template = Template::parse("entity decoder is\nend entity;\n");
    assert_eq!(
        template.render(&Record::new()).unwrap(),
        "entity decoder is\nend entity;\n"
    );
}

#[test]
fn test_plain_substitution() {
    let template = Template::parse("signal {name} : addr {absaddr};");
    assert_eq!(
        template.render(&context()).unwrap(),
        "signal ctrl : addr 64;"
    );
}

#[test]
fn test_dotted_key_traverses_records() {
    let mut inner = Record::new();
    inner.set("width", 32i64);
    let mut ctx = Record::new();
    ctx.set("bus", inner);
    let template = Template::parse("{bus.width}");
    assert_eq!(template.render(&ctx).unwrap(), "32");
}

#[test]
fn test_escaped_braces_and_lone_close() {
    let template = Template::parse("use {{name}} not {name}; dangling } stays");
    assert_eq!(
        template.render(&context()).unwrap(),
        "use {name} not ctrl; dangling } stays"
    );
}

#[test]
fn test_case_folding() {
    let template = Template::parse("{name:upper} / {name:lower}");
    assert_eq!(template.render(&context()).unwrap(), "CTRL / ctrl");
}

#[test]
fn test_hex_rendering() {
    let template = Template::parse("x\"{absaddr:hex}\" x\"{absaddr:hex:8}\"");
    assert_eq!(template.render(&context()).unwrap(), "x\"40\" x\"00000040\"");
}

#[test]
fn test_removeprefix() {
    let template = Template::parse("{name:removeprefix:ct}{name:removeprefix:xx}");
    assert_eq!(template.render(&context()).unwrap(), "rlctrl");
}

#[test]
fn test_repeat_concatenates_in_order() {
    let mut a = Record::new();
    a.set("x", "a");
    let mut b = Record::new();
    b.set("x", "b");
    let mut ctx = Record::new();
    ctx.set("items", vec![a, b]);
    let template = Template::parse("{items:repeat:{x}}");
    assert_eq!(template.render(&ctx).unwrap(), "ab");
}

#[test]
fn test_repeat_over_empty_sequence_is_empty() {
    let mut ctx = Record::new();
    ctx.set("items", Vec::<Record>::new());
    let template = Template::parse("[{items:repeat:{x},}]");
    assert_eq!(template.render(&ctx).unwrap(), "[]");
}

#[test]
fn test_repeat_element_becomes_the_context() {
    let mut field = Record::new();
    field.set("name", "en");
    field.set("low", 0i64);
    let mut reg = Record::new();
    reg.set("name", "ctrl");
    reg.set("fields", vec![field]);
    let mut ctx = Record::new();
    ctx.set("regs", vec![reg]);
    // the outer key is no longer visible inside the element render
    let template = Template::parse("{regs:repeat:{name}: {fields:repeat:{name}@{low}}}");
    assert_eq!(template.render(&ctx).unwrap(), "ctrl: en@0");
}

#[test]
fn test_if_eq_on_integers() {
    let template = Template::parse("{n:if:eq:n:0:Y}");
    assert_eq!(template.render(&context()).unwrap(), "Y");
    let mut ctx = context();
    ctx.set("n", 1i64);
    assert_eq!(template.render(&ctx).unwrap(), "");
}

#[test]
fn test_if_ordered_comparisons() {
    let mut ctx = Record::new();
    ctx.set("width", 32i64);
    let template = Template::parse("{width:if:gt:width:16:wide}{width:if:le:width:16:narrow}");
    assert_eq!(template.render(&ctx).unwrap(), "wide");
}

#[test]
fn test_if_coerces_numeric_strings() {
    let mut ctx = Record::new();
    ctx.set("count", " 5 ");
    let template = Template::parse("{count:if:ge:count:5:ok}");
    assert_eq!(template.render(&ctx).unwrap(), "ok");
}

#[test]
fn test_if_string_equality_fallback() {
    let mut ctx = Record::new();
    ctx.set("mode", "wire");
    let eq = Template::parse("{mode:if:eq:mode:wire:W}");
    assert_eq!(eq.render(&ctx).unwrap(), "W");
    let ne = Template::parse("{mode:if:ne:mode:storage:S}");
    assert_eq!(ne.render(&ctx).unwrap(), "S");
}

#[test]
fn test_if_ordering_on_non_numeric_reports_and_yields_empty() {
    let mut ctx = Record::new();
    ctx.set("mode", "wire");
    let template = Template::parse("a{mode:if:gt:mode:storage:X}b");
    assert_eq!(template.render(&ctx).unwrap(), "ab");
}

#[test]
fn test_if_on_missing_field_yields_empty() {
    let template = Template::parse("a{n:if:eq:nothere:0:X}b");
    assert_eq!(template.render(&context()).unwrap(), "ab");
}

#[test]
fn test_unknown_key_leaves_visible_marker() {
    let template = Template::parse("a {nothere} b");
    let out = template.render(&context()).unwrap();
    assert!(out.starts_with("a <<template-error:"), "got: {out}");
    assert!(out.contains("nothere"));
    assert!(out.ends_with(" b"), "surrounding text must survive");
}

#[test]
fn test_unknown_directive_leaves_visible_marker() {
    let template = Template::parse("{name:frobnicate:x}");
    let out = template.render(&context()).unwrap();
    assert!(out.contains("<<template-error:"), "got: {out}");
    assert!(out.contains("frobnicate"));
}

#[test]
fn test_malformed_if_is_an_unknown_directive() {
    // too few parts for an `if`, must not be mistaken for a valid one
    let template = Template::parse("{n:if:eq:n}");
    let out = template.render(&context()).unwrap();
    assert!(out.contains("<<template-error:"), "got: {out}");
}

#[test]
fn test_unclosed_brace_leaves_visible_marker() {
    let template = Template::parse("head {name:upper");
    let out = template.render(&context()).unwrap();
    assert!(out.starts_with("head <<template-error:"), "got: {out}");
}

#[test]
fn test_non_scalar_substitution_leaves_marker() {
    let mut ctx = Record::new();
    ctx.set("items", vec![Record::new()]);
    let out = Template::parse("{items}").render(&ctx).unwrap();
    assert!(out.contains("<<template-error:"), "got: {out}");
}

#[test]
fn test_recursion_limit_aborts_the_render() {
    let mut leaf = Record::new();
    leaf.set("x", 1i64);
    let mut mid = Record::new();
    mid.set("items", vec![leaf]);
    let mut ctx = Record::new();
    ctx.set("items", vec![mid]);
    let template = Template::parse_named("deep.in", "{items:repeat:{items:repeat:{x}}}");
    assert_eq!(template.render(&ctx).unwrap(), "1");
    match template.render_with_limit(&ctx, 2) {
        Err(Error::TemplateRecursion { template, limit }) => {
            assert_eq!(template, "deep.in");
            assert_eq!(limit, 2);
        }
        other => panic!("expected a recursion error, got {other:?}"),
    }
}

#[test]
fn test_directive_free_output_renders_to_itself() {
    let template = Template::parse("{name:upper} at {absaddr:hex}");
    let once = template.render(&context()).unwrap();
    let twice = Template::parse(&once).render(&context()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_parse_builds_the_expected_ast() {
    let template = Template::parse("a{k}{k:if:eq:f:v:body}");
    assert_eq!(
        template.items,
        vec![
            Item::Literal("a".to_string()),
            Item::Subst {
                key: "k".to_string(),
                directive: None,
            },
            Item::Subst {
                key: "k".to_string(),
                directive: Some(Directive::If {
                    cmp: Cmp::Eq,
                    field: "f".to_string(),
                    value: "v".to_string(),
                    body: Template::parse("body"),
                }),
            },
        ]
    );
}
