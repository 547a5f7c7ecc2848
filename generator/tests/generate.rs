// Licensed under the Apache-2.0 license

//! Whole-pipeline checks: elaborated model in, rendered text out.

use regspace_generator::{build_contexts, Emitter, GeneratorConfig, Template, WriteMode};
use regspace_model::{build, AddressSpace, NodeSpec};

fn device_space() -> AddressSpace {
    build(vec![NodeSpec::addrmap("dev")
        .prop("access_channel", 0i64)
        .child(
            NodeSpec::reg("ctrl", 0x0, 32).type_name("CTRL").child(
                NodeSpec::field("mode", 0, 4)
                    .prop("reset", 5i64)
                    .prop("sw", "rw")
                    .prop("hw", "r"),
            ),
        )
        .child(NodeSpec::mem("buf", 0x100, 4, 32))])
    .unwrap()
}

#[test]
fn test_register_and_memory_lines() {
    let space = device_space();
    let contexts = build_contexts(&space, &GeneratorConfig::with_defaults());
    assert_eq!(contexts.len(), 1);
    let ctx = contexts.into_iter().next().unwrap().unwrap();

    let regs = Template::parse("{regitems:repeat:{name}@{absaddr} }");
    assert_eq!(regs.render(&ctx.record).unwrap(), "ctrl@0 ");

    let mems = Template::parse("{memitems:repeat:{name}[{entries}] }");
    assert_eq!(mems.render(&ctx.record).unwrap(), "buf[4] ");
}

#[test]
fn test_field_keys_flow_to_the_type_table() {
    let space = device_space();
    let contexts = build_contexts(&space, &GeneratorConfig::with_defaults());
    let ctx = contexts.into_iter().next().unwrap().unwrap();

    let types = Template::parse(
        "{regtypes:repeat:{name} w{width} {fields:repeat:[{high}:{low}] mask={mask:hex} rst={reset}}}",
    );
    assert_eq!(
        types.render(&ctx.record).unwrap(),
        "CTRL w32 [3:0] mask=f rst=5"
    );
}

#[test]
fn test_pipeline_writes_files() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = dir.path().join("regs.txt.in");
    std::fs::write(&tpl, "{name}: {regitems:repeat:{name}@{absaddr} }\n").unwrap();

    let space = device_space();
    let ctx = build_contexts(&space, &GeneratorConfig::with_defaults())
        .into_iter()
        .next()
        .unwrap()
        .unwrap();

    let out = dir.path().join("out");
    let mut emitter = Emitter::new(&out, WriteMode::Overwrite);
    let dest = emitter
        .process_template(&tpl, "{name}_regs.txt", &ctx.record)
        .unwrap();

    assert_eq!(dest, out.join("dev_regs.txt"));
    assert_eq!(
        std::fs::read_to_string(&dest).unwrap(),
        "dev: ctrl@0 \n"
    );
}
