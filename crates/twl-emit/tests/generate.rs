//! Whole-file generation tests.

use twl_emit::{CtfEmitter, EmitError, PlainEmitter, generate};
use twl_model::{Function, Generator, ModelError, Signature, Slot, Tracer, UserType};

fn test_tracer() -> Tracer {
    let mut io = Function::new("io");
    io.headers.push("#include <unistd.h>".to_string());
    io.add_signature(Signature::new(
        "read",
        vec!["int".into(), "void*".into(), "size_t".into()],
        "ssize_t",
    ));
    io.add_signature(Signature::new("sync", vec![], ""));

    let mut mem = Function::new("mem");
    mem.headers.push("#include <stdlib.h>".to_string());
    mem.add_signature(Signature::new("malloc", vec!["size_t".into()], "void*"));

    let mut generator = Generator::new("buffer-trace");
    generator.headers.push("#include <stdint.h>".to_string());
    generator.set_template(Slot::BufferLocal, " uint32_t in;");
    generator.set_template(Slot::EntryAlloc, "in = trace_alloc(@FUNC_DATA_ENTRY_SIZE@);");
    generator.set_template(Slot::EntryTrace, "trace_entry(@FUNC_INDEX@, in);");
    generator.set_template(Slot::ArgTrace, "trace_arg(in, @ARG_SIZE@, &@ARG_LABEL@);");
    generator.set_template(Slot::ExitTrace, "trace_exit(@FUNC_INDEX@, in);");
    generator.set_template(Slot::RetTrace, "trace_ret(in, @RET_SIZE@, &@RET_LABEL@);");

    let mut tracer = Tracer::new("itest");
    tracer.traces = vec!["read".into(), "sync".into(), "malloc".into()];
    tracer.enables = vec!["read".into(), "malloc".into()];
    tracer.functions = vec![io, mem];
    tracer.generator = generator;
    tracer
}

#[test]
fn test_plain_generation_layout() {
    let tracer = test_tracer();
    let mut out = String::new();
    generate(&tracer, &mut PlainEmitter::new(), &mut out).unwrap();

    // preamble before tables, tables before wrappers
    let functions = out.find(" * Functions.").unwrap();
    let names = out.find(" * Names.").unwrap();
    let sigs = out.find(" * Signatures.").unwrap();
    let enables = out.find(" * Enables.").unwrap();
    let triggers = out.find(" * Triggers.").unwrap();
    let wrappers = out.find(" * Wrappers.").unwrap();
    assert!(functions < names);
    assert!(names < sigs);
    assert!(sigs < enables);
    assert!(enables < triggers);
    assert!(triggers < wrappers);

    // headers of both traced functions present
    assert!(out.contains("#include <unistd.h>"));
    assert!(out.contains("#include <stdlib.h>"));

    // one wrapper per trace, in declared order
    let read_at = out.find("ssize_t __wrap_read(").unwrap();
    let sync_at = out.find("void __wrap_sync(void)").unwrap();
    let malloc_at = out.find("void* __wrap_malloc(").unwrap();
    assert!(read_at < sync_at);
    assert!(sync_at < malloc_at);

    // trace indices follow the declared order
    assert!(out.contains(" trace_entry(0, in);"));
    assert!(out.contains(" trace_entry(1, in);"));
    assert!(out.contains(" trace_entry(2, in);"));

    // no unreplaced tokens anywhere
    assert!(!out.contains('@'));
}

#[test]
fn test_unknown_trace_aborts() {
    let mut tracer = test_tracer();
    tracer.traces.insert(0, "mystery".into());
    let mut out = String::new();
    let err = generate(&tracer, &mut PlainEmitter::new(), &mut out).unwrap_err();
    match err {
        EmitError::Model(ModelError::TraceNotFound(name)) => assert_eq!(name, "mystery"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_disabled_tables_absent() {
    let mut tracer = test_tracer();
    tracer.options.set("gen-names", "disable");
    tracer.options.set("gen-sigs", "disable");
    tracer.options.set("gen-enables", "disable");
    tracer.options.set("gen-triggers", "disable");

    let mut out = String::new();
    generate(&tracer, &mut PlainEmitter::new(), &mut out).unwrap();

    assert!(!out.contains("__twl_trace_names"));
    assert!(!out.contains("__twl_trace_signatures"));
    assert!(!out.contains("__twl_trace_enables"));
    assert!(!out.contains("__twl_trace_triggers"));
    assert!(out.contains("__wrap_read"));
}

#[test]
fn test_ctf_stream_and_event_ids() {
    let tracer = test_tracer();
    let mut out = String::new();
    let mut emitter = CtfEmitter::new();
    generate(&tracer, &mut emitter, &mut out).unwrap();
    let metadata = emitter.metadata();

    // one stream per trace keyed by its position
    for (index, trace) in tracer.traces.iter().enumerate() {
        assert!(metadata.contains(&format!("    id = {index};")));
        assert!(metadata.contains(&format!("    name = \"{trace}_entry\";")));
        assert!(metadata.contains(&format!("    name = \"{trace}_exit\";")));
    }

    // entry/exit events carry ids 0 and 1 and the right stream id
    let read_entry = metadata.find("name = \"read_entry\";").unwrap();
    let read_exit = metadata.find("name = \"read_exit\";").unwrap();
    assert!(read_entry < read_exit);
    let entry_block = &metadata[..read_entry];
    assert!(entry_block.ends_with("    id = 0;\n    "));
    let exit_block = &metadata[..read_exit];
    assert!(exit_block.ends_with("    id = 1;\n    "));

    // malloc is trace 2: its events name stream 2
    let malloc_entry = metadata.find("name = \"malloc_entry\";").unwrap();
    let after = &metadata[malloc_entry..];
    assert!(after.starts_with("name = \"malloc_entry\";\n    stream_id = 2;"));
}

#[test]
fn test_ctf_entry_fields_and_ret() {
    let tracer = test_tracer();
    let mut out = String::new();
    let mut emitter = CtfEmitter::new();
    generate(&tracer, &mut emitter, &mut out).unwrap();
    let metadata = emitter.metadata();

    // fixed header fields plus one field per argument, types verbatim
    assert!(metadata.contains("        uint32_t func_index;"));
    assert!(metadata.contains("        uint32_t executing_thread;"));
    assert!(metadata.contains("        uint32_t executing_status;"));
    assert!(metadata.contains("        uint64_clock_monotonic_t now;"));
    assert!(metadata.contains("        int a1;"));
    assert!(metadata.contains("        void* a2;"));
    assert!(metadata.contains("        size_t a3;"));

    // return field only on exits of traces with a return value
    assert!(metadata.contains("        ssize_t ret;"));
    assert!(metadata.contains("        void* ret;"));

    // preamble blocks with placeholder clock values
    assert!(metadata.starts_with("/* CTF 1.8 */"));
    assert!(metadata.contains("trace {\n    major = 1;\n    minor = 8;\n    byte_order = le;"));
    assert!(metadata.contains("freq = @CLOCK_FREQ@;"));
    assert!(metadata.contains("offset_s = @CLOCK_OFFSET_S@;"));
}

#[test]
fn test_ctf_user_type_translation() {
    let mut tracer = test_tracer();
    tracer.types.push(UserType::new(
        "enumeration state",
        vec!["st_idle".into(), "st_run".into()],
    ));
    tracer
        .types
        .push(UserType::new("packet", vec!["uint32_t len".into(), "uint8_t kind".into()]));
    tracer
        .types
        .push(UserType::with_size("ident", vec!["unsigned int".into()], 4));

    let mut out = String::new();
    let mut emitter = CtfEmitter::new();
    generate(&tracer, &mut emitter, &mut out).unwrap();
    let metadata = emitter.metadata();

    assert!(metadata.contains(
        "enum state : integer { size = 32; align = 8; signed = true; } { st_idle, st_run, };"
    ));
    assert!(metadata.contains("struct packet {\n    uint32_t len;\n    uint8_t kind;\n};"));
    assert!(
        metadata.contains("typealias integer { size = 32; align = 8; signed = false; } := ident;")
    );
}

#[test]
fn test_ctf_code_matches_plain() {
    // The CTF backend emits the same wrapper code as the plain backend.
    let tracer = test_tracer();
    let mut plain_out = String::new();
    generate(&tracer, &mut PlainEmitter::new(), &mut plain_out).unwrap();
    let mut ctf_out = String::new();
    generate(&tracer, &mut CtfEmitter::new(), &mut ctf_out).unwrap();
    assert_eq!(plain_out, ctf_out);
}
