//! Probe source emission.

use std::fmt::Write;

use crate::TypeEntry;

/// Reserved object-file section holding the probe's type records.
pub const TYPE_MAP_SECTION: &str = "__twl_type_map";

/// Make a type name usable as a C identifier suffix.
#[must_use]
pub fn sanitize_ident(name: &str) -> String {
    name.replace(' ', "_").replace('*', "_pointer")
}

/// Width of the fixed name field: longest requested name plus the NUL.
#[must_use]
pub fn name_field_width(types: &[TypeEntry]) -> usize {
    types.iter().map(|t| t.name.len()).max().unwrap_or(0) + 1
}

/// Emit the probe translation unit.
///
/// One packed record per requested type is placed into
/// [`TYPE_MAP_SECTION`], its length field initialized to `sizeof(type)`;
/// the target compiler evaluates the sizes. A trailing empty-name record
/// terminates the section for the decoder.
#[must_use]
pub fn probe_source(types: &[TypeEntry], prefix_code: &str, headers: &str) -> String {
    let width = name_field_width(types);

    let mut out = String::new();
    out.push_str(headers);
    out.push_str(prefix_code);
    out.push('\n');

    writeln!(out, "struct type_map {{").expect("formatting probe");
    writeln!(out, "  char name[{width}];").expect("formatting probe");
    writeln!(out, "  char tag_s;").expect("formatting probe");
    writeln!(out, "  int32_t len;").expect("formatting probe");
    writeln!(out, "  char tag_e;").expect("formatting probe");
    writeln!(out, "}} __attribute__((packed));").expect("formatting probe");
    out.push('\n');

    for t in types {
        emit_record(&mut out, &sanitize_ident(&t.name), &t.name);
    }

    // Empty-name terminator record; the decoder stops here.
    writeln!(
        out,
        "static struct type_map __type_map_end __attribute__((used, \
         section(\"{TYPE_MAP_SECTION}\"))) ="
    )
    .expect("formatting probe");
    writeln!(out, "  {{ .name = \"\", .tag_s = '[', .len = 0, .tag_e = ']' }};")
        .expect("formatting probe");

    out
}

fn emit_record(out: &mut String, ident: &str, name: &str) {
    writeln!(
        out,
        "static struct type_map __type_map_{ident} __attribute__((used, \
         section(\"{TYPE_MAP_SECTION}\"))) ="
    )
    .expect("formatting probe");
    writeln!(
        out,
        "  {{ .name = \"{name}\", .tag_s = '[', .len = sizeof({name}), .tag_e = ']' }};"
    )
    .expect("formatting probe");
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_ident() {
        assert_eq!(sanitize_ident("unsigned int"), "unsigned_int");
        assert_eq!(sanitize_ident("char*"), "char_pointer");
        assert_eq!(sanitize_ident("struct point*"), "struct_point_pointer");
    }

    #[test]
    fn test_name_field_width() {
        let types = vec![TypeEntry::new("int"), TypeEntry::new("double")];
        assert_eq!(name_field_width(&types), 7);
        assert_eq!(name_field_width(&[]), 1);
    }

    #[test]
    fn test_probe_source_layout() {
        let types = vec![TypeEntry::new("int"), TypeEntry::new("char*")];
        let src = probe_source(&types, "typedef int myint;\n", "#include <stdint.h>\n");

        assert!(src.starts_with("#include <stdint.h>\n"));
        assert!(src.contains("typedef int myint;"));
        // Name field sized to the longest name plus NUL.
        assert!(src.contains("char name[6];"));
        assert!(src.contains("__attribute__((packed));"));
        assert!(src.contains("static struct type_map __type_map_int"));
        assert!(src.contains("section(\"__twl_type_map\")"));
        assert!(src.contains(".len = sizeof(int)"));
        assert!(src.contains("__type_map_char_pointer"));
        assert!(src.contains(".len = sizeof(char*)"));
        // Terminator record present and last.
        let end = src.find("__type_map_end").unwrap();
        assert!(end > src.find("__type_map_char_pointer").unwrap());
        assert!(src.contains(".name = \"\", .tag_s = '[', .len = 0"));
    }
}
