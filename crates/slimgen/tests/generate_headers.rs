//! End-to-end generation over a fake include directory
//!
//! Each test writes the four stock header names into a temp dir and runs the
//! whole pipeline, checking the artifact rather than intermediate values.

use regex::Regex;
use slimgen::{GenError, GeneratorConfig, generate_file, generate_from_dir, load_catalog};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::process::Command;

const INTRIN_H: &str = "\
#pragma once
__MACHINEX86X_X64(__m128 _mm_set1_ps(float))
__MACHINE(unsigned char _BitScanForward(unsigned long *, unsigned long))
";

const XMMINTRIN_H: &str = "\
#ifndef _INCLUDED_MM2
#define _INCLUDED_MM2
extern __m128 _mm_add_ps(__m128 _A, __m128 _B);
extern __m128 _mm_load_ps(float const*_A);
/* target only declared in a later source */
#define _mm_mul_ps _mm_mul_ps_impl
#endif
";

const ZMMINTRIN_H: &str = "\
extern __m512 __cdecl _mm512_roundscale_ps(__m512, const int);
#define _mm512_floor_ps(a) \\
    _mm512_roundscale_ps((a), _MM_FROUND_FLOOR)
extern __m128 __vectorcall _mm_sub_ps_impl(__m128, __m128);
";

const IMMINTRIN_H: &str = "\
extern __m128 _mm_mul_ps_impl(__m128, __m128);
#define _mm_sub_ps _mm_sub_ps_impl
";

/// Names the fake headers make available as entry points
const AVAILABLE: [&str; 6] = [
    "_mm_set1_ps",
    "_mm_add_ps",
    "_mm_load_ps",
    "_mm_sub_ps",
    "_mm512_roundscale_ps",
    "_mm512_floor_ps",
];

fn write_headers(dir: &Path) {
    fs::write(dir.join("intrin.h"), INTRIN_H).unwrap();
    fs::write(dir.join("xmmintrin.h"), XMMINTRIN_H).unwrap();
    fs::write(dir.join("zmmintrin.h"), ZMMINTRIN_H).unwrap();
    fs::write(dir.join("immintrin.h"), IMMINTRIN_H).unwrap();
}

/// Text of one generated struct, from `struct NAME` to its closing `};`
fn struct_body<'a>(text: &'a str, name: &str) -> &'a str {
    let start = text
        .find(&format!("struct {}\n", name))
        .unwrap_or_else(|| panic!("struct {} not generated", name));
    let len = text[start..].find("};\n").expect("struct terminated");
    &text[start..start + len]
}

#[test]
fn test_catalog_from_headers() {
    let dir = tempfile::tempdir().unwrap();
    write_headers(dir.path());

    let catalog = load_catalog(dir.path(), &GeneratorConfig::default().sources).unwrap();
    for name in AVAILABLE {
        assert!(catalog.present(name), "{} should be present", name);
    }
    // Aliased before its target was declared
    assert!(!catalog.present("_mm_mul_ps"));
    assert!(catalog.present("_mm_mul_ps_impl"));
    assert!(catalog.present("_BitScanForward"));
}

#[test]
fn test_generated_header_layout() {
    let dir = tempfile::tempdir().unwrap();
    write_headers(dir.path());

    let text = generate_from_dir(dir.path(), &GeneratorConfig::default()).unwrap();

    let include_at = text.find("#include <cstdint>\n").expect("includes");
    assert!(text.starts_with("// Typed vector wrappers"));
    assert!(text[include_at..].starts_with(
        "#include <cstdint>\n#include <concepts>\n#include <immintrin.h>\n\n"
    ));
    assert!(text.find("struct FLOATX4\n").unwrap() > include_at);

    // All 30 types, in table order, then the concept and clip
    let names: Vec<String> = slimgen::DEFAULT_DESCRIPTORS.iter().map(|d| d.name()).collect();
    let mut last = 0;
    for name in &names {
        let at = text.find(&format!("struct {}\n", name)).unwrap();
        assert!(at >= last, "{} out of order", name);
        last = at;
        assert!(text.contains(&format!("    std::same_as<T, {}>", name)));
    }
    let concept_at = text.find("concept IntrinsicType =").unwrap();
    assert!(concept_at > last);
    assert!(text.find("inline T clip(").unwrap() > concept_at);
    assert!(text.ends_with("    return min(max(a, b), c);\n}\n"));
}

#[test]
fn test_members_follow_catalog() {
    let dir = tempfile::tempdir().unwrap();
    write_headers(dir.path());
    let text = generate_from_dir(dir.path(), &GeneratorConfig::default()).unwrap();

    let floatx4 = struct_body(&text, "FLOATX4");
    assert!(floatx4.contains("v{ _mm_set1_ps(value) }"));
    assert!(floatx4.contains("return _mm_add_ps(v, other.v);"));
    assert!(floatx4.contains("return _mm_sub_ps(v, other.v);"));
    assert!(floatx4.contains("v = _mm_load_ps(src);"));
    assert!(!floatx4.contains("operator*"));
    assert!(!floatx4.contains("store"));
    assert!(!floatx4.contains("loadu"));

    let floatx16 = struct_body(&text, "FLOATX16");
    assert!(floatx16.contains("return _mm512_roundscale_ps(v, Mode);"));
    assert!(floatx16.contains("return _mm512_floor_ps(v);"));
    assert!(floatx16.contains("return round<_MM_FROUND_TO_POS_INF | _MM_FROUND_NO_EXC>();"));

    // Nothing backs any member of an integer type here
    let int8 = struct_body(&text, "INT8X16");
    assert!(int8.contains("    using value_type = __m128i;"));
    assert!(int8.contains("    INT8X16(__m128i other) noexcept"));
    assert!(!int8.contains("_mm"));

    // No free function has an entry point
    assert!(!text.contains("static inline"));
}

#[test]
fn test_only_catalog_names_referenced() {
    let dir = tempfile::tempdir().unwrap();
    write_headers(dir.path());
    let text = generate_from_dir(dir.path(), &GeneratorConfig::default()).unwrap();

    let call = Regex::new(r"\b(_mm\d*_\w+)\(").unwrap();
    let referenced: HashSet<&str> = call
        .captures_iter(&text)
        .map(|c| c.get(1).unwrap().as_str())
        .collect();
    let available: HashSet<&str> = AVAILABLE.into_iter().collect();
    assert!(
        referenced.is_subset(&available),
        "unexpected: {:?}",
        referenced.difference(&available).collect::<Vec<_>>()
    );
    assert!(referenced.contains("_mm_add_ps"));
}

#[test]
fn test_source_order_changes_alias_resolution() {
    let dir = tempfile::tempdir().unwrap();
    write_headers(dir.path());

    // Reading immintrin.h first: its alias now precedes the zmmintrin.h target
    let config = GeneratorConfig::new().with_sources([
        "intrin.h",
        "immintrin.h",
        "xmmintrin.h",
        "zmmintrin.h",
    ]);
    let catalog = load_catalog(dir.path(), &config.sources).unwrap();
    assert!(!catalog.present("_mm_sub_ps"));
    // and the xmmintrin.h alias now follows its target
    assert!(catalog.present("_mm_mul_ps"));

    let text = generate_from_dir(dir.path(), &config).unwrap();
    let floatx4 = struct_body(&text, "FLOATX4");
    assert!(!floatx4.contains("operator-"));
    assert!(floatx4.contains("return _mm_mul_ps(v, other.v);"));
}

#[test]
fn test_missing_header_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_headers(dir.path());
    fs::remove_file(dir.path().join("zmmintrin.h")).unwrap();

    let output = dir.path().join("slimmintrin.h");
    let config = GeneratorConfig::new().with_output(&output);
    match generate_file(dir.path(), &config) {
        Err(GenError::Io { path, .. }) => assert!(path.ends_with("zmmintrin.h")),
        other => panic!("expected Io error, got {:?}", other),
    }
    assert!(!output.exists());
}

#[test]
fn test_empty_header_is_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_headers(dir.path());
    fs::write(dir.path().join("intrin.h"), "").unwrap();

    let text = generate_from_dir(dir.path(), &GeneratorConfig::default()).unwrap();
    let floatx4 = struct_body(&text, "FLOATX4");
    assert!(!floatx4.contains("_mm_set1_ps"));
    assert!(floatx4.contains("_mm_add_ps"));
}

#[test]
fn test_generate_file_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    write_headers(dir.path());
    let output = dir.path().join("out.h");

    let config = GeneratorConfig::new().with_output(&output).with_banner("");
    let written = generate_file(dir.path(), &config).unwrap();
    assert_eq!(written, output);

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("#include <cstdint>\n"));
    assert_eq!(text, generate_from_dir(dir.path(), &config).unwrap());
}

#[test]
fn test_cli_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    write_headers(dir.path());
    let output = dir.path().join("cli.h");

    let status = Command::new(env!("CARGO_BIN_EXE_slimgen"))
        .arg(dir.path())
        .arg("--output")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(fs::read_to_string(&output).unwrap().contains("struct UINT64X8\n"));
}

#[test]
fn test_cli_fails_on_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("never.h");

    let status = Command::new(env!("CARGO_BIN_EXE_slimgen"))
        .arg(dir.path().join("no-such-dir"))
        .arg("-o")
        .arg(&output)
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!output.exists());

    // Missing positional argument is a usage error
    let status = Command::new(env!("CARGO_BIN_EXE_slimgen")).status().unwrap();
    assert!(!status.success());
}
