use std::path::Path;

fn main() {
    let registry_path = Path::new("registries/x12_837p.json");
    validate_registry_file(registry_path);
    set_build_dependencies();
}

fn validate_registry_file(registry_path: &Path) {
    // Ensure the embedded registry exists at build time
    assert!(
        registry_path.exists(),
        "\n\nREGISTRY BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the registry file before building.\n",
        registry_path.display()
    );

    let registry_contents = std::fs::read_to_string(registry_path).unwrap_or_else(|e| {
        panic!(
            "\n\nREGISTRY BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            registry_path.display()
        );
    });

    let registry: serde_json::Value = serde_json::from_str(&registry_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nREGISTRY BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            registry_path.display()
        );
    });

    validate_registry_structure(&registry);
}

fn validate_registry_structure(registry: &serde_json::Value) {
    assert!(
        registry.is_object(),
        "\n\nREGISTRY BUILD ERROR: Root must be a JSON object\n\
         Got: {registry}\n"
    );

    let mut segment_count = 0;
    for field in ["numbered_segments", "plain_segments", "two_letter_segments"] {
        let value = registry.get(field).unwrap_or_else(|| {
            panic!(
                "\n\nREGISTRY BUILD ERROR: Missing '{field}' field\n\
                 The registry must have a top-level '{field}' array.\n"
            );
        });
        let segments = value.as_array().unwrap_or_else(|| {
            panic!(
                "\n\nREGISTRY BUILD ERROR: '{field}' must be an array\n\
                 Got: {value}\n"
            );
        });
        for (i, segment) in segments.iter().enumerate() {
            validate_segment_tag(segment, field, i);
        }
        segment_count += segments.len();
    }

    let qualifiers = registry
        .get("loop_qualifiers")
        .and_then(|v| v.as_array())
        .unwrap_or_else(|| {
            panic!(
                "\n\nREGISTRY BUILD ERROR: Missing or invalid 'loop_qualifiers' field\n\
                 The registry must have a top-level 'loop_qualifiers' array.\n"
            );
        });
    for (i, entry) in qualifiers.iter().enumerate() {
        validate_loop_qualifier(entry, i);
    }

    println!(
        "cargo:warning=Validated registry: {segment_count} segment tags, {} loop qualifiers",
        qualifiers.len()
    );
}

fn validate_segment_tag(segment: &serde_json::Value, field: &str, index: usize) {
    let tag = segment.as_str().unwrap_or_else(|| {
        panic!("\n\nREGISTRY BUILD ERROR: '{field}' entry {index} must be a string\n")
    });

    assert!(
        (2..=4).contains(&tag.len()),
        "\n\nREGISTRY BUILD ERROR: '{field}' tag '{tag}' must be 2-4 characters\n"
    );
    assert!(
        tag.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
        "\n\nREGISTRY BUILD ERROR: '{field}' tag '{tag}' must be uppercase alphanumeric\n"
    );
}

fn validate_loop_qualifier(entry: &serde_json::Value, index: usize) {
    assert!(
        entry.get("segment").and_then(|v| v.as_str()).is_some(),
        "\n\nREGISTRY BUILD ERROR: loop_qualifiers entry {index} missing 'segment' field\n"
    );

    let loop_prefix = entry
        .get("loop_prefix")
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| {
            panic!(
                "\n\nREGISTRY BUILD ERROR: loop_qualifiers entry {index} missing 'loop_prefix' field\n"
            );
        });

    // Loop ids are 4 digits plus up to 2 uppercase letters
    let (digits, letters) = loop_prefix.split_at(loop_prefix.len().min(4));
    assert!(
        digits.len() == 4
            && digits.chars().all(|c| c.is_ascii_digit())
            && letters.len() <= 2
            && letters.chars().all(|c| c.is_ascii_uppercase()),
        "\n\nREGISTRY BUILD ERROR: loop_qualifiers entry {index} has invalid loop prefix '{loop_prefix}'\n\
         Expected 4 digits optionally followed by up to 2 uppercase letters.\n"
    );
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the registry changes
    println!("cargo:rerun-if-changed=registries/x12_837p.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
