use quotediff_core::error::QuoteDiffError;
use quotediff_core::vocab::{builtin, Vocabulary};
use std::path::Path;

pub fn list() -> Result<(), QuoteDiffError> {
    println!("Available predefined vocabularies:\n");
    for name in builtin::PRESETS {
        let def = builtin::load_preset(name)?;
        let default_marker = if *name == builtin::DEFAULT_PRESET {
            " [default]"
        } else {
            ""
        };
        println!("  {:<8} {} (v{}){}", name, def.name, def.version, default_marker);
        if let Some(ref desc) = def.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), QuoteDiffError> {
    let def = builtin::load_preset(preset)?;

    println!("{} (version {})\n", def.name, def.version);
    if let Some(ref desc) = def.description {
        println!("{}\n", desc);
    }

    println!(
        "Lines are grouped under {} section headers (before the first header: \"{}\"):\n",
        def.section_headers.len(),
        def.default_section
    );
    println!("  {}\n", def.section_headers.join(", "));

    println!("A specification line starts with an UPPERCASE feature, followed by any of:");
    println!("  option code   OP + 6 digits (e.g. OP000412)");
    println!("  quantity      number + EA, LF, SF or D$ (e.g. 1,316 SF)");
    println!("  price         Standard, or an amount with two decimals (e.g. 4,250.00)");
    println!("  variant       first listed color/material found in the line");
    println!("  description   whatever text is left\n");

    println!("Variants, in priority order:");
    println!("  {}\n", def.variants.join(", "));

    println!(
        "Lines starting with {} continue the previous line's description.\n",
        def.continuation_markers
            .iter()
            .map(|m| format!("\"{m}\""))
            .collect::<Vec<_>>()
            .join(", ")
    );

    let bp = &def.boilerplate;
    println!("Dropped as boilerplate:");
    if !bp.prefixes.is_empty() {
        println!("  lines starting with: {}", bp.prefixes.join(", "));
    }
    if !bp.contains.is_empty() {
        println!("  lines containing:    {}", bp.contains.join(", "));
    }
    println!("  page numbers (\"Page 3 of 12\")");
    if let Some(ref header) = bp.column_header {
        println!("  the column header:   {}", header);
    }
    println!();

    if !def.labels.is_empty() {
        println!("Variable labels:\n");
        let width = def.labels.iter().map(|l| l.label.len()).max().unwrap_or(10);
        for label in &def.labels {
            println!("  {:<width$}  -> {}", label.label, label.name, width = width);
        }
        println!();
    }

    if !def.code_offsets.is_empty() {
        println!("Option codes whose value is read further down the page:");
        for (code, offset) in &def.code_offsets {
            println!("  {}  {} line(s) below", code, offset);
        }
        println!();
    }

    if !def.aliases.is_empty() {
        println!("Fields compared across formats:");
        for alias in &def.aliases {
            println!("  {}  <->  {}", alias.a, alias.b);
        }
        println!();
    }

    Ok(())
}

pub fn schema() -> Result<(), QuoteDiffError> {
    print!(
        r#"JSON Vocabulary Schema
======================

A vocabulary describes one vendor's specification layout: which lines are
section headers, which words are variants, what is boilerplate, and which
labels carry variables. `quotediff parse` and `quotediff compare` use it to
turn document text into structured lines and variables.

Top-level fields:
  name                 (string, required)  Human-readable name
  description          (string, optional)  What documents this describes
  version              (string, required)  Version identifier (e.g., "2024.1")
  default_section      (string, optional)  Section for lines before the first
                                           header. Default: "Miscellaneous"
  section_headers      (array, required)   Exact header lines, e.g. "Kitchen"
  variants             (array, optional)   Color/material names in priority
                                           order; the first one found in a
                                           line wins
  continuation_markers (array, optional)   Line prefixes that continue the
                                           previous description.
                                           Default: ["**", "..", "-", "~"]
  boilerplate          (object, optional)
    prefixes           (array)             Drop lines starting with these
    contains           (array)             Drop lines containing these,
                                           unless they carry an option code
    column_header      (string)            Drop this header row (whitespace
                                           is ignored when comparing)
  labels               (array, optional)   {{ "label", "name" }} pairs: text
                                           after "label" becomes variable
                                           "name". Names must be unique.
  code_offsets         (object, optional)  Option code -> number of lines
                                           (1-100) below the code where its
                                           value is printed
  aliases              (array, optional)   {{ "a", "b" }} pairs: field "a" in
                                           one document is compared with
                                           field "b" in the other
  embedded_labels      (array, optional)   Field names that values sometimes
                                           repeat ("Roof Pitch 4/12"); removed
                                           before fuzzy matching

Example:
{{
  "name": "Acme dealer quote",
  "version": "1.0",
  "section_headers": ["Exterior", "Kitchen", "Bath"],
  "variants": ["Brushed Nickel", "White", "Almond"],
  "boilerplate": {{
    "prefixes": ["Page", "Quote #"],
    "column_header": "Feature Option Description Price"
  }},
  "labels": [
    {{ "label": "Exterior Siding", "name": "Siding" }},
    {{ "label": "Siding Color", "name": "Siding Color" }}
  ],
  "code_offsets": {{ "OP000412": 15 }},
  "aliases": [{{ "a": "Siding Color", "b": "OP000412" }}],
  "embedded_labels": ["roof pitch"]
}}
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), QuoteDiffError> {
    let def = quotediff_core::vocab::load_vocabulary(file)?;
    let vocab = Vocabulary::compile(def)?;
    let def = vocab.def();

    println!("Vocabulary '{}' (v{}) is valid.", def.name, def.version);
    println!("  Sections: {}", def.section_headers.len());
    println!("  Variants: {}", def.variants.len());
    println!("  Labels: {}", def.labels.len());

    // Potential issues, not errors
    let mut warnings = Vec::new();
    let names: Vec<&str> = def.labels.iter().map(|l| l.name.as_str()).collect();
    for alias in &def.aliases {
        let known = |field: &str| names.contains(&field) || def.code_offsets.contains_key(field);
        if !known(&alias.a) && !known(&alias.b) {
            warnings.push(format!(
                "alias '{}' <-> '{}' names no label or offset code",
                alias.a, alias.b
            ));
        }
    }
    if def.boilerplate.column_header.is_none() {
        warnings.push("no column_header: the table header row will be parsed as text".into());
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
