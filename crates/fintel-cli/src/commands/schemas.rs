//! Schemas command - list supported document types.

use console::style;

use fintel_core::DocumentType;

pub fn run() -> anyhow::Result<()> {
    for doc_type in DocumentType::ALL {
        let schema = doc_type.schema();
        println!(
            "{} ({})",
            style(schema.name).bold(),
            schema.color_scale.as_str()
        );
        for field in schema.fields {
            println!("  - {}", field);
        }
        println!();
    }
    Ok(())
}
